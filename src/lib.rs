//! Shanai is a terminal chat client for Gemini-style text generation
//! endpoints that keeps every completed conversation for later.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state machine, reply segmentation, the
//!   saved session history and its persistence, and configuration.
//! - [`api`] defines the request/response payloads of the endpoint.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`cli`] parses arguments and dispatches to the chat, one-shot and
//!   history commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
