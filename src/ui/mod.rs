//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that feeds key presses to the
//!   conversation controller and collects endpoint replies.
//! - [`keybindings`]: key dispatch for the input line and history list.
//! - [`renderer`] and [`transcript`]: frame layout and message lines.
//! - [`theme`] and [`view`]: styles and UI-only state.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns the conversation and its history.

pub mod chat_loop;
pub mod keybindings;
pub mod lifecycle;
pub mod renderer;
pub mod theme;
pub mod transcript;
pub mod view;
