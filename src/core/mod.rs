pub mod config;
pub mod conversation;
pub mod endpoint;
pub mod formatter;
pub mod message;
pub mod session;
pub mod session_store;
pub mod storage;
