//! Stephen Wolf is a full-screen terminal chat page that talks to a hosted
//! inference API through a selectable persona.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the persona and model registries, the per-session
//!   conversation state, the streaming completion client, and the
//!   conversation controller that drives each turn.
//! - [`ui`] renders the terminal page and runs the interactive event loop.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the chat-completion payloads exchanged with the service.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
