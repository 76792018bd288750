//! Chatdeck is a terminal chat client that keeps several conversations side
//! by side and answers through a simulated responder or a remote
//! text-generation API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation store, attachment handling, response
//!   providers and the [`core::controller::ChatController`] that ties them
//!   together.
//! - [`commands`] parses the slash commands typed in an interactive session.
//! - [`cli`] defines the command-line surface and runs the interactive loop.
//! - [`api`] defines the request/response payloads of the remote providers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
