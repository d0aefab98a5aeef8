//! Domain layer of the Alfred conversational engine.
//!
//! This crate holds the entities and contracts the rest of the workspace
//! is built on: the per-user [`session::Session`] record, intent
//! definitions, the product and recommendation catalogs, the promotional
//! calendar, the embedded tic-tac-toe game, the moderation pre-filter, and
//! the repository traits that decouple the engine from storage.

pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod intent;
pub mod moderation;
pub mod promo;
pub mod session;

pub use error::{AlfredError, Result};
