//! The dialogue state machine.
//!
//! [`Engine::resolve_turn`] turns one user utterance into one reply: load
//! the session, run the moderation pre-filter, walk the priority-ordered
//! cascade of resolution stages, persist the mutated session, and hand the
//! reply back to the transport. No error crosses that boundary; every
//! failure path degrades to a textual reply.

pub mod context;
pub mod engine;
pub mod stages;
pub mod tone;

pub use context::EngineContext;
pub use engine::Engine;
