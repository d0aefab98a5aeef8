//! Infrastructure layer: file-backed repositories and static-data loaders.
//!
//! Sessions live as one JSON file per user, the learned-intent overlay as
//! a single JSON file, and the static data sources (intent definitions,
//! dialogue corpus, product catalog, sentiment lexicon) load once at
//! startup via the functions in [`data`].

pub mod data;
pub mod json_learned_intent_repository;
pub mod json_session_repository;
pub mod paths;

pub use json_learned_intent_repository::JsonLearnedIntentRepository;
pub use json_session_repository::JsonSessionRepository;
pub use paths::AlfredPaths;
