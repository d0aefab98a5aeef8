//! Per-user session state and its persistence contract.

pub mod model;
pub mod ordered_set;
pub mod repository;

pub use model::{Session, TurnRecord};
pub use ordered_set::OrderedSet;
pub use repository::SessionRepository;
