//! Game hosting on top of `frontier-core`.
//!
//! This crate keeps many concurrent games alive behind a TTL-based
//! snapshot store, exposes one manager method per game action, and
//! renders per-player views that hide what a player should not see.

pub mod manager;
pub mod store;
pub mod view;

pub use manager::{GameManager, DEFAULT_SNAPSHOT_TTL};
pub use store::{InMemoryStore, SnapshotStore};
pub use view::{BoardView, HouseView, OpponentView, OwnPlayerView, PlayerGameView};
