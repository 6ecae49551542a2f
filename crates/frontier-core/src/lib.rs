//! Frontier - the rules engine for a settlement-building board game
//!
//! This crate provides the full game logic for Frontier, including:
//! - Grid coordinate system for tiles, vertices and edges
//! - Board representation with placement legality and longest-road
//!   computation
//! - Per-player cards, pieces and achievements
//! - Game state machine with full rule enforcement
//!
//! The engine is deliberately transport-agnostic: one caller performs
//! one mutating operation on a [`game::Game`] at a time, and every rule
//! violation comes back as an [`error::Error`] with the game unchanged.
//!
//! # Modules
//!
//! - [`grid`]: Coordinate system for tiles, vertices and edges
//! - [`constants`]: Fixed quantities of the base game
//! - [`board`]: Board state and placement legality
//! - [`player`]: Per-player cards, pieces and achievements
//! - [`game`]: Turn/phase state machine
//! - [`error`]: The shared error taxonomy

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod grid;
pub mod player;

// Re-export commonly used types
pub use board::{Board, House, LongestRoadInfo, Port, PortType, Road, Tile, TileType};
pub use error::Error;
pub use game::{Game, GamePhase, GameSubPhase, TradeOffer};
pub use grid::{TileCoords, VertexCoords};
pub use player::{
    DevelopmentCardHand, DevelopmentCardType, Player, PlayerColour, ResourceHand, ResourceType,
};
