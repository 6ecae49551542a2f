//! Errors returned by game operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong when acting on a game. Rule violations
/// and sequencing violations are both rejected with a variant from this
/// enum, and the game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Error {
    #[error("no game exists with the given id")]
    GameNotFound,

    #[error("games need three or four players")]
    InvalidPlayerCount,

    #[error("the player colour is not part of this game")]
    InvalidPlayerColour,

    #[error("the action is not allowed in the current phase or sub-phase")]
    InvalidGamePhase,

    #[error("nothing can be built at that location")]
    InvalidBuildLocation,

    #[error("no development card can be bought right now")]
    CannotBuyDevelopmentCard,

    #[error("the development card cannot be played")]
    CannotPlayDevelopmentCard,

    #[error("a development card was already played this turn")]
    AlreadyPlayedDevelopmentCard,

    #[error("the robber cannot be moved to that location")]
    CannotMoveRobberToLocation,

    #[error("no resource can be stolen from that player")]
    CannotStealResource,

    #[error("the discard request is not valid")]
    CannotDiscardResources,

    #[error("the bank trade is not available")]
    CannotTradeWithBank,

    #[error("the embargo request is not valid")]
    CannotEmbargoPlayer,
}
