//! Player-scoped snapshots of a game.
//!
//! A view is built for one colour: that player sees their own hand in
//! full, but only card totals for everyone else. Victory points hidden
//! in other players' development cards stay hidden.

use std::collections::BTreeMap;

use frontier_core::{
    DevelopmentCardHand, Error, Game, GamePhase, GameSubPhase, House, LongestRoadInfo, Player,
    PlayerColour, Port, ResourceHand, Road, Tile, TileCoords, VertexCoords,
};
use serde::Serialize;

/// A house that actually stands somewhere.
#[derive(Debug, Clone, Serialize)]
pub struct HouseView {
    pub coords: VertexCoords,
    pub house: House,
}

/// The board as everyone sees it; nothing here is secret.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub tiles: Vec<Tile>,
    pub houses: Vec<HouseView>,
    pub roads: Vec<Road>,
    pub ports: Vec<Port>,
    pub robber_position: TileCoords,
    pub longest_road: LongestRoadInfo,
}

/// The requesting player's own ledger, hands included.
#[derive(Debug, Clone, Serialize)]
pub struct OwnPlayerView {
    pub colour: PlayerColour,
    pub resource_cards: ResourceHand,
    pub playable_development_cards: DevelopmentCardHand,
    pub on_hold_development_cards: DevelopmentCardHand,
    pub remaining_roads: u32,
    pub remaining_settlements: u32,
    pub remaining_cities: u32,
    pub knights_played: u32,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
    pub victory_points: u32,
    pub embargoed_players: Vec<PlayerColour>,
}

/// Another player as seen from outside: totals only.
#[derive(Debug, Clone, Serialize)]
pub struct OpponentView {
    pub colour: PlayerColour,
    pub resource_card_count: u32,
    pub development_card_count: u32,
    pub remaining_roads: u32,
    pub remaining_settlements: u32,
    pub remaining_cities: u32,
    pub knights_played: u32,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
    /// Points from buildings and titles; development-card points stay
    /// hidden until their owner would reveal them.
    pub visible_victory_points: u32,
}

/// Everything one player is allowed to know about a game.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerGameView {
    pub phase: GamePhase,
    pub sub_phase: GameSubPhase,
    pub current_colour: PlayerColour,
    pub rolled_dice: [u8; 2],
    pub bank_resource_cards: ResourceHand,
    pub remaining_development_cards: usize,
    pub players_yet_to_discard: BTreeMap<PlayerColour, u32>,
    pub board: BoardView,
    pub me: OwnPlayerView,
    pub opponents: Vec<OpponentView>,
}

impl PlayerGameView {
    pub fn from_game(game: &Game, colour: PlayerColour) -> Result<PlayerGameView, Error> {
        let me = game.player(colour).ok_or(Error::InvalidPlayerColour)?;
        let opponents = game
            .players()
            .iter()
            .filter(|p| p.colour() != colour)
            .map(OpponentView::from_player)
            .collect();
        Ok(PlayerGameView {
            phase: game.phase(),
            sub_phase: game.sub_phase(),
            current_colour: game.current_colour(),
            rolled_dice: game.rolled_dice(),
            bank_resource_cards: game.remaining_resource_cards(),
            remaining_development_cards: game.remaining_development_card_count(),
            players_yet_to_discard: game.players_yet_to_discard().clone(),
            board: BoardView::from_game(game),
            me: OwnPlayerView::from_player(me),
            opponents,
        })
    }
}

impl BoardView {
    fn from_game(game: &Game) -> BoardView {
        let board = game.board();
        let houses = frontier_core::grid::all_vertices()
            .into_iter()
            .filter_map(|coords| {
                board
                    .get_house(coords)
                    .filter(|house| !house.is_empty())
                    .map(|house| HouseView { coords, house })
            })
            .collect();
        BoardView {
            tiles: board.tiles().copied().collect(),
            houses,
            roads: board
                .roads()
                .iter()
                .filter(|road| road.owner.is_some())
                .copied()
                .collect(),
            ports: board.ports().to_vec(),
            robber_position: board.robber_position(),
            longest_road: board.longest_road_info(),
        }
    }
}

impl OwnPlayerView {
    fn from_player(player: &Player) -> OwnPlayerView {
        OwnPlayerView {
            colour: player.colour(),
            resource_cards: *player.resource_cards(),
            playable_development_cards: *player.playable_development_cards(),
            on_hold_development_cards: *player.on_hold_development_cards(),
            remaining_roads: player.remaining_roads(),
            remaining_settlements: player.remaining_settlements(),
            remaining_cities: player.remaining_cities(),
            knights_played: player.knights_played(),
            has_longest_road: player.has_longest_road(),
            has_largest_army: player.has_largest_army(),
            victory_points: player.victory_points(),
            embargoed_players: player.embargoed_players().iter().copied().collect(),
        }
    }
}

impl OpponentView {
    fn from_player(player: &Player) -> OpponentView {
        let hidden_card_points = player
            .playable_development_cards()
            .count(frontier_core::DevelopmentCardType::VictoryPoint)
            + player
                .on_hold_development_cards()
                .count(frontier_core::DevelopmentCardType::VictoryPoint);
        OpponentView {
            colour: player.colour(),
            resource_card_count: player.resource_cards().total(),
            development_card_count: player.playable_development_cards().total()
                + player.on_hold_development_cards().total(),
            remaining_roads: player.remaining_roads(),
            remaining_settlements: player.remaining_settlements(),
            remaining_cities: player.remaining_cities(),
            knights_played: player.knights_played(),
            has_longest_road: player.has_longest_road(),
            has_largest_army: player.has_largest_army(),
            visible_victory_points: player.victory_points() - hidden_card_points,
        }
    }
}
