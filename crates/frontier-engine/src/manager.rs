//! Game lifecycle orchestration.
//!
//! The manager is the caller-facing surface: it owns a snapshot store,
//! maps transport-level primitives (integer coordinates, small-integer
//! colour and resource indices) onto the core types, and runs every
//! mutating action as a load-mutate-store cycle. All rule enforcement
//! stays in `frontier-core`; the manager only adds lookup, argument
//! mapping and logging.

use std::time::Duration;

use frontier_core::{
    DevelopmentCardHand, Error, Game, PlayerColour, ResourceHand, ResourceType, TileCoords,
    VertexCoords,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::SnapshotStore;
use crate::view::PlayerGameView;

/// How long an untouched game survives in the store.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(15 * 60);

/// Orchestrates games stored behind a [`SnapshotStore`].
pub struct GameManager<S: SnapshotStore> {
    store: S,
    ttl: Duration,
}

impl<S: SnapshotStore> GameManager<S> {
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, DEFAULT_SNAPSHOT_TTL)
    }

    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        GameManager { store, ttl }
    }

    /// Creates a new game and returns its id.
    pub fn create_game(&self, player_count: usize, seed: Option<u64>) -> Result<Uuid, Error> {
        let game = Game::new(player_count, seed)?;
        let id = Uuid::new_v4();
        info!(game_id = %id, player_count, "created game");
        self.store.store(id, game, self.ttl);
        Ok(id)
    }

    /// A view of the game scoped to one player. Reading also refreshes
    /// the snapshot's expiry window.
    pub fn game_status(&self, id: Uuid, colour_index: u8) -> Result<PlayerGameView, Error> {
        let game = self.store.load(id).ok_or(Error::GameNotFound)?;
        let colour =
            PlayerColour::from_index(colour_index).ok_or(Error::InvalidPlayerColour)?;
        let view = PlayerGameView::from_game(&game, colour)?;
        self.store.store(id, game, self.ttl);
        Ok(view)
    }

    /// Loads, mutates and stores one game. The snapshot is only written
    /// back when the operation succeeded; a failed operation leaves the
    /// stored game untouched.
    fn apply<T>(
        &self,
        id: Uuid,
        action: &'static str,
        op: impl FnOnce(&mut Game) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut game = self.store.load(id).ok_or(Error::GameNotFound)?;
        match op(&mut game) {
            Ok(value) => {
                debug!(game_id = %id, action, "action applied");
                self.store.store(id, game, self.ttl);
                Ok(value)
            }
            Err(error) => {
                debug!(game_id = %id, action, %error, "action rejected");
                Err(error)
            }
        }
    }

    pub fn roll_dice(&self, id: Uuid) -> Result<[u8; 2], Error> {
        self.apply(id, "roll_dice", |game| game.roll_dice())
    }

    pub fn end_turn(&self, id: Uuid) -> Result<(), Error> {
        self.apply(id, "end_turn", |game| game.next_player())
    }

    pub fn build_settlement(&self, id: Uuid, vertex: (i32, i32)) -> Result<(), Error> {
        self.apply(id, "build_settlement", |game| {
            game.build_settlement(VertexCoords::new(vertex.0, vertex.1))
        })
    }

    pub fn build_road(
        &self,
        id: Uuid,
        first: (i32, i32),
        second: (i32, i32),
    ) -> Result<(), Error> {
        self.apply(id, "build_road", |game| {
            game.build_road(
                VertexCoords::new(first.0, first.1),
                VertexCoords::new(second.0, second.1),
            )
        })
    }

    pub fn build_city(&self, id: Uuid, vertex: (i32, i32)) -> Result<(), Error> {
        self.apply(id, "build_city", |game| {
            game.build_city(VertexCoords::new(vertex.0, vertex.1))
        })
    }

    pub fn buy_development_card(&self, id: Uuid) -> Result<(), Error> {
        self.apply(id, "buy_development_card", |game| game.buy_development_card())
    }

    pub fn play_knight_card(
        &self,
        id: Uuid,
        robber_to: (i32, i32),
        victim_index: u8,
    ) -> Result<(), Error> {
        let victim =
            PlayerColour::from_index(victim_index).ok_or(Error::InvalidPlayerColour)?;
        self.apply(id, "play_knight_card", |game| {
            game.play_knight_card(TileCoords::new(robber_to.0, robber_to.1), victim)
        })
    }

    pub fn play_road_building_card(
        &self,
        id: Uuid,
        first: ((i32, i32), (i32, i32)),
        second: ((i32, i32), (i32, i32)),
    ) -> Result<(), Error> {
        let edge = |((ax, ay), (bx, by)): ((i32, i32), (i32, i32))| {
            (VertexCoords::new(ax, ay), VertexCoords::new(bx, by))
        };
        self.apply(id, "play_road_building_card", |game| {
            game.play_road_building_card(edge(first), edge(second))
        })
    }

    pub fn play_year_of_plenty_card(
        &self,
        id: Uuid,
        first_resource: u8,
        second_resource: u8,
    ) -> Result<(), Error> {
        let first =
            ResourceType::from_index(first_resource).ok_or(Error::CannotPlayDevelopmentCard)?;
        let second =
            ResourceType::from_index(second_resource).ok_or(Error::CannotPlayDevelopmentCard)?;
        self.apply(id, "play_year_of_plenty_card", |game| {
            game.play_year_of_plenty_card(first, second)
        })
    }

    pub fn play_monopoly_card(&self, id: Uuid, resource: u8) -> Result<(), Error> {
        let resource =
            ResourceType::from_index(resource).ok_or(Error::CannotPlayDevelopmentCard)?;
        self.apply(id, "play_monopoly_card", |game| {
            game.play_monopoly_card(resource)
        })
    }

    pub fn move_robber(&self, id: Uuid, tile: (i32, i32)) -> Result<(), Error> {
        self.apply(id, "move_robber", |game| {
            game.move_robber(TileCoords::new(tile.0, tile.1))
        })
    }

    pub fn steal_resource_card(&self, id: Uuid, victim_index: u8) -> Result<(), Error> {
        let victim =
            PlayerColour::from_index(victim_index).ok_or(Error::InvalidPlayerColour)?;
        self.apply(id, "steal_resource_card", |game| {
            game.steal_resource_card(victim)
        })
    }

    /// `resources` pairs resource indices with the counts to give up.
    pub fn discard_resources(
        &self,
        id: Uuid,
        colour_index: u8,
        resources: &[(u8, u32)],
    ) -> Result<(), Error> {
        let colour =
            PlayerColour::from_index(colour_index).ok_or(Error::InvalidPlayerColour)?;
        let mut bundle = ResourceHand::new();
        for &(resource, count) in resources {
            let resource =
                ResourceType::from_index(resource).ok_or(Error::CannotDiscardResources)?;
            bundle.add(resource, count);
        }
        self.apply(id, "discard_resources", |game| {
            game.discard_resources(colour, bundle)
        })
    }

    pub fn trade_with_bank(&self, id: Uuid, give: u8, receive: u8) -> Result<(), Error> {
        let give = ResourceType::from_index(give).ok_or(Error::CannotTradeWithBank)?;
        let receive = ResourceType::from_index(receive).ok_or(Error::CannotTradeWithBank)?;
        self.apply(id, "trade_with_bank", |game| {
            game.trade_with_bank(give, receive)
        })
    }

    pub fn embargo_player(&self, id: Uuid, by: u8, target: u8) -> Result<(), Error> {
        let by = PlayerColour::from_index(by).ok_or(Error::InvalidPlayerColour)?;
        let target = PlayerColour::from_index(target).ok_or(Error::InvalidPlayerColour)?;
        self.apply(id, "embargo_player", |game| game.embargo_player(by, target))
    }

    pub fn remove_player_embargo(&self, id: Uuid, by: u8, target: u8) -> Result<(), Error> {
        let by = PlayerColour::from_index(by).ok_or(Error::InvalidPlayerColour)?;
        let target = PlayerColour::from_index(target).ok_or(Error::InvalidPlayerColour)?;
        self.apply(id, "remove_player_embargo", |game| {
            game.remove_player_embargo(by, target)
        })
    }

    /// Totals of every development card ever issued, for reconciling a
    /// finished game.
    pub fn development_cards_issued(&self, id: Uuid) -> Result<DevelopmentCardHand, Error> {
        let game = self.store.load(id).ok_or(Error::GameNotFound)?;
        Ok(game.development_cards_issued())
    }
}
