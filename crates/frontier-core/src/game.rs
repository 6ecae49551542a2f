//! The turn/phase state machine and all cross-entity rules.
//!
//! A `Game` owns the board, the players in turn order, the bank, the
//! development-card deck and the dice. Every mutating operation checks
//! the current phase and sub-phase first, then delegates placement
//! questions to the board and inventory questions to the players, and
//! finally updates cross-cutting state (current player, achievement
//! holders, sub-phase). Rule violations are rejected with an [`Error`]
//! and leave the game untouched.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, PortType};
use crate::constants;
use crate::error::Error;
use crate::grid::{TileCoords, VertexCoords};
use crate::player::{
    DevelopmentCardHand, DevelopmentCardType, Player, PlayerColour, ResourceHand, ResourceType,
};

/// Top-level game phase. Setup runs twice through the players (snake
/// order), then the game stays in `Main` until abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    FirstRoundSetup,
    SecondRoundSetup,
    Main,
}

/// Fine-grained position inside a turn. Every operation names the
/// sub-phases it is legal in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSubPhase {
    BuildSettlement,
    BuildRoad,
    RollOrPlayDevelopmentCard,
    Roll,
    DiscardResources,
    MoveRobberSevenRoll,
    StealResourceSevenRoll,
    MoveRobberKnightCardBeforeRoll,
    StealResourceKnightCardBeforeRoll,
    MoveRobberKnightCardAfterRoll,
    StealResourceKnightCardAfterRoll,
    PlayTurn,
    TradeOrBuild,
}

/// A pending player-to-player trade offer. The offer lifecycle lives
/// outside the rules engine; this is the snapshot shape plus rejection
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub active: bool,
    pub offered: ResourceHand,
    pub requested: ResourceHand,
    pub rejected_by: BTreeSet<PlayerColour>,
}

impl TradeOffer {
    pub fn new(offered: ResourceHand, requested: ResourceHand) -> Self {
        TradeOffer {
            active: true,
            offered,
            requested,
            rejected_by: BTreeSet::new(),
        }
    }

    pub fn reject(&mut self, colour: PlayerColour) {
        self.rejected_by.insert(colour);
    }

    /// An offer dies once every other player has rejected it.
    pub fn is_rejected_by_all(&self, others: &[PlayerColour]) -> bool {
        others.iter().all(|c| self.rejected_by.contains(c))
    }
}

/// One match. Constructed once, then mutated only through the public
/// operations below.
#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    board: Board,
    rolled_dice: [u8; 2],
    remaining_resource_cards: ResourceHand,
    remaining_development_cards: Vec<DevelopmentCardType>,
    development_cards_issued: DevelopmentCardHand,
    knights_required_for_largest_army: u32,
    development_card_played_this_turn: bool,
    current_player_index: usize,
    phase: GamePhase,
    sub_phase: GameSubPhase,
    players_yet_to_discard: BTreeMap<PlayerColour, u32>,
    setup_settlement: Option<VertexCoords>,
    rng: StdRng,
}

impl Game {
    /// Creates a game for 3 or 4 players. The seed drives the board
    /// shuffle, the turn order, the deck shuffle and every later dice
    /// roll and robbery, so two games created with the same seed and
    /// fed the same operations evolve identically.
    pub fn new(player_count: usize, seed: Option<u64>) -> Result<Game, Error> {
        if !(3..=4).contains(&player_count) {
            return Err(Error::InvalidPlayerCount);
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let board = Board::new(&mut rng);

        let mut colours: Vec<PlayerColour> = PlayerColour::ALL[..player_count].to_vec();
        colours.shuffle(&mut rng);
        let players = colours.into_iter().map(Player::new).collect();

        let mut deck = Vec::with_capacity(25);
        for (card, count) in constants::development_card_totals() {
            for _ in 0..count {
                deck.push(card);
            }
        }
        deck.shuffle(&mut rng);

        Ok(Game {
            players,
            board,
            rolled_dice: [0, 0],
            remaining_resource_cards: ResourceHand::uniform(constants::BANK_CARDS_PER_RESOURCE),
            remaining_development_cards: deck,
            development_cards_issued: DevelopmentCardHand::new(),
            knights_required_for_largest_army: constants::INITIAL_KNIGHTS_FOR_LARGEST_ARMY,
            development_card_played_this_turn: false,
            current_player_index: 0,
            phase: GamePhase::FirstRoundSetup,
            sub_phase: GameSubPhase::BuildSettlement,
            players_yet_to_discard: BTreeMap::new(),
            setup_settlement: None,
            rng,
        })
    }

    // ==================== Accessors ====================

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, colour: PlayerColour) -> Option<&Player> {
        self.players.iter().find(|p| p.colour() == colour)
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn current_colour(&self) -> PlayerColour {
        self.current_player().colour()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn sub_phase(&self) -> GameSubPhase {
        self.sub_phase
    }

    pub fn rolled_dice(&self) -> [u8; 2] {
        self.rolled_dice
    }

    pub fn dice_total(&self) -> u8 {
        self.rolled_dice[0] + self.rolled_dice[1]
    }

    /// The bank's remaining resource cards.
    pub fn remaining_resource_cards(&self) -> ResourceHand {
        self.remaining_resource_cards
    }

    pub fn remaining_development_card_count(&self) -> usize {
        self.remaining_development_cards.len()
    }

    /// How many of each development card have ever been drawn from the
    /// deck.
    pub fn development_cards_issued(&self) -> DevelopmentCardHand {
        self.development_cards_issued
    }

    pub fn has_played_development_card_this_turn(&self) -> bool {
        self.development_card_played_this_turn
    }

    /// Colours still owing a discard after a seven, with the counts
    /// they owe.
    pub fn players_yet_to_discard(&self) -> &BTreeMap<PlayerColour, u32> {
        &self.players_yet_to_discard
    }

    /// Colours in turn order.
    pub fn turn_order(&self) -> Vec<PlayerColour> {
        self.players.iter().map(|p| p.colour()).collect()
    }

    fn player_checked(&self, colour: PlayerColour) -> Result<&Player, Error> {
        self.player(colour).ok_or(Error::InvalidPlayerColour)
    }

    fn player_mut(&mut self, colour: PlayerColour) -> Result<&mut Player, Error> {
        self.players
            .iter_mut()
            .find(|p| p.colour() == colour)
            .ok_or(Error::InvalidPlayerColour)
    }

    fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player_index]
    }

    fn require_main_sub_phase(&self, allowed: &[GameSubPhase]) -> Result<(), Error> {
        if self.phase == GamePhase::Main && allowed.contains(&self.sub_phase) {
            Ok(())
        } else {
            Err(Error::InvalidGamePhase)
        }
    }

    // ==================== Dice ====================

    /// Rolls both dice. A total of seven routes into the discard/robber
    /// sub-phases; any other total distributes resources immediately.
    pub fn roll_dice(&mut self) -> Result<[u8; 2], Error> {
        self.require_main_sub_phase(&[
            GameSubPhase::RollOrPlayDevelopmentCard,
            GameSubPhase::Roll,
        ])?;
        self.rolled_dice = [self.rng.gen_range(1..=6), self.rng.gen_range(1..=6)];
        let total = self.dice_total();

        if total == constants::ROBBER_ROLL {
            self.players_yet_to_discard = self
                .players
                .iter()
                .filter(|p| p.resource_cards().total() > constants::SAFE_HAND_SIZE)
                .map(|p| (p.colour(), p.resource_cards().total() / 2))
                .collect();
            self.sub_phase = if self.players_yet_to_discard.is_empty() {
                GameSubPhase::MoveRobberSevenRoll
            } else {
                GameSubPhase::DiscardResources
            };
        } else {
            self.distribute_resources(total);
            self.sub_phase = GameSubPhase::PlayTurn;
        }
        Ok(self.rolled_dice)
    }

    /// Grants each house on an activated tile its owner's yield, one
    /// card per settlement and two per city, while the bank lasts.
    /// Distribution runs in the board's fixed tile order; when the bank
    /// runs short mid-distribution the shortfall is simply not granted.
    fn distribute_resources(&mut self, total: u8) {
        let robber = self.board.robber_position();
        let activated: Vec<(TileCoords, ResourceType)> = self
            .board
            .tiles_with_activation_number(total)
            .into_iter()
            .filter(|tile| tile.coords != robber)
            .filter_map(|tile| tile.tile_type.resource().map(|r| (tile.coords, r)))
            .collect();
        for (coords, resource) in activated {
            for (_, house) in self.board.houses_on_tile(coords) {
                let Some(owner) = house.owner() else { continue };
                let wanted = house.resource_multiplier();
                let granted = wanted.min(self.remaining_resource_cards.count(resource));
                if granted == 0 {
                    continue;
                }
                self.remaining_resource_cards.try_remove(resource, granted);
                if let Ok(player) = self.player_mut(owner) {
                    player.add_resource_cards(&ResourceHand::with(&[(resource, granted)]));
                }
            }
        }
    }

    // ==================== Turn rotation ====================

    /// Ends the current turn: recomputes the largest-army holder,
    /// clears the card-played flag, releases the incoming player's
    /// on-hold development cards and advances the turn pointer.
    pub fn next_player(&mut self) -> Result<(), Error> {
        self.require_main_sub_phase(&[GameSubPhase::PlayTurn, GameSubPhase::TradeOrBuild])?;
        self.update_largest_army();
        self.development_card_played_this_turn = false;
        let next = (self.current_player_index + 1) % self.players.len();
        self.players[next].release_on_hold_development_cards();
        self.current_player_index = next;
        self.sub_phase = GameSubPhase::RollOrPlayDevelopmentCard;
        Ok(())
    }

    fn advance_setup(&mut self) {
        match self.phase {
            GamePhase::FirstRoundSetup => {
                if self.current_player_index + 1 < self.players.len() {
                    self.current_player_index += 1;
                } else {
                    // The last player places again immediately, in
                    // reverse order back to the first.
                    self.phase = GamePhase::SecondRoundSetup;
                }
                self.sub_phase = GameSubPhase::BuildSettlement;
            }
            GamePhase::SecondRoundSetup => {
                if self.current_player_index > 0 {
                    self.current_player_index -= 1;
                    self.sub_phase = GameSubPhase::BuildSettlement;
                } else {
                    self.phase = GamePhase::Main;
                    self.sub_phase = GameSubPhase::RollOrPlayDevelopmentCard;
                }
            }
            GamePhase::Main => {}
        }
    }

    // ==================== Building ====================

    /// Places a settlement. During setup the placement is free and only
    /// the distance rule applies; in the main phase it costs resources
    /// and must connect to the player's roads.
    pub fn build_settlement(&mut self, coords: VertexCoords) -> Result<(), Error> {
        let colour = self.current_colour();
        match self.phase {
            GamePhase::FirstRoundSetup | GamePhase::SecondRoundSetup => {
                if self.sub_phase != GameSubPhase::BuildSettlement {
                    return Err(Error::InvalidGamePhase);
                }
                if !self.current_player().has_settlement_piece()
                    || !self.board.can_place_house(coords, colour, true)
                {
                    return Err(Error::InvalidBuildLocation);
                }
                self.current_player_mut().take_settlement_piece();
                self.board.place_house(coords, colour);
                if self.phase == GamePhase::SecondRoundSetup {
                    self.grant_starting_resources(coords);
                }
                self.setup_settlement = Some(coords);
                self.sub_phase = GameSubPhase::BuildRoad;
                Ok(())
            }
            GamePhase::Main => {
                self.require_main_sub_phase(&[
                    GameSubPhase::PlayTurn,
                    GameSubPhase::TradeOrBuild,
                ])?;
                let cost = constants::settlement_cost();
                if !self.current_player().has_settlement_piece()
                    || !self.current_player().can_afford(&cost)
                    || !self.board.can_place_house(coords, colour, false)
                {
                    return Err(Error::InvalidBuildLocation);
                }
                self.current_player_mut().try_remove_resource_cards(&cost);
                self.remaining_resource_cards.add_hand(&cost);
                self.current_player_mut().take_settlement_piece();
                self.board.place_house(coords, colour);
                // A new settlement can sever an opponent's trail.
                self.update_longest_road_title();
                self.sub_phase = GameSubPhase::TradeOrBuild;
                Ok(())
            }
        }
    }

    /// One card of each resource tile surrounding the second setup
    /// settlement, bank permitting.
    fn grant_starting_resources(&mut self, coords: VertexCoords) {
        let yields: Vec<ResourceType> = self
            .board
            .tiles_surrounding_house(coords)
            .into_iter()
            .filter_map(|tile| tile.tile_type.resource())
            .collect();
        for resource in yields {
            if self.remaining_resource_cards.try_remove(resource, 1) {
                self.current_player_mut()
                    .add_resource_cards(&ResourceHand::with(&[(resource, 1)]));
            }
        }
    }

    /// Places a road. During setup the road is free but must touch the
    /// settlement just placed; in the main phase it costs resources.
    pub fn build_road(&mut self, a: VertexCoords, b: VertexCoords) -> Result<(), Error> {
        let colour = self.current_colour();
        match self.phase {
            GamePhase::FirstRoundSetup | GamePhase::SecondRoundSetup => {
                if self.sub_phase != GameSubPhase::BuildRoad {
                    return Err(Error::InvalidGamePhase);
                }
                let Some(settlement) = self.setup_settlement else {
                    return Err(Error::InvalidGamePhase);
                };
                if a != settlement && b != settlement {
                    return Err(Error::InvalidBuildLocation);
                }
                if !self.board.can_place_road(a, b, colour)
                    || !self.current_player().has_road_piece()
                {
                    return Err(Error::InvalidBuildLocation);
                }
                self.current_player_mut().take_road_piece();
                self.board.place_road(a, b, colour);
                self.setup_settlement = None;
                self.advance_setup();
                Ok(())
            }
            GamePhase::Main => {
                self.require_main_sub_phase(&[
                    GameSubPhase::PlayTurn,
                    GameSubPhase::TradeOrBuild,
                ])?;
                let cost = constants::road_cost();
                if !self.current_player().has_road_piece()
                    || !self.current_player().can_afford(&cost)
                    || !self.board.can_place_road(a, b, colour)
                {
                    return Err(Error::InvalidBuildLocation);
                }
                self.current_player_mut().try_remove_resource_cards(&cost);
                self.remaining_resource_cards.add_hand(&cost);
                self.current_player_mut().take_road_piece();
                self.board.place_road(a, b, colour);
                self.update_longest_road_title();
                self.sub_phase = GameSubPhase::TradeOrBuild;
                Ok(())
            }
        }
    }

    /// Upgrades one of the player's settlements to a city.
    pub fn build_city(&mut self, coords: VertexCoords) -> Result<(), Error> {
        self.require_main_sub_phase(&[GameSubPhase::PlayTurn, GameSubPhase::TradeOrBuild])?;
        let colour = self.current_colour();
        let cost = constants::city_cost();
        if !self.current_player().has_city_piece()
            || !self.current_player().can_afford(&cost)
            || !self.board.can_upgrade_house(coords, colour)
        {
            return Err(Error::InvalidBuildLocation);
        }
        self.current_player_mut().try_remove_resource_cards(&cost);
        self.remaining_resource_cards.add_hand(&cost);
        self.current_player_mut().take_city_piece();
        self.board.upgrade_house(coords, colour);
        self.sub_phase = GameSubPhase::TradeOrBuild;
        Ok(())
    }

    // ==================== Development cards ====================

    /// Draws the top card of the deck into the buyer's on-hold pool.
    pub fn buy_development_card(&mut self) -> Result<(), Error> {
        self.require_main_sub_phase(&[GameSubPhase::PlayTurn, GameSubPhase::TradeOrBuild])?;
        let cost = constants::development_card_cost();
        if !self.current_player().can_afford(&cost) {
            return Err(Error::CannotBuyDevelopmentCard);
        }
        let Some(card) = self.remaining_development_cards.pop() else {
            return Err(Error::CannotBuyDevelopmentCard);
        };
        self.current_player_mut().try_remove_resource_cards(&cost);
        self.remaining_resource_cards.add_hand(&cost);
        self.development_cards_issued.add(card, 1);
        self.current_player_mut().buy_development_card(card);
        self.sub_phase = GameSubPhase::TradeOrBuild;
        Ok(())
    }

    /// Sub-phases in which a development card may be played, before or
    /// after the roll. At most one card per turn; `Roll` is included so
    /// a second attempt before rolling reports the card limit rather
    /// than a phase mismatch.
    fn development_card_gate(&self) -> Result<bool, Error> {
        self.require_main_sub_phase(&[
            GameSubPhase::RollOrPlayDevelopmentCard,
            GameSubPhase::Roll,
            GameSubPhase::PlayTurn,
            GameSubPhase::TradeOrBuild,
        ])?;
        if self.development_card_played_this_turn {
            return Err(Error::AlreadyPlayedDevelopmentCard);
        }
        Ok(matches!(
            self.sub_phase,
            GameSubPhase::RollOrPlayDevelopmentCard | GameSubPhase::Roll
        ))
    }

    fn sub_phase_after_card(before_roll: bool) -> GameSubPhase {
        if before_roll {
            GameSubPhase::Roll
        } else {
            GameSubPhase::TradeOrBuild
        }
    }

    /// Plays a knight: moves the robber onto a tile touching the victim
    /// and steals one random card from them. The play is transactional;
    /// if the steal is rejected the robber returns and the card is not
    /// consumed.
    pub fn play_knight_card(
        &mut self,
        robber_to: TileCoords,
        victim: PlayerColour,
    ) -> Result<(), Error> {
        let before_roll = self.development_card_gate()?;
        if !self
            .current_player()
            .can_play_development_card(DevelopmentCardType::Knight)
        {
            return Err(Error::CannotPlayDevelopmentCard);
        }
        let saved_sub_phase = self.sub_phase;
        let saved_robber = self.board.robber_position();

        self.sub_phase = if before_roll {
            GameSubPhase::MoveRobberKnightCardBeforeRoll
        } else {
            GameSubPhase::MoveRobberKnightCardAfterRoll
        };
        if self.move_robber(robber_to).is_err() {
            self.sub_phase = saved_sub_phase;
            return Err(Error::CannotPlayDevelopmentCard);
        }
        if self.steal_resource_card(victim).is_err() {
            self.board.move_robber_to(saved_robber);
            self.sub_phase = saved_sub_phase;
            return Err(Error::CannotPlayDevelopmentCard);
        }
        self.current_player_mut()
            .play_development_card(DevelopmentCardType::Knight);
        self.development_card_played_this_turn = true;
        Ok(())
    }

    /// Plays road building: two free roads. Both placements must be
    /// legal and backed by road pieces, or nothing is placed.
    pub fn play_road_building_card(
        &mut self,
        first: (VertexCoords, VertexCoords),
        second: (VertexCoords, VertexCoords),
    ) -> Result<(), Error> {
        let before_roll = self.development_card_gate()?;
        if !self
            .current_player()
            .can_play_development_card(DevelopmentCardType::RoadBuilding)
        {
            return Err(Error::CannotPlayDevelopmentCard);
        }
        let colour = self.current_colour();
        if !self.board.can_place_road(first.0, first.1, colour)
            || !self.current_player_mut().take_road_piece()
        {
            return Err(Error::CannotPlayDevelopmentCard);
        }
        self.board.place_road(first.0, first.1, colour);
        let second_ok = self.board.can_place_road(second.0, second.1, colour)
            && self.current_player_mut().take_road_piece();
        if !second_ok {
            self.board.clear_road(first.0, first.1);
            self.current_player_mut().return_road_piece();
            return Err(Error::CannotPlayDevelopmentCard);
        }
        self.board.place_road(second.0, second.1, colour);

        self.current_player_mut()
            .play_development_card(DevelopmentCardType::RoadBuilding);
        self.development_card_played_this_turn = true;
        self.update_longest_road_title();
        self.sub_phase = Self::sub_phase_after_card(before_roll);
        Ok(())
    }

    /// Plays year of plenty: two resource cards of the player's choice
    /// from the bank. Taking the same type twice needs the bank to hold
    /// two of it.
    pub fn play_year_of_plenty_card(
        &mut self,
        first: ResourceType,
        second: ResourceType,
    ) -> Result<(), Error> {
        let before_roll = self.development_card_gate()?;
        if !self
            .current_player()
            .can_play_development_card(DevelopmentCardType::YearOfPlenty)
        {
            return Err(Error::CannotPlayDevelopmentCard);
        }
        let wanted = {
            let mut hand = ResourceHand::new();
            hand.add(first, 1);
            hand.add(second, 1);
            hand
        };
        if !self.remaining_resource_cards.contains(&wanted) {
            return Err(Error::CannotPlayDevelopmentCard);
        }
        self.remaining_resource_cards.try_remove_hand(&wanted);
        self.current_player_mut().add_resource_cards(&wanted);

        self.current_player_mut()
            .play_development_card(DevelopmentCardType::YearOfPlenty);
        self.development_card_played_this_turn = true;
        self.sub_phase = Self::sub_phase_after_card(before_roll);
        Ok(())
    }

    /// Plays monopoly: every other player surrenders all their cards of
    /// one resource type to the current player.
    pub fn play_monopoly_card(&mut self, resource: ResourceType) -> Result<(), Error> {
        let before_roll = self.development_card_gate()?;
        if !self
            .current_player()
            .can_play_development_card(DevelopmentCardType::Monopoly)
        {
            return Err(Error::CannotPlayDevelopmentCard);
        }
        let current = self.current_player_index;
        let mut collected = 0;
        for (index, player) in self.players.iter_mut().enumerate() {
            if index != current {
                collected += player.surrender_resource_type(resource);
            }
        }
        self.current_player_mut()
            .add_resource_cards(&ResourceHand::with(&[(resource, collected)]));

        self.current_player_mut()
            .play_development_card(DevelopmentCardType::Monopoly);
        self.development_card_played_this_turn = true;
        self.sub_phase = Self::sub_phase_after_card(before_roll);
        Ok(())
    }

    // ==================== Robber ====================

    /// Moves the robber during one of the robber sub-phases, then
    /// advances to the matching steal sub-phase. After a seven, when
    /// nobody can be robbed on the chosen tile, the steal step is
    /// skipped entirely.
    pub fn move_robber(&mut self, coords: TileCoords) -> Result<(), Error> {
        let steal_sub_phase = match self.sub_phase {
            GameSubPhase::MoveRobberSevenRoll => GameSubPhase::StealResourceSevenRoll,
            GameSubPhase::MoveRobberKnightCardBeforeRoll => {
                GameSubPhase::StealResourceKnightCardBeforeRoll
            }
            GameSubPhase::MoveRobberKnightCardAfterRoll => {
                GameSubPhase::StealResourceKnightCardAfterRoll
            }
            _ => return Err(Error::InvalidGamePhase),
        };
        if !self.board.move_robber_to(coords) {
            return Err(Error::CannotMoveRobberToLocation);
        }
        let current = self.current_colour();
        let anyone_to_rob = self
            .board
            .house_colours_on_tile(coords)
            .iter()
            .any(|&c| c != current);
        if steal_sub_phase == GameSubPhase::StealResourceSevenRoll && !anyone_to_rob {
            self.sub_phase = GameSubPhase::PlayTurn;
        } else {
            self.sub_phase = steal_sub_phase;
        }
        Ok(())
    }

    /// Steals one random resource card from a victim with a house on
    /// the robber's tile. Succeeds with nothing stolen when the victim's
    /// hand is empty.
    pub fn steal_resource_card(&mut self, victim: PlayerColour) -> Result<(), Error> {
        let next_sub_phase = match self.sub_phase {
            GameSubPhase::StealResourceSevenRoll => GameSubPhase::PlayTurn,
            GameSubPhase::StealResourceKnightCardBeforeRoll => GameSubPhase::Roll,
            GameSubPhase::StealResourceKnightCardAfterRoll => GameSubPhase::TradeOrBuild,
            _ => return Err(Error::InvalidGamePhase),
        };
        if victim == self.current_colour() {
            return Err(Error::CannotStealResource);
        }
        self.player_checked(victim)
            .map_err(|_| Error::CannotStealResource)?;
        let robber = self.board.robber_position();
        if !self.board.house_colours_on_tile(robber).contains(&victim) {
            return Err(Error::CannotStealResource);
        }
        let stolen = {
            let rng = &mut self.rng;
            self.players
                .iter_mut()
                .find(|p| p.colour() == victim)
                .and_then(|p| p.remove_random_resource_card(rng))
        };
        if let Some(resource) = stolen {
            self.current_player_mut()
                .add_resource_cards(&ResourceHand::with(&[(resource, 1)]));
        }
        self.sub_phase = next_sub_phase;
        Ok(())
    }

    /// One owing player's discard after a seven. Once every owing
    /// player has discarded, the robber may move.
    pub fn discard_resources(
        &mut self,
        colour: PlayerColour,
        cards: ResourceHand,
    ) -> Result<(), Error> {
        if self.phase != GamePhase::Main || self.sub_phase != GameSubPhase::DiscardResources {
            return Err(Error::InvalidGamePhase);
        }
        let Some(&required) = self.players_yet_to_discard.get(&colour) else {
            return Err(Error::CannotDiscardResources);
        };
        let player = self.player_checked(colour)?;
        if !player.can_discard_resource_cards(&cards, required) {
            return Err(Error::CannotDiscardResources);
        }
        self.player_mut(colour)?.try_remove_resource_cards(&cards);
        self.remaining_resource_cards.add_hand(&cards);
        self.players_yet_to_discard.remove(&colour);
        if self.players_yet_to_discard.is_empty() {
            self.sub_phase = GameSubPhase::MoveRobberSevenRoll;
        }
        Ok(())
    }

    // ==================== Trading ====================

    /// Trades with the bank at the best rate the player qualifies for:
    /// 2:1 with a matching resource port, then 3:1 with a general port,
    /// then the open 4:1 rate. The bank must hold the requested card.
    pub fn trade_with_bank(
        &mut self,
        give: ResourceType,
        receive: ResourceType,
    ) -> Result<(), Error> {
        self.require_main_sub_phase(&[GameSubPhase::PlayTurn, GameSubPhase::TradeOrBuild])?;
        let colour = self.current_colour();
        if self.remaining_resource_cards.count(receive) == 0 {
            return Err(Error::CannotTradeWithBank);
        }
        let player = self.current_player();
        let rate = if player.resource_cards().can_trade_two_to_one(give)
            && self
                .board
                .colour_has_port_of_type(colour, PortType::for_resource(give))
        {
            2
        } else if player.resource_cards().can_trade_three_to_one(give)
            && self
                .board
                .colour_has_port_of_type(colour, PortType::ThreeToOne)
        {
            3
        } else if player.resource_cards().can_trade_four_to_one(give) {
            4
        } else {
            return Err(Error::CannotTradeWithBank);
        };
        let given = ResourceHand::with(&[(give, rate)]);
        self.current_player_mut().try_remove_resource_cards(&given);
        self.remaining_resource_cards.add_hand(&given);
        self.remaining_resource_cards.try_remove(receive, 1);
        self.current_player_mut()
            .add_resource_cards(&ResourceHand::with(&[(receive, 1)]));
        self.sub_phase = GameSubPhase::TradeOrBuild;
        Ok(())
    }

    // ==================== Embargoes ====================

    pub fn embargo_player(
        &mut self,
        by: PlayerColour,
        target: PlayerColour,
    ) -> Result<(), Error> {
        self.require_main_sub_phase(&[GameSubPhase::TradeOrBuild])?;
        if by == target {
            return Err(Error::CannotEmbargoPlayer);
        }
        self.player_checked(target)?;
        self.player_mut(by)?.embargo_player(target);
        Ok(())
    }

    pub fn remove_player_embargo(
        &mut self,
        by: PlayerColour,
        target: PlayerColour,
    ) -> Result<(), Error> {
        self.require_main_sub_phase(&[GameSubPhase::TradeOrBuild])?;
        if by == target {
            return Err(Error::CannotEmbargoPlayer);
        }
        self.player_checked(target)?;
        self.player_mut(by)?.remove_embargo(target);
        Ok(())
    }

    // ==================== Achievements ====================

    /// Hands the largest-army title to the first player in turn order
    /// whose played knights reach the current requirement, then raises
    /// the requirement past the new holder's count.
    fn update_largest_army(&mut self) {
        let required = self.knights_required_for_largest_army;
        let challenger = self
            .players
            .iter()
            .find(|p| p.knights_played() >= required && !p.has_largest_army())
            .map(|p| (p.colour(), p.knights_played()));
        if let Some((colour, knights)) = challenger {
            for player in &mut self.players {
                let holds = player.colour() == colour;
                player.set_has_largest_army(holds);
            }
            self.knights_required_for_largest_army = knights + 1;
        }
    }

    fn update_longest_road_title(&mut self) {
        let order = self.turn_order();
        let info = self.board.update_longest_road(&order);
        for player in &mut self.players {
            player.set_has_longest_road(Some(player.colour()) == info.colour);
        }
    }
}
