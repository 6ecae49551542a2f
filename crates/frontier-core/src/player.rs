//! Players and the cards they hold.
//!
//! A player tracks:
//! - Resource cards, counted per resource type
//! - Development cards, split into playable and on-hold (bought this turn)
//! - Remaining building pieces (roads, settlements, cities)
//! - Victory points, including the longest-road and largest-army bonuses
//! - Embargoes against other players

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Points awarded for holding the longest road or the largest army.
pub const BONUS_VICTORY_POINTS: u32 = 2;

/// A player's seat colour. Colours are assigned in turn order at game
/// creation, so with three players Yellow is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColour {
    Red,
    Blue,
    Green,
    Yellow,
}

impl PlayerColour {
    pub const ALL: [PlayerColour; 4] = [
        PlayerColour::Red,
        PlayerColour::Blue,
        PlayerColour::Green,
        PlayerColour::Yellow,
    ];

    /// Maps a transport-level index to a colour.
    pub fn from_index(index: u8) -> Option<PlayerColour> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// The five tradeable resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
}

impl ResourceType {
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Wood,
        ResourceType::Brick,
        ResourceType::Sheep,
        ResourceType::Wheat,
        ResourceType::Ore,
    ];

    pub fn from_index(index: u8) -> Option<ResourceType> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A multiset of resource cards, used for player hands, the bank, build
/// costs and trade bundles alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand([u32; 5]);

impl ResourceHand {
    pub fn new() -> Self {
        ResourceHand([0; 5])
    }

    /// A hand holding `count` of every resource type.
    pub fn uniform(count: u32) -> Self {
        ResourceHand([count; 5])
    }

    pub fn with(amounts: &[(ResourceType, u32)]) -> Self {
        let mut hand = ResourceHand::new();
        for &(resource, count) in amounts {
            hand.add(resource, count);
        }
        hand
    }

    pub fn count(&self, resource: ResourceType) -> u32 {
        self.0[resource as usize]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn add(&mut self, resource: ResourceType, count: u32) {
        self.0[resource as usize] += count;
    }

    /// Removes `count` cards of one type. Fails without changing the hand
    /// when fewer are held.
    pub fn try_remove(&mut self, resource: ResourceType, count: u32) -> bool {
        let held = &mut self.0[resource as usize];
        if *held < count {
            return false;
        }
        *held -= count;
        true
    }

    /// Whether this hand holds at least `other` of every type.
    pub fn contains(&self, other: &ResourceHand) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(held, needed)| held >= needed)
    }

    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (held, extra) in self.0.iter_mut().zip(other.0.iter()) {
            *held += extra;
        }
    }

    /// Removes `other` from this hand. Fails without changing the hand
    /// when any type is short.
    pub fn try_remove_hand(&mut self, other: &ResourceHand) -> bool {
        if !self.contains(other) {
            return false;
        }
        for (held, taken) in self.0.iter_mut().zip(other.0.iter()) {
            *held -= taken;
        }
        true
    }

    /// Removes one card chosen uniformly at random, or `None` when the
    /// hand is empty.
    pub fn remove_random<R: Rng>(&mut self, rng: &mut R) -> Option<ResourceType> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for resource in ResourceType::ALL {
            let held = self.count(resource);
            if pick < held {
                self.0[resource as usize] -= 1;
                return Some(resource);
            }
            pick -= held;
        }
        unreachable!("pick is bounded by the hand total")
    }

    pub fn can_trade_two_to_one(&self, give: ResourceType) -> bool {
        self.count(give) >= 2
    }

    pub fn can_trade_three_to_one(&self, give: ResourceType) -> bool {
        self.count(give) >= 3
    }

    pub fn can_trade_four_to_one(&self, give: ResourceType) -> bool {
        self.count(give) >= 4
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL.iter().map(move |&r| (r, self.count(r)))
    }
}

/// The five development card types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DevelopmentCardType {
    Knight,
    VictoryPoint,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
}

impl DevelopmentCardType {
    pub const ALL: [DevelopmentCardType; 5] = [
        DevelopmentCardType::Knight,
        DevelopmentCardType::VictoryPoint,
        DevelopmentCardType::RoadBuilding,
        DevelopmentCardType::YearOfPlenty,
        DevelopmentCardType::Monopoly,
    ];

    pub fn from_index(index: u8) -> Option<DevelopmentCardType> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A multiset of development cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentCardHand([u32; 5]);

impl DevelopmentCardHand {
    pub fn new() -> Self {
        DevelopmentCardHand([0; 5])
    }

    pub fn count(&self, card: DevelopmentCardType) -> u32 {
        self.0[card as usize]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn add(&mut self, card: DevelopmentCardType, count: u32) {
        self.0[card as usize] += count;
    }

    pub fn try_remove_one(&mut self, card: DevelopmentCardType) -> bool {
        let held = &mut self.0[card as usize];
        if *held == 0 {
            return false;
        }
        *held -= 1;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (DevelopmentCardType, u32)> + '_ {
        DevelopmentCardType::ALL.iter().map(move |&c| (c, self.count(c)))
    }
}

pub const STARTING_ROAD_PIECES: u32 = 15;
pub const STARTING_SETTLEMENT_PIECES: u32 = 5;
pub const STARTING_CITY_PIECES: u32 = 4;

/// A single player's ledger: cards, pieces, points and embargoes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    colour: PlayerColour,
    resource_cards: ResourceHand,
    playable_development_cards: DevelopmentCardHand,
    on_hold_development_cards: DevelopmentCardHand,
    remaining_roads: u32,
    remaining_settlements: u32,
    remaining_cities: u32,
    knights_played: u32,
    has_longest_road: bool,
    has_largest_army: bool,
    embargoed_players: BTreeSet<PlayerColour>,
}

impl Player {
    pub fn new(colour: PlayerColour) -> Self {
        Player {
            colour,
            resource_cards: ResourceHand::new(),
            playable_development_cards: DevelopmentCardHand::new(),
            on_hold_development_cards: DevelopmentCardHand::new(),
            remaining_roads: STARTING_ROAD_PIECES,
            remaining_settlements: STARTING_SETTLEMENT_PIECES,
            remaining_cities: STARTING_CITY_PIECES,
            knights_played: 0,
            has_longest_road: false,
            has_largest_army: false,
            embargoed_players: BTreeSet::new(),
        }
    }

    pub fn colour(&self) -> PlayerColour {
        self.colour
    }

    pub fn resource_cards(&self) -> &ResourceHand {
        &self.resource_cards
    }

    pub fn playable_development_cards(&self) -> &DevelopmentCardHand {
        &self.playable_development_cards
    }

    pub fn on_hold_development_cards(&self) -> &DevelopmentCardHand {
        &self.on_hold_development_cards
    }

    pub fn remaining_roads(&self) -> u32 {
        self.remaining_roads
    }

    pub fn remaining_settlements(&self) -> u32 {
        self.remaining_settlements
    }

    pub fn remaining_cities(&self) -> u32 {
        self.remaining_cities
    }

    pub fn knights_played(&self) -> u32 {
        self.knights_played
    }

    pub fn has_longest_road(&self) -> bool {
        self.has_longest_road
    }

    pub fn has_largest_army(&self) -> bool {
        self.has_largest_army
    }

    pub fn embargoed_players(&self) -> &BTreeSet<PlayerColour> {
        &self.embargoed_players
    }

    // ==================== Victory points ====================

    /// Total victory points: one per settlement placed, two per city,
    /// one per victory-point card held (playable or on hold), plus the
    /// longest-road and largest-army bonuses.
    pub fn victory_points(&self) -> u32 {
        let settlements = STARTING_SETTLEMENT_PIECES - self.remaining_settlements;
        let cities = STARTING_CITY_PIECES - self.remaining_cities;
        let card_points = self
            .playable_development_cards
            .count(DevelopmentCardType::VictoryPoint)
            + self
                .on_hold_development_cards
                .count(DevelopmentCardType::VictoryPoint);
        let mut points = settlements + 2 * cities + card_points;
        if self.has_longest_road {
            points += BONUS_VICTORY_POINTS;
        }
        if self.has_largest_army {
            points += BONUS_VICTORY_POINTS;
        }
        points
    }

    pub fn set_has_longest_road(&mut self, value: bool) {
        self.has_longest_road = value;
    }

    pub fn set_has_largest_army(&mut self, value: bool) {
        self.has_largest_army = value;
    }

    // ==================== Resource cards ====================

    pub fn add_resource_cards(&mut self, cards: &ResourceHand) {
        self.resource_cards.add_hand(cards);
    }

    pub fn try_remove_resource_cards(&mut self, cards: &ResourceHand) -> bool {
        self.resource_cards.try_remove_hand(cards)
    }

    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        self.resource_cards.contains(cost)
    }

    /// Removes one random resource card, as when robbed.
    pub fn remove_random_resource_card<R: Rng>(&mut self, rng: &mut R) -> Option<ResourceType> {
        self.resource_cards.remove_random(rng)
    }

    /// Whether `cards` is an acceptable discard bundle: exactly
    /// `required` cards, all of them actually held.
    pub fn can_discard_resource_cards(&self, cards: &ResourceHand, required: u32) -> bool {
        cards.total() == required && self.resource_cards.contains(cards)
    }

    /// Gives up every card of one resource type, as when a monopoly is
    /// played against this player. Returns the number surrendered.
    pub fn surrender_resource_type(&mut self, resource: ResourceType) -> u32 {
        let held = self.resource_cards.count(resource);
        self.resource_cards.try_remove(resource, held);
        held
    }

    // ==================== Development cards ====================

    /// Adds a freshly bought card; it stays on hold until the end of the
    /// buyer's turn.
    pub fn buy_development_card(&mut self, card: DevelopmentCardType) {
        self.on_hold_development_cards.add(card, 1);
    }

    /// Moves all on-hold cards into the playable hand.
    pub fn release_on_hold_development_cards(&mut self) {
        for card in DevelopmentCardType::ALL {
            let count = self.on_hold_development_cards.count(card);
            self.playable_development_cards.add(card, count);
        }
        self.on_hold_development_cards = DevelopmentCardHand::new();
    }

    pub fn can_play_development_card(&self, card: DevelopmentCardType) -> bool {
        card != DevelopmentCardType::VictoryPoint
            && self.playable_development_cards.count(card) > 0
    }

    /// Consumes a playable card. Knights also count towards the largest
    /// army.
    pub fn play_development_card(&mut self, card: DevelopmentCardType) -> bool {
        if !self.can_play_development_card(card) {
            return false;
        }
        self.playable_development_cards.try_remove_one(card);
        if card == DevelopmentCardType::Knight {
            self.knights_played += 1;
        }
        true
    }

    // ==================== Building pieces ====================

    pub fn has_road_piece(&self) -> bool {
        self.remaining_roads > 0
    }

    pub fn has_settlement_piece(&self) -> bool {
        self.remaining_settlements > 0
    }

    pub fn has_city_piece(&self) -> bool {
        self.remaining_cities > 0
    }

    pub fn take_road_piece(&mut self) -> bool {
        if self.remaining_roads == 0 {
            return false;
        }
        self.remaining_roads -= 1;
        true
    }

    pub fn return_road_piece(&mut self) {
        self.remaining_roads += 1;
    }

    pub fn take_settlement_piece(&mut self) -> bool {
        if self.remaining_settlements == 0 {
            return false;
        }
        self.remaining_settlements -= 1;
        true
    }

    /// Upgrading to a city consumes a city piece and returns the
    /// settlement piece to the supply.
    pub fn take_city_piece(&mut self) -> bool {
        if self.remaining_cities == 0 {
            return false;
        }
        self.remaining_cities -= 1;
        self.remaining_settlements += 1;
        true
    }

    // ==================== Embargoes ====================

    pub fn embargo_player(&mut self, target: PlayerColour) {
        self.embargoed_players.insert(target);
    }

    pub fn remove_embargo(&mut self, target: PlayerColour) {
        self.embargoed_players.remove(&target);
    }

    pub fn has_embargoed(&self, target: PlayerColour) -> bool {
        self.embargoed_players.contains(&target)
    }
}
