//! The board: tiles, houses, roads, ports and the robber.
//!
//! This module contains:
//! - Tile generation with shuffled resources and activation numbers
//! - House (settlement/city) placement rules, including the
//!   distance rule and the setup-phase relaxation
//! - Road placement rules and the longest-trail computation
//! - The fixed port layout and port ownership queries
//! - Robber position and movement

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::grid::{self, TileCoords, VertexCoords, TILE_GRID_SIZE, VERTEX_GRID_HEIGHT, VERTEX_GRID_WIDTH};
use crate::player::{PlayerColour, ResourceType};

/// Reshuffle attempts before accepting a board where 6s and 8s touch.
const ACTIVATION_SHUFFLE_ATTEMPTS: u32 = 100;

/// What a tile produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Resource(ResourceType),
    Desert,
}

impl TileType {
    /// The resource this tile yields, or `None` for the desert.
    pub fn resource(&self) -> Option<ResourceType> {
        match self {
            TileType::Resource(resource) => Some(*resource),
            TileType::Desert => None,
        }
    }
}

/// One hexagonal tile of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub coords: TileCoords,
    pub tile_type: TileType,
    /// Dice total that activates this tile. `None` for the desert.
    pub activation_number: Option<u8>,
}

/// What stands on a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum House {
    Empty,
    Settlement(PlayerColour),
    City(PlayerColour),
}

impl House {
    pub fn owner(&self) -> Option<PlayerColour> {
        match self {
            House::Empty => None,
            House::Settlement(colour) | House::City(colour) => Some(*colour),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, House::Empty)
    }

    /// Cards yielded per activation of an adjacent tile.
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            House::Empty => 0,
            House::Settlement(_) => 1,
            House::City(_) => 2,
        }
    }
}

/// One road position. All 72 positions exist from the start; placing a
/// road just sets the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub first: VertexCoords,
    pub second: VertexCoords,
    pub owner: Option<PlayerColour>,
}

impl Road {
    fn connects(&self, vertex: VertexCoords) -> bool {
        self.first == vertex || self.second == vertex
    }

    fn other_end(&self, vertex: VertexCoords) -> VertexCoords {
        if self.first == vertex {
            self.second
        } else {
            self.first
        }
    }
}

/// Exchange rate a port grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
    ThreeToOne,
}

impl PortType {
    /// The 2:1 port for a given resource.
    pub fn for_resource(resource: ResourceType) -> PortType {
        match resource {
            ResourceType::Wood => PortType::Wood,
            ResourceType::Brick => PortType::Brick,
            ResourceType::Sheep => PortType::Sheep,
            ResourceType::Wheat => PortType::Wheat,
            ResourceType::Ore => PortType::Ore,
        }
    }
}

/// A port anchor: one coastal vertex granting a trade rate to whoever
/// builds a house there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub coords: VertexCoords,
    pub port_type: PortType,
}

/// Who currently holds the longest-road title, and at what length.
/// `colour` is `None` until some trail reaches the minimum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongestRoadInfo {
    pub colour: Option<PlayerColour>,
    pub length: u32,
}

/// The full board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Vec<Option<Tile>>>,
    houses: Vec<Vec<Option<House>>>,
    roads: Vec<Road>,
    ports: Vec<Port>,
    robber_position: TileCoords,
    longest_road: LongestRoadInfo,
}

impl Board {
    /// Generates a fresh board: shuffled tiles and activation numbers,
    /// empty vertices, all road positions unowned, the fixed port
    /// layout, and the robber on the desert.
    pub fn new<R: Rng>(rng: &mut R) -> Board {
        let (tiles, robber_position) = Self::generate_tiles(rng);

        let mut houses = vec![vec![None; VERTEX_GRID_HEIGHT as usize]; VERTEX_GRID_WIDTH as usize];
        for vertex in grid::all_vertices() {
            houses[vertex.x as usize][vertex.y as usize] = Some(House::Empty);
        }

        let roads = grid::all_edges()
            .into_iter()
            .map(|(first, second)| Road {
                first,
                second,
                owner: None,
            })
            .collect();

        Board {
            tiles,
            houses,
            roads,
            ports: constants::starting_ports(),
            robber_position,
            longest_road: LongestRoadInfo {
                colour: None,
                length: 0,
            },
        }
    }

    fn generate_tiles<R: Rng>(rng: &mut R) -> (Vec<Vec<Option<Tile>>>, TileCoords) {
        let positions = grid::all_tiles();

        let mut tile_types = Vec::with_capacity(positions.len());
        for (tile_type, count) in constants::tile_type_totals() {
            for _ in 0..count {
                tile_types.push(tile_type);
            }
        }
        tile_types.shuffle(rng);

        let mut numbers = Vec::new();
        for (number, count) in constants::activation_number_totals() {
            for _ in 0..count {
                numbers.push(number);
            }
        }

        // Keep reshuffling the numbers until no 6 or 8 tiles touch, up
        // to a bounded number of attempts.
        for _ in 0..ACTIVATION_SHUFFLE_ATTEMPTS {
            numbers.shuffle(rng);
            if !Self::high_numbers_adjacent(&positions, &tile_types, &numbers) {
                break;
            }
        }

        let mut tiles = vec![vec![None; TILE_GRID_SIZE as usize]; TILE_GRID_SIZE as usize];
        let mut robber_position = positions[0];
        let mut next_number = 0;
        for (coords, tile_type) in positions.iter().zip(tile_types.iter()) {
            let activation_number = match tile_type {
                TileType::Desert => {
                    robber_position = *coords;
                    None
                }
                TileType::Resource(_) => {
                    let number = numbers[next_number];
                    next_number += 1;
                    Some(number)
                }
            };
            tiles[coords.x as usize][coords.y as usize] = Some(Tile {
                coords: *coords,
                tile_type: *tile_type,
                activation_number,
            });
        }

        (tiles, robber_position)
    }

    /// Whether a 6 or 8 would sit next to another 6 or 8 under the given
    /// assignment of `numbers` to the non-desert tiles of `positions`.
    fn high_numbers_adjacent(
        positions: &[TileCoords],
        tile_types: &[TileType],
        numbers: &[u8],
    ) -> bool {
        let mut assigned: Vec<Vec<Option<u8>>> =
            vec![vec![None; TILE_GRID_SIZE as usize]; TILE_GRID_SIZE as usize];
        let mut next_number = 0;
        for (coords, tile_type) in positions.iter().zip(tile_types.iter()) {
            if tile_type.resource().is_some() {
                assigned[coords.x as usize][coords.y as usize] = Some(numbers[next_number]);
                next_number += 1;
            }
        }
        for coords in positions {
            let Some(number) = assigned[coords.x as usize][coords.y as usize] else {
                continue;
            };
            if number != 6 && number != 8 {
                continue;
            }
            for neighbour in coords.neighbours() {
                if let Some(other) = assigned[neighbour.x as usize][neighbour.y as usize] {
                    if other == 6 || other == 8 {
                        return true;
                    }
                }
            }
        }
        false
    }

    // ==================== Tiles ====================

    pub fn get_tile(&self, coords: TileCoords) -> Option<&Tile> {
        if !coords.is_valid() {
            return None;
        }
        self.tiles[coords.x as usize][coords.y as usize].as_ref()
    }

    /// All tiles in fixed grid order (x outer, y inner). Resource
    /// distribution follows this order, so it is part of a seeded game's
    /// deterministic behaviour.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().flatten().filter_map(|t| t.as_ref())
    }

    /// Tiles activated by a dice total, in fixed grid order.
    pub fn tiles_with_activation_number(&self, number: u8) -> Vec<&Tile> {
        self.tiles()
            .filter(|tile| tile.activation_number == Some(number))
            .collect()
    }

    // ==================== Houses ====================

    pub fn get_house(&self, coords: VertexCoords) -> Option<House> {
        if !coords.is_valid() {
            return None;
        }
        self.houses[coords.x as usize][coords.y as usize]
    }

    /// Whether `colour` may place a settlement at `coords`.
    ///
    /// The vertex must exist and be empty, and no neighbouring vertex
    /// may be occupied (the distance rule). Outside setup the vertex
    /// must also connect to one of the player's roads.
    pub fn can_place_house(&self, coords: VertexCoords, colour: PlayerColour, is_setup: bool) -> bool {
        match self.get_house(coords) {
            Some(house) if house.is_empty() => {}
            _ => return false,
        }
        let neighbour_occupied = coords
            .neighbours()
            .iter()
            .any(|n| self.get_house(*n).is_some_and(|h| !h.is_empty()));
        if neighbour_occupied {
            return false;
        }
        if is_setup {
            return true;
        }
        self.roads_at_vertex(coords)
            .any(|road| road.owner == Some(colour))
    }

    /// Places a settlement. The caller is expected to have checked
    /// `can_place_house` first.
    pub fn place_house(&mut self, coords: VertexCoords, colour: PlayerColour) {
        if coords.is_valid() {
            self.houses[coords.x as usize][coords.y as usize] = Some(House::Settlement(colour));
        }
    }

    /// Whether `colour` has a settlement at `coords` to upgrade.
    pub fn can_upgrade_house(&self, coords: VertexCoords, colour: PlayerColour) -> bool {
        self.get_house(coords) == Some(House::Settlement(colour))
    }

    pub fn upgrade_house(&mut self, coords: VertexCoords, colour: PlayerColour) {
        if self.can_upgrade_house(coords, colour) {
            self.houses[coords.x as usize][coords.y as usize] = Some(House::City(colour));
        }
    }

    /// Non-empty houses at the corners of a tile, with their positions.
    pub fn houses_on_tile(&self, coords: TileCoords) -> Vec<(VertexCoords, House)> {
        if !coords.is_valid() {
            return Vec::new();
        }
        coords
            .vertices()
            .into_iter()
            .filter_map(|v| {
                self.get_house(v)
                    .filter(|h| !h.is_empty())
                    .map(|h| (v, h))
            })
            .collect()
    }

    /// Colours owning at least one house on a tile, deduplicated, in
    /// corner order.
    pub fn house_colours_on_tile(&self, coords: TileCoords) -> Vec<PlayerColour> {
        let mut colours = Vec::new();
        for (_, house) in self.houses_on_tile(coords) {
            if let Some(colour) = house.owner() {
                if !colours.contains(&colour) {
                    colours.push(colour);
                }
            }
        }
        colours
    }

    /// The tiles whose corner a house sits on, desert excluded.
    pub fn tiles_surrounding_house(&self, coords: VertexCoords) -> Vec<&Tile> {
        coords
            .touching_tiles()
            .into_iter()
            .filter_map(|t| self.get_tile(t))
            .filter(|t| t.tile_type.resource().is_some())
            .collect()
    }

    // ==================== Roads ====================

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    fn road_index(&self, a: VertexCoords, b: VertexCoords) -> Option<usize> {
        self.roads
            .iter()
            .position(|road| (road.first == a && road.second == b) || (road.first == b && road.second == a))
    }

    pub fn get_road(&self, a: VertexCoords, b: VertexCoords) -> Option<&Road> {
        self.road_index(a, b).map(|i| &self.roads[i])
    }

    fn roads_at_vertex(&self, vertex: VertexCoords) -> impl Iterator<Item = &Road> + '_ {
        self.roads.iter().filter(move |road| road.connects(vertex))
    }

    /// Whether `colour` may place a road between `a` and `b`.
    ///
    /// The edge must exist and be unowned, and at least one endpoint
    /// must connect to the player's network: a house of theirs, or one
    /// of their roads reached through a vertex not blocked by an
    /// opponent's house.
    pub fn can_place_road(&self, a: VertexCoords, b: VertexCoords, colour: PlayerColour) -> bool {
        let Some(road) = self.get_road(a, b) else {
            return false;
        };
        if road.owner.is_some() {
            return false;
        }
        [a, b].into_iter().any(|vertex| {
            match self.get_house(vertex) {
                Some(house) if house.owner() == Some(colour) => return true,
                Some(house) if !house.is_empty() => return false,
                _ => {}
            }
            self.roads_at_vertex(vertex)
                .any(|other| other.owner == Some(colour) && !(other.connects(a) && other.connects(b)))
        })
    }

    /// Places a road. The caller is expected to have checked
    /// `can_place_road` first.
    pub fn place_road(&mut self, a: VertexCoords, b: VertexCoords, colour: PlayerColour) {
        if let Some(index) = self.road_index(a, b) {
            self.roads[index].owner = Some(colour);
        }
    }

    /// Removes a road's owner again, for rolling back a failed compound
    /// action.
    pub(crate) fn clear_road(&mut self, a: VertexCoords, b: VertexCoords) {
        if let Some(index) = self.road_index(a, b) {
            self.roads[index].owner = None;
        }
    }

    // ==================== Longest road ====================

    pub fn longest_road_info(&self) -> LongestRoadInfo {
        self.longest_road
    }

    /// Recomputes the longest-road title after the board changed.
    ///
    /// A trail may reuse vertices but never road segments, and cannot
    /// pass through a vertex occupied by an opponent's house. The title
    /// needs at least the minimum length. The holder only changes when a
    /// single challenger is strictly longer than the current holder; on
    /// exact ties the holder keeps the title, and when two non-holders
    /// tie for the strict maximum nobody takes it.
    pub fn update_longest_road(&mut self, turn_order: &[PlayerColour]) -> LongestRoadInfo {
        let lengths: Vec<(PlayerColour, u32)> = turn_order
            .iter()
            .map(|&colour| (colour, self.longest_trail_for(colour)))
            .collect();

        // The incumbent keeps the title as long as their trail still
        // qualifies.
        let holder = self.longest_road.colour.and_then(|colour| {
            lengths
                .iter()
                .find(|(c, length)| *c == colour && *length >= constants::MIN_LONGEST_ROAD)
                .copied()
        });

        let max_length = lengths.iter().map(|(_, l)| *l).max().unwrap_or(0);
        let holder_length = holder.map(|(_, l)| l).unwrap_or(0);

        let mut best = match holder {
            Some((colour, length)) => LongestRoadInfo {
                colour: Some(colour),
                length,
            },
            None => LongestRoadInfo {
                colour: None,
                length: 0,
            },
        };
        if max_length >= constants::MIN_LONGEST_ROAD && max_length > holder_length {
            let mut challengers = lengths
                .iter()
                .filter(|(_, length)| *length == max_length)
                .map(|(colour, _)| *colour);
            let first = challengers.next();
            // Two non-holders tying for the maximum leave the title
            // where it was.
            if challengers.next().is_none() {
                if let Some(colour) = first {
                    best = LongestRoadInfo {
                        colour: Some(colour),
                        length: max_length,
                    };
                }
            }
        }
        self.longest_road = best;
        best
    }

    /// Longest trail of `colour`'s roads, in segments.
    fn longest_trail_for(&self, colour: PlayerColour) -> u32 {
        let owned: Vec<usize> = self
            .roads
            .iter()
            .enumerate()
            .filter(|(_, road)| road.owner == Some(colour))
            .map(|(i, _)| i)
            .collect();
        let mut best = 0;
        let mut visited = HashSet::new();
        for &start in &owned {
            // Walk outward from each end of the starting segment.
            for entry in [self.roads[start].first, self.roads[start].second] {
                let length = self.trail_from(start, entry, colour, &mut visited);
                best = best.max(length);
            }
        }
        best
    }

    /// Length of the longest trail starting at road `index`, entered
    /// from `entry`, extending through the opposite vertex.
    fn trail_from(
        &self,
        index: usize,
        entry: VertexCoords,
        colour: PlayerColour,
        visited: &mut HashSet<usize>,
    ) -> u32 {
        visited.insert(index);
        let exit = self.roads[index].other_end(entry);
        let mut best = 0;
        let blocked = self
            .get_house(exit)
            .is_some_and(|house| !house.is_empty() && house.owner() != Some(colour));
        if !blocked {
            for (next, road) in self.roads.iter().enumerate() {
                if road.owner == Some(colour) && road.connects(exit) && !visited.contains(&next) {
                    best = best.max(self.trail_from(next, exit, colour, visited));
                }
            }
        }
        visited.remove(&index);
        1 + best
    }

    // ==================== Ports ====================

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Whether `colour` owns a house on an anchor of the given port
    /// type.
    pub fn colour_has_port_of_type(&self, colour: PlayerColour, port_type: PortType) -> bool {
        self.ports
            .iter()
            .filter(|port| port.port_type == port_type)
            .any(|port| {
                self.get_house(port.coords)
                    .is_some_and(|house| house.owner() == Some(colour))
            })
    }

    // ==================== Robber ====================

    pub fn robber_position(&self) -> TileCoords {
        self.robber_position
    }

    /// The robber must move to a different, existing tile.
    pub fn can_move_robber_to(&self, coords: TileCoords) -> bool {
        self.get_tile(coords).is_some() && coords != self.robber_position
    }

    pub fn move_robber_to(&mut self, coords: TileCoords) -> bool {
        if !self.can_move_robber_to(coords) {
            return false;
        }
        self.robber_position = coords;
        true
    }
}
