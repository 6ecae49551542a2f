//! Fixed quantities of the base game: tile mix, activation numbers,
//! port layout, bank size, card counts and build costs.

use crate::board::{Port, PortType, TileType};
use crate::grid::VertexCoords;
use crate::player::{DevelopmentCardType, ResourceHand, ResourceType};

/// Number of cards of each resource the bank starts with.
pub const BANK_CARDS_PER_RESOURCE: u32 = 19;

/// Dice total that triggers discards and the robber.
pub const ROBBER_ROLL: u8 = 7;

/// Holding more than this many resource cards forces a discard on a
/// seven.
pub const SAFE_HAND_SIZE: u32 = 7;

/// Minimum trail length before the longest-road title can be claimed.
pub const MIN_LONGEST_ROAD: u32 = 5;

/// Knights needed to claim the largest army for the first time.
pub const INITIAL_KNIGHTS_FOR_LARGEST_ARMY: u32 = 3;

/// How many tiles of each type the board holds (19 in total).
pub fn tile_type_totals() -> [(TileType, u32); 6] {
    [
        (TileType::Resource(ResourceType::Wood), 4),
        (TileType::Resource(ResourceType::Brick), 3),
        (TileType::Resource(ResourceType::Sheep), 4),
        (TileType::Resource(ResourceType::Wheat), 4),
        (TileType::Resource(ResourceType::Ore), 3),
        (TileType::Desert, 1),
    ]
}

/// How many tiles carry each activation number (18 in total; the desert
/// carries none).
pub fn activation_number_totals() -> [(u8, u32); 10] {
    [
        (2, 1),
        (3, 2),
        (4, 2),
        (5, 2),
        (6, 2),
        (8, 2),
        (9, 2),
        (10, 2),
        (11, 2),
        (12, 1),
    ]
}

/// How many of each development card the deck holds (25 in total).
pub fn development_card_totals() -> [(DevelopmentCardType, u32); 5] {
    [
        (DevelopmentCardType::Knight, 14),
        (DevelopmentCardType::VictoryPoint, 5),
        (DevelopmentCardType::RoadBuilding, 2),
        (DevelopmentCardType::YearOfPlenty, 2),
        (DevelopmentCardType::Monopoly, 2),
    ]
}

/// The fixed port layout: nine ports, each anchored at two adjacent
/// coastal vertices, listed clockwise from the top-left corner of the
/// board. Four 3:1 ports plus one 2:1 port per resource.
pub fn starting_ports() -> Vec<Port> {
    let anchors = [
        (PortType::ThreeToOne, (2, 0)),
        (PortType::ThreeToOne, (3, 0)),
        (PortType::Sheep, (5, 0)),
        (PortType::Sheep, (6, 0)),
        (PortType::ThreeToOne, (8, 0)),
        (PortType::ThreeToOne, (8, 1)),
        (PortType::Ore, (10, 2)),
        (PortType::Ore, (10, 3)),
        (PortType::Wheat, (9, 4)),
        (PortType::Wheat, (8, 4)),
        (PortType::ThreeToOne, (7, 5)),
        (PortType::ThreeToOne, (6, 5)),
        (PortType::Wood, (3, 5)),
        (PortType::Wood, (2, 5)),
        (PortType::Brick, (1, 4)),
        (PortType::Brick, (1, 3)),
        (PortType::ThreeToOne, (1, 2)),
        (PortType::ThreeToOne, (1, 1)),
    ];
    anchors
        .into_iter()
        .map(|(port_type, (x, y))| Port {
            coords: VertexCoords::new(x, y),
            port_type,
        })
        .collect()
}

/// Cost of a road: one wood, one brick.
pub fn road_cost() -> ResourceHand {
    ResourceHand::with(&[(ResourceType::Wood, 1), (ResourceType::Brick, 1)])
}

/// Cost of a settlement: one each of wood, brick, sheep and wheat.
pub fn settlement_cost() -> ResourceHand {
    ResourceHand::with(&[
        (ResourceType::Wood, 1),
        (ResourceType::Brick, 1),
        (ResourceType::Sheep, 1),
        (ResourceType::Wheat, 1),
    ])
}

/// Cost of a city upgrade: two wheat, three ore.
pub fn city_cost() -> ResourceHand {
    ResourceHand::with(&[(ResourceType::Wheat, 2), (ResourceType::Ore, 3)])
}

/// Cost of a development card: one each of sheep, wheat and ore.
pub fn development_card_cost() -> ResourceHand {
    ResourceHand::with(&[
        (ResourceType::Sheep, 1),
        (ResourceType::Wheat, 1),
        (ResourceType::Ore, 1),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tile_totals_cover_the_board() {
        let total: u32 = tile_type_totals().iter().map(|(_, n)| n).sum();
        assert_eq!(total, 19);
    }

    #[test]
    fn test_activation_numbers_cover_non_desert_tiles() {
        let total: u32 = activation_number_totals().iter().map(|(_, n)| n).sum();
        assert_eq!(total, 18);
    }

    #[test]
    fn test_development_card_deck_size() {
        let total: u32 = development_card_totals().iter().map(|(_, n)| n).sum();
        assert_eq!(total, 25);
    }

    #[test]
    fn test_port_layout_shape() {
        let ports = starting_ports();
        assert_eq!(ports.len(), 18, "nine ports anchored at two vertices each");

        let three_to_one = ports
            .iter()
            .filter(|p| p.port_type == PortType::ThreeToOne)
            .count();
        assert_eq!(three_to_one, 8);
        for resource in ResourceType::ALL {
            let anchors = ports
                .iter()
                .filter(|p| p.port_type == PortType::for_resource(resource))
                .count();
            assert_eq!(anchors, 2, "one 2:1 port per resource");
        }
    }

    #[test]
    fn test_port_anchors_are_valid_adjacent_vertices() {
        let ports = starting_ports();
        for pair in ports.chunks(2) {
            assert_eq!(pair[0].port_type, pair[1].port_type);
            assert!(pair[0].coords.is_valid());
            assert!(pair[1].coords.is_valid());
            assert!(
                crate::grid::is_edge(pair[0].coords, pair[1].coords),
                "port anchors {:?} and {:?} must share an edge",
                pair[0].coords,
                pair[1].coords
            );
        }
    }
}
