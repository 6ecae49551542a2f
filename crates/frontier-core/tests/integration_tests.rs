//! Integration tests for the Frontier rules engine.
//!
//! These tests run complete game flows against the public API: board
//! construction, both setup rounds, dice and distribution, and the
//! phase gating a caller observes from outside.

use frontier_core::*;

/// A legal, fixed spread of setup placements for a four-player game:
/// four settlements along the top coast, then four along the bottom in
/// the reverse pass.
const FIRST_ROUND: [(i32, i32, i32, i32); 4] =
    [(2, 0, 3, 0), (4, 0, 5, 0), (6, 0, 7, 0), (8, 0, 8, 1)];
const SECOND_ROUND: [(i32, i32, i32, i32); 4] =
    [(8, 5, 7, 5), (6, 5, 5, 5), (4, 5, 3, 5), (2, 5, 2, 4)];

/// Runs both setup rounds with the fixed placement spread.
fn complete_setup(game: &mut Game) {
    for &(sx, sy, rx, ry) in FIRST_ROUND.iter().chain(SECOND_ROUND.iter()) {
        game.build_settlement(VertexCoords::new(sx, sy))
            .expect("setup settlement");
        game.build_road(VertexCoords::new(sx, sy), VertexCoords::new(rx, ry))
            .expect("setup road");
    }
    assert_eq!(game.phase(), GamePhase::Main);
}

/// Resolves discards and the robber after a seven so the turn can end.
fn handle_seven(game: &mut Game) {
    let mut iterations = 0;
    while game.sub_phase() != GameSubPhase::PlayTurn {
        assert!(iterations < 10, "seven handling should settle quickly");
        iterations += 1;
        match game.sub_phase() {
            GameSubPhase::DiscardResources => {
                let owing: Vec<(PlayerColour, u32)> = game
                    .players_yet_to_discard()
                    .iter()
                    .map(|(c, n)| (*c, *n))
                    .collect();
                for (colour, required) in owing {
                    let hand = *game.player(colour).unwrap().resource_cards();
                    let mut bundle = ResourceHand::new();
                    let mut left = required;
                    for (resource, held) in hand.iter() {
                        let take = held.min(left);
                        bundle.add(resource, take);
                        left -= take;
                    }
                    game.discard_resources(colour, bundle).expect("discard");
                }
            }
            GameSubPhase::MoveRobberSevenRoll => {
                let robber = game.board().robber_position();
                let target = grid::all_tiles()
                    .into_iter()
                    .find(|t| *t != robber)
                    .unwrap();
                game.move_robber(target).expect("robber move");
            }
            GameSubPhase::StealResourceSevenRoll => {
                let current = game.current_colour();
                let robber = game.board().robber_position();
                let victim = game
                    .board()
                    .house_colours_on_tile(robber)
                    .into_iter()
                    .find(|c| *c != current)
                    .unwrap();
                game.steal_resource_card(victim).expect("steal");
            }
            other => panic!("unexpected sub-phase after a seven: {:?}", other),
        }
    }
}

/// Plays one full turn: roll, resolve a seven if needed, end.
fn play_turn(game: &mut Game) {
    game.roll_dice().expect("roll");
    if game.dice_total() == 7 {
        handle_seven(game);
    }
    game.next_player().expect("end turn");
}

#[test]
fn test_board_shape_after_construction() {
    let game = Game::new(4, Some(99)).unwrap();
    let board = game.board();

    assert_eq!(board.tiles().count(), 19);
    assert_eq!(board.roads().len(), 72);
    assert_eq!(board.ports().len(), 18);

    let mut wood = 0;
    let mut brick = 0;
    let mut sheep = 0;
    let mut wheat = 0;
    let mut ore = 0;
    let mut desert = 0;
    for tile in board.tiles() {
        match tile.tile_type {
            TileType::Resource(ResourceType::Wood) => wood += 1,
            TileType::Resource(ResourceType::Brick) => brick += 1,
            TileType::Resource(ResourceType::Sheep) => sheep += 1,
            TileType::Resource(ResourceType::Wheat) => wheat += 1,
            TileType::Resource(ResourceType::Ore) => ore += 1,
            TileType::Desert => desert += 1,
        }
    }
    assert_eq!(
        (wood, brick, sheep, wheat, ore, desert),
        (4, 3, 4, 4, 3, 1)
    );

    // Activation numbers follow the standard distribution.
    let mut counts = [0u32; 13];
    for tile in board.tiles() {
        if let Some(n) = tile.activation_number {
            counts[n as usize] += 1;
        }
    }
    assert_eq!(counts[2], 1);
    assert_eq!(counts[7], 0);
    assert_eq!(counts[12], 1);
    for n in [3, 4, 5, 6, 8, 9, 10, 11] {
        assert_eq!(counts[n], 2, "two tiles should carry {}", n);
    }
}

#[test]
fn test_same_seed_same_game() {
    let mut a = Game::new(4, Some(1234)).unwrap();
    let mut b = Game::new(4, Some(1234)).unwrap();

    assert_eq!(a.turn_order(), b.turn_order());
    assert_eq!(
        a.board().robber_position(),
        b.board().robber_position()
    );
    let tiles_a: Vec<Tile> = a.board().tiles().copied().collect();
    let tiles_b: Vec<Tile> = b.board().tiles().copied().collect();
    assert_eq!(tiles_a, tiles_b);

    complete_setup(&mut a);
    complete_setup(&mut b);
    for _ in 0..12 {
        let roll_a = a.roll_dice().unwrap();
        let roll_b = b.roll_dice().unwrap();
        assert_eq!(roll_a, roll_b, "seeded dice sequences must match");
        if a.dice_total() == 7 {
            handle_seven(&mut a);
            handle_seven(&mut b);
        }
        a.next_player().unwrap();
        b.next_player().unwrap();
    }
}

#[test]
fn test_different_seeds_diverge() {
    let a = Game::new(4, Some(1)).unwrap();
    let b = Game::new(4, Some(2)).unwrap();
    let tiles_a: Vec<Tile> = a.board().tiles().copied().collect();
    let tiles_b: Vec<Tile> = b.board().tiles().copied().collect();
    // Not strictly guaranteed for every pair of seeds, but these two
    // produce different boards.
    assert!(tiles_a != tiles_b || a.turn_order() != b.turn_order());
}

#[test]
fn test_setup_follows_snake_order() {
    let mut game = Game::new(4, Some(7)).unwrap();
    let order = game.turn_order();
    let mut placing = Vec::new();

    for &(sx, sy, rx, ry) in FIRST_ROUND.iter().chain(SECOND_ROUND.iter()) {
        placing.push(game.current_colour());
        game.build_settlement(VertexCoords::new(sx, sy)).unwrap();
        game.build_road(VertexCoords::new(sx, sy), VertexCoords::new(rx, ry))
            .unwrap();
    }

    let mut expected = order.clone();
    let mut reversed = order.clone();
    reversed.reverse();
    expected.extend(reversed);
    assert_eq!(placing, expected);
    assert_eq!(game.current_colour(), order[0], "first player opens the game");
}

#[test]
fn test_occupied_vertex_is_rejected() {
    let mut game = Game::new(4, Some(7)).unwrap();
    game.build_settlement(VertexCoords::new(5, 2)).unwrap();
    game.build_road(VertexCoords::new(5, 2), VertexCoords::new(6, 2))
        .unwrap();
    assert_eq!(
        game.build_settlement(VertexCoords::new(5, 2)).unwrap_err(),
        Error::InvalidBuildLocation
    );
    // The distance rule also blocks the adjacent vertex.
    assert_eq!(
        game.build_settlement(VertexCoords::new(4, 2)).unwrap_err(),
        Error::InvalidBuildLocation
    );
}

#[test]
fn test_actions_gated_by_phase() {
    let mut game = Game::new(3, Some(5)).unwrap();

    // Nothing but setup placement is legal during setup.
    assert_eq!(game.roll_dice().unwrap_err(), Error::InvalidGamePhase);
    assert_eq!(game.next_player().unwrap_err(), Error::InvalidGamePhase);
    assert_eq!(
        game.buy_development_card().unwrap_err(),
        Error::InvalidGamePhase
    );
    assert_eq!(
        game.trade_with_bank(ResourceType::Wood, ResourceType::Ore)
            .unwrap_err(),
        Error::InvalidGamePhase
    );
    assert_eq!(
        game.move_robber(TileCoords::new(2, 2)).unwrap_err(),
        Error::InvalidGamePhase
    );

    // A road before its settlement is out of order too.
    assert_eq!(
        game.build_road(VertexCoords::new(5, 2), VertexCoords::new(6, 2))
            .unwrap_err(),
        Error::InvalidGamePhase
    );
}

#[test]
fn test_three_player_game_runs_full_rotations() {
    let mut game = Game::new(3, Some(21)).unwrap();
    // Three-player setup: first three spreads forward, then back.
    let first = &FIRST_ROUND[..3];
    let second = &SECOND_ROUND[1..];
    for &(sx, sy, rx, ry) in first.iter().chain(second.iter()) {
        game.build_settlement(VertexCoords::new(sx, sy)).unwrap();
        game.build_road(VertexCoords::new(sx, sy), VertexCoords::new(rx, ry))
            .unwrap();
    }
    assert_eq!(game.phase(), GamePhase::Main);
    let opener = game.current_colour();

    for _ in 0..9 {
        play_turn(&mut game);
    }
    assert_eq!(
        game.current_colour(),
        opener,
        "three full rotations return to the opener"
    );
}

#[test]
fn test_distribution_conserves_cards() {
    let mut game = Game::new(4, Some(31)).unwrap();
    complete_setup(&mut game);
    let fixed_total = game.remaining_resource_cards().total()
        + game
            .players()
            .iter()
            .map(|p| p.resource_cards().total())
            .sum::<u32>();

    for _ in 0..20 {
        play_turn(&mut game);
        let in_play: u32 = game
            .players()
            .iter()
            .map(|p| p.resource_cards().total())
            .sum();
        let bank = game.remaining_resource_cards();
        assert_eq!(in_play + bank.total(), fixed_total);
        for resource in ResourceType::ALL {
            let type_total: u32 = game
                .players()
                .iter()
                .map(|p| p.resource_cards().count(resource))
                .sum::<u32>()
                + bank.count(resource);
            assert_eq!(type_total, constants::BANK_CARDS_PER_RESOURCE);
        }
    }
}

#[test]
fn test_seven_with_small_hands_skips_discard() {
    let mut game = Game::new(4, Some(13)).unwrap();
    complete_setup(&mut game);

    // Roll until the first seven; nobody can exceed seven cards this
    // early, so the game must go straight to robber movement.
    for _ in 0..200 {
        game.roll_dice().unwrap();
        if game.dice_total() == 7 {
            assert!(
                game.players_yet_to_discard().is_empty(),
                "no hand can owe a discard yet"
            );
            assert!(matches!(
                game.sub_phase(),
                GameSubPhase::MoveRobberSevenRoll
            ));
            return;
        }
        if game
            .players()
            .iter()
            .any(|p| p.resource_cards().total() > 7)
        {
            // Hands have grown past the threshold; stop before the
            // assertion above becomes wrong.
            return;
        }
        game.next_player().unwrap();
    }
}

#[test]
fn test_setup_leaves_expected_pieces_and_points() {
    let mut game = Game::new(4, Some(50)).unwrap();
    complete_setup(&mut game);
    let colour = game.current_colour();
    let player = game.player(colour).unwrap();
    assert_eq!(player.victory_points(), 2, "two setup settlements");
    assert_eq!(player.remaining_settlements(), 3);
    assert_eq!(player.remaining_roads(), 13);
    assert_eq!(player.remaining_cities(), 4);
}
