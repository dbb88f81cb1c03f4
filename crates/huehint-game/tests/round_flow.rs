//! Full games played against the rules, start to finish.

use huehint_game::{GameError, GameSession, engine};
use huehint_protocol::{Device, Mode, PlayerId, RedirectRole, Role, SessionCode, SessionStatus};
use rand::{SeedableRng, rngs::StdRng};

// =========================================================================
// Helpers
// =========================================================================

struct Game {
    session: GameSession,
    rng: StdRng,
    ana: PlayerId,
    beto: PlayerId,
}

fn new_game(seed: u64) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut session, ana) =
        GameSession::new(SessionCode::new("FLOW01"), Mode::Remote, "Ana", &mut rng);
    let beto = session.join("Beto", Device::Mobile, &mut rng).unwrap();
    Game {
        session,
        rng,
        ana,
        beto,
    }
}

/// Where the current round's target sits.
fn target(game: &Game) -> (i32, i32) {
    let pos = game.session.current_round().unwrap().target.position;
    (i32::from(pos.row), i32::from(pos.col))
}

/// A cell exactly `distance` rows away from the target (same column).
fn cell_at_distance(game: &Game, distance: i32) -> (i32, i32) {
    let (row, col) = target(game);
    let shifted = if row + distance <= 4 {
        row + distance
    } else {
        row - distance
    };
    (shifted, col)
}

// =========================================================================
// End to end
// =========================================================================

#[test]
fn test_two_player_round_credits_only_the_explainer() {
    let mut g = new_game(2024);

    let start = g.session.begin_round(&g.ana, &mut g.rng).unwrap();
    assert_eq!(start.round_number, 1);
    assert_eq!(start.explainer_id, g.ana);
    assert_eq!(start.redirect, RedirectRole::SubmitHint);
    assert_eq!(g.session.status, SessionStatus::InGame);

    g.session
        .hint(&g.ana, "red", "the color of fire")
        .unwrap();

    let (row, col) = target(&g);
    let first = g.session.guess(&g.beto, row, col).unwrap();
    assert_eq!((first.score, first.distance), (4, 0));
    assert_eq!(g.session.player(&g.ana).unwrap().points, 3);
    assert!(!g.session.status(&g.beto).unwrap().round_over);
    assert_eq!(g.session.summary(), Err(GameError::RoundInProgress(1)));

    let (row, col) = cell_at_distance(&g, 1);
    let second = g.session.guess(&g.beto, row, col).unwrap();
    assert_eq!((second.score, second.distance), (3, 1));

    let status = g.session.status(&g.beto).unwrap();
    assert!(status.round_over);
    assert_eq!(status.role, Role::Waiting);

    let summary = g.session.summary().unwrap();
    let ana = &summary.players[0];
    let beto = &summary.players[1];
    assert_eq!(ana.name, "Ana");
    assert_eq!((ana.round_score, ana.total_score), (0, 3 + 2));
    assert_eq!(beto.name, "Beto");
    assert_eq!((beto.round_score, beto.total_score), (7, 0));
    assert_eq!(summary.short_hint, "red");
    assert_eq!(summary.long_hint, "the color of fire");
}

#[test]
fn test_third_move_is_refused() {
    let mut g = new_game(5);
    g.session.begin_round(&g.ana, &mut g.rng).unwrap();
    g.session.hint(&g.ana, "blue", "deep ocean").unwrap();

    g.session.guess(&g.beto, 0, 0).unwrap();
    g.session.guess(&g.beto, 4, 4).unwrap();

    assert_eq!(
        g.session.guess(&g.beto, 2, 2),
        Err(GameError::NoAttemptAvailable)
    );
}

#[test]
fn test_rounds_rotate_through_every_player_and_wrap() {
    let mut g = new_game(9);
    let cleo = g
        .session
        .join("Cleo", Device::Desktop, &mut g.rng)
        .unwrap();

    g.session.begin_round(&g.ana, &mut g.rng).unwrap();
    let mut explainers = vec![g.session.current_round().unwrap().explainer_id.clone()];

    for expected_round in 2..=4 {
        let current = explainers[explainers.len() - 1].clone();
        let n = g.session.advance(&current, &mut g.rng).unwrap();
        assert_eq!(n, expected_round);
        explainers.push(g.session.current_round().unwrap().explainer_id.clone());
    }

    assert_eq!(
        explainers,
        vec![g.ana.clone(), g.beto.clone(), cleo, g.ana.clone()]
    );

    let numbers: Vec<u32> = g.session.rounds.iter().map(|r| r.round_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(g.session.current_round_number, Some(4));
}

#[test]
fn test_points_accumulate_across_rounds() {
    let mut g = new_game(77);
    g.session.begin_round(&g.ana, &mut g.rng).unwrap();
    g.session.hint(&g.ana, "green", "fresh grass").unwrap();
    let (row, col) = target(&g);
    g.session.guess(&g.beto, row, col).unwrap();
    g.session.guess(&g.beto, row, col).unwrap();

    // Beto explains round 2; Ana guesses.
    g.session.advance(&g.ana, &mut g.rng).unwrap();
    g.session.hint(&g.beto, "pink", "bubble gum").unwrap();
    let (row, col) = cell_at_distance(&g, 2);
    let mv = g.session.guess(&g.ana, row, col).unwrap();
    assert_eq!(mv.score, 2);

    let ana = g.session.player(&g.ana).unwrap().points;
    let beto = g.session.player(&g.beto).unwrap().points;
    assert_eq!(ana, 3 + 3);
    assert_eq!(beto, 1);
}

#[test]
fn test_same_seed_replays_same_targets() {
    let play = |seed| {
        let mut g = new_game(seed);
        g.session.begin_round(&g.ana, &mut g.rng).unwrap();
        g.session.advance(&g.ana, &mut g.rng).unwrap();
        g.session
            .rounds
            .iter()
            .map(|r| r.target.key)
            .collect::<Vec<_>>()
    };
    assert_eq!(play(31), play(31));
}

#[test]
fn test_rotate_explainer_host_in_pool() {
    let g = new_game(1);
    let players = &g.session.players;
    assert_eq!(engine::rotate_explainer(players, None), Some(g.ana.clone()));
    assert_eq!(
        engine::rotate_explainer(players, Some(&g.beto)),
        Some(g.ana.clone())
    );
}
