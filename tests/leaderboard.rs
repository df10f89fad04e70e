//! Standings for every format.

mod common;

use bot_tournament_engine::elo::apply_match;
use bot_tournament_engine::{
    build_leaderboard, double_elimination, generate, EngineError, GenerationState, Leaderboard,
    MatchResult, NewMatch, PlayedMatch, RankingStrategy, TournamentFormat, TournamentSettings,
};
use common::{favourite, player, players, seed_of, simulate, state, with_third_place};
use std::collections::HashMap;

fn order(leaderboard: &Leaderboard) -> Vec<usize> {
    leaderboard
        .entries
        .iter()
        .map(|e| (e.participant.as_u128() - 1) as usize)
        .collect()
}

/// Shared places skip as many places as were shared (1, 2, 3, 3, 5, ...).
fn assert_competition_ranking(leaderboard: &Leaderboard) {
    let places = leaderboard.places();
    assert_eq!(places.first(), Some(&1));
    for i in 1..places.len() {
        assert!(
            places[i] == places[i - 1] || places[i] == i as u32 + 1,
            "{:?}",
            places
        );
    }
}

fn minimum() -> TournamentSettings {
    TournamentSettings {
        ranking: RankingStrategy::Minimum,
        ..Default::default()
    }
}

fn play_table(
    mut s: GenerationState,
    result: impl Fn(&NewMatch) -> MatchResult,
) -> GenerationState {
    let generation = generate(&s).unwrap();
    for m in generation.matches {
        let r = result(&m);
        s.matches.push(m.into_played().with_result(r));
    }
    s
}

#[test]
fn single_elimination_places() {
    let (done, _) = simulate(state(TournamentFormat::SingleElimination, 8), favourite);
    let leaderboard = build_leaderboard(&done).unwrap();
    assert!(leaderboard.finished);
    assert_eq!(leaderboard.places(), vec![1, 2, 3, 3, 5, 5, 5, 5]);
    assert_eq!(&order(&leaderboard)[..2], &[0, 1]);
    assert_eq!(leaderboard.entries[0].score, 3.0);
    assert_competition_ranking(&leaderboard);
}

#[test]
fn byes_count_as_cleared_rounds() {
    let (done, _) = simulate(state(TournamentFormat::SingleElimination, 6), favourite);
    let leaderboard = build_leaderboard(&done).unwrap();
    assert_eq!(leaderboard.places(), vec![1, 2, 3, 3, 5, 5]);
    assert_eq!(leaderboard.entry(player(0).id).unwrap().score, 3.0);
    // Seed 2 beat seed 5 and lost to seed 1.
    assert_eq!(leaderboard.entry(player(2).id).unwrap().score, 1.0);
    assert_eq!(leaderboard.entry(player(5).id).unwrap().score, 0.0);
}

#[test]
fn third_place_match_splits_the_semifinal_losers() {
    let s = with_third_place(state(TournamentFormat::SingleElimination, 8));
    let (done, _) = simulate(s, favourite);
    let leaderboard = build_leaderboard(&done).unwrap();
    assert!(leaderboard.finished);
    assert_eq!(leaderboard.places(), vec![1, 2, 3, 4, 5, 5, 5, 5]);
    assert_eq!(&order(&leaderboard)[..4], &[0, 1, 2, 3]);
    let bracket = leaderboard.bracket.unwrap();
    assert_eq!(bracket.third_place, Some(7));
    assert_eq!(bracket.reset_match, None);
}

#[test]
fn double_elimination_ranks_everyone() {
    for n in 2..=24 {
        let (done, _) = simulate(state(TournamentFormat::DoubleElimination, n), favourite);
        let leaderboard = build_leaderboard(&done).unwrap();
        assert!(leaderboard.finished, "n = {n}");
        assert_eq!(leaderboard.entries.len(), n);
        assert_competition_ranking(&leaderboard);
        let places = leaderboard.places();
        let podium = n.min(3);
        assert_eq!(
            &places[..podium],
            &(1..=podium as u32).collect::<Vec<_>>()[..],
            "n = {n}"
        );
        assert_eq!(order(&leaderboard)[..2], [0, 1]);
    }
}

#[test]
fn double_elimination_reset_decides_the_title() {
    let grand_final = double_elimination(4).final_match.unwrap();
    let (done, _) = simulate(state(TournamentFormat::DoubleElimination, 4), |m| {
        if m.index >= grand_final {
            1
        } else {
            favourite(m)
        }
    });
    let leaderboard = build_leaderboard(&done).unwrap();
    assert!(leaderboard.finished);
    assert_eq!(leaderboard.places(), vec![1, 2, 3, 4]);
    assert_eq!(order(&leaderboard)[..2], [1, 0]);
    assert_eq!(leaderboard.bracket.unwrap().reset_match, Some(6));
}

#[test]
fn bracket_in_progress_shares_first_place() {
    let mut s = state(TournamentFormat::DoubleElimination, 4);
    for m in generate(&s).unwrap().matches {
        let winner = favourite(&m);
        s.matches
            .push(m.into_played().with_result(MatchResult::won_by(winner)));
    }
    let leaderboard = build_leaderboard(&s).unwrap();
    assert!(!leaderboard.finished);
    // Losing once in double elimination only drops a participant to the losers bracket.
    assert_eq!(leaderboard.places(), vec![1, 1, 1, 1]);
    assert_eq!(leaderboard.bracket.unwrap().losers_final, Some(4));
}

#[test]
fn table_points_order() {
    let s = play_table(state(TournamentFormat::Table, 4), |m| {
        MatchResult::won_by(favourite(m))
    });
    let leaderboard = build_leaderboard(&s).unwrap();
    assert!(leaderboard.finished);
    assert_eq!(order(&leaderboard), vec![0, 1, 2, 3]);
    assert_eq!(leaderboard.places(), vec![1, 2, 3, 4]);
    let points: Vec<f64> = leaderboard.entries.iter().map(|e| e.score).collect();
    assert_eq!(points, vec![3.0, 2.0, 1.0, 0.0]);
    assert!(leaderboard.bracket.is_none());

    let lowest_first = GenerationState {
        settings: minimum(),
        ..s
    };
    // Declared winners keep their points; the direction never flips the table.
    let leaderboard = build_leaderboard(&lowest_first).unwrap();
    assert_eq!(order(&leaderboard), vec![0, 1, 2, 3]);
}

#[test]
fn table_points_follow_the_ranking_direction() {
    // Seed 0 always reports the lowest score, seed 2 the highest.
    let raw = [1.0, 2.0, 5.0];
    let score = |m: &NewMatch| {
        MatchResult::scored(m.slots.iter().map(|p| raw[seed_of(p)]).collect())
    };

    let lowest_wins = state(TournamentFormat::Table, 3).with_settings(minimum());
    let leaderboard = build_leaderboard(&play_table(lowest_wins, score)).unwrap();
    assert_eq!(order(&leaderboard), vec![0, 1, 2]);
    let points: Vec<f64> = leaderboard.entries.iter().map(|e| e.score).collect();
    assert_eq!(points, vec![2.0, 1.0, 0.0]);
    assert_eq!(leaderboard.places(), vec![1, 2, 3]);

    let highest_wins = state(TournamentFormat::Table, 3);
    let leaderboard = build_leaderboard(&play_table(highest_wins, score)).unwrap();
    assert_eq!(order(&leaderboard), vec![2, 1, 0]);
}

#[test]
fn table_ties_are_broken_by_participant() {
    let s = play_table(state(TournamentFormat::Table, 4), |_| MatchResult::draw());
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![0, 1, 2, 3]);
    assert_eq!(leaderboard.places(), vec![1, 2, 3, 4]);
    assert!(leaderboard.entries.iter().all(|e| e.score == 1.5));
}

#[test]
fn table_unfinished_while_matches_are_open() {
    let mut s = state(TournamentFormat::Table, 3);
    let generation = generate(&s).unwrap();
    s.matches
        .extend(generation.matches.into_iter().map(|m| m.into_played()));
    assert!(!build_leaderboard(&s).unwrap().finished);

    s.matches.pop();
    for m in &mut s.matches {
        m.result = Some(MatchResult::won_by(0));
    }
    assert!(!build_leaderboard(&s).unwrap().finished);
}

#[test]
fn ongoing_orders_by_rating() {
    let mut s = state(TournamentFormat::Ongoing, 3);
    s.ratings.insert(player(0).id, 1400.0);
    s.ratings.insert(player(1).id, 1600.0);
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![1, 2, 0]);
    assert_eq!(leaderboard.entries[1].score, 1500.0);
    assert!(!leaderboard.finished);

    s.evaluation_closed = true;
    s.settings = minimum();
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![1, 2, 0]);
    assert!(leaderboard.finished);
}

#[test]
fn ongoing_winner_under_lowest_score_ranks_first() {
    let mut ratings = HashMap::new();
    let m = PlayedMatch::new(0, vec![player(0), player(1)])
        .with_result(MatchResult::scored(vec![1.0, 3.0]));
    assert!(apply_match(&mut ratings, &m, RankingStrategy::Minimum));

    let mut s = state(TournamentFormat::Ongoing, 3).with_settings(minimum());
    s.ratings = ratings;
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![0, 2, 1]);
    assert!(leaderboard.entries[0].score > 1500.0);
}

#[test]
fn single_player_orders_by_latest_score() {
    let mut s = state(TournamentFormat::SinglePlayer, 3).with_matches(vec![
        PlayedMatch::new(0, vec![player(0)]).with_result(MatchResult::scored(vec![5.0])),
        PlayedMatch::new(1, vec![player(1)]).with_result(MatchResult::scored(vec![9.0])),
    ]);
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![1, 0, 2]);
    assert_eq!(leaderboard.places(), vec![1, 2, 3]);
    assert!(!leaderboard.finished);

    s.matches
        .push(PlayedMatch::new(2, vec![player(2)]).with_result(MatchResult::scored(vec![7.0])));
    s.matches
        .push(PlayedMatch::new(3, vec![player(1)]).with_result(MatchResult::scored(vec![1.0])));
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![2, 0, 1]);
    assert!(leaderboard.finished);
}

#[test]
fn single_player_follows_the_ranking_direction() {
    let runs = [5.0, 9.0, 7.0]
        .into_iter()
        .enumerate()
        .map(|(seed, score)| {
            PlayedMatch::new(seed, vec![player(seed)])
                .with_result(MatchResult::scored(vec![score]))
        })
        .collect();
    let s = state(TournamentFormat::SinglePlayer, 3)
        .with_settings(minimum())
        .with_matches(runs);
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(order(&leaderboard), vec![0, 2, 1]);
    assert!(leaderboard.finished);
}

fn underdog(m: &NewMatch) -> usize {
    1 - favourite(m)
}

fn alternating(m: &NewMatch) -> usize {
    m.index % 2
}

fn count(places: &[u32], place: u32) -> usize {
    places.iter().filter(|&&p| p == place).count()
}

#[test]
fn bracket_places_hold_for_any_results() {
    let picks: [fn(&NewMatch) -> usize; 3] = [favourite, underdog, alternating];
    for n in 2..=24 {
        for pick in picks {
            let formats = [
                state(TournamentFormat::SingleElimination, n),
                with_third_place(state(TournamentFormat::SingleElimination, n)),
                state(TournamentFormat::DoubleElimination, n),
            ];
            for (kind, s) in formats.into_iter().enumerate() {
                let (done, _) = simulate(s, pick);
                let leaderboard = build_leaderboard(&done).unwrap();
                assert!(leaderboard.finished, "n = {n}, kind {kind}");
                assert_competition_ranking(&leaderboard);

                let places = leaderboard.places();
                assert_eq!(places.len(), n);
                assert!(places.iter().all(|&p| p >= 1 && p as usize <= n));
                assert_eq!(count(&places, 1), 1, "n = {n}, kind {kind}");
                assert_eq!(count(&places, 2), 1, "n = {n}, kind {kind}");
                let thirds = match kind {
                    // Without a third-place match both semifinal losers share place 3.
                    0 if n > 3 => 2,
                    _ if n > 2 => 1,
                    _ => 0,
                };
                assert_eq!(count(&places, 3), thirds, "n = {n}, kind {kind}");
            }
        }
    }
}

#[test]
fn inconsistent_bracket_fails() {
    let s = state(TournamentFormat::SingleElimination, 4)
        .with_matches(vec![PlayedMatch::new(9, vec![player(0), player(1)])]);
    assert_eq!(
        build_leaderboard(&s),
        Err(EngineError::UnknownBracketNode { index: 9, nodes: 3 })
    );
}

#[test]
fn lone_participant_is_unranked_bracket() {
    let s = GenerationState::new(TournamentFormat::DoubleElimination, players(1));
    let leaderboard = build_leaderboard(&s).unwrap();
    assert_eq!(leaderboard.places(), vec![1]);
    assert!(!leaderboard.finished);
    assert!(leaderboard.bracket.is_none());
}
