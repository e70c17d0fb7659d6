//! Ranking and tiebreaker engine
//!
//! This module orders teams for standings slides. Ordering is by total
//! score over a round subset, descending, with ties broken by distance to
//! the correct tiebreaker answer and, failing that, by the legacy scalar
//! tiebreaker score. Everything here is a pure function over the game
//! document; no state is kept between calls.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::game::{GameData, QuestionFormat, Round, Team, TeamId};

/// A team's entry in a pre-ranked standings snapshot
///
/// Standings slides carry a vector of these so the display never has to
/// re-run the ranking on a navigation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTeam {
    /// The team's stable identifier
    pub team_id: TeamId,
    /// The team's display name
    pub name: String,
    /// 1-based rank; tied teams share a rank
    pub rank: usize,
    /// Total score over the rounds the standings slide covers
    pub score: f64,
}

/// Sums a team's scores over the given round subset
///
/// Absent entries count as zero. Score entries keyed by a round id not in
/// `rounds` are ignored entirely, which also discards orphaned scores left
/// behind by deleted rounds.
pub fn total_score(team: &Team, rounds: &[Round]) -> f64 {
    rounds
        .iter()
        .filter_map(|round| team.scores.get(&round.id))
        .sum()
}

/// Distance from the team's tiebreaker answer to the correct answer,
/// or `None` if the team supplied no answer
pub fn tiebreaker_distance(team: &Team, correct_answer: f64) -> Option<f64> {
    team.tiebreaker_answer
        .map(|answer| (answer - correct_answer).abs())
}

/// Whether team `a` ranks strictly above team `b` on the tiebreaker basis
///
/// With no known correct answer, the comparison falls back to the legacy
/// scalar tiebreaker score (higher wins). With a correct answer, smaller
/// distance wins; equal distances and answerless pairs fall back to the
/// legacy score; a team with an answer always outranks one without.
pub fn ranks_above(a: &Team, b: &Team, correct_answer: Option<f64>) -> bool {
    let Some(correct) = correct_answer else {
        return a.tiebreaker_score > b.tiebreaker_score;
    };

    match (
        tiebreaker_distance(a, correct),
        tiebreaker_distance(b, correct),
    ) {
        (Some(distance_a), Some(distance_b)) => {
            if distance_a == distance_b {
                a.tiebreaker_score > b.tiebreaker_score
            } else {
                distance_a < distance_b
            }
        }
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => a.tiebreaker_score > b.tiebreaker_score,
    }
}

/// Orders the two teams for standings, totals first, tiebreaker basis on
/// equal totals
fn standings_ordering(
    (a, total_a): (&Team, f64),
    (b, total_b): (&Team, f64),
    correct_answer: Option<f64>,
) -> Ordering {
    match total_b.total_cmp(&total_a) {
        Ordering::Equal => {
            if ranks_above(a, b, correct_answer) {
                Ordering::Less
            } else if ranks_above(b, a, correct_answer) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ordering => ordering,
    }
}

/// Sorts teams descending by total score over `rounds`, ties broken by
/// [`ranks_above`]
///
/// The sort is stable: teams that are genuinely tied keep their document
/// order.
pub fn sorted_standings<'a>(
    teams: &'a [Team],
    rounds: &[Round],
    correct_answer: Option<f64>,
) -> Vec<&'a Team> {
    teams
        .iter()
        .map(|team| (team, total_score(team, rounds)))
        .sorted_by(|a, b| standings_ordering(*a, *b, correct_answer))
        .map(|(team, _)| team)
        .collect_vec()
}

/// Sorts teams as [`sorted_standings`] and assigns 1-based ranks
///
/// A team shares the previous team's rank only on a genuine statistical
/// tie: equal total score and a tiebreaker basis that orders neither team
/// above the other. Adjacent sort order alone never shares a rank, so a
/// team holding a tiebreaker answer outranks an answerless team with a
/// distinct rank even at equal score.
pub fn with_ranks(
    teams: &[Team],
    rounds: &[Round],
    correct_answer: Option<f64>,
) -> Vec<RankedTeam> {
    let mut ranked: Vec<RankedTeam> = Vec::with_capacity(teams.len());
    let mut previous: Option<(&Team, f64, usize)> = None;

    for (position, team) in sorted_standings(teams, rounds, correct_answer)
        .into_iter()
        .enumerate()
    {
        let total = total_score(team, rounds);
        let rank = match previous {
            Some((previous_team, previous_total, previous_rank))
                if previous_total == total
                    && !ranks_above(previous_team, team, correct_answer)
                    && !ranks_above(team, previous_team, correct_answer) =>
            {
                previous_rank
            }
            _ => position + 1,
        };
        previous = Some((team, total, rank));
        ranked.push(RankedTeam {
            team_id: team.id,
            name: team.name.clone(),
            rank,
            score: total,
        });
    }

    ranked
}

/// Finds the correct tiebreaker answer in the document
///
/// Scans rounds in order and parses the answer of the first question with
/// format [`QuestionFormat::Tiebreaker`]. Returns `None` if no tiebreaker
/// question exists or its answer does not parse as a number (with optional
/// magnitude suffix).
pub fn extract_correct_tiebreaker_answer(game: &GameData) -> Option<f64> {
    game.rounds
        .iter()
        .flat_map(|round| round.questions.iter())
        .find(|question| question.format == QuestionFormat::Tiebreaker)
        .and_then(|question| parse_tiebreaker_value(&question.answer))
}

/// Parses a tiebreaker answer string into a number
///
/// Commas and spaces are stripped, the match is case-insensitive, and a
/// trailing `B` or `T` scales by a billion or a trillion respectively.
pub fn parse_tiebreaker_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect();

    let (digits, multiplier) = match cleaned.chars().last()? {
        'b' | 'B' => (
            &cleaned[..cleaned.len() - 1],
            crate::constants::tiebreaker::BILLION,
        ),
        't' | 'T' => (
            &cleaned[..cleaned.len() - 1],
            crate::constants::tiebreaker::TRILLION,
        ),
        _ => (cleaned.as_str(), 1.0),
    };

    digits.parse::<f64>().ok().map(|value| value * multiplier)
}
