//! Slide model and slide builder
//!
//! This module turns a game document into the ordered slide sequence the
//! presentation displays. Building is deterministic: the same document
//! always yields the same slides with the same ids, and ids are derived
//! from document content rather than generated, so a rebuilt sequence
//! keeps "the same conceptual slide" addressable across edits.

use std::collections::BTreeSet;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    constants,
    game::{GameData, QuestionFormat, QuestionId, RoundFormat, RoundId},
    ranking::{self, RankedTeam},
};

/// A stable, content-derived identifier for a slide
///
/// Ids are deterministic functions of the document: a question slide's id
/// comes from its question id, a standings slide's from its round
/// position. Regenerating slides from an edited document therefore yields
/// the same id for the same conceptual slide.
#[derive(Debug, Clone, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    /// Id of the fixed leading welcome slide
    pub fn welcome() -> Self {
        Self("welcome".to_string())
    }

    /// Id of a round title slide
    pub fn round_title(round_id: RoundId) -> Self {
        Self(format!("round-title-{round_id}"))
    }

    /// Id of a question slide
    pub fn question(question_id: QuestionId) -> Self {
        Self(format!("question-{question_id}"))
    }

    /// Id of a round's submit-answers slide
    pub fn submit_answers(round_id: RoundId) -> Self {
        Self(format!("submit-answers-{round_id}"))
    }

    /// Id of an answer slide
    pub fn answer(question_id: QuestionId) -> Self {
        Self(format!("answer-{question_id}"))
    }

    /// Id of the standings slide shown after the round at `round_index`
    pub fn standings(round_index: usize) -> Self {
        Self(format!("standings-{round_index}"))
    }

    /// Id of the final standings slide
    pub fn standings_final() -> Self {
        Self("standings-final".to_string())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The kind of a slide together with its precomputed display payload
///
/// Payloads are computed once at build time (titles, question numbers,
/// crossword reveal sets, ranked standings snapshots) so navigation never
/// recomputes anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SlideKind {
    /// The fixed leading slide
    Welcome,
    /// A round's title card
    RoundTitle {
        /// Position of the round in the document
        round_index: usize,
        /// The round's stable id
        round_id: RoundId,
        /// The round's display name
        name: String,
        /// The round's format, shown as an icon on the title card
        format: RoundFormat,
    },
    /// A question being asked
    Question {
        /// Position of the round in the document
        round_index: usize,
        /// Position of the question within its round
        question_index: usize,
        /// The question's stable id
        question_id: QuestionId,
        /// Display title ("R1 - Q3", or "Tiebreaker")
        title: String,
        /// The prompt text
        prompt: String,
        /// 1-based sequential question number within the round, skipping
        /// connections
        number: usize,
        /// Whether this is a music question
        is_music: bool,
        /// Parsed 1-based crossword reveal indices (empty for
        /// non-crossword questions)
        crossword_reveals: BTreeSet<usize>,
    },
    /// The "hand in your answers" interstitial at the end of a round's
    /// questions
    SubmitAnswers {
        /// Position of the round in the document
        round_index: usize,
        /// The round's stable id
        round_id: RoundId,
    },
    /// A question's answer being revealed
    Answer {
        /// Position of the round in the document
        round_index: usize,
        /// Position of the question within its round
        question_index: usize,
        /// The question's stable id
        question_id: QuestionId,
        /// Display title ("R1 - A3", "Connection", or "Tiebreaker Answer")
        title: String,
        /// The prompt text, repeated for context
        prompt: String,
        /// The answer text
        answer: String,
        /// 1-based question number, `None` for connections (which consume
        /// no number slot)
        number: Option<usize>,
        /// Whether this is a music question; music answers are never
        /// staged behind a reveal step
        is_music: bool,
        /// Parsed 1-based crossword reveal indices (empty for
        /// non-crossword questions)
        crossword_reveals: BTreeSet<usize>,
    },
    /// Team standings, revealed row by row
    Standings {
        /// The round position the standings are scoped through, or `None`
        /// for the final standings over every round
        after_round: Option<usize>,
        /// Pre-sorted, pre-ranked snapshot of every team
        standings: Vec<RankedTeam>,
    },
}

/// One addressable unit of the presentation sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Stable content-derived identity
    pub id: SlideId,
    /// The slide's kind and display payload
    pub kind: SlideKind,
}

impl Slide {
    /// Whether this is an answer slide
    pub fn is_answer(&self) -> bool {
        matches!(self.kind, SlideKind::Answer { .. })
    }

    /// Whether this is a standings slide
    pub fn is_standings(&self) -> bool {
        matches!(self.kind, SlideKind::Standings { .. })
    }

    /// Whether this is the answer slide of a music question
    pub fn is_music_answer(&self) -> bool {
        matches!(self.kind, SlideKind::Answer { is_music: true, .. })
    }

    /// The question this slide presents, if it is a question or answer
    /// slide
    pub fn question_id(&self) -> Option<QuestionId> {
        match self.kind {
            SlideKind::Question { question_id, .. } | SlideKind::Answer { question_id, .. } => {
                Some(question_id)
            }
            _ => None,
        }
    }
}

/// Parses a comma-separated crossword reveal spec into a set of 1-based
/// indices
///
/// Empty and unparseable tokens are dropped. An absent spec, or one with
/// no usable token, falls back to the default index set `{1}`.
pub fn parse_crossword_reveals(spec: Option<&str>) -> BTreeSet<usize> {
    let parsed: BTreeSet<usize> = spec
        .map(|s| {
            s.split(',')
                .filter_map(|token| token.trim().parse::<usize>().ok())
                .filter(|index| *index >= 1)
                .collect()
        })
        .unwrap_or_default();

    if parsed.is_empty() {
        BTreeSet::from([constants::crossword::DEFAULT_REVEAL_INDEX])
    } else {
        parsed
    }
}

fn reveals_for(question: &crate::game::Question) -> BTreeSet<usize> {
    if question.format == QuestionFormat::CrosswordClue {
        parse_crossword_reveals(question.crossword_reveals.as_deref())
    } else {
        BTreeSet::new()
    }
}

/// Builds the complete slide sequence for a game document
///
/// The sequence is: a welcome slide, then per round a title slide, one
/// question slide per non-connection question, a submit-answers slide,
/// one answer slide per question (connections included), and a standings
/// slide scoped through that round. The standings slide after the last
/// round doubles as the final standings. A document with no rounds yields
/// only the welcome slide.
pub fn build_slides(game: &GameData) -> Vec<Slide> {
    let mut slides = vec![Slide {
        id: SlideId::welcome(),
        kind: SlideKind::Welcome,
    }];

    // Computed once; every standings slide reuses it.
    let correct_answer = ranking::extract_correct_tiebreaker_answer(game);

    for (round_index, round) in game.rounds.iter().enumerate() {
        slides.push(Slide {
            id: SlideId::round_title(round.id),
            kind: SlideKind::RoundTitle {
                round_index,
                round_id: round.id,
                name: round.name.clone(),
                format: round.format,
            },
        });

        let mut question_number = 0;
        for (question_index, question) in round.questions.iter().enumerate() {
            if question.format == QuestionFormat::Connection {
                continue;
            }
            question_number += 1;
            let title = if question.format == QuestionFormat::Tiebreaker {
                "Tiebreaker".to_string()
            } else {
                format!("R{} - Q{}", round_index + 1, question_number)
            };
            slides.push(Slide {
                id: SlideId::question(question.id),
                kind: SlideKind::Question {
                    round_index,
                    question_index,
                    question_id: question.id,
                    title,
                    prompt: question.prompt.clone(),
                    number: question_number,
                    is_music: question.is_music(),
                    crossword_reveals: reveals_for(question),
                },
            });
        }

        slides.push(Slide {
            id: SlideId::submit_answers(round.id),
            kind: SlideKind::SubmitAnswers {
                round_index,
                round_id: round.id,
            },
        });

        let mut answer_number = 0;
        for (question_index, question) in round.questions.iter().enumerate() {
            let (title, number) = match question.format {
                QuestionFormat::Connection => ("Connection".to_string(), None),
                QuestionFormat::Tiebreaker => {
                    answer_number += 1;
                    ("Tiebreaker Answer".to_string(), Some(answer_number))
                }
                _ => {
                    answer_number += 1;
                    (
                        format!("R{} - A{}", round_index + 1, answer_number),
                        Some(answer_number),
                    )
                }
            };
            slides.push(Slide {
                id: SlideId::answer(question.id),
                kind: SlideKind::Answer {
                    round_index,
                    question_index,
                    question_id: question.id,
                    title,
                    prompt: question.prompt.clone(),
                    answer: question.answer.clone(),
                    number,
                    is_music: question.is_music(),
                    crossword_reveals: reveals_for(question),
                },
            });
        }

        let is_final = round_index + 1 == game.rounds.len();
        slides.push(Slide {
            id: if is_final {
                SlideId::standings_final()
            } else {
                SlideId::standings(round_index)
            },
            kind: SlideKind::Standings {
                after_round: (!is_final).then_some(round_index),
                standings: ranking::with_ranks(
                    &game.teams,
                    &game.rounds[..=round_index],
                    correct_answer,
                ),
            },
        });
    }

    slides
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::game::{Question, Round, Team};

    fn question(format: QuestionFormat, prompt: &str, answer: &str) -> Question {
        let mut q = Question::new(format);
        q.prompt = prompt.to_string();
        q.answer = answer.to_string();
        q
    }

    fn two_round_game() -> GameData {
        let mut first = Round::new("Openers", RoundFormat::Standard);
        first.questions.push(question(
            QuestionFormat::Standard,
            "Capital of France?",
            "Paris",
        ));
        first.questions.push(question(
            QuestionFormat::Connection,
            "",
            "All capitals",
        ));
        first.questions.push(question(
            QuestionFormat::Standard,
            "Capital of Peru?",
            "Lima",
        ));

        let mut second = Round::new("Closers", RoundFormat::Music);
        second.questions.push(question(
            QuestionFormat::MusicQuestion,
            "Name this song",
            "Bohemian Rhapsody",
        ));

        GameData {
            rounds: vec![first, second],
            teams: vec![Team::new("Alpha"), Team::new("Beta")],
        }
    }

    fn kinds(slides: &[Slide]) -> Vec<&'static str> {
        slides
            .iter()
            .map(|slide| match slide.kind {
                SlideKind::Welcome => "welcome",
                SlideKind::RoundTitle { .. } => "round-title",
                SlideKind::Question { .. } => "question",
                SlideKind::SubmitAnswers { .. } => "submit",
                SlideKind::Answer { .. } => "answer",
                SlideKind::Standings { .. } => "standings",
            })
            .collect_vec()
    }

    #[test]
    fn test_build_sequence_shape() {
        let slides = build_slides(&two_round_game());
        assert_eq!(
            kinds(&slides),
            [
                "welcome",
                // Round one: three questions, one of which is a connection.
                "round-title",
                "question",
                "question",
                "submit",
                "answer",
                "answer",
                "answer",
                "standings",
                // Round two: single music question.
                "round-title",
                "question",
                "submit",
                "answer",
                "standings",
            ]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let game = two_round_game();
        assert_eq!(build_slides(&game), build_slides(&game));
    }

    #[test]
    fn test_connection_skipped_on_question_side_only() {
        let game = two_round_game();
        let slides = build_slides(&game);

        let question_count = slides
            .iter()
            .filter(|s| matches!(s.kind, SlideKind::Question { round_index: 0, .. }))
            .count();
        let answer_count = slides
            .iter()
            .filter(|s| matches!(s.kind, SlideKind::Answer { round_index: 0, .. }))
            .count();
        assert_eq!(question_count, 2);
        assert_eq!(answer_count, 3);
    }

    #[test]
    fn test_question_numbering_skips_connections() {
        let game = two_round_game();
        let slides = build_slides(&game);

        let titles: Vec<&str> = slides
            .iter()
            .filter_map(|s| match &s.kind {
                SlideKind::Question { round_index: 0, title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(titles, ["R1 - Q1", "R1 - Q2"]);

        let answer_titles: Vec<(&str, Option<usize>)> = slides
            .iter()
            .filter_map(|s| match &s.kind {
                SlideKind::Answer { round_index: 0, title, number, .. } => {
                    Some((title.as_str(), *number))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            answer_titles,
            [
                ("R1 - A1", Some(1)),
                ("Connection", None),
                ("R1 - A2", Some(2)),
            ]
        );
    }

    #[test]
    fn test_tiebreaker_titles_consume_number_slot() {
        let mut round = Round::new("Mixed", RoundFormat::Standard);
        round
            .questions
            .push(question(QuestionFormat::Standard, "Q?", "A"));
        let mut tiebreaker = question(QuestionFormat::Tiebreaker, "Guess", "1000");
        tiebreaker.answer = "1000".to_string();
        round.questions.push(tiebreaker);
        round
            .questions
            .push(question(QuestionFormat::Standard, "Q2?", "A2"));
        let game = GameData {
            rounds: vec![round],
            teams: vec![],
        };

        let titles: Vec<(String, usize)> = build_slides(&game)
            .into_iter()
            .filter_map(|s| match s.kind {
                SlideKind::Question { title, number, .. } => Some((title, number)),
                _ => None,
            })
            .collect();
        assert_eq!(
            titles,
            [
                ("R1 - Q1".to_string(), 1),
                ("Tiebreaker".to_string(), 2),
                ("R1 - Q3".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_stable_ids_under_content_edit() {
        let mut game = two_round_game();
        let before = build_slides(&game);
        game.rounds[0].questions[0].prompt = "Capital of Spain?".to_string();
        let after = build_slides(&game);

        let before_ids = before.iter().map(|s| s.id.clone()).collect_vec();
        let after_ids = after.iter().map(|s| s.id.clone()).collect_vec();
        assert_eq!(before_ids, after_ids);
    }

    #[test]
    fn test_empty_round_still_emits_frame_slides() {
        let game = GameData {
            rounds: vec![Round::new("Hollow", RoundFormat::Standard)],
            teams: vec![],
        };
        let slides = build_slides(&game);
        assert_eq!(kinds(&slides), ["welcome", "round-title", "submit", "standings"]);
    }

    #[test]
    fn test_empty_document_yields_welcome_only() {
        let slides = build_slides(&GameData::default());
        assert_eq!(kinds(&slides), ["welcome"]);
        assert_eq!(slides[0].id, SlideId::welcome());
    }

    #[test]
    fn test_final_standings_id() {
        let slides = build_slides(&two_round_game());
        let standing_ids = slides
            .iter()
            .filter(|s| s.is_standings())
            .map(|s| s.id.as_str())
            .collect_vec();
        assert_eq!(standing_ids, ["standings-0", "standings-final"]);

        let final_slide = slides.iter().find(|s| s.id == SlideId::standings_final());
        assert!(matches!(
            final_slide.map(|s| &s.kind),
            Some(SlideKind::Standings { after_round: None, .. })
        ));
    }

    #[test]
    fn test_standings_snapshot_includes_every_team() {
        let mut game = two_round_game();
        game.teams[0]
            .scores
            .insert(game.rounds[0].id, 5.0);
        let slides = build_slides(&game);

        for slide in slides.iter().filter(|s| s.is_standings()) {
            let SlideKind::Standings { standings, .. } = &slide.kind else {
                unreachable!();
            };
            assert_eq!(standings.len(), 2);
            assert_eq!(standings[0].name, "Alpha");
            assert_eq!(standings[0].rank, 1);
        }
    }

    #[test]
    fn test_music_flag_carried_on_both_slides() {
        let slides = build_slides(&two_round_game());
        let music_question = slides.iter().any(|s| {
            matches!(s.kind, SlideKind::Question { round_index: 1, is_music: true, .. })
        });
        let music_answer = slides.iter().any(|s| s.is_music_answer());
        assert!(music_question);
        assert!(music_answer);
    }

    #[test]
    fn test_parse_crossword_reveals() {
        assert_eq!(
            parse_crossword_reveals(Some("1, 3, 5")),
            BTreeSet::from([1, 3, 5])
        );
        // Bad tokens are dropped, good ones kept.
        assert_eq!(
            parse_crossword_reveals(Some("2, x, , 4")),
            BTreeSet::from([2, 4])
        );
        // Absent or useless specs fall back to the default set.
        assert_eq!(parse_crossword_reveals(None), BTreeSet::from([1]));
        assert_eq!(parse_crossword_reveals(Some("")), BTreeSet::from([1]));
        assert_eq!(parse_crossword_reveals(Some("a, b")), BTreeSet::from([1]));
        // Zero is not a valid 1-based index.
        assert_eq!(parse_crossword_reveals(Some("0")), BTreeSet::from([1]));
    }

    #[test]
    fn test_crossword_question_gets_reveal_set() {
        let mut round = Round::new("Grid", RoundFormat::Crossword);
        let mut clue = question(QuestionFormat::CrosswordClue, "4 across", "OTTER");
        clue.crossword_reveals = Some("1,4".to_string());
        round.questions.push(clue);
        let game = GameData {
            rounds: vec![round],
            teams: vec![],
        };

        let slides = build_slides(&game);
        let sets = slides
            .iter()
            .filter_map(|s| match &s.kind {
                SlideKind::Question { crossword_reveals, .. }
                | SlideKind::Answer { crossword_reveals, .. } => Some(crossword_reveals.clone()),
                _ => None,
            })
            .collect_vec();
        assert_eq!(sets, [BTreeSet::from([1, 4]), BTreeSet::from([1, 4])]);
    }
}
