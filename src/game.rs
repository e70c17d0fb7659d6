//! Game document data model
//!
//! This module defines the document the presentation core consumes: an
//! ordered list of rounds, each owning an ordered list of questions, plus
//! the teams playing the game. The document is supplied by collaborators
//! (load/save, live editing) and treated as an immutable input per
//! regeneration pass; the core never mutates the caller's document.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use uuid::Uuid;

/// A unique, stable identifier for a question
///
/// Question identity survives content edits; the slide builder derives
/// stable slide ids from it so an edited question keeps "its" slide.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct QuestionId(Uuid);

/// A unique, stable identifier for a round
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct RoundId(Uuid);

/// A unique, stable identifier for a team
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct TeamId(Uuid);

macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::from_str(s)?))
            }
        }
    };
}

uuid_id!(QuestionId);
uuid_id!(RoundId);
uuid_id!(TeamId);

/// The format of an individual question
///
/// The format governs which slides a question produces and how its text
/// fields are interpreted by the display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionFormat {
    /// A plain prompt-and-answer question
    Standard,
    /// A connection question: revealed only among the round's answers,
    /// with no question slide of its own
    Connection,
    /// A numeric-estimation question used to break score ties
    Tiebreaker,
    /// A music question identified by title/artist; its answer is never
    /// staged behind an extra reveal step
    MusicQuestion,
    /// A crossword clue with a reveal-index spec naming which letters
    /// to uncover
    CrosswordClue,
    /// A before-and-after wordplay question
    BeforeAndAfter,
}

impl QuestionFormat {
    /// Whether questions of this format award points through the points
    /// field (tiebreakers and connections do not)
    pub fn awards_points(self) -> bool {
        !matches!(self, Self::Tiebreaker | Self::Connection)
    }
}

/// The format of a round
///
/// A round's format only selects the *default* format newly added
/// questions take; it does not constrain existing questions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundFormat {
    /// Plain prompt-and-answer questions
    Standard,
    /// Crossword clue questions
    Crossword,
    /// Music questions
    Music,
    /// Before-and-after questions
    BeforeAndAfter,
}

impl RoundFormat {
    /// The question format a newly added question defaults to in a round
    /// of this format
    pub fn default_question_format(self) -> QuestionFormat {
        match self {
            Self::Standard => QuestionFormat::Standard,
            Self::Crossword => QuestionFormat::CrosswordClue,
            Self::Music => QuestionFormat::MusicQuestion,
            Self::BeforeAndAfter => QuestionFormat::BeforeAndAfter,
        }
    }
}

/// A single question owned by a round
///
/// Identity is immutable; content is freely editable. Which text fields
/// are meaningful depends on [`QuestionFormat`]: music questions use
/// `song_title`/`artist`, crossword clues use `crossword_reveals`, and
/// everything uses `prompt`/`answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique across the document
    pub id: QuestionId,
    /// The question's format
    pub format: QuestionFormat,
    /// The prompt read to the room
    pub prompt: String,
    /// The answer revealed on the answer slide
    pub answer: String,
    /// Song title, for music questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_title: Option<String>,
    /// Performing artist, for music questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Playback start offset in seconds, for music questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_start_seconds: Option<f64>,
    /// Comma-separated 1-based letter indices to reveal, for crossword clues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crossword_reveals: Option<String>,
    /// Points awarded for a correct answer, in half-point steps within
    /// [`crate::constants::points`] bounds (not enforced here; validation
    /// belongs to the editor)
    pub points: f64,
}

impl Question {
    /// Creates a blank question of the given format with default points
    pub fn new(format: QuestionFormat) -> Self {
        Self {
            id: QuestionId::new(),
            format,
            prompt: String::new(),
            answer: String::new(),
            song_title: None,
            artist: None,
            media_start_seconds: None,
            crossword_reveals: None,
            points: 1.0,
        }
    }

    /// Whether this question is a music question
    pub fn is_music(&self) -> bool {
        self.format == QuestionFormat::MusicQuestion
    }
}

/// A round of questions
///
/// Round order within the document is significant: a round's position is
/// the cutoff used when scoring standings "after round N".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Stable identifier, unique across the document
    pub id: RoundId,
    /// Display name of the round
    pub name: String,
    /// Default format for newly added questions
    pub format: RoundFormat,
    /// The round's questions, in presentation order
    pub questions: Vec<Question>,
}

impl Round {
    /// Creates an empty round with the given name and format
    pub fn new(name: impl Into<String>, format: RoundFormat) -> Self {
        Self {
            id: RoundId::new(),
            name: name.into(),
            format,
            questions: Vec::new(),
        }
    }
}

/// A team playing the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Stable identifier, unique across the document
    pub id: TeamId,
    /// Display name of the team
    pub name: String,
    /// Scores keyed by round id; absent entries count as zero. Entries
    /// for rounds no longer in the document are ignored by scoring.
    #[serde(default)]
    pub scores: HashMap<RoundId, f64>,
    /// The team's numeric answer to the tiebreaker question, if submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreaker_answer: Option<f64>,
    /// Legacy scalar tiebreaker score, consulted only when structured
    /// answers cannot decide an ordering
    #[serde(default)]
    pub tiebreaker_score: f64,
}

impl Team {
    /// Creates a team with the given name and no scores
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            scores: HashMap::new(),
            tiebreaker_answer: None,
            tiebreaker_score: 0.0,
        }
    }
}

/// The root game document
///
/// The single value the presentation core consumes. Each regeneration pass
/// takes a fresh `GameData` in and produces derived state out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    /// Rounds in presentation order
    pub rounds: Vec<Round>,
    /// Teams in display order
    pub teams: Vec<Team>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_through_string() {
        let id = QuestionId::new();
        let parsed: QuestionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_default_question_format_follows_round_format() {
        assert_eq!(
            RoundFormat::Music.default_question_format(),
            QuestionFormat::MusicQuestion
        );
        assert_eq!(
            RoundFormat::Crossword.default_question_format(),
            QuestionFormat::CrosswordClue
        );
        assert_eq!(
            RoundFormat::Standard.default_question_format(),
            QuestionFormat::Standard
        );
        assert_eq!(
            RoundFormat::BeforeAndAfter.default_question_format(),
            QuestionFormat::BeforeAndAfter
        );
    }

    #[test]
    fn test_awards_points() {
        assert!(QuestionFormat::Standard.awards_points());
        assert!(QuestionFormat::MusicQuestion.awards_points());
        assert!(!QuestionFormat::Tiebreaker.awards_points());
        assert!(!QuestionFormat::Connection.awards_points());
    }

    #[test]
    fn test_document_serde_roundtrip() {
        let mut round = Round::new("Round One", RoundFormat::Standard);
        round.questions.push(Question::new(QuestionFormat::Standard));
        let mut team = Team::new("The Quizzards");
        team.scores.insert(round.id, 7.5);
        let game = GameData {
            rounds: vec![round],
            teams: vec![team],
        };

        let json = serde_json::to_string(&game).unwrap();
        let back: GameData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rounds.len(), 1);
        assert_eq!(back.teams.len(), 1);
        assert_eq!(
            back.teams[0].scores.get(&back.rounds[0].id),
            Some(&7.5)
        );
    }
}
