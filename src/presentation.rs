//! Presentation controller: navigation and regeneration
//!
//! This module owns the presentation state: the current slide sequence,
//! the host's position in it, and the staged reveal progress on the
//! current slide (answer shown, standings rows shown). It exposes the
//! navigation operations the editor and the second-screen display drive,
//! and reconciles state across document edits by rebuilding the sequence
//! and remapping the position onto it by stable slide identity.
//!
//! Every operation is synchronous and atomic: a navigation step or a
//! regeneration pass either fully applies or leaves state untouched.
//! Callers in a multi-threaded host must serialize access through one
//! owner.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    game::{GameData, QuestionId, RoundFormat, RoundId},
    ranking,
    slides::{self, Slide, SlideId, SlideKind},
};

/// Errors reported by navigation operations
///
/// All of these are non-fatal: the operation that raised one is a no-op
/// and presentation state is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// A jump targeted an index outside the slide sequence
    #[error("slide index {index} is out of range (slide count {count})")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The number of slides in the sequence
        count: usize,
    },
    /// A jump targeted a slide id not present in the sequence
    #[error("no slide with id {0}")]
    UnknownSlideId(SlideId),
    /// A jump targeted a question with no slide in the sequence
    #[error("no slide for question {0}")]
    UnknownQuestionId(QuestionId),
}

/// The presentation controller
///
/// Owns the slide sequence and the navigation state over it. Created
/// empty; [`Presentation::regenerate`] or [`Presentation::update`]
/// replace the sequence wholesale from a game document, while the
/// navigation operations mutate position and reveal fields in place.
///
/// Invariant: while slides are non-empty, `current_index` is a valid
/// index into them; while empty, the index and both reveal fields are
/// zero/hidden.
#[derive(Debug, Default)]
pub struct Presentation {
    /// The slide sequence, rebuilt on every document change
    slides: Vec<Slide>,
    /// Index of the current slide
    current_index: usize,
    /// Number of standings rows revealed on the current slide; only
    /// meaningful while the current slide is a standings slide
    standings_reveal_count: usize,
    /// Whether the current answer slide's answer has been revealed; only
    /// meaningful while the current slide is an answer slide
    answer_revealed: bool,
    /// Number of teams in the document, bounding the standings reveal
    team_count: usize,
    /// Correct tiebreaker answer, recomputed on every rebuild
    tiebreaker_answer: Option<f64>,
    /// Slide id to index, for O(1) id jumps
    index_by_slide_id: HashMap<SlideId, usize>,
    /// Question id to slide index, for O(1) question jumps. Non-connection
    /// questions map to their question slide; connections, which have
    /// none, map to their answer slide.
    index_by_question_id: HashMap<QuestionId, usize>,
}

impl Presentation {
    /// Creates a presentation already populated from a document, with
    /// navigation at the start
    pub fn new(game: &GameData) -> Self {
        let mut presentation = Self::default();
        presentation.regenerate(game);
        presentation
    }

    /// The current slide sequence
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// The current slide, or `None` while the sequence is empty
    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_index)
    }

    /// The current slide's id, or `None` while the sequence is empty
    pub fn current_slide_id(&self) -> Option<&SlideId> {
        self.current_slide().map(|slide| &slide.id)
    }

    /// Index of the current slide
    pub fn current_slide_index(&self) -> usize {
        self.current_index
    }

    /// Number of standings rows currently revealed
    pub fn standings_reveal_count(&self) -> usize {
        self.standings_reveal_count
    }

    /// Whether the current answer slide's answer has been stepped into
    /// view
    ///
    /// Displays should prefer [`Presentation::is_answer_shown`], which
    /// also accounts for music answers being shown unconditionally.
    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    /// Whether the current slide is an answer slide whose answer should
    /// be displayed
    ///
    /// Music answers are never staged, so they count as shown as soon as
    /// the slide is current.
    pub fn is_answer_shown(&self) -> bool {
        match self.current_slide() {
            Some(slide) if slide.is_answer() => self.answer_revealed || slide.is_music_answer(),
            _ => false,
        }
    }

    /// The cached correct tiebreaker answer, recomputed on every
    /// `update`/`regenerate`
    pub fn tiebreaker_answer(&self) -> Option<f64> {
        self.tiebreaker_answer
    }

    /// Whether a `next` call would change state
    ///
    /// True if the current slide still has a staged reveal to show, or if
    /// the index can advance.
    pub fn can_go_next(&self) -> bool {
        let Some(slide) = self.current_slide() else {
            return false;
        };
        (slide.is_answer() && !slide.is_music_answer() && !self.answer_revealed)
            || (slide.is_standings() && self.standings_reveal_count < self.team_count)
            || self.current_index + 1 < self.slides.len()
    }

    /// Whether a `previous` call would change state
    pub fn can_go_previous(&self) -> bool {
        let Some(slide) = self.current_slide() else {
            return false;
        };
        (slide.is_answer() && !slide.is_music_answer() && self.answer_revealed)
            || (slide.is_standings() && self.standings_reveal_count > 0)
            || self.current_index > 0
    }

    /// Advances the presentation one step
    ///
    /// Staged reveals come first: an unrevealed (non-music) answer is
    /// shown, then standings rows are revealed one at a time, and only
    /// once the current slide is exhausted does the index move. At the
    /// very end of the sequence this is a no-op.
    pub fn next(&mut self) {
        let Some(slide) = self.slides.get(self.current_index) else {
            return;
        };

        if slide.is_answer() && !slide.is_music_answer() && !self.answer_revealed {
            self.answer_revealed = true;
        } else if slide.is_standings() && self.standings_reveal_count < self.team_count {
            self.standings_reveal_count += 1;
        } else if self.current_index + 1 < self.slides.len() {
            self.current_index += 1;
            self.standings_reveal_count = 0;
            self.answer_revealed = false;
        }
    }

    /// Steps the presentation back one step
    ///
    /// The mirror of [`Presentation::next`]: a shown answer is hidden,
    /// then standings rows are hidden one at a time, and only then does
    /// the index move back. A slide re-entered from the right is treated
    /// as fully revealed. At the very start this is a no-op.
    pub fn previous(&mut self) {
        let Some(slide) = self.slides.get(self.current_index) else {
            return;
        };

        if slide.is_answer() && !slide.is_music_answer() && self.answer_revealed {
            self.answer_revealed = false;
        } else if slide.is_standings() && self.standings_reveal_count > 0 {
            self.standings_reveal_count -= 1;
        } else if self.current_index > 0 {
            self.current_index -= 1;
            let entered = &self.slides[self.current_index];
            self.standings_reveal_count = if entered.is_standings() {
                self.team_count
            } else {
                0
            };
            self.answer_revealed = entered.is_answer();
        }
    }

    /// Jumps directly to the slide at `index`
    ///
    /// Reveal progress resets: standings start hidden and answers start
    /// unrevealed, except music answers which are always shown.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::IndexOutOfRange`] (leaving state
    /// unchanged) if `index` is outside the sequence.
    pub fn jump_to_index(&mut self, index: usize) -> Result<(), NavigationError> {
        let Some(slide) = self.slides.get(index) else {
            warn!(index, count = self.slides.len(), "jump to out-of-range slide index");
            return Err(NavigationError::IndexOutOfRange {
                index,
                count: self.slides.len(),
            });
        };

        self.answer_revealed = slide.is_music_answer();
        self.standings_reveal_count = 0;
        self.current_index = index;
        Ok(())
    }

    /// Jumps to the slide with the given id
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::UnknownSlideId`] (leaving state
    /// unchanged) if no slide in the sequence has this id.
    pub fn jump_to_slide_id(&mut self, id: &SlideId) -> Result<(), NavigationError> {
        let Some(index) = self.index_by_slide_id.get(id).copied() else {
            warn!(slide_id = %id, "jump to unknown slide id");
            return Err(NavigationError::UnknownSlideId(id.clone()));
        };
        self.jump_to_index(index)
    }

    /// Jumps to the slide presenting the given question
    ///
    /// Non-connection questions resolve to their question slide;
    /// connections, which have none, resolve to their answer slide.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::UnknownQuestionId`] (leaving state
    /// unchanged) if the question has no slide in the sequence.
    pub fn jump_to_question(&mut self, question_id: QuestionId) -> Result<(), NavigationError> {
        let Some(index) = self.index_by_question_id.get(&question_id).copied() else {
            warn!(question_id = %question_id, "jump to unknown question id");
            return Err(NavigationError::UnknownQuestionId(question_id));
        };
        self.jump_to_index(index)
    }

    /// Rebuilds slides from the document and resets navigation to the
    /// start
    ///
    /// Used for structural edits (rounds or questions added, removed or
    /// reordered), where keeping the old position would be misleading.
    pub fn regenerate(&mut self, game: &GameData) {
        self.rebuild(game);
        self.current_index = 0;
        self.standings_reveal_count = 0;
        self.answer_revealed = false;
    }

    /// Rebuilds slides from the document, preserving navigation where
    /// possible
    ///
    /// Used for content-only edits. The previously-current slide is
    /// located in the new sequence by its stable id; if it no longer
    /// exists the old index is clamped into range. Reveal progress
    /// carries over only where it still applies, clamped to new bounds.
    pub fn update(&mut self, game: &GameData) {
        let previous_id = self.current_slide_id().cloned();
        let previous_index = self.current_index;
        let previous_reveal_count = self.standings_reveal_count;
        let previous_answer_revealed = self.answer_revealed;

        self.rebuild(game);

        if self.slides.is_empty() {
            self.current_index = 0;
            self.standings_reveal_count = 0;
            self.answer_revealed = false;
            return;
        }

        self.current_index = previous_id
            .and_then(|id| self.index_by_slide_id.get(&id).copied())
            .unwrap_or_else(|| previous_index.min(self.slides.len() - 1));

        let slide = &self.slides[self.current_index];
        self.standings_reveal_count = if slide.is_standings() {
            previous_reveal_count.min(self.team_count)
        } else {
            0
        };
        self.answer_revealed = if slide.is_answer() {
            previous_answer_revealed || slide.is_music_answer()
        } else {
            false
        };
    }

    /// Patches the format icon on a round's title slide in place
    ///
    /// A narrow, non-regenerating update for the purely cosmetic case of
    /// a round's format changing. No-ops (with a logged miss) if no title
    /// slide for the round exists.
    pub fn update_round_icon(&mut self, round_id: RoundId, new_format: RoundFormat) {
        let title_slide = self.slides.iter_mut().find_map(|slide| match &mut slide.kind {
            SlideKind::RoundTitle {
                round_id: id,
                format,
                ..
            } if *id == round_id => Some(format),
            _ => None,
        });
        match title_slide {
            Some(format) => *format = new_format,
            None => warn!(round_id = %round_id, "round icon update for unknown round"),
        }
    }

    /// Rebuilds the slide sequence, lookup indices, and cached document
    /// facts from a document
    fn rebuild(&mut self, game: &GameData) {
        self.slides = slides::build_slides(game);
        self.team_count = game.teams.len();
        self.tiebreaker_answer = ranking::extract_correct_tiebreaker_answer(game);

        self.index_by_slide_id = self
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| (slide.id.clone(), index))
            .collect();

        // Question slides precede answer slides within a round, so
        // or_insert keeps the question slide for everything except
        // connections.
        self.index_by_question_id = HashMap::new();
        for (index, slide) in self.slides.iter().enumerate() {
            if let Some(question_id) = slide.question_id() {
                self.index_by_question_id.entry(question_id).or_insert(index);
            }
        }

        debug!(
            slide_count = self.slides.len(),
            team_count = self.team_count,
            "rebuilt slide sequence"
        );
    }
}
