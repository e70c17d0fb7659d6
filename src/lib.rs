//! # Quizdeck Presentation Core
//!
//! This library provides the presentation core for a trivia-night host tool.
//! It converts a mutable game document (rounds, questions, teams) into a
//! deterministic, addressable sequence of display slides, navigates through
//! that sequence with stepwise reveal semantics, and reconciles the host's
//! position whenever the document is edited. It also houses the ranking and
//! tiebreaker engine that orders teams for standings slides.
//!
//! The crate performs no I/O: document persistence, rendering, and playback
//! integrations are collaborators that hand in a [`game::GameData`] value and
//! read the resulting [`presentation::Presentation`] state.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod constants;

pub mod game;
pub mod presentation;
pub mod ranking;
pub mod slides;

pub use game::GameData;
pub use presentation::Presentation;
pub use slides::{Slide, SlideId, SlideKind};
