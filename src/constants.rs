//! Configuration constants for the presentation core
//!
//! This module contains the numeric bounds and parser constants used
//! throughout the slide builder and the ranking engine, grouped the same
//! way the rest of the crate is organized.

/// Question point value constants
pub mod points {
    /// Minimum points a question can award
    pub const MIN: f64 = 0.0;
    /// Maximum points a question can award
    pub const MAX: f64 = 10.0;
    /// Granularity of point values (half-point steps)
    pub const STEP: f64 = 0.5;
}

/// Tiebreaker answer parsing constants
pub mod tiebreaker {
    /// Multiplier applied for a trailing `B` (billions) suffix
    pub const BILLION: f64 = 1_000_000_000.0;
    /// Multiplier applied for a trailing `T` (trillions) suffix
    pub const TRILLION: f64 = 1_000_000_000_000.0;
}

/// Crossword clue reveal constants
pub mod crossword {
    /// Default 1-based reveal index used when a clue has no reveal spec
    /// or its spec contains no parseable index
    pub const DEFAULT_REVEAL_INDEX: usize = 1;
}
