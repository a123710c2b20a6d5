//! # color_detect
//!
//! Name the color of an image pixel by finding the closest entry in a small
//! reference palette, together with a ranked shortlist of near matches.
//!
//! ## Quick Start
//!
//! ```rust
//! use color_detect::prelude::*;
//!
//! let palette = Palette::basic();
//! let result = Matcher::new()
//!     .match_color(ColorSample::new(250, 160, 10), &palette)
//!     .unwrap();
//!
//! assert_eq!(result.name(), "Orange");
//! assert_eq!(result.shortlist().len(), 5);
//! ```
//!
//! ## Core Concepts
//!
//! - **ColorSample**: an 8-bit RGB triple, either a palette color or a query
//! - **Palette**: an ordered, immutable list of named colors
//! - **Matcher**: Euclidean nearest match plus a top-K shortlist, ties
//!   resolved by palette order
//! - **Report**: text rendering of a match (hex code, distance, swatches)

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod palette;
pub mod matcher;
pub mod sample;
pub mod report;
pub mod terminal;
pub mod logging;
pub mod sync;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::color::{Channel, ColorParseError, ColorSample, InvalidColorError};
    pub use crate::matcher::{MatchError, MatchResult, Matcher, RankedEntry, nearest, top_k};
    pub use crate::palette::{InvalidPaletteError, Palette, PaletteEntry};
    pub use crate::report::{Report, Sections};
    pub use crate::sample::{Position, SampleError};
    pub use crate::terminal::ColorSupport;
}

// Re-export key types at crate root
pub use color::{ColorSample, InvalidColorError};
pub use matcher::{MatchError, MatchResult, Matcher, RankedEntry};
pub use palette::{InvalidPaletteError, Palette, PaletteEntry};
