//! Nearest-color matching.
//!
//! Distance is Euclidean in RGB space. Comparisons run on the squared
//! integer distance, which orders entries exactly like the rooted value;
//! the rooted `f64` distance is what callers see.
//!
//! Ties always resolve to palette order: [`nearest`] only replaces its
//! running best on a strict improvement, and [`top_k`] uses a stable sort.
//!
//! # Examples
//!
//! ```
//! use color_detect::color::ColorSample;
//! use color_detect::matcher::{nearest, top_k, Matcher};
//! use color_detect::palette::Palette;
//!
//! let palette = Palette::new([
//!     ("Black", 0, 0, 0),
//!     ("White", 255, 255, 255),
//!     ("Red", 255, 0, 0),
//! ]).unwrap();
//! let query = ColorSample::new(250, 10, 10);
//!
//! let best = nearest(query, &palette).unwrap();
//! assert_eq!(best.entry.name(), "Red");
//! assert!((best.distance - 15.0).abs() < 1e-9);
//!
//! let names: Vec<_> = top_k(query, &palette, 2)
//!     .unwrap()
//!     .into_iter()
//!     .map(|r| r.entry.name().to_string())
//!     .collect();
//! assert_eq!(names, ["Red", "Black"]);
//!
//! let result = Matcher::new().match_color(query, &palette).unwrap();
//! assert_eq!(result.best().entry.name(), "Red");
//! assert_eq!(result.shortlist().len(), 3);
//! ```

use smallvec::SmallVec;
use std::fmt;

use crate::color::{ColorSample, InvalidColorError};
use crate::palette::PaletteEntry;

/// Shortlist length used when none is configured.
pub const DEFAULT_TOP_K: usize = 5;

/// Squared Euclidean distance between two colors.
#[must_use]
pub fn distance_squared(a: ColorSample, b: ColorSample) -> u32 {
    let dr = u32::from(a.red.abs_diff(b.red));
    let dg = u32::from(a.green.abs_diff(b.green));
    let db = u32::from(a.blue.abs_diff(b.blue));
    dr * dr + dg * dg + db * db
}

/// Euclidean distance between two colors.
#[must_use]
pub fn distance(a: ColorSample, b: ColorSample) -> f64 {
    f64::from(distance_squared(a, b)).sqrt()
}

/// A palette entry together with its distance to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// Position of the entry in the palette.
    pub index: usize,
    /// The matched palette entry.
    pub entry: PaletteEntry,
    /// Euclidean distance to the query; `0.0` for an exact match.
    pub distance: f64,
}

impl RankedEntry {
    fn new(index: usize, entry: &PaletteEntry, distance_sq: u32) -> Self {
        Self {
            index,
            entry: entry.clone(),
            distance: f64::from(distance_sq).sqrt(),
        }
    }
}

/// Find the palette entry closest to `query`.
///
/// Scans every entry once. The first entry with the minimum distance wins.
///
/// # Errors
///
/// Returns [`MatchError::EmptyPalette`] if `palette` has no entries. A
/// [`Palette`](crate::palette::Palette) is never empty; plain slices can be.
pub fn nearest<P>(query: ColorSample, palette: &P) -> Result<RankedEntry, MatchError>
where
    P: AsRef<[PaletteEntry]> + ?Sized,
{
    let entries = palette.as_ref();
    let (index, best_sq) = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i, distance_squared(query, e.color())))
        .fold(None, |best: Option<(usize, u32)>, (i, d)| match best {
            Some((_, best_d)) if d >= best_d => best,
            _ => Some((i, d)),
        })
        .ok_or(MatchError::EmptyPalette)?;

    let ranked = RankedEntry::new(index, &entries[index], best_sq);
    log::trace!(
        "nearest {} -> {} ({:.1})",
        query.hex(),
        ranked.entry.name(),
        ranked.distance
    );
    Ok(ranked)
}

/// The `k` palette entries closest to `query`, nearest first.
///
/// Equidistant entries keep their palette order. Returns the whole ranked
/// palette when `k` exceeds its length.
///
/// # Errors
///
/// Returns [`MatchError::ZeroTopK`] if `k` is zero and
/// [`MatchError::EmptyPalette`] if `palette` has no entries.
pub fn top_k<P>(query: ColorSample, palette: &P, k: usize) -> Result<Vec<RankedEntry>, MatchError>
where
    P: AsRef<[PaletteEntry]> + ?Sized,
{
    Ok(rank(query, palette.as_ref(), k)?.into_vec())
}

fn rank(
    query: ColorSample,
    entries: &[PaletteEntry],
    k: usize,
) -> Result<SmallVec<[RankedEntry; DEFAULT_TOP_K]>, MatchError> {
    if k == 0 {
        return Err(MatchError::ZeroTopK);
    }
    if entries.is_empty() {
        return Err(MatchError::EmptyPalette);
    }

    let mut scored: Vec<(usize, u32)> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i, distance_squared(query, e.color())))
        .collect();
    // Stable: equal distances stay in palette order.
    scored.sort_by_key(|&(_, d)| d);

    Ok(scored
        .into_iter()
        .take(k)
        .map(|(i, d)| RankedEntry::new(i, &entries[i], d))
        .collect())
}

/// Matches query colors against a palette with a configured shortlist size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    top_k: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl Matcher {
    /// Create a matcher with the default shortlist size of five.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shortlist size.
    #[must_use]
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// The configured shortlist size.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.top_k
    }

    /// Match one query color.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::ZeroTopK`] if the matcher was configured with
    /// `k == 0` and [`MatchError::EmptyPalette`] for an empty palette.
    pub fn match_color<P>(&self, query: ColorSample, palette: &P) -> Result<MatchResult, MatchError>
    where
        P: AsRef<[PaletteEntry]> + ?Sized,
    {
        let entries = palette.as_ref();
        let best = nearest(query, entries)?;
        let shortlist = rank(query, entries, self.top_k)?;
        log::debug!(
            "matched {} against {} entries: {} ({:.1}), shortlist of {}",
            query.hex(),
            entries.len(),
            best.entry.name(),
            best.distance,
            shortlist.len()
        );
        Ok(MatchResult {
            query,
            best,
            shortlist,
        })
    }

    /// Match a query given as wide integer channels.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidColor`] if a channel is outside
    /// `0..=255`, otherwise the errors of [`Matcher::match_color`].
    pub fn match_channels<P>(
        &self,
        red: i64,
        green: i64,
        blue: i64,
        palette: &P,
    ) -> Result<MatchResult, MatchError>
    where
        P: AsRef<[PaletteEntry]> + ?Sized,
    {
        let query = ColorSample::try_new(red, green, blue)?;
        self.match_color(query, palette)
    }
}

/// Outcome of matching one query color.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    query: ColorSample,
    best: RankedEntry,
    shortlist: SmallVec<[RankedEntry; DEFAULT_TOP_K]>,
}

impl MatchResult {
    /// The color that was matched.
    #[must_use]
    pub const fn query(&self) -> ColorSample {
        self.query
    }

    /// The nearest entry.
    #[must_use]
    pub const fn best(&self) -> &RankedEntry {
        &self.best
    }

    /// Name of the nearest entry.
    #[must_use]
    pub fn name(&self) -> &str {
        self.best.entry.name()
    }

    /// Distance to the nearest entry.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.best.distance
    }

    /// The closest entries, nearest first.
    #[must_use]
    pub fn shortlist(&self) -> &[RankedEntry] {
        &self.shortlist
    }
}

/// Errors raised while matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The palette has no entries.
    EmptyPalette,
    /// A shortlist of zero entries was requested.
    ZeroTopK,
    /// The query has a channel outside `0..=255`.
    InvalidColor(InvalidColorError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => write!(f, "Cannot match against an empty palette"),
            Self::ZeroTopK => write!(f, "Shortlist size must be at least 1"),
            Self::InvalidColor(err) => write!(f, "Invalid query color: {err}"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidColor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidColorError> for MatchError {
    fn from(err: InvalidColorError) -> Self {
        Self::InvalidColor(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Channel;
    use crate::palette::Palette;

    fn primaries() -> Palette {
        Palette::new([("Black", 0, 0, 0), ("White", 255, 255, 255), ("Red", 255, 0, 0)]).unwrap()
    }

    #[test]
    fn test_distance_metric() {
        let a = ColorSample::new(250, 10, 10);
        let b = ColorSample::new(255, 0, 0);
        assert_eq!(distance_squared(a, b), 225);
        assert_eq!(distance_squared(b, a), 225);
        assert!((distance(a, b) - 15.0).abs() < 1e-12);
        assert_eq!(distance(a, a), 0.0);
        assert_eq!(
            distance_squared(ColorSample::new(0, 0, 0), ColorSample::new(255, 255, 255)),
            3 * 255 * 255
        );
    }

    #[test]
    fn test_nearest_end_to_end_example() {
        let best = nearest(ColorSample::new(250, 10, 10), &primaries()).unwrap();
        assert_eq!(best.entry.name(), "Red");
        assert_eq!(best.index, 2);
        assert!((best.distance - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_k_end_to_end_example() {
        let ranked = top_k(ColorSample::new(250, 10, 10), &primaries(), 2).unwrap();
        let names: Vec<_> = ranked.iter().map(|r| r.entry.name()).collect();
        assert_eq!(names, ["Red", "Black"]);
        // sqrt(250² + 10² + 10²) = sqrt(62700)
        assert!((ranked[1].distance - 62_700f64.sqrt()).abs() < 1e-12);
        assert_eq!(format!("{:.1}", ranked[1].distance), "250.4");
    }

    #[test]
    fn test_nearest_tie_prefers_earlier_entry() {
        let palette = Palette::new([("A", 0, 0, 0), ("B", 0, 0, 0)]).unwrap();
        let best = nearest(ColorSample::new(0, 0, 0), &palette).unwrap();
        assert_eq!(best.entry.name(), "A");
        assert_eq!(best.distance, 0.0);

        // Equidistant but different colors
        let palette = Palette::new([("Low", 0, 0, 0), ("High", 20, 0, 0)]).unwrap();
        let best = nearest(ColorSample::new(10, 0, 0), &palette).unwrap();
        assert_eq!(best.entry.name(), "Low");
    }

    #[test]
    fn test_top_k_tie_is_stable() {
        let palette = Palette::new([
            ("Far", 100, 100, 100),
            ("TieA", 10, 0, 0),
            ("TieB", 0, 10, 0),
            ("TieC", 0, 0, 10),
        ])
        .unwrap();
        let ranked = top_k(ColorSample::new(0, 0, 0), &palette, 4).unwrap();
        let names: Vec<_> = ranked.iter().map(|r| r.entry.name()).collect();
        assert_eq!(names, ["TieA", "TieB", "TieC", "Far"]);
    }

    #[test]
    fn test_top_k_larger_than_palette() {
        let ranked = top_k(ColorSample::new(1, 2, 3), &primaries(), 10).unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_top_k_zero_is_rejected() {
        assert_eq!(
            top_k(ColorSample::new(1, 2, 3), &primaries(), 0),
            Err(MatchError::ZeroTopK)
        );
        assert_eq!(
            Matcher::new().top_k(0).match_color(ColorSample::default(), &primaries()),
            Err(MatchError::ZeroTopK)
        );
    }

    #[test]
    fn test_empty_slice_is_rejected() {
        let empty: &[PaletteEntry] = &[];
        assert_eq!(
            nearest(ColorSample::new(1, 2, 3), empty),
            Err(MatchError::EmptyPalette)
        );
        assert_eq!(
            top_k(ColorSample::new(1, 2, 3), empty, 5),
            Err(MatchError::EmptyPalette)
        );
        assert_eq!(
            Matcher::new().match_color(ColorSample::new(1, 2, 3), empty),
            Err(MatchError::EmptyPalette)
        );
    }

    #[test]
    fn test_matcher_default_shortlist() {
        let matcher = Matcher::default();
        assert_eq!(matcher.k(), DEFAULT_TOP_K);

        let palette = Palette::basic();
        let result = matcher.match_color(ColorSample::new(250, 160, 10), &palette).unwrap();
        assert_eq!(result.name(), "Orange");
        assert_eq!(result.shortlist().len(), 5);
        assert_eq!(result.shortlist()[0], *result.best());
        assert_eq!(result.query(), ColorSample::new(250, 160, 10));
    }

    #[test]
    fn test_match_channels_validates_query() {
        let err = Matcher::new()
            .match_channels(0, 0, 256, &primaries())
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::InvalidColor(InvalidColorError {
                channel: Channel::Blue,
                value: 256
            })
        );
        assert_eq!(
            err.to_string(),
            "Invalid query color: blue channel value 256 is outside 0-255"
        );

        let ok = Matcher::new().match_channels(255, 0, 0, &primaries()).unwrap();
        assert_eq!(ok.name(), "Red");
        assert_eq!(ok.distance(), 0.0);
    }

    #[test]
    fn test_basic_palette_self_match() {
        let palette = Palette::basic();
        for (i, entry) in palette.iter().enumerate() {
            let best = nearest(entry.color(), &palette).unwrap();
            assert_eq!(best.index, i, "self match for {}", entry.name());
            assert_eq!(best.distance, 0.0);
        }
    }
}
