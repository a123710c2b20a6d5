//! Reference palettes of named colors.
//!
//! A [`Palette`] is an ordered, immutable list of [`PaletteEntry`] values.
//! Construction order is part of the contract: when two entries are equally
//! close to a query, the one that comes first wins.
//!
//! # Examples
//!
//! ```
//! use color_detect::palette::Palette;
//!
//! let palette = Palette::new([("Black", 0, 0, 0), ("White", 255, 255, 255)]).unwrap();
//! assert_eq!(palette.len(), 2);
//! assert_eq!(palette.entries()[1].name(), "White");
//!
//! // Channels are range checked
//! assert!(Palette::new([("X", 300, 0, 0)]).is_err());
//! ```
//!
//! Palettes can also be read from `Name,R,G,B` lines:
//!
//! ```
//! use color_detect::palette::Palette;
//!
//! let palette = Palette::from_csv("name,r,g,b\nCoral,255,127,80\n# more later\n").unwrap();
//! assert_eq!(palette.find("coral").map(|e| e.color().hex()), Some("#FF7F50".to_string()));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::color::{Channel, ColorSample, InvalidColorError};

/// The built-in table of common named colors, in palette order.
pub const BASIC_COLORS: [(&str, u8, u8, u8); 20] = [
    ("Black", 0, 0, 0),
    ("White", 255, 255, 255),
    ("Red", 255, 0, 0),
    ("Lime", 0, 255, 0),
    ("Blue", 0, 0, 255),
    ("Yellow", 255, 255, 0),
    ("Cyan", 0, 255, 255),
    ("Magenta", 255, 0, 255),
    ("Silver", 192, 192, 192),
    ("Gray", 128, 128, 128),
    ("Maroon", 128, 0, 0),
    ("Olive", 128, 128, 0),
    ("Green", 0, 128, 0),
    ("Purple", 128, 0, 128),
    ("Teal", 0, 128, 128),
    ("Navy", 0, 0, 128),
    ("Orange", 255, 165, 0),
    ("Pink", 255, 192, 203),
    ("Brown", 165, 42, 42),
    ("Gold", 255, 215, 0),
];

/// A named reference color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    name: String,
    color: ColorSample,
}

impl PaletteEntry {
    /// Create an entry. The name is not validated here; [`Palette`]
    /// construction rejects blank names.
    #[must_use]
    pub fn new(name: impl Into<String>, color: ColorSample) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    /// The entry's label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's reference color.
    #[must_use]
    pub const fn color(&self) -> ColorSample {
        self.color
    }
}

impl fmt::Display for PaletteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.color.hex())
    }
}

/// An ordered, immutable catalog of named colors.
///
/// Always holds at least one entry. Cloning is cheap (the entries are shared),
/// and the type is `Send + Sync`, so one palette can serve any number of
/// concurrent matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Arc<[PaletteEntry]>,
}

impl Palette {
    /// Build a palette from `(name, r, g, b)` tuples.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPaletteError`] if there are no entries, a name is
    /// blank, or a channel lies outside `0..=255`.
    pub fn new<I, S, C>(definition: I) -> Result<Self, InvalidPaletteError>
    where
        I: IntoIterator<Item = (S, C, C, C)>,
        S: Into<String>,
        C: Into<i64>,
    {
        let entries = definition
            .into_iter()
            .enumerate()
            .map(|(index, (name, r, g, b))| {
                let color = ColorSample::try_new(r.into(), g.into(), b.into())
                    .map_err(|source| InvalidPaletteError::ChannelOutOfRange { index, source })?;
                Ok(PaletteEntry::new(name, color))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    /// Build a palette from ready-made entries.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPaletteError`] if `entries` is empty or a name is blank.
    pub fn from_entries(entries: Vec<PaletteEntry>) -> Result<Self, InvalidPaletteError> {
        if entries.is_empty() {
            return Err(InvalidPaletteError::Empty);
        }
        if let Some(index) = entries.iter().position(|e| e.name.trim().is_empty()) {
            return Err(InvalidPaletteError::EmptyName { index });
        }
        log::debug!("palette built with {} entries", entries.len());
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// The built-in palette of [`BASIC_COLORS`].
    #[must_use]
    pub fn basic() -> Self {
        let entries: Vec<_> = BASIC_COLORS
            .iter()
            .map(|&(name, r, g, b)| PaletteEntry::new(name, ColorSample::new(r, g, b)))
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    /// Parse a palette from `Name,R,G,B` lines.
    ///
    /// Blank lines and lines starting with `#` are skipped. A first data
    /// line of `name,r,g,b` (any case) is treated as a header.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPaletteError::Malformed`] with the 1-based line
    /// number for a line that is not a name and three channels in
    /// `0..=255`, and [`InvalidPaletteError::Empty`] if no entries remain.
    pub fn from_csv(text: &str) -> Result<Self, InvalidPaletteError> {
        let mut entries = Vec::new();
        let mut seen_data = false;

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if !seen_data {
                seen_data = true;
                if is_header(&fields) {
                    continue;
                }
            }

            let [name, r, g, b] = fields.as_slice() else {
                return Err(InvalidPaletteError::Malformed {
                    line: line_no,
                    reason: format!("expected 4 fields, found {}", fields.len()),
                });
            };
            let malformed = |reason: String| InvalidPaletteError::Malformed {
                line: line_no,
                reason,
            };
            if name.is_empty() {
                return Err(malformed("empty name".to_string()));
            }
            let channel = |field: &str, channel: Channel| {
                field.parse::<i64>().map_err(|_| {
                    malformed(format!("{channel} value {field:?} is not an integer"))
                })
            };
            let color = ColorSample::try_new(
                channel(*r, Channel::Red)?,
                channel(*g, Channel::Green)?,
                channel(*b, Channel::Blue)?,
            )
            .map_err(|err| malformed(err.to_string()))?;
            entries.push(PaletteEntry::new(*name, color));
        }

        Self::from_entries(entries)
    }

    /// The entries in construction order.
    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Iterate over the entries in construction order.
    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    /// Number of entries (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; kept for slice-like API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose name matches `name`, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PaletteEntry> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::basic()
    }
}

impl AsRef<[PaletteEntry]> for Palette {
    fn as_ref(&self) -> &[PaletteEntry] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn is_header(fields: &[&str]) -> bool {
    matches!(fields, [n, r, g, b]
        if n.eq_ignore_ascii_case("name")
            && r.eq_ignore_ascii_case("r")
            && g.eq_ignore_ascii_case("g")
            && b.eq_ignore_ascii_case("b"))
}

/// Errors raised while building a [`Palette`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPaletteError {
    /// No entries were given.
    Empty,
    /// An entry has a blank name.
    EmptyName { index: usize },
    /// An entry has a channel outside `0..=255`.
    ChannelOutOfRange {
        index: usize,
        source: InvalidColorError,
    },
    /// A palette definition line could not be read.
    Malformed { line: usize, reason: String },
}

impl fmt::Display for InvalidPaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Palette must contain at least one entry"),
            Self::EmptyName { index } => write!(f, "Palette entry {index} has an empty name"),
            Self::ChannelOutOfRange { index, source } => {
                write!(f, "Palette entry {index}: {source}")
            }
            Self::Malformed { line, reason } => {
                write!(f, "Palette definition line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for InvalidPaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ChannelOutOfRange { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_construction_order() {
        let palette = Palette::new([("C", 3, 3, 3), ("A", 1, 1, 1), ("B", 2, 2, 2)]).unwrap();
        let names: Vec<_> = palette.iter().map(PaletteEntry::name).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_new_rejects_empty() {
        let empty: [(&str, u8, u8, u8); 0] = [];
        assert_eq!(Palette::new(empty), Err(InvalidPaletteError::Empty));
        assert_eq!(Palette::from_entries(Vec::new()), Err(InvalidPaletteError::Empty));
    }

    #[test]
    fn test_new_rejects_out_of_range_channel() {
        let err = Palette::new([("Ok", 0, 0, 0), ("X", 300, 0, 0)]).unwrap_err();
        assert_eq!(
            err,
            InvalidPaletteError::ChannelOutOfRange {
                index: 1,
                source: InvalidColorError {
                    channel: Channel::Red,
                    value: 300
                }
            }
        );

        assert!(Palette::new([("Neg", 0, -1, 0)]).is_err());
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let err = Palette::new([("A", 0, 0, 0), ("  ", 1, 1, 1)]).unwrap_err();
        assert_eq!(err, InvalidPaletteError::EmptyName { index: 1 });
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let palette = Palette::new([("Dup", 0, 0, 0), ("Dup", 9, 9, 9)]).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.find("dup").map(PaletteEntry::color), Some(ColorSample::new(0, 0, 0)));
    }

    #[test]
    fn test_basic_palette_table() {
        let palette = Palette::basic();
        assert_eq!(palette.len(), 20);
        assert!(!palette.is_empty());
        assert_eq!(palette.entries()[0].name(), "Black");
        assert_eq!(palette.entries()[19].name(), "Gold");
        assert_eq!(
            palette.find("Brown").map(PaletteEntry::color),
            Some(ColorSample::new(165, 42, 42))
        );
        assert_eq!(Palette::default(), palette);
    }

    #[test]
    fn test_clones_share_entries() {
        let a = Palette::basic();
        let b = a.clone();
        assert!(std::ptr::eq(a.entries(), b.entries()));
    }

    #[test]
    fn test_from_csv() {
        let text = "\
# custom palette
Name, R, G, B

Coral, 255, 127, 80
Slate Gray,112,128,144
";
        let palette = Palette::from_csv(text).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.entries()[1].name(), "Slate Gray");
        assert_eq!(palette.entries()[1].color(), ColorSample::new(112, 128, 144));
    }

    #[test]
    fn test_from_csv_errors() {
        assert_eq!(Palette::from_csv("# nothing\n\n"), Err(InvalidPaletteError::Empty));

        let err = Palette::from_csv("A,1,2\n").unwrap_err();
        assert!(matches!(err, InvalidPaletteError::Malformed { line: 1, .. }));

        let err = Palette::from_csv("A,1,2,3\nB,x,2,3\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Palette definition line 2: red value \"x\" is not an integer"
        );

        let err = Palette::from_csv("A,1,2,256\n").unwrap_err();
        assert!(matches!(err, InvalidPaletteError::Malformed { line: 1, .. }));

        let err = Palette::from_csv(" , 1, 2, 3\n").unwrap_err();
        assert!(matches!(err, InvalidPaletteError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_from_csv_range_error_names_the_file_line() {
        let text = "\
# comment
name,r,g,b
A,1,2,3
B,4,5,300
";
        let err = Palette::from_csv(text).unwrap_err();
        assert_eq!(err, InvalidPaletteError::Malformed {
            line: 4,
            reason: "blue channel value 300 is outside 0-255".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Palette definition line 4: blue channel value 300 is outside 0-255"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            InvalidPaletteError::Empty.to_string(),
            "Palette must contain at least one entry"
        );
        let err = Palette::new([("X", 300, 0, 0)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Palette entry 0: red channel value 300 is outside 0-255"
        );
    }
}
