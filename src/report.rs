//! Human-readable match reports.
//!
//! Formatting rules shared by every output: hex codes are `#RRGGBB`
//! uppercase, distances are rounded to one decimal place. Swatches are only
//! drawn when a [`ColorSupport`] other than `None` is configured.
//!
//! # Example
//!
//! ```
//! use color_detect::color::ColorSample;
//! use color_detect::matcher::Matcher;
//! use color_detect::palette::Palette;
//! use color_detect::report::{Report, Sections};
//!
//! let palette = Palette::basic();
//! let result = Matcher::new().match_color(ColorSample::new(250, 10, 10), &palette).unwrap();
//! let text = Report::new(&result)
//!     .sections(Sections::NEAREST | Sections::HEX)
//!     .render();
//! assert_eq!(text, "Nearest name: Red (RGB distance ≈ 15.0)\nHex: #FA0A0A\n");
//! ```

use bitflags::bitflags;
use std::fmt::{self, Write as _};
use unicode_width::UnicodeWidthStr;

use crate::color::ColorSample;
use crate::matcher::{MatchResult, RankedEntry};
use crate::sample::Position;
use crate::terminal::ColorSupport;

bitflags! {
    /// Which parts of a report are rendered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Sections: u16 {
        const SIZE       = 1 << 0;
        const POSITION   = 1 << 1;
        const RGB        = 1 << 2;
        const NEAREST    = 1 << 3;
        const HEX        = 1 << 4;
        const SWATCH     = 1 << 5;
        const COMPONENTS = 1 << 6;
        const SHORTLIST  = 1 << 7;
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::all()
    }
}

/// Cells per swatch in the detected-color line.
const LARGE_SWATCH: usize = 14;
/// Cells per swatch in the shortlist.
const SMALL_SWATCH: usize = 6;
/// Spaces between shortlist columns.
const COLUMN_GAP: usize = 2;

/// Round a distance for display.
#[must_use]
pub fn format_distance(distance: f64) -> String {
    format!("{distance:.1}")
}

/// SGR parameters that set `color` as the background.
#[must_use]
pub fn background_codes(color: ColorSample, support: ColorSupport) -> Vec<String> {
    match support {
        ColorSupport::None => Vec::new(),
        ColorSupport::EightBit => vec![
            "48".to_string(),
            "5".to_string(),
            color.to_eight_bit().to_string(),
        ],
        ColorSupport::TrueColor => vec![
            "48".to_string(),
            "2".to_string(),
            color.red.to_string(),
            color.green.to_string(),
            color.blue.to_string(),
        ],
    }
}

/// A block of `cells` spaces painted in `color`; empty without color support.
#[must_use]
pub fn swatch(color: ColorSample, cells: usize, support: ColorSupport) -> String {
    let codes = background_codes(color, support);
    if codes.is_empty() {
        return String::new();
    }
    format!("\x1b[{}m{}\x1b[0m", codes.join(";"), " ".repeat(cells))
}

fn pad_right(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

fn pad_left(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{}{text}", " ".repeat(pad))
}

/// A report on one matched pixel.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    result: &'a MatchResult,
    position: Option<Position>,
    image_size: Option<(u32, u32)>,
    sections: Sections,
    support: ColorSupport,
    width: usize,
}

impl<'a> Report<'a> {
    /// A plain-text report with every section and an 80 cell width.
    #[must_use]
    pub fn new(result: &'a MatchResult) -> Self {
        Self {
            result,
            position: None,
            image_size: None,
            sections: Sections::default(),
            support: ColorSupport::None,
            width: 80,
        }
    }

    /// Pixel the color was sampled from.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Dimensions of the sampled image.
    #[must_use]
    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = Some((width, height));
        self
    }

    /// Sections to render.
    #[must_use]
    pub fn sections(mut self, sections: Sections) -> Self {
        self.sections = sections;
        self
    }

    /// How swatches are drawn.
    #[must_use]
    pub fn color_support(mut self, support: ColorSupport) -> Self {
        self.support = support;
        self
    }

    /// Available width in cells; decides the shortlist layout.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Render the report, one line per item, each ending in a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> fmt::Result {
        let query = self.result.query();
        let best = self.result.best();

        if self.sections.contains(Sections::SIZE)
            && let Some((w, h)) = self.image_size
        {
            writeln!(out, "Image size: {w} × {h} (W × H)")?;
        }
        if self.sections.contains(Sections::POSITION)
            && let Some(p) = self.position
        {
            writeln!(out, "Position: X = {}, Y = {} (origin: top-left)", p.x, p.y)?;
        }
        if self.sections.contains(Sections::RGB) {
            writeln!(out, "RGB: {}", query.rgb())?;
        }
        if self.sections.contains(Sections::NEAREST) {
            writeln!(
                out,
                "Nearest name: {} (RGB distance ≈ {})",
                best.entry.name(),
                format_distance(best.distance)
            )?;
        }
        if self.sections.contains(Sections::HEX) {
            writeln!(out, "Hex: {}", query.hex())?;
        }
        if self.sections.contains(Sections::SWATCH) && self.support.is_colored() {
            writeln!(out, "{}", swatch(query, LARGE_SWATCH, self.support))?;
        }
        if self.sections.contains(Sections::COMPONENTS) {
            self.write_components(out, query)?;
        }
        if self.sections.contains(Sections::SHORTLIST) {
            self.write_shortlist(out)?;
        }
        Ok(())
    }

    fn write_components(&self, out: &mut String, query: ColorSample) -> fmt::Result {
        const HEADERS: (&str, &str) = ("Component", "Value");
        let rows: Vec<(&str, String)> = query
            .components()
            .iter()
            .map(|(channel, value)| (channel.label(), value.to_string()))
            .collect();
        let label_w = rows
            .iter()
            .map(|(l, _)| l.width())
            .chain([HEADERS.0.width()])
            .max()
            .unwrap_or(0);
        let value_w = rows
            .iter()
            .map(|(_, v)| v.width())
            .chain([HEADERS.1.width()])
            .max()
            .unwrap_or(0);

        writeln!(
            out,
            "{}  {}",
            pad_right(HEADERS.0, label_w),
            pad_left(HEADERS.1, value_w)
        )?;
        for (label, value) in &rows {
            writeln!(
                out,
                "{}  {}",
                pad_right(label, label_w),
                pad_left(value, value_w)
            )?;
        }
        Ok(())
    }

    fn write_shortlist(&self, out: &mut String) -> fmt::Result {
        let shortlist = self.result.shortlist();
        writeln!(out, "Closest named colors (top {})", shortlist.len())?;

        let cell_w = shortlist
            .iter()
            .map(|r| r.entry.name().width())
            .chain([7, SMALL_SWATCH])
            .max()
            .unwrap_or(SMALL_SWATCH);
        let columns_w = shortlist.len() * cell_w + shortlist.len().saturating_sub(1) * COLUMN_GAP;

        if columns_w <= self.width {
            self.write_shortlist_columns(out, shortlist, cell_w)
        } else {
            self.write_shortlist_rows(out, shortlist)
        }
    }

    fn write_shortlist_columns(
        &self,
        out: &mut String,
        shortlist: &[RankedEntry],
        cell_w: usize,
    ) -> fmt::Result {
        let gap = " ".repeat(COLUMN_GAP);
        let line = |cell: &dyn Fn(&RankedEntry) -> String| {
            let cells: Vec<String> = shortlist
                .iter()
                .map(|r| pad_right(&cell(r), cell_w))
                .collect();
            cells.join(&gap).trim_end().to_string()
        };

        writeln!(out, "{}", line(&|r| r.entry.name().to_string()))?;
        writeln!(out, "{}", line(&|r| r.entry.color().hex()))?;
        writeln!(out, "{}", line(&|r| format_distance(r.distance)))?;
        if self.support.is_colored() {
            // Swatch escapes have no display width, so pad by hand.
            let pad = " ".repeat(cell_w - SMALL_SWATCH);
            let cells: Vec<String> = shortlist
                .iter()
                .map(|r| swatch(r.entry.color(), SMALL_SWATCH, self.support))
                .collect();
            writeln!(out, "{}", cells.join(&format!("{pad}{gap}")))?;
        }
        Ok(())
    }

    fn write_shortlist_rows(&self, out: &mut String, shortlist: &[RankedEntry]) -> fmt::Result {
        let name_w = shortlist
            .iter()
            .map(|r| r.entry.name().width())
            .max()
            .unwrap_or(0);
        let distances: Vec<String> = shortlist
            .iter()
            .map(|r| format_distance(r.distance))
            .collect();
        let dist_w = distances.iter().map(String::len).max().unwrap_or(0);

        for (rank, (r, dist)) in shortlist.iter().zip(&distances).enumerate() {
            let prefix = if self.support.is_colored() {
                format!("{} ", swatch(r.entry.color(), 2, self.support))
            } else {
                String::new()
            };
            writeln!(
                out,
                "{prefix}{}. {}  {}  {}",
                rank + 1,
                pad_right(r.entry.name(), name_w),
                r.entry.color().hex(),
                pad_left(dist, dist_w)
            )?;
        }
        Ok(())
    }

    /// The report as JSON with raw (unrounded) distances.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let ranked = |r: &RankedEntry| {
            let color = r.entry.color();
            json!({
                "name": r.entry.name(),
                "rgb": [color.red, color.green, color.blue],
                "hex": color.hex(),
                "distance": r.distance,
            })
        };
        let query = self.result.query();

        json!({
            "image_size": self.image_size.map(|(w, h)| json!({ "width": w, "height": h })),
            "position": self.position.map(|p| json!({ "x": p.x, "y": p.y })),
            "query": {
                "rgb": [query.red, query.green, query.blue],
                "hex": query.hex(),
            },
            "nearest": ranked(self.result.best()),
            "shortlist": self.result.shortlist().iter().map(ranked).collect::<Vec<_>>(),
        })
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
