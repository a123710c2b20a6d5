//! Color samples in 8-bit RGB space.
//!
//! A [`ColorSample`] is the value both sides of a match are made of: the
//! reference color of a palette entry and the queried pixel color.
//!
//! # Examples
//!
//! ## Creating Samples
//!
//! ```
//! use color_detect::color::ColorSample;
//!
//! let orange = ColorSample::new(255, 165, 0);
//! assert_eq!(orange.hex(), "#FFA500");
//!
//! // Wide integers are checked against the channel range
//! assert!(ColorSample::try_new(300, 0, 0).is_err());
//! ```
//!
//! ## Parsing Manual Input
//!
//! ```
//! use color_detect::color::ColorSample;
//!
//! let a = ColorSample::parse("#ffa500").unwrap();
//! let b = ColorSample::parse("#fa0").unwrap();
//! let c = ColorSample::parse("rgb(255, 165, 0)").unwrap();
//! let d = ColorSample::parse("255,165,0").unwrap();
//! assert_eq!(a, c);
//! assert_eq!(a, d);
//! assert_eq!(b, ColorSample::new(255, 170, 0));
//! ```

use lru::LruCache;
use regex::Regex;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::Mutex;

use crate::sync::lock_recover;

/// One of the three components of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Single letter label used in component tables.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Red => "R",
            Self::Green => "G",
            Self::Blue => "B",
        }
    }

    /// Lowercase channel name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RGB color sample with channel values 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSample {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorSample {
    /// Create a new sample from RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a sample from wide integer channels.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidColorError`] naming the first channel (in R, G, B
    /// order) that lies outside `0..=255`.
    pub fn try_new(red: i64, green: i64, blue: i64) -> Result<Self, InvalidColorError> {
        Ok(Self {
            red: checked_channel(Channel::Red, red)?,
            green: checked_channel(Channel::Green, green)?,
            blue: checked_channel(Channel::Blue, blue)?,
        })
    }

    /// Returns the uppercase hex format `#RRGGBB`.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Returns the tuple format `(r, g, b)`.
    #[must_use]
    pub fn rgb(&self) -> String {
        format!("({}, {}, {})", self.red, self.green, self.blue)
    }

    /// Channel value by name.
    #[must_use]
    pub const fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// The component rows `R`, `G`, `B` with their values.
    #[must_use]
    pub const fn components(&self) -> [(Channel, u8); 3] {
        [
            (Channel::Red, self.red),
            (Channel::Green, self.green),
            (Channel::Blue, self.blue),
        ]
    }

    /// Returns normalized RGB as floats in range 0.0-1.0.
    #[must_use]
    pub fn normalized(&self) -> (f64, f64, f64) {
        (
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
        )
    }

    /// Convert RGB to HLS (Hue, Lightness, Saturation).
    #[must_use]
    pub fn to_hls(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.normalized();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = f64::midpoint(max, min);

        if (max - min).abs() < f64::EPSILON {
            return (0.0, lightness, 0.0);
        }

        let delta = max - min;
        let saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let hue = if (max - r).abs() < f64::EPSILON {
            (g - b) / delta + (if g < b { 6.0 } else { 0.0 })
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        (hue / 6.0, lightness, saturation)
    }

    /// Nearest entry of the xterm 256-color table, for terminals without
    /// truecolor support.
    #[must_use]
    pub fn to_eight_bit(&self) -> u8 {
        let (_, lightness, saturation) = self.to_hls();

        // Grayscale ramp (232-255)
        if saturation < 0.15 {
            if lightness < 0.04 {
                return 16;
            }
            if lightness > 0.96 {
                return 231;
            }
            #[expect(clippy::cast_possible_truncation, reason = "result is 0-24 range")]
            #[expect(
                clippy::cast_sign_loss,
                reason = "lightness is positive so result is positive"
            )]
            let gray_index = ((lightness - 0.04) / 0.92 * 24.0).round() as u8;
            return 232 + gray_index.min(23);
        }

        // 6x6x6 color cube (16-231)
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "values are in 0-5 range"
        )]
        let quantize = |v: u8| -> usize {
            if v < 95 {
                (f64::from(v) / 95.0).round() as usize
            } else {
                1 + ((f64::from(v) - 95.0) / 40.0).round() as usize
            }
            .min(5)
        };

        let index = 16 + quantize(self.red) * 36 + quantize(self.green) * 6 + quantize(self.blue);
        #[expect(clippy::cast_possible_truncation, reason = "result is in 16-231 range")]
        let index = index as u8;
        index
    }

    /// Parse a color from manual input (cached).
    ///
    /// Supported formats:
    /// - Hex format: `#FFA500`
    /// - Hex shorthand: `#FA0`
    /// - RGB format: `rgb(255, 165, 0)`
    /// - Bare triple: `255,165,0`
    ///
    /// # Errors
    ///
    /// Returns `ColorParseError` if the input is invalid:
    /// - `Empty` if the string is empty
    /// - `InvalidHex` if hex format is malformed
    /// - `OutOfRange` if a decimal channel exceeds 255
    /// - `Unrecognized` if the input matches no format
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        static CACHE: LazyLock<Mutex<LruCache<String, ColorSample>>> =
            LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::MIN.saturating_add(255))));

        let normalized = input.trim().to_lowercase();

        if let Some(cached) = lock_recover(&CACHE).get(&normalized) {
            return Ok(*cached);
        }

        let result = Self::parse_uncached(&normalized)?;
        lock_recover(&CACHE).put(normalized, result);
        Ok(result)
    }

    fn parse_uncached(input: &str) -> Result<Self, ColorParseError> {
        static RGB_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
            Regex::new(concat!(
                r"^(?:rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)",
                r"|(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3}))$"
            ))
            .ok()
        });

        if input.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(input.to_string()));
        }

        if let Some(re) = RGB_RE.as_ref()
            && let Some(caps) = re.captures(input)
        {
            // Either the rgb(...) groups 1-3 or the bare groups 4-6 matched.
            let offset = if caps.get(1).is_some() { 1 } else { 4 };
            let mut channels = [0i64; 3];
            for (i, slot) in channels.iter_mut().enumerate() {
                *slot = caps
                    .get(offset + i)
                    .and_then(|m| m.as_str().parse::<i64>().ok())
                    .ok_or_else(|| ColorParseError::Unrecognized(input.to_string()))?;
            }
            let [r, g, b] = channels;
            return Self::try_new(r, g, b).map_err(ColorParseError::OutOfRange);
        }

        Err(ColorParseError::Unrecognized(input.to_string()))
    }
}

fn checked_channel(channel: Channel, value: i64) -> Result<u8, InvalidColorError> {
    u8::try_from(value).map_err(|_| InvalidColorError { channel, value })
}

fn parse_hex(hex: &str) -> Option<ColorSample> {
    // from_str_radix alone would accept a leading '+'.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(ColorSample::new(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(ColorSample::new(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

impl From<(u8, u8, u8)> for ColorSample {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<[u8; 3]> for ColorSample {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<ColorSample> for [u8; 3] {
    fn from(sample: ColorSample) -> Self {
        [sample.red, sample.green, sample.blue]
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

impl FromStr for ColorSample {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ColorSample {
    type Error = ColorParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// A channel value outside `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidColorError {
    pub channel: Channel,
    pub value: i64,
}

impl fmt::Display for InvalidColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} channel value {} is outside 0-255",
            self.channel, self.value
        )
    }
}

impl std::error::Error for InvalidColorError {}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    Empty,
    InvalidHex(String),
    OutOfRange(InvalidColorError),
    Unrecognized(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty color string"),
            Self::InvalidHex(s) => write!(f, "Invalid hex color: {s}"),
            Self::OutOfRange(err) => write!(f, "Invalid RGB color: {err}"),
            Self::Unrecognized(s) => write!(f, "Unrecognized color: {s}"),
        }
    }
}

impl std::error::Error for ColorParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OutOfRange(err) => Some(err),
            _ => None,
        }
    }
}
