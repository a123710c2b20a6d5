use std::path::PathBuf;

use color_detect::color::ColorSample;
use color_detect::logging::DetectLogger;
use color_detect::matcher::{DEFAULT_TOP_K, Matcher};
use color_detect::palette::Palette;
use color_detect::report::Report;
use color_detect::sample::{Position, load_image, sample_pixel};
use color_detect::terminal::{self, ColorSupport};

/// Command-line front end: sample a pixel (or take a color), name it, and
/// print the report.
///
/// Arguments are parsed by hand; the surface is small enough not to need a
/// CLI crate.
fn main() {
    let cfg = match parse_args(std::env::args()) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if cfg.help {
        print!("{HELP_TEXT}");
        return;
    }

    if cfg.log_level != LogLevel::Off {
        init_logger(cfg.log_level);
    }

    match run(&cfg) {
        Ok(output) => print!("{output}"),
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

fn init_logger(level: LogLevel) {
    let logger = DetectLogger::new()
        .level(level.to_level_filter())
        .colored(std::io::IsTerminal::is_terminal(&std::io::stderr()));

    if let Err(err) = logger.init() {
        eprintln!("Warning: Failed to initialize logger: {err}");
    }
}

fn run(cfg: &Config) -> Result<String, String> {
    let palette = match cfg.palette.as_ref() {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("Cannot read palette {}: {err}", path.display()))?;
            Palette::from_csv(&text).map_err(|err| format!("{}: {err}", path.display()))?
        }
        None => Palette::basic(),
    };

    let (query, picked) = match &cfg.source {
        Some(Source::Color(text)) => (ColorSample::parse(text).map_err(|e| e.to_string())?, None),
        Some(Source::Image(path)) => {
            let image = load_image(path).map_err(|e| e.to_string())?;
            let (width, height) = image.dimensions();
            let center = Position::center(width, height);
            let position = Position::new(cfg.x.unwrap_or(center.x), cfg.y.unwrap_or(center.y));
            let query = sample_pixel(&image, position).map_err(|e| e.to_string())?;
            (query, Some((position, width, height)))
        }
        None => return Err("No input: give an image path or `--color`.".to_string()),
    };

    let result = Matcher::new()
        .top_k(cfg.top)
        .match_color(query, &palette)
        .map_err(|e| e.to_string())?;

    let support = if cfg.no_color {
        ColorSupport::None
    } else {
        terminal::detect_color_support()
    };
    log::debug!("swatch colors: {}", support.name());
    let mut report = Report::new(&result)
        .color_support(support)
        .width(terminal::terminal_width());
    if let Some((position, width, height)) = picked {
        report = report.position(position).image_size(width, height);
    }

    #[cfg(feature = "json")]
    {
        if cfg.json {
            return Ok(format!("{:#}\n", report.to_json()));
        }
    }

    Ok(report.render())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Image(PathBuf),
    Color(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "Invalid --log-level value `{value}` (expected: off|error|warn|info|debug|trace)."
            )),
        }
    }

    const fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
struct Config {
    help: bool,
    source: Option<Source>,
    x: Option<u32>,
    y: Option<u32>,
    palette: Option<PathBuf>,
    top: usize,
    #[cfg_attr(not(feature = "json"), allow(dead_code))]
    json: bool,
    no_color: bool,
    log_level: LogLevel,
}

impl Config {
    fn with_defaults() -> Self {
        Self {
            help: false,
            source: None,
            x: None,
            y: None,
            palette: None,
            top: DEFAULT_TOP_K,
            json: false,
            no_color: false,
            log_level: LogLevel::Off,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Config, String> {
    let mut iter = args.into_iter();
    // Drop binary name if present.
    let _ = iter.next();

    let mut cfg = Config::with_defaults();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cfg.help = true,
            "--x" => {
                let raw = next_value(&mut iter, "--x")?;
                cfg.x = Some(parse_u32_flag("--x", &raw)?);
            }
            "--y" => {
                let raw = next_value(&mut iter, "--y")?;
                cfg.y = Some(parse_u32_flag("--y", &raw)?);
            }
            "--color" => {
                let raw = next_value(&mut iter, "--color")?;
                set_source(&mut cfg, Source::Color(raw))?;
            }
            "--palette" => {
                if cfg.palette.is_some() {
                    return Err("`--palette` provided more than once.".to_string());
                }
                cfg.palette = Some(PathBuf::from(next_value(&mut iter, "--palette")?));
            }
            "--top" => {
                let raw = next_value(&mut iter, "--top")?;
                cfg.top = parse_usize_flag("--top", &raw)?;
            }
            "--json" => {
                if !cfg!(feature = "json") {
                    return Err("`--json` requires the `json` feature.".to_string());
                }
                cfg.json = true;
            }
            "--no-color" => cfg.no_color = true,
            "--log-level" => {
                let raw = next_value(&mut iter, "--log-level")?;
                cfg.log_level = LogLevel::parse(&raw)?;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option `{flag}`.\n\n{HELP_TEXT}"));
            }
            _ => set_source(&mut cfg, Source::Image(PathBuf::from(arg)))?,
        }
    }

    if matches!(cfg.source, Some(Source::Color(_))) && (cfg.x.is_some() || cfg.y.is_some()) {
        return Err("`--x`/`--y` only apply to an image input.".to_string());
    }

    Ok(cfg)
}

fn set_source(cfg: &mut Config, source: Source) -> Result<(), String> {
    if cfg.source.is_some() {
        return Err("Give either one image path or one `--color`, not both.".to_string());
    }
    cfg.source = Some(source);
    Ok(())
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next()
        .ok_or_else(|| format!("Missing value for `{flag}`."))
}

fn parse_usize_flag(flag: &str, raw: &str) -> Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("Invalid {flag} value `{raw}` (expected a positive integer)."))?;
    if value == 0 {
        return Err(format!("Invalid {flag} value `{raw}` (expected >= 1)."));
    }
    Ok(value)
}

fn parse_u32_flag(flag: &str, raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("Invalid {flag} value `{raw}` (expected a non-negative integer)."))
}

const HELP_TEXT: &str = r"color_detect: name the color of an image pixel

USAGE:
    color_detect <IMAGE> [OPTIONS]
    color_detect --color <COLOR> [OPTIONS]

INPUT:
    <IMAGE>                     PNG or JPEG file to sample
    --x <N>                     Pixel column, 0 = left (default: image center)
    --y <N>                     Pixel row, 0 = top (default: image center)
    --color <COLOR>             Match a color instead: #RRGGBB, #RGB, rgb(r,g,b) or r,g,b

OPTIONS:
    --palette <FILE>            Use a Name,R,G,B palette file instead of the built-in colors
    --top <N>                   Number of closest named colors to list (default: 5)
    --json                      Print JSON (requires the `json` feature)
    --no-color                  Do not draw color swatches
    --log-level <LEVEL>         off|error|warn|info|debug|trace (default: off)
    -h, --help                  Print this help

ENVIRONMENT:
    NO_COLOR                    Disable swatches
    FORCE_COLOR                 Draw swatches even when output is not a terminal
    COLORTERM=truecolor         Use 24-bit swatches instead of the 256-color palette
";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, String> {
        parse_args(argv.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn help_flag_sets_help() {
        let cfg = parse(&["color_detect", "--help"]).expect("parse");
        assert!(cfg.help);
    }

    #[test]
    fn defaults() {
        let cfg = parse(&["color_detect"]).expect("parse");
        assert_eq!(cfg, Config::with_defaults());
        assert_eq!(cfg.top, 5);
    }

    #[test]
    fn image_with_coordinates() {
        let cfg = parse(&["color_detect", "photo.png", "--x", "10", "--y", "20"]).expect("parse");
        assert_eq!(cfg.source, Some(Source::Image(PathBuf::from("photo.png"))));
        assert_eq!(cfg.x, Some(10));
        assert_eq!(cfg.y, Some(20));
    }

    #[test]
    fn color_input() {
        let cfg = parse(&["color_detect", "--color", "#FA0A0A", "--top", "3"]).expect("parse");
        assert_eq!(cfg.source, Some(Source::Color("#FA0A0A".to_string())));
        assert_eq!(cfg.top, 3);
    }

    #[test]
    fn rejects_two_sources() {
        let err = parse(&["color_detect", "a.png", "--color", "#fff"]).expect_err("error");
        assert!(err.contains("not both"));
        let err = parse(&["color_detect", "a.png", "b.png"]).expect_err("error");
        assert!(err.contains("not both"));
    }

    #[test]
    fn rejects_coordinates_for_color() {
        let err = parse(&["color_detect", "--color", "#fff", "--x", "1"]).expect_err("error");
        assert!(err.contains("only apply to an image"));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(parse(&["color_detect", "a.png", "--x", "-1"]).is_err());
        assert!(parse(&["color_detect", "--top", "0"]).is_err());
        assert!(parse(&["color_detect", "--top", "many"]).is_err());
        let err = parse(&["color_detect", "--top"]).expect_err("error");
        assert!(err.contains("Missing value"));
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = parse(&["color_detect", "--wat"]).expect_err("error");
        assert!(err.contains("Unknown option `--wat`"));
    }

    #[test]
    fn log_level_parses() {
        let cfg = parse(&["color_detect", "--log-level", "DEBUG"]).expect("parse");
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_level.to_level_filter(), log::LevelFilter::Debug);
        assert!(parse(&["color_detect", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn palette_once() {
        let cfg = parse(&["color_detect", "--palette", "p.csv"]).expect("parse");
        assert_eq!(cfg.palette, Some(PathBuf::from("p.csv")));
        assert!(parse(&["color_detect", "--palette", "a", "--palette", "b"]).is_err());
    }

    #[test]
    fn run_with_color_source() {
        let mut cfg = parse(&["color_detect", "--color", "rgb(250,10,10)", "--no-color"])
            .expect("parse");
        cfg.top = 2;
        let output = run(&cfg).expect("run");
        assert!(output.contains("Nearest name: Red (RGB distance ≈ 15.0)"));
        assert!(output.contains("Hex: #FA0A0A"));
        assert!(output.contains("Closest named colors (top 2)"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn run_without_source_fails() {
        let cfg = parse(&["color_detect"]).expect("parse");
        assert!(run(&cfg).is_err());
    }

    #[test]
    fn run_with_missing_palette_fails() {
        let cfg = parse(&["color_detect", "--color", "#000", "--palette", "/no/such/palette.csv"])
            .expect("parse");
        let err = run(&cfg).expect_err("error");
        assert!(err.contains("Cannot read palette"));
    }
}
