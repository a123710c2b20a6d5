//! Common test utilities.
//!
//! Import this module in integration tests:
//! ```rust,ignore
//! mod common;
//! use common::init_test_logging;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG=debug` - Enable debug logging in tests
//! - `RUST_LOG=color_detect::matcher=trace` - Module-specific tracing

#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use color_detect::palette::Palette;

static INIT: Once = Once::new();

/// Initialize test logging. Idempotent.
///
/// `log` records from the library are forwarded to the subscriber.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("color_detect=debug,test=info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_ansi(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(true)
                    .compact(),
            )
            .try_init()
            .ok();
    });
}

/// The three-entry palette used in the worked examples.
pub fn rgb_palette() -> Palette {
    Palette::new([("Red", 255, 0, 0), ("Green", 0, 255, 0), ("Black", 0, 0, 0)])
        .expect("valid palette")
}

/// Two entries with the same color, so every query ties between them.
pub fn twin_palette() -> Palette {
    Palette::new([("A", 10, 10, 10), ("B", 10, 10, 10), ("C", 200, 200, 200)])
        .expect("valid palette")
}
