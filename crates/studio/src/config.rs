use std::str::FromStr;

use iconforge_core::constraints::{BrandConstraints, IconStyle};

/// Studio configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development
/// against an engine on `localhost`.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Base HTTP URL of the generation engine.
    pub engine_url: String,
    /// HTTP request timeout in seconds. Generation round-trips routinely
    /// take tens of seconds, so this is deliberately generous.
    pub request_timeout_secs: u64,
    /// Brand constraints sent with every generate call.
    pub constraints: BrandConstraints,
}

impl StudioConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `ENGINE_URL`           | `http://localhost:8000` |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                   |
    /// | `BRAND_GRID`           | `24`                    |
    /// | `BRAND_STROKE_WIDTH`   | `2.0`                   |
    /// | `BRAND_STYLE`          | `outline`               |
    pub fn from_env() -> Self {
        let engine_url =
            std::env::var("ENGINE_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = BrandConstraints::default();

        let grid: u32 = std::env::var("BRAND_GRID")
            .unwrap_or_else(|_| defaults.grid.to_string())
            .parse()
            .expect("BRAND_GRID must be a valid u32");

        let stroke_width: f64 = std::env::var("BRAND_STROKE_WIDTH")
            .unwrap_or_else(|_| defaults.stroke_width.to_string())
            .parse()
            .expect("BRAND_STROKE_WIDTH must be a valid f64");

        let style = match std::env::var("BRAND_STYLE") {
            Ok(value) => IconStyle::from_str(&value)
                .expect("BRAND_STYLE must be 'outline' or 'filled'"),
            Err(_) => defaults.style,
        };

        let constraints = BrandConstraints {
            grid,
            stroke_width,
            style,
        };
        constraints
            .validate()
            .expect("Brand constraint environment variables are invalid");

        Self {
            engine_url,
            request_timeout_secs,
            constraints,
        }
    }
}
