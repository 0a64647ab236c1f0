//! Layout settings read from `SCHEMAFLOW_*` environment variables.
//!
//! The binary calls `dotenvy::dotenv()` first, so a `.env` file works too.

use crate::core::auto_layout::{Direction, LayoutConfig};

pub const DIRECTION_VAR: &str = "SCHEMAFLOW_DIRECTION";
pub const X_SPACING_VAR: &str = "SCHEMAFLOW_X_SPACING";
pub const Y_SPACING_VAR: &str = "SCHEMAFLOW_Y_SPACING";

/// Direction and spacing used when no command-line override is given
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Layout direction, `LR` or `TB`
    pub direction: Direction,
    /// Grid spacing used by the layout engine
    pub layout: LayoutConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unset or malformed values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LayoutConfig::default();

        let direction = match lookup(DIRECTION_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}: {}, using {}", DIRECTION_VAR, e, Direction::default());
                Direction::default()
            }),
            None => Direction::default(),
        };

        Self {
            direction,
            layout: LayoutConfig {
                x_spacing: spacing(&lookup, X_SPACING_VAR, defaults.x_spacing),
                y_spacing: spacing(&lookup, Y_SPACING_VAR, defaults.y_spacing),
            },
        }
    }
}

/// Parses a grid spacing; only finite, non-negative numbers are accepted
pub fn parse_spacing(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

fn spacing(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse_spacing(&raw).unwrap_or_else(|| {
        tracing::warn!("{}: invalid spacing '{}', using {}", key, raw, default);
        default
    })
}
