use std::{env, time::Duration};

use model::Coordinate;

pub const DEFAULT_STORAGE_KEY: &str = "maplog.entries";
pub const DEFAULT_CENTER: Coordinate = Coordinate::new_unchecked(28.6139, 77.2090);
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub storage_key: String,
    /// Where the map opens when the user's position is unknown.
    pub fallback_center: Coordinate,
    pub zoom: f64,
    pub frame_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            fallback_center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Reads `MAPLOG_*` variables, keeping the default for anything unset or
    /// unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |name: &str| -> Option<f64> {
            let raw = lookup(name)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("ignoring {}={:?}, not a number", name, raw);
                    None
                }
            }
        };

        let fallback_center = match (
            parsed("MAPLOG_FALLBACK_LAT"),
            parsed("MAPLOG_FALLBACK_LNG"),
        ) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).unwrap_or_else(|why| {
                log::warn!("ignoring fallback center: {}", why);
                defaults.fallback_center
            }),
            _ => defaults.fallback_center,
        };

        Self {
            storage_key: lookup("MAPLOG_STORAGE_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.storage_key),
            fallback_center,
            zoom: parsed("MAPLOG_ZOOM").unwrap_or(defaults.zoom),
            frame_interval: parsed("MAPLOG_FRAME_MS")
                .filter(|ms| *ms >= 1.0)
                .map(|ms| Duration::from_micros((ms * 1000.0).round() as u64))
                .unwrap_or(defaults.frame_interval),
        }
    }
}
