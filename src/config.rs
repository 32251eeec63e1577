//! Runtime configuration
//!
//! Tunables are loaded once from a JSON file at startup; there is no
//! persistence layer and no live reload. The numeric values consulted on
//! the hot paths are copied into [`Tuning`](crate::engine::Tuning) so the
//! engine never touches the config after construction.

use crate::engine::Tuning;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Per-application override, matched on the frontmost app's bundle id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRule {
    pub bundle_id: String,
    pub smooth: bool,
    pub reverse: bool,
}

/// Effective settings for one scroll event after per-app resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveRule {
    pub smooth: bool,
    pub reverse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Multiplier applied to every raw delta.
    pub speed: f64,
    /// Normalization threshold for non-precise (line based) wheel deltas.
    pub step: f64,
    /// Fraction of the remaining distance covered per tick.
    pub ease_fraction: f64,
    /// Pulse magnitude treated as converged.
    pub precision: f64,
    /// Startup jitter filter warm-up, in pulses.
    pub filter_window: u32,
    /// Tick cadence; should match the display refresh rate.
    pub tick_rate_hz: f64,
    /// How often the watchdog re-checks the event taps.
    pub watchdog_interval_ms: u64,
    /// Logical keycode flipping the axis-swap toggle. 0 disables.
    pub toggle_key: i64,
    /// Logical keycode flipping the smoothing block. 0 disables.
    pub block_key: i64,
    /// Global default: smooth scroll events.
    pub smooth: bool,
    /// Global default: reverse scroll direction.
    pub reverse: bool,
    /// Per-application exceptions to the global defaults.
    pub exceptions: Vec<AppRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1.0,
            step: 30.0,
            ease_fraction: 0.15,
            precision: 0.2,
            filter_window: 4,
            tick_rate_hz: 60.0,
            watchdog_interval_ms: 2000,
            // Left shift; the hook unifies right shift onto it.
            toggle_key: 56,
            block_key: 0,
            smooth: true,
            reverse: false,
            exceptions: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the effective settings for an application. Unknown or
    /// missing bundle ids fall back to the global defaults.
    pub fn rule_for(&self, bundle_id: Option<&str>) -> EffectiveRule {
        if let Some(id) = bundle_id {
            if let Some(rule) = self.exceptions.iter().find(|r| r.bundle_id == id) {
                return EffectiveRule {
                    smooth: rule.smooth,
                    reverse: rule.reverse,
                };
            }
        }
        EffectiveRule {
            smooth: self.smooth,
            reverse: self.reverse,
        }
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            speed: self.speed,
            ease_fraction: self.ease_fraction,
            precision: self.precision,
            filter_window: self.filter_window,
            toggle_key: self.toggle_key,
            block_key: self.block_key,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::default();
        assert!(config.ease_fraction > 0.0 && config.ease_fraction < 1.0);
        assert!(config.precision > 0.0);
        assert_eq!(config.tick_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_rule_resolution_prefers_exception() {
        let mut config = Config::default();
        config.exceptions.push(AppRule {
            bundle_id: "com.example.terminal".to_string(),
            smooth: false,
            reverse: true,
        });

        let rule = config.rule_for(Some("com.example.terminal"));
        assert_eq!(
            rule,
            EffectiveRule {
                smooth: false,
                reverse: true
            },
            "Exception must override the global defaults"
        );

        let fallback = config.rule_for(Some("com.example.unknown"));
        assert_eq!(
            fallback,
            EffectiveRule {
                smooth: true,
                reverse: false
            },
            "Unknown bundle ids fall back to the defaults"
        );
        assert_eq!(fallback, config.rule_for(None));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wheelglide.json");
        std::fs::write(&path, r#"{ "speed": 2.5, "blockKey": 59 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.block_key, 59);
        assert_eq!(
            config.step,
            Config::default().step,
            "Unspecified fields keep their defaults"
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut config = Config::default();
        config.exceptions.push(AppRule {
            bundle_id: "org.mozilla.firefox".to_string(),
            smooth: true,
            reverse: true,
        });
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.exceptions.len(), 1);
        assert_eq!(back.exceptions[0].bundle_id, "org.mozilla.firefox");
    }
}
