//! Engine configuration.

use anyhow::Context;

pub const EXPIRING_WINDOW_VAR: &str = "LARDER_EXPIRING_WINDOW_DAYS";
pub const LEFTOVER_SHELF_LIFE_VAR: &str = "LARDER_LEFTOVER_SHELF_LIFE_DAYS";

/// Tunables of the consumption engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Window of the "expiring soon" query, in days.
    pub expiring_window_days: u32,
    /// Shelf life given to leftovers created by cooking.
    pub leftover_shelf_life_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expiring_window_days: 3,
            leftover_shelf_life_days: 4,
        }
    }
}

impl EngineConfig {
    /// Load from the process environment; unset variables keep their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup (tests pass a map instead of mutating the environment).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let expiring_window_days = parse_days(&lookup, EXPIRING_WINDOW_VAR)?
            .unwrap_or(defaults.expiring_window_days);
        let leftover_shelf_life_days = parse_days(&lookup, LEFTOVER_SHELF_LIFE_VAR)?
            .unwrap_or(defaults.leftover_shelf_life_days);

        if leftover_shelf_life_days == 0 {
            anyhow::bail!("{LEFTOVER_SHELF_LIFE_VAR} must be at least 1");
        }

        Ok(Self {
            expiring_window_days,
            leftover_shelf_life_days,
        })
    }
}

fn parse_days<F>(lookup: &F, key: &str) -> anyhow::Result<Option<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        tracing::debug!(key, "not set; using default");
        return Ok(None);
    };
    let days = raw
        .trim()
        .parse::<u32>()
        .with_context(|| format!("{key} must be a whole number of days, got {raw:?}"))?;
    Ok(Some(days))
}
