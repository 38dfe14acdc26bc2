use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::brand::DEFAULT_BRAND_TIMEOUT;
use crate::error_codes::CodedError;
use crate::templates::Canvas;

pub const BRAND_TIMEOUT_ENV: &str = "VCR_BRAND_TIMEOUT_MS";
pub const CANVAS_WIDTH_ENV: &str = "VCR_CANVAS_WIDTH";
pub const CANVAS_HEIGHT_ENV: &str = "VCR_CANVAS_HEIGHT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Upper bound on one brand colour lookup.
    pub brand_timeout: Duration,
    pub canvas: Canvas,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            brand_timeout: DEFAULT_BRAND_TIMEOUT,
            canvas: Canvas::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub brand_timeout_ms: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Raw environment values, captured once so resolution stays testable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub brand_timeout_ms: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl EnvSettings {
    pub fn from_process_env() -> Self {
        Self {
            brand_timeout_ms: env::var(BRAND_TIMEOUT_ENV).ok(),
            width: env::var(CANVAS_WIDTH_ENV).ok(),
            height: env::var(CANVAS_HEIGHT_ENV).ok(),
        }
    }
}

/// CLI wins over env, env wins over defaults.
pub fn resolve_settings(cli: &SettingsOverrides, env: &EnvSettings) -> Result<GeneratorSettings> {
    let defaults = GeneratorSettings::default();

    let brand_timeout = match cli.brand_timeout_ms {
        Some(ms) => Duration::from_millis(ms),
        None => parse_env::<u64>(BRAND_TIMEOUT_ENV, env.brand_timeout_ms.as_deref())?
            .map(Duration::from_millis)
            .unwrap_or(defaults.brand_timeout),
    };
    let width = resolve_override(cli.width, CANVAS_WIDTH_ENV, env.width.as_deref())?;
    let height = resolve_override(cli.height, CANVAS_HEIGHT_ENV, env.height.as_deref())?;

    let canvas = defaults.canvas.with_overrides(width, height);
    canvas.validate()?;

    Ok(GeneratorSettings {
        brand_timeout,
        canvas,
    })
}

fn resolve_override(cli_arg: Option<u32>, name: &str, env_value: Option<&str>) -> Result<Option<u32>> {
    if cli_arg.is_some() {
        return Ok(cli_arg);
    }
    parse_env(name, env_value)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<T>().map(Some).map_err(|_| {
        anyhow!(CodedError::usage(
            "INVALID_SETTING",
            format!("{name} must be a non-negative integer, got '{raw}'"),
        )
        .with_details(json!({ "variable": name, "value": raw })))
    })
}
