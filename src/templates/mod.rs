//! Renderer-facing template configurations.
//!
//! Every variant shares [`ConfigBase`] and serializes with a `type`
//! discriminator, camelCase fields, and frame counts at [`FPS`].

pub mod before_after;
pub mod picture_in_picture;
pub mod process_flow;
pub mod progress_bar;
pub mod split_screen;
pub mod stat_counter;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::brand::BrandColors;
use crate::error_codes::CodedError;
use crate::timing::{seconds_to_frames, FPS};

pub use before_after::{BeforeAfterConfig, BeforeAfterOptions};
pub use picture_in_picture::{PictureInPictureConfig, PictureInPictureOptions};
pub use process_flow::{ProcessFlowConfig, ProcessFlowOptions};
pub use progress_bar::{ProgressBarConfig, ProgressBarOptions};
pub use split_screen::{SplitScreenConfig, SplitScreenOptions};
pub use stat_counter::{StatCounterConfig, StatCounterOptions};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
pub const INFOGRAPHIC_BACKGROUND: &str = "#111111";
pub const COMPOSITOR_BACKGROUND: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn with_overrides(self, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.unwrap_or(self.width),
            height: height.unwrap_or(self.height),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(CodedError::invalid_input(
                "INVALID_CANVAS",
                format!(
                    "canvas must be at least 1x1 pixels, got {}x{}",
                    self.width, self.height
                ),
            )
            .with_details(json!({ "width": self.width, "height": self.height }))));
        }
        Ok(())
    }
}

pub fn validate_duration(duration_seconds: f64) -> Result<()> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(anyhow!(CodedError::invalid_input(
            "INVALID_DURATION",
            format!("duration must be a positive number of seconds, got {duration_seconds}"),
        )
        .with_details(json!({ "duration": duration_seconds.to_string() }))));
    }
    Ok(())
}

pub(crate) fn empty_entities(what: &str) -> anyhow::Error {
    anyhow!(CodedError::invalid_input(
        "EMPTY_ENTITIES",
        format!("at least one {what} is required"),
    ))
}

/// Fields every template carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigBase {
    pub duration: f64,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub brand_colors: BrandColors,
    /// `round(fps * duration)`; renderers clip the timeline to this.
    pub total_frames: u32,
}

impl ConfigBase {
    /// Expects `duration_seconds` and `canvas` to be validated already.
    pub fn new(
        duration_seconds: f64,
        canvas: Canvas,
        background_color: &str,
        brand_colors: BrandColors,
    ) -> Self {
        Self {
            duration: duration_seconds,
            fps: FPS,
            width: canvas.width,
            height: canvas.height,
            background_color: background_color.to_owned(),
            brand_colors,
            total_frames: seconds_to_frames(FPS, duration_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TemplateConfig {
    StatCounter(StatCounterConfig),
    ProgressBar(ProgressBarConfig),
    ProcessFlow(ProcessFlowConfig),
    SplitScreen(SplitScreenConfig),
    BeforeAfter(BeforeAfterConfig),
    PictureInPicture(PictureInPictureConfig),
}

impl TemplateConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StatCounter(_) => "stat-counter",
            Self::ProgressBar(_) => "progress-bar",
            Self::ProcessFlow(_) => "process-flow",
            Self::SplitScreen(_) => "split-screen",
            Self::BeforeAfter(_) => "before-after",
            Self::PictureInPicture(_) => "picture-in-picture",
        }
    }

    pub fn base(&self) -> &ConfigBase {
        match self {
            Self::StatCounter(config) => &config.base,
            Self::ProgressBar(config) => &config.base,
            Self::ProcessFlow(config) => &config.base,
            Self::SplitScreen(config) => &config.base,
            Self::BeforeAfter(config) => &config.base,
            Self::PictureInPicture(config) => &config.base,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 of the compact JSON form. Identical inputs give identical
    /// fingerprints.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(sha256_hex(&bytes))
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes::find_coded_error;

    fn code_of(result: Result<()>) -> Option<&'static str> {
        result
            .err()
            .and_then(|error| find_coded_error(&error).map(|coded| coded.code))
    }

    #[test]
    fn durations_must_be_positive_and_finite() {
        assert!(validate_duration(0.25).is_ok());
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert_eq!(code_of(validate_duration(bad)), Some("INVALID_DURATION"));
        }
    }

    #[test]
    fn canvas_overrides_and_validation() {
        let canvas = Canvas::default().with_overrides(Some(1080), None);
        assert_eq!(canvas, Canvas { width: 1080, height: 1080 });
        assert_eq!(
            code_of(Canvas::default().with_overrides(None, Some(0)).validate()),
            Some("INVALID_CANVAS")
        );
    }

    #[test]
    fn base_derives_total_frames() {
        let base = ConfigBase::new(
            2.5,
            Canvas::default(),
            INFOGRAPHIC_BACKGROUND,
            BrandColors::default(),
        );
        assert_eq!(base.fps, 30);
        assert_eq!(base.total_frames, 75);
        let value = serde_json::to_value(&base).expect("base should serialize");
        assert_eq!(value["backgroundColor"], "#111111");
        assert_eq!(value["brandColors"]["primary"], "#2D5A27");
    }
}
