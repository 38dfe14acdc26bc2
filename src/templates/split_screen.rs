use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ConfigBase;
use crate::direction::{SplitLayout, MAX_SPLIT_PANELS, MIN_SPLIT_PANELS};
use crate::error_codes::CodedError;
use crate::media::PanelDescriptor;
use crate::timing::allocate_split_screen;

const DIVIDER_WIDTH: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitTransition {
    #[default]
    Simultaneous,
    Sequential,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitScreenOptions {
    pub layout: Option<SplitLayout>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub transition_type: Option<SplitTransition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerStyle {
    pub width: u32,
    pub color: String,
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitScreenConfig {
    #[serde(flatten)]
    pub base: ConfigBase,
    pub panels: Vec<PanelDescriptor>,
    pub panel_count: usize,
    pub layout: SplitLayout,
    pub divider: DividerStyle,
    pub transition_type: SplitTransition,
    pub transition_duration: u32,
    pub stagger_delay: u32,
}

pub fn validate(panels: &[PanelDescriptor]) -> Result<()> {
    if !(MIN_SPLIT_PANELS..=MAX_SPLIT_PANELS).contains(&panels.len()) {
        return Err(anyhow!(CodedError::invalid_input(
            "INVALID_PANEL_COUNT",
            format!(
                "split screen needs {MIN_SPLIT_PANELS} to {MAX_SPLIT_PANELS} panels, got {}",
                panels.len()
            ),
        )
        .with_details(json!({ "panels": panels.len() }))));
    }
    Ok(())
}

pub fn build(
    base: ConfigBase,
    panels: Vec<PanelDescriptor>,
    options: &SplitScreenOptions,
) -> SplitScreenConfig {
    let panel_count = panels.len();
    let timing = allocate_split_screen(base.fps, base.duration);
    let divider = DividerStyle {
        width: DIVIDER_WIDTH,
        color: base.brand_colors.secondary.clone(),
        animated: true,
    };

    SplitScreenConfig {
        base,
        panels,
        panel_count,
        layout: options
            .layout
            .unwrap_or_else(|| SplitLayout::for_panels(panel_count, false, false)),
        divider,
        transition_type: options.transition_type.unwrap_or_default(),
        transition_duration: timing.transition_duration,
        stagger_delay: timing.stagger_delay,
    }
}
