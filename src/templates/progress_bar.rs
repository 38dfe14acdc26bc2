use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{empty_entities, ConfigBase};
use crate::entities::{ProgressEntity, MAX_PROGRESS_ITEMS};
use crate::error_codes::CodedError;
use crate::timing::{allocate, EntranceShape, PhaseTiming, PROGRESS_BAR_PHASES};

const BAR_RADIUS: u32 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLayout {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBarOptions {
    pub layout: Option<ProgressLayout>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bar_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledProgress {
    #[serde(flatten)]
    pub item: ProgressEntity,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBarConfig {
    #[serde(flatten)]
    pub base: ConfigBase,
    pub items: Vec<StyledProgress>,
    pub layout: ProgressLayout,
    pub bar_height: u32,
    pub bar_radius: u32,
    pub timing: PhaseTiming,
}

pub fn validate(items: &[ProgressEntity]) -> Result<()> {
    if items.is_empty() {
        return Err(empty_entities("progress item"));
    }
    if let Some(item) = items
        .iter()
        .find(|item| !(0.0..=100.0).contains(&item.value))
    {
        return Err(anyhow!(CodedError::invalid_input(
            "INVALID_PROGRESS_VALUE",
            format!(
                "progress '{}' must be between 0 and 100, got {}",
                item.label, item.value
            ),
        )
        .with_details(json!({ "label": item.label, "value": item.value.to_string() }))));
    }
    Ok(())
}

pub fn build(
    base: ConfigBase,
    items: &[ProgressEntity],
    options: &ProgressBarOptions,
) -> ProgressBarConfig {
    let items = &items[..items.len().min(MAX_PROGRESS_ITEMS)];
    let bar_height = options
        .bar_height
        .unwrap_or(if items.len() <= 3 { 40 } else { 30 });
    let timing = allocate(
        base.fps,
        base.duration,
        items.len(),
        PROGRESS_BAR_PHASES,
        EntranceShape::Staggered,
    );

    let colors = &base.brand_colors;
    let items = items
        .iter()
        .enumerate()
        .map(|(index, item)| StyledProgress {
            item: item.clone(),
            color: if index % 2 == 0 {
                colors.primary.clone()
            } else {
                colors.secondary.clone()
            },
        })
        .collect();

    ProgressBarConfig {
        layout: options.layout.unwrap_or_default(),
        base,
        items,
        bar_height,
        bar_radius: BAR_RADIUS,
        timing,
    }
}
