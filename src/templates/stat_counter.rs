use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{empty_entities, ConfigBase};
use crate::entities::{StatEntity, MAX_STATS};
use crate::timing::{allocate, EntranceShape, PhaseTiming, STAT_COUNTER_PHASES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatLayout {
    Horizontal,
    Grid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatCounterOptions {
    pub layout: Option<StatLayout>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledStat {
    #[serde(flatten)]
    pub stat: StatEntity,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCounterConfig {
    #[serde(flatten)]
    pub base: ConfigBase,
    pub stats: Vec<StyledStat>,
    pub layout: StatLayout,
    pub number_font_size: u32,
    pub label_font_size: u32,
    pub entrance_animation: String,
    pub count_easing: String,
    pub timing: PhaseTiming,
}

pub fn validate(stats: &[StatEntity]) -> Result<()> {
    if stats.is_empty() {
        return Err(empty_entities("stat"));
    }
    Ok(())
}

fn font_sizes(count: usize) -> (u32, u32) {
    match count {
        0..=2 => (120, 28),
        3 => (96, 24),
        _ => (72, 24),
    }
}

pub fn build(base: ConfigBase, stats: &[StatEntity], options: &StatCounterOptions) -> StatCounterConfig {
    let stats = &stats[..stats.len().min(MAX_STATS)];
    let layout = options.layout.unwrap_or(if stats.len() <= 3 {
        StatLayout::Horizontal
    } else {
        StatLayout::Grid
    });
    let (number_font_size, label_font_size) = font_sizes(stats.len());
    let timing = allocate(
        base.fps,
        base.duration,
        stats.len(),
        STAT_COUNTER_PHASES,
        EntranceShape::Staggered,
    );

    let stats = stats
        .iter()
        .map(|stat| StyledStat {
            stat: stat.clone(),
            color: base.brand_colors.primary.clone(),
        })
        .collect();

    StatCounterConfig {
        base,
        stats,
        layout,
        number_font_size,
        label_font_size,
        entrance_animation: "scale".to_owned(),
        count_easing: "ease-out".to_owned(),
        timing,
    }
}
