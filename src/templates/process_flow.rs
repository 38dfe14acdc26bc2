use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{empty_entities, ConfigBase};
use crate::entities::{ProcessStepEntity, MAX_STEPS};
use crate::timing::{allocate, EntranceShape, PhaseTiming, PROCESS_FLOW_PHASES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowLayout {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowAnimation {
    #[default]
    Sequential,
    Simultaneous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessFlowOptions {
    pub layout: Option<FlowLayout>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub animation_type: Option<FlowAnimation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStyle {
    pub size: u32,
    pub title_font_size: u32,
    pub description_font_size: u32,
    pub color: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStyle {
    pub kind: String,
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFlowConfig {
    #[serde(flatten)]
    pub base: ConfigBase,
    pub steps: Vec<ProcessStepEntity>,
    pub layout: FlowLayout,
    pub animation_type: FlowAnimation,
    pub step_style: StepStyle,
    pub connector_style: ConnectorStyle,
    pub show_numbers: bool,
    pub timing: PhaseTiming,
}

pub fn validate(steps: &[ProcessStepEntity]) -> Result<()> {
    if steps.is_empty() {
        return Err(empty_entities("process step"));
    }
    Ok(())
}

fn marker_size(count: usize) -> u32 {
    match count {
        0..=3 => 90,
        4 | 5 => 80,
        _ => 70,
    }
}

pub fn build(
    base: ConfigBase,
    steps: &[ProcessStepEntity],
    options: &ProcessFlowOptions,
) -> ProcessFlowConfig {
    let steps = &steps[..steps.len().min(MAX_STEPS)];
    let layout = options.layout.unwrap_or(if steps.len() <= 4 {
        FlowLayout::Horizontal
    } else {
        FlowLayout::Vertical
    });
    let animation_type = options.animation_type.unwrap_or_default();
    let shape = match animation_type {
        FlowAnimation::Sequential => EntranceShape::Sequential,
        FlowAnimation::Simultaneous => EntranceShape::Simultaneous,
    };
    let timing = allocate(
        base.fps,
        base.duration,
        steps.len(),
        PROCESS_FLOW_PHASES,
        shape,
    );

    let (title_font_size, description_font_size) =
        if steps.len() <= 3 { (36, 22) } else { (28, 18) };
    let colors = &base.brand_colors;
    let step_style = StepStyle {
        size: marker_size(steps.len()),
        title_font_size,
        description_font_size,
        color: colors.primary.clone(),
        text_color: colors.text.clone(),
    };
    let connector_style = ConnectorStyle {
        kind: "arrow".to_owned(),
        color: colors.accent.clone(),
        width: 3,
    };

    ProcessFlowConfig {
        steps: steps.to_vec(),
        base,
        layout,
        animation_type,
        step_style,
        connector_style,
        show_numbers: true,
        timing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandColors;
    use crate::templates::{Canvas, INFOGRAPHIC_BACKGROUND};

    fn base(duration: f64) -> ConfigBase {
        ConfigBase::new(
            duration,
            Canvas::default(),
            INFOGRAPHIC_BACKGROUND,
            BrandColors::default(),
        )
    }

    fn steps(count: usize) -> Vec<ProcessStepEntity> {
        (1..=count)
            .map(|n| ProcessStepEntity {
                title: format!("Step {n}"),
                description: None,
            })
            .collect()
    }

    #[test]
    fn three_steps_over_nine_seconds() {
        let config = build(base(9.0), &steps(3), &Default::default());
        assert_eq!(config.layout, FlowLayout::Horizontal);
        assert_eq!(config.step_style.size, 90);
        assert_eq!(config.step_style.title_font_size, 36);
        assert_eq!(config.base.total_frames, 270);
        assert!(config.show_numbers);
        assert_eq!(config.connector_style.kind, "arrow");
        // Three sequential 30-frame entrances, no stagger.
        assert_eq!(config.timing.entrance_span_frames, 90);
        assert_eq!(config.timing.hold_frames, 165);
    }

    #[test]
    fn sizing_shrinks_with_step_count() {
        let five = build(base(9.0), &steps(5), &Default::default());
        assert_eq!(five.layout, FlowLayout::Vertical);
        assert_eq!(five.step_style.size, 80);
        assert_eq!(five.step_style.description_font_size, 18);

        let six = build(base(9.0), &steps(8), &Default::default());
        assert_eq!(six.steps.len(), 6);
        assert_eq!(six.step_style.size, 70);
    }

    #[test]
    fn simultaneous_entrance_uses_a_single_span() {
        let options = ProcessFlowOptions {
            animation_type: Some(FlowAnimation::Simultaneous),
            ..Default::default()
        };
        let config = build(base(9.0), &steps(4), &options);
        assert_eq!(config.timing.entrance_span_frames, 30);
        assert_eq!(config.timing.stagger_frames, 0);
    }
}
