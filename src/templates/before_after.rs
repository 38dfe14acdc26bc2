use serde::{Deserialize, Serialize};

use super::ConfigBase;
use crate::direction::TransitionStyle;
use crate::media::{LabelPosition, MediaItem, PanelDescriptor};
use crate::timing::{allocate_before_after, BeforeAfterTiming};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeforeAfterOptions {
    pub transition_style: Option<TransitionStyle>,
    pub before_label: Option<String>,
    pub after_label: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Slider sweep in percent of the frame width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderSweep {
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeAfterConfig {
    #[serde(flatten)]
    pub base: ConfigBase,
    pub before: PanelDescriptor,
    pub after: PanelDescriptor,
    pub transition_style: TransitionStyle,
    pub timing: BeforeAfterTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider: Option<SliderSweep>,
}

pub fn build(
    base: ConfigBase,
    before: &MediaItem,
    after: &MediaItem,
    options: &BeforeAfterOptions,
) -> BeforeAfterConfig {
    let panel = |item: &MediaItem, label: Option<&str>, fallback: &str| {
        PanelDescriptor::new(item)
            .with_label(Some(label.unwrap_or(fallback)))
            .with_label_position(LabelPosition::Top)
    };
    let before = panel(before, options.before_label.as_deref(), "Before");
    let after = panel(after, options.after_label.as_deref(), "After");

    let transition_style = options.transition_style.unwrap_or_default();
    let slider = (transition_style == TransitionStyle::Slider)
        .then_some(SliderSweep { from: 100, to: 0 });

    BeforeAfterConfig {
        timing: allocate_before_after(base.fps, base.duration),
        base,
        before,
        after,
        transition_style,
        slider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandColors;
    use crate::media::{media_pair, MediaType};
    use crate::templates::{Canvas, COMPOSITOR_BACKGROUND};

    fn media() -> Vec<MediaItem> {
        vec![
            MediaItem {
                url: "desk-messy.jpg".to_owned(),
                media_type: MediaType::Image,
            },
            MediaItem {
                url: "desk-clean.mp4".to_owned(),
                media_type: MediaType::Video,
            },
        ]
    }

    fn build_with(duration: f64, options: &BeforeAfterOptions) -> BeforeAfterConfig {
        let media = media();
        let (before, after) = media_pair(&media).expect("two media items");
        build(base(duration), before, after, options)
    }

    fn base(duration: f64) -> ConfigBase {
        ConfigBase::new(
            duration,
            Canvas::default(),
            COMPOSITOR_BACKGROUND,
            BrandColors::default(),
        )
    }

    #[test]
    fn slider_sweeps_by_default() {
        let config = build_with(6.0, &Default::default());
        assert_eq!(config.transition_style, TransitionStyle::Slider);
        assert_eq!(config.slider, Some(SliderSweep { from: 100, to: 0 }));
        assert_eq!(config.before.label.as_deref(), Some("Before"));
        assert_eq!(config.after.media_type, MediaType::Video);
        assert_eq!(config.timing.hold_before_frames, 30);
        assert_eq!(config.timing.transition_duration, 45);
        assert_eq!(config.timing.hold_after_frames, 90);
    }

    #[test]
    fn fade_has_no_slider_and_keeps_labels() {
        let options = BeforeAfterOptions {
            transition_style: Some(TransitionStyle::Fade),
            before_label: Some("Messy Desk".to_owned()),
            after_label: Some("Clean Desk".to_owned()),
            ..Default::default()
        };
        let config = build_with(6.0, &options);
        assert_eq!(config.slider, None);
        assert_eq!(config.after.label.as_deref(), Some("Clean Desk"));

        let value = serde_json::to_value(&config).expect("config should serialize");
        assert!(value.get("slider").is_none());
        assert_eq!(value["transitionStyle"], "fade");
        assert_eq!(value["timing"]["holdBeforeFrames"], 30);
    }

    #[test]
    fn a_single_media_item_is_not_a_pair() {
        let media = media();
        assert!(media_pair(&media[..1]).is_err());
    }

    #[test]
    fn short_durations_keep_the_hold_floor() {
        let config = build_with(2.0, &Default::default());
        assert_eq!(config.timing.hold_after_frames, 15);
        assert!(config.timing.timeline_frames() > config.base.total_frames);
    }
}
