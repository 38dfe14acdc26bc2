use serde::{Deserialize, Serialize};

use super::ConfigBase;
use crate::direction::PipPosition;
use crate::media::{LabelPosition, MediaItem, PanelDescriptor};
use crate::timing::allocate_picture_in_picture;

const DEFAULT_PIP_SIZE: u32 = 30;
const PIP_BORDER_WIDTH: u32 = 4;
const PIP_BORDER_RADIUS: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipEntrance {
    #[default]
    Scale,
    Fade,
    Slide,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureInPictureOptions {
    pub position: Option<PipPosition>,
    /// Inset size as a percentage of the frame width.
    pub size: Option<u32>,
    pub entrance_style: Option<PipEntrance>,
    pub main_label: Option<String>,
    pub pip_label: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipBorder {
    pub width: u32,
    pub color: String,
    pub radius: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipLabelStyle {
    pub text: String,
    pub color: String,
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureInPictureConfig {
    #[serde(flatten)]
    pub base: ConfigBase,
    pub main: PanelDescriptor,
    pub pip: PanelDescriptor,
    pub pip_position: PipPosition,
    pub pip_size: u32,
    pub pip_border: PipBorder,
    pub entrance_style: PipEntrance,
    pub pip_entrance_frame: u32,
    pub pip_entrance_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<PipLabelStyle>,
}

/// `main` fills the frame; `inset` is drawn on top in a corner.
pub fn build(
    base: ConfigBase,
    main: &MediaItem,
    inset: &MediaItem,
    options: &PictureInPictureOptions,
) -> PictureInPictureConfig {
    let timing = allocate_picture_in_picture(base.fps, base.duration);
    let colors = &base.brand_colors;

    let pip_label = options
        .pip_label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty());
    let label_style = pip_label.map(|text| PipLabelStyle {
        text: text.to_owned(),
        color: colors.text.clone(),
        background_color: colors.primary.clone(),
    });
    let pip_border = PipBorder {
        width: PIP_BORDER_WIDTH,
        color: colors.accent.clone(),
        radius: PIP_BORDER_RADIUS,
    };

    PictureInPictureConfig {
        main: PanelDescriptor::new(main).with_label(options.main_label.as_deref()),
        pip: PanelDescriptor::new(inset)
            .with_label(pip_label)
            .with_label_position(LabelPosition::Overlay),
        pip_position: options.position.unwrap_or_default(),
        pip_size: options.size.unwrap_or(DEFAULT_PIP_SIZE),
        pip_border,
        entrance_style: options.entrance_style.unwrap_or_default(),
        pip_entrance_frame: timing.entrance_frame,
        pip_entrance_duration: timing.entrance_duration,
        label_style,
        base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandColors;
    use crate::media::MediaType;
    use crate::templates::{Canvas, COMPOSITOR_BACKGROUND};

    fn item(url: &str) -> MediaItem {
        MediaItem {
            url: url.to_owned(),
            media_type: MediaType::Video,
        }
    }

    fn base() -> ConfigBase {
        ConfigBase::new(
            8.0,
            Canvas::default(),
            COMPOSITOR_BACKGROUND,
            BrandColors::default(),
        )
    }

    #[test]
    fn defaults_to_bottom_right_scale_inset() {
        let config = build(base(), &item("screen.mp4"), &item("cam.mp4"), &Default::default());
        assert_eq!(config.pip_position, PipPosition::BottomRight);
        assert_eq!(config.pip_size, 30);
        assert_eq!(config.entrance_style, PipEntrance::Scale);
        assert_eq!(config.pip_entrance_frame, 15);
        assert_eq!(config.pip_entrance_duration, 15);
    }

    #[test]
    fn label_style_is_omitted_without_a_pip_label() {
        let config = build(base(), &item("screen.mp4"), &item("cam.mp4"), &Default::default());
        let value = serde_json::to_value(&config).expect("config should serialize");
        assert!(value.get("labelStyle").is_none());
        assert_eq!(value["pipPosition"], "bottom-right");

        let blank = PictureInPictureOptions {
            pip_label: Some("   ".to_owned()),
            ..Default::default()
        };
        let config = build(base(), &item("screen.mp4"), &item("cam.mp4"), &blank);
        assert_eq!(config.label_style, None);
    }

    #[test]
    fn pip_label_styles_with_brand_colours() {
        let options = PictureInPictureOptions {
            pip_label: Some("Host".to_owned()),
            position: Some(PipPosition::TopLeft),
            ..Default::default()
        };
        let config = build(base(), &item("screen.mp4"), &item("cam.mp4"), &options);
        let style = config.label_style.expect("label style present");
        assert_eq!(style.text, "Host");
        assert_eq!(style.background_color, "#2D5A27");
        assert_eq!(config.pip.label.as_deref(), Some("Host"));
        assert_eq!(config.pip_position, PipPosition::TopLeft);
    }
}
