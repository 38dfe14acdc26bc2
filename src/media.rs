use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error_codes::CodedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_MEDIA_TYPE",
                format!("invalid media type '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["image", "video"]
            })))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Top,
    #[default]
    Bottom,
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub url: String,
    pub media_type: MediaType,
}

/// One media slot of a compositor template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDescriptor {
    pub media_url: String,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub label_position: LabelPosition,
}

impl PanelDescriptor {
    pub fn new(media: &MediaItem) -> Self {
        Self {
            media_url: media.url.clone(),
            media_type: media.media_type,
            label: None,
            label_position: LabelPosition::default(),
        }
    }

    /// Blank labels are dropped.
    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_owned);
        self
    }

    pub fn with_label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }
}

/// Zips parallel URL/type lists; lengths must match.
pub fn pair_media(urls: &[String], types: &[MediaType]) -> Result<Vec<MediaItem>> {
    if urls.len() != types.len() {
        return Err(anyhow!(CodedError::invalid_input(
            "MEDIA_LENGTH_MISMATCH",
            format!(
                "got {} media urls but {} media types",
                urls.len(),
                types.len()
            ),
        )
        .with_details(json!({
            "mediaUrls": urls.len(),
            "mediaTypes": types.len()
        }))));
    }

    Ok(urls
        .iter()
        .zip(types)
        .map(|(url, media_type)| MediaItem {
            url: url.clone(),
            media_type: *media_type,
        })
        .collect())
}

/// The first two items, for templates that composite exactly two shots.
pub fn media_pair(media: &[MediaItem]) -> Result<(&MediaItem, &MediaItem)> {
    match media {
        [first, second, ..] => Ok((first, second)),
        _ => Err(anyhow!(CodedError::invalid_input(
            "INVALID_PANEL_COUNT",
            format!("two media items are required, got {}", media.len()),
        )
        .with_details(json!({ "panels": media.len() })))),
    }
}
