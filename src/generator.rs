use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::brand::{BrandBibleSource, BrandColorProvider};
use crate::detect::{detect_type, NarrationTemplate};
use crate::direction::{parse_direction, DirectionIntent, DirectionKind, SplitLayout};
use crate::entities::{
    parse_progress, parse_stats, parse_steps, ProcessStepEntity, ProgressEntity, StatEntity,
};
use crate::media::{media_pair, pair_media, MediaItem, MediaType, PanelDescriptor};
use crate::settings::GeneratorSettings;
use crate::templates::{
    before_after, picture_in_picture, process_flow, progress_bar, split_screen, stat_counter,
    validate_duration, BeforeAfterConfig, BeforeAfterOptions, Canvas, ConfigBase,
    PictureInPictureConfig, PictureInPictureOptions, ProcessFlowConfig, ProcessFlowOptions,
    ProgressBarConfig, ProgressBarOptions, SplitScreenConfig, SplitScreenOptions,
    StatCounterConfig, StatCounterOptions, TemplateConfig, COMPOSITOR_BACKGROUND,
    INFOGRAPHIC_BACKGROUND,
};

/// Turns narration, visual direction or pre-parsed entities into template
/// configs. Each call performs at most one brand colour lookup.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    brand: BrandColorProvider,
    canvas: Canvas,
}

impl TemplateGenerator {
    pub fn new(brand: BrandColorProvider, canvas: Canvas) -> Self {
        Self { brand, canvas }
    }

    pub fn with_settings(source: Arc<dyn BrandBibleSource>, settings: &GeneratorSettings) -> Self {
        Self::new(
            BrandColorProvider::new(source, settings.brand_timeout),
            settings.canvas,
        )
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// `Ok(None)` when no template fits the narration.
    pub async fn generate_from_narration(
        &self,
        narration: &str,
        duration_seconds: f64,
    ) -> Result<Option<TemplateConfig>> {
        validate_duration(duration_seconds)?;
        self.canvas.validate()?;

        let Some(template) = detect_type(narration) else {
            return Ok(None);
        };

        let config = match template {
            NarrationTemplate::ProcessFlow => {
                let steps = parse_steps(narration);
                if steps.is_empty() {
                    return Ok(None);
                }
                TemplateConfig::ProcessFlow(
                    self.generate_process_flow_config(&steps, duration_seconds, &Default::default())
                        .await?,
                )
            }
            NarrationTemplate::ProgressBar => {
                let items = parse_progress(narration);
                if items.is_empty() {
                    return Ok(None);
                }
                TemplateConfig::ProgressBar(
                    self.generate_progress_bar_config(&items, duration_seconds, &Default::default())
                        .await?,
                )
            }
            NarrationTemplate::StatCounter => {
                let stats = parse_stats(narration);
                if stats.is_empty() {
                    return Ok(None);
                }
                TemplateConfig::StatCounter(
                    self.generate_stat_counter_config(&stats, duration_seconds, &Default::default())
                        .await?,
                )
            }
        };

        debug!(template = config.kind(), "generated config from narration");
        Ok(Some(config))
    }

    /// `Ok(None)` for fewer than two media items or an unrecognised
    /// direction. Mismatched URL/type lists are an error.
    pub async fn generate_from_direction(
        &self,
        visual_direction: &str,
        media_urls: &[String],
        media_types: &[MediaType],
        duration_seconds: f64,
    ) -> Result<Option<TemplateConfig>> {
        validate_duration(duration_seconds)?;
        self.canvas.validate()?;
        let media = pair_media(media_urls, media_types)?;
        if media.len() < 2 {
            debug!(media = media.len(), "direction needs at least two media items");
            return Ok(None);
        }

        let intent = parse_direction(visual_direction);
        let config = match intent.kind {
            DirectionKind::BeforeAfter => {
                let mut labels = intent.labels.into_iter();
                let options = BeforeAfterOptions {
                    transition_style: intent.transition_style,
                    before_label: labels.next(),
                    after_label: labels.next(),
                    ..Default::default()
                };
                TemplateConfig::BeforeAfter(
                    self.generate_before_after_config(&media, duration_seconds, &options)
                        .await?,
                )
            }
            DirectionKind::Pip => {
                let options = PictureInPictureOptions {
                    position: intent.pip_position,
                    ..Default::default()
                };
                TemplateConfig::PictureInPicture(
                    self.generate_picture_in_picture_config(&media, duration_seconds, &options)
                        .await?,
                )
            }
            DirectionKind::SplitScreen => {
                let (panels, options) = split_panels(&intent, &media);
                TemplateConfig::SplitScreen(
                    self.generate_split_screen_config(panels, duration_seconds, &options)
                        .await?,
                )
            }
            DirectionKind::Unknown => {
                debug!("visual direction matched no compositor template");
                return Ok(None);
            }
        };

        debug!(template = config.kind(), "generated config from direction");
        Ok(Some(config))
    }

    pub async fn generate_stat_counter_config(
        &self,
        stats: &[StatEntity],
        duration_seconds: f64,
        options: &StatCounterOptions,
    ) -> Result<StatCounterConfig> {
        stat_counter::validate(stats)?;
        let base = self
            .base(duration_seconds, options.width, options.height, INFOGRAPHIC_BACKGROUND)
            .await?;
        Ok(stat_counter::build(base, stats, options))
    }

    pub async fn generate_progress_bar_config(
        &self,
        items: &[ProgressEntity],
        duration_seconds: f64,
        options: &ProgressBarOptions,
    ) -> Result<ProgressBarConfig> {
        progress_bar::validate(items)?;
        let base = self
            .base(duration_seconds, options.width, options.height, INFOGRAPHIC_BACKGROUND)
            .await?;
        Ok(progress_bar::build(base, items, options))
    }

    pub async fn generate_process_flow_config(
        &self,
        steps: &[ProcessStepEntity],
        duration_seconds: f64,
        options: &ProcessFlowOptions,
    ) -> Result<ProcessFlowConfig> {
        process_flow::validate(steps)?;
        let base = self
            .base(duration_seconds, options.width, options.height, INFOGRAPHIC_BACKGROUND)
            .await?;
        Ok(process_flow::build(base, steps, options))
    }

    pub async fn generate_split_screen_config(
        &self,
        panels: Vec<PanelDescriptor>,
        duration_seconds: f64,
        options: &SplitScreenOptions,
    ) -> Result<SplitScreenConfig> {
        split_screen::validate(&panels)?;
        let base = self
            .base(duration_seconds, options.width, options.height, COMPOSITOR_BACKGROUND)
            .await?;
        Ok(split_screen::build(base, panels, options))
    }

    pub async fn generate_before_after_config(
        &self,
        media: &[MediaItem],
        duration_seconds: f64,
        options: &BeforeAfterOptions,
    ) -> Result<BeforeAfterConfig> {
        let (before, after) = media_pair(media)?;
        let base = self
            .base(duration_seconds, options.width, options.height, COMPOSITOR_BACKGROUND)
            .await?;
        Ok(before_after::build(base, before, after, options))
    }

    pub async fn generate_picture_in_picture_config(
        &self,
        media: &[MediaItem],
        duration_seconds: f64,
        options: &PictureInPictureOptions,
    ) -> Result<PictureInPictureConfig> {
        let (main, inset) = media_pair(media)?;
        let base = self
            .base(duration_seconds, options.width, options.height, COMPOSITOR_BACKGROUND)
            .await?;
        Ok(picture_in_picture::build(base, main, inset, options))
    }

    /// Validates duration and canvas, then resolves brand colours.
    async fn base(
        &self,
        duration_seconds: f64,
        width: Option<u32>,
        height: Option<u32>,
        background_color: &str,
    ) -> Result<ConfigBase> {
        validate_duration(duration_seconds)?;
        let canvas = self.canvas.with_overrides(width, height);
        canvas.validate()?;
        let colors = self.brand.colors().await;
        Ok(ConfigBase::new(duration_seconds, canvas, background_color, colors))
    }
}

/// Panels for a split-screen direction: never more than the media supplied.
fn split_panels(
    intent: &DirectionIntent,
    media: &[MediaItem],
) -> (Vec<PanelDescriptor>, SplitScreenOptions) {
    let panel_count = intent.panel_count.min(media.len()).max(2);
    let layout = match intent.layout {
        Some(layout) if panel_count == intent.panel_count => layout,
        layout => SplitLayout::for_panels(
            panel_count,
            layout.is_some_and(SplitLayout::is_vertical),
            false,
        ),
    };

    let panels = media
        .iter()
        .take(panel_count)
        .enumerate()
        .map(|(index, item)| {
            PanelDescriptor::new(item).with_label(intent.labels.get(index).map(String::as_str))
        })
        .collect();
    let options = SplitScreenOptions {
        layout: Some(layout),
        ..Default::default()
    };
    (panels, options)
}
