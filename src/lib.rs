//! Turns narration and visual-direction text into frame-accurate motion
//! graphics template configs.

pub mod brand;
pub mod detect;
pub mod direction;
pub mod entities;
pub mod error_codes;
pub mod generator;
pub mod media;
pub mod settings;
pub mod templates;
pub mod timing;

pub use brand::{BrandBible, BrandBibleSource, BrandColorProvider, BrandColors};
pub use detect::{detect_type, NarrationTemplate};
pub use direction::{parse_direction, DirectionIntent, DirectionKind};
pub use entities::{parse_progress, parse_stats, parse_steps};
pub use generator::TemplateGenerator;
pub use media::{MediaType, PanelDescriptor};
pub use templates::TemplateConfig;
