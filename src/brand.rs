use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BRAND_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "#2D5A27".to_owned(),
            secondary: "#D4A574".to_owned(),
            accent: "#8B4513".to_owned(),
            text: "#FFFFFF".to_owned(),
        }
    }
}

impl BrandColors {
    pub fn validate(&self) -> Result<()> {
        for (slot, value) in [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("text", &self.text),
        ] {
            if value.trim().is_empty() {
                bail!("brand colour '{slot}' is empty");
            }
        }
        Ok(())
    }
}

/// The slice of a brand bible this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandBible {
    pub colors: BrandColors,
}

/// External source of brand identity. Implementations may fail or stall;
/// [`BrandColorProvider`] absorbs both.
#[async_trait]
pub trait BrandBibleSource: Send + Sync {
    fn name(&self) -> &str;

    async fn brand_bible(&self) -> Result<BrandBible>;
}

/// Resolves brand colours once per generation call, falling back to the
/// default palette on any failure.
#[derive(Clone)]
pub struct BrandColorProvider {
    source: Arc<dyn BrandBibleSource>,
    timeout: Duration,
}

impl std::fmt::Debug for BrandColorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandColorProvider")
            .field("source", &self.source.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BrandColorProvider {
    pub fn new(source: Arc<dyn BrandBibleSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// A provider that always yields the default palette.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableBrandBible), DEFAULT_BRAND_TIMEOUT)
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn colors(&self) -> BrandColors {
        match self.lookup().await {
            Ok(colors) => {
                debug!(source = self.source.name(), "resolved brand colours");
                colors
            }
            Err(error) => {
                warn!(
                    source = self.source.name(),
                    error = %format!("{error:#}"),
                    "brand colour lookup failed; using default palette"
                );
                BrandColors::default()
            }
        }
    }

    async fn lookup(&self) -> Result<BrandColors> {
        let bible = tokio::time::timeout(self.timeout, self.source.brand_bible())
            .await
            .map_err(|_| anyhow!("timed out after {} ms", self.timeout.as_millis()))??;
        bible.colors.validate()?;
        Ok(bible.colors)
    }
}

/// Fixed in-memory brand bible.
#[derive(Debug, Clone)]
pub struct StaticBrandBible {
    bible: BrandBible,
}

impl StaticBrandBible {
    pub fn new(colors: BrandColors) -> Self {
        Self {
            bible: BrandBible { colors },
        }
    }
}

#[async_trait]
impl BrandBibleSource for StaticBrandBible {
    fn name(&self) -> &str {
        "static"
    }

    async fn brand_bible(&self) -> Result<BrandBible> {
        Ok(self.bible.clone())
    }
}

/// Stands in when no brand source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBrandBible;

#[async_trait]
impl BrandBibleSource for UnavailableBrandBible {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn brand_bible(&self) -> Result<BrandBible> {
        bail!("no brand bible source configured")
    }
}

/// Brand bible stored on disk as JSON or YAML.
#[derive(Debug, Clone)]
pub struct FileBrandBible {
    path: PathBuf,
}

impl FileBrandBible {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BrandBibleSource for FileBrandBible {
    fn name(&self) -> &str {
        "file"
    }

    async fn brand_bible(&self) -> Result<BrandBible> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read brand bible {}", self.path.display()))?;
        // YAML is a superset of JSON, so one parser covers both.
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse brand bible {}", self.path.display()))
    }
}

#[cfg(feature = "remote_brand")]
pub use remote::HttpBrandBible;

#[cfg(feature = "remote_brand")]
mod remote {
    use anyhow::{Context, Result};
    use async_trait::async_trait;
    use reqwest::Client;
    use url::Url;

    use super::{BrandBible, BrandBibleSource};

    /// Brand bible served as JSON over HTTP.
    #[derive(Debug, Clone)]
    pub struct HttpBrandBible {
        http: Client,
        url: Url,
    }

    impl HttpBrandBible {
        pub fn new(http: Client, url: Url) -> Self {
            Self { http, url }
        }
    }

    #[async_trait]
    impl BrandBibleSource for HttpBrandBible {
        fn name(&self) -> &str {
            "http"
        }

        async fn brand_bible(&self) -> Result<BrandBible> {
            self.http
                .get(self.url.clone())
                .send()
                .await
                .context("failed to call brand bible endpoint")?
                .error_for_status()
                .context("brand bible endpoint returned an error status")?
                .json()
                .await
                .context("failed to decode brand bible response")
        }
    }
}
