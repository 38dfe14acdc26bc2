use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tempfile::tempdir;

use vcr_templates::brand::{
    BrandBible, BrandBibleSource, BrandColorProvider, BrandColors, FileBrandBible,
};
use vcr_templates::entities::StatEntity;
use vcr_templates::templates::Canvas;
use vcr_templates::TemplateGenerator;

struct ThrowingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl BrandBibleSource for ThrowingSource {
    fn name(&self) -> &str {
        "throwing"
    }

    async fn brand_bible(&self) -> Result<BrandBible> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        bail!("brand service is down")
    }
}

struct StallingSource;

#[async_trait]
impl BrandBibleSource for StallingSource {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn brand_bible(&self) -> Result<BrandBible> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        bail!("unreachable after the timeout")
    }
}

fn stats() -> Vec<StatEntity> {
    vec![StatEntity {
        value: 2_000_000.0,
        label: "Revenue".to_owned(),
        prefix: "$".to_owned(),
        suffix: "M".to_owned(),
        display_value: Some("$2M".to_owned()),
    }]
}

#[tokio::test]
async fn throwing_provider_still_builds_a_complete_stat_counter() {
    let source = Arc::new(ThrowingSource {
        calls: AtomicUsize::new(0),
    });
    let generator = TemplateGenerator::new(
        BrandColorProvider::new(source.clone(), Duration::from_secs(1)),
        Canvas::default(),
    );

    let config = generator
        .generate_stat_counter_config(&stats(), 5.0, &Default::default())
        .await
        .expect("brand failures never surface");
    assert_eq!(config.base.brand_colors, BrandColors::default());
    assert_eq!(config.stats[0].color, "#2D5A27");
    assert_eq!((config.base.width, config.base.height), (1920, 1080));

    generator
        .generate_stat_counter_config(&stats(), 5.0, &Default::default())
        .await
        .expect("second call succeeds");
    assert_eq!(source.calls.load(Ordering::SeqCst), 2, "one lookup per call, no retries");
}

#[tokio::test]
async fn stalled_lookup_is_bounded_by_the_timeout() {
    let provider = BrandColorProvider::new(Arc::new(StallingSource), Duration::from_millis(50));
    let colors = tokio::time::timeout(Duration::from_secs(5), provider.colors())
        .await
        .expect("lookup should give up well before five seconds");
    assert_eq!(colors, BrandColors::default());
}

#[tokio::test]
async fn yaml_brand_file_supplies_colours() {
    let dir = tempdir().expect("tempdir should create");
    let path = dir.path().join("brand.yaml");
    fs::write(
        &path,
        "colors:\n  primary: \"#112233\"\n  secondary: \"#445566\"\n  accent: \"#778899\"\n  text: \"#000000\"\n",
    )
    .expect("brand file should write");

    let provider = BrandColorProvider::new(
        Arc::new(FileBrandBible::new(&path)),
        Duration::from_secs(1),
    );
    let colors = provider.colors().await;
    assert_eq!(colors.primary, "#112233");
    assert_eq!(colors.text, "#000000");
}

#[tokio::test]
async fn json_brand_file_supplies_colours() {
    let dir = tempdir().expect("tempdir should create");
    let path = dir.path().join("brand.json");
    fs::write(
        &path,
        r##"{"colors":{"primary":"#0A0A0A","secondary":"#0B0B0B","accent":"#0C0C0C","text":"#0D0D0D"}}"##,
    )
    .expect("brand file should write");

    let provider = BrandColorProvider::new(
        Arc::new(FileBrandBible::new(&path)),
        Duration::from_secs(1),
    );
    assert_eq!(provider.colors().await.secondary, "#0B0B0B");
}

#[tokio::test]
async fn malformed_or_missing_brand_files_fall_back() {
    let dir = tempdir().expect("tempdir should create");
    let malformed = dir.path().join("brand.yaml");
    fs::write(&malformed, "colors:\n  primary: \"#112233\"\n").expect("brand file should write");

    for path in [malformed, dir.path().join("missing.yaml")] {
        let provider = BrandColorProvider::new(
            Arc::new(FileBrandBible::new(&path)),
            Duration::from_secs(1),
        );
        assert_eq!(provider.colors().await, BrandColors::default(), "{}", path.display());
    }
}
