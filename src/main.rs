use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use url::Url;

use vcr_templates::brand::{BrandBibleSource, FileBrandBible, UnavailableBrandBible};
use vcr_templates::detect::detection_report;
use vcr_templates::error_codes::{envelope_for, exit_code_for, CodedError};
use vcr_templates::media::MediaType;
use vcr_templates::settings::{resolve_settings, EnvSettings, SettingsOverrides};
use vcr_templates::{TemplateConfig, TemplateGenerator};

const LOG_ENV: &str = "VCR_LOG";

#[derive(Debug, Parser)]
#[command(name = "vcr-templates")]
#[command(about = "Turn narration and visual direction into motion graphics template configs")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct GlobalArgs {
    /// Print a machine-readable envelope instead of the bare config.
    #[arg(long, global = true)]
    json: bool,
    /// Brand bible file (JSON or YAML) with a `colors` table.
    #[arg(long, global = true, conflicts_with = "brand_url")]
    brand_file: Option<PathBuf>,
    /// Brand bible endpoint; needs the `remote_brand` feature.
    #[arg(long, global = true)]
    brand_url: Option<String>,
    /// Upper bound on the brand colour lookup [env: VCR_BRAND_TIMEOUT_MS].
    #[arg(long, global = true)]
    brand_timeout_ms: Option<u64>,
    /// Canvas width in pixels [env: VCR_CANVAS_WIDTH].
    #[arg(long, global = true)]
    width: Option<u32>,
    /// Canvas height in pixels [env: VCR_CANVAS_HEIGHT].
    #[arg(long, global = true)]
    height: Option<u32>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pick an infographic template from spoken narration.
    Narration {
        text: String,
        #[arg(short = 'd', long)]
        duration: f64,
    },
    /// Pick a compositor template from a visual direction and media list.
    Direction {
        text: String,
        #[arg(short = 'd', long)]
        duration: f64,
        /// Media URL; repeat once per panel.
        #[arg(long = "media")]
        media: Vec<String>,
        /// `image` or `video`; one per --media, in the same order.
        #[arg(long = "media-type")]
        media_types: Vec<String>,
    },
    /// Show the detected narration template and every parsed entity list.
    Detect { text: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.globals.json;
    if let Err(error) = run(cli).await {
        report_error(&error, json);
        std::process::exit(exit_code_for(&error));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let Cli { globals, command } = cli;

    let config = match command {
        Commands::Detect { text } => {
            let report = detection_report(&text);
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        Commands::Narration { text, duration } => {
            build_generator(&globals)?
                .generate_from_narration(&text, duration)
                .await?
        }
        Commands::Direction {
            text,
            duration,
            media,
            media_types,
        } => {
            let media_types = media_types
                .iter()
                .map(|value| value.parse::<MediaType>())
                .collect::<Result<Vec<_>>>()?;
            build_generator(&globals)?
                .generate_from_direction(&text, &media, &media_types, duration)
                .await?
        }
    };

    print_config(config.as_ref(), globals.json)
}

fn build_generator(globals: &GlobalArgs) -> Result<TemplateGenerator> {
    let overrides = SettingsOverrides {
        brand_timeout_ms: globals.brand_timeout_ms,
        width: globals.width,
        height: globals.height,
    };
    let settings = resolve_settings(&overrides, &EnvSettings::from_process_env())?;
    let source = brand_source(globals.brand_file.clone(), globals.brand_url.as_deref())?;
    Ok(TemplateGenerator::with_settings(source, &settings))
}

fn print_config(config: Option<&TemplateConfig>, json: bool) -> Result<()> {
    if !json {
        match config {
            Some(config) => println!("{}", config.to_json_pretty()?),
            None => println!("null"),
        }
        return Ok(());
    }

    let payload = match config {
        Some(config) => json!({
            "ok": true,
            "template": config.kind(),
            "fingerprint": config.fingerprint()?,
            "config": config,
        }),
        None => json!({ "ok": true, "template": null, "config": null }),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn brand_source(
    brand_file: Option<PathBuf>,
    brand_url: Option<&str>,
) -> Result<Arc<dyn BrandBibleSource>> {
    if let Some(path) = brand_file {
        return Ok(Arc::new(FileBrandBible::new(path)));
    }
    let Some(raw) = brand_url else {
        return Ok(Arc::new(UnavailableBrandBible));
    };

    let url = Url::parse(raw).map_err(|error| {
        anyhow!(CodedError::usage(
            "INVALID_BRAND_URL",
            format!("brand url '{raw}' is not valid: {error}"),
        ))
    })?;
    remote_brand_source(url)
}

#[cfg(feature = "remote_brand")]
fn remote_brand_source(url: Url) -> Result<Arc<dyn BrandBibleSource>> {
    use anyhow::Context;
    use vcr_templates::brand::HttpBrandBible;

    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .context("failed to create HTTP client")?;
    Ok(Arc::new(HttpBrandBible::new(http, url)))
}

#[cfg(not(feature = "remote_brand"))]
fn remote_brand_source(url: Url) -> Result<Arc<dyn BrandBibleSource>> {
    Err(anyhow!(CodedError::usage(
        "FEATURE_DISABLED",
        format!("--brand-url {url} needs a build with the remote_brand feature"),
    )))
}

fn report_error(error: &anyhow::Error, json: bool) {
    if json {
        match serde_json::to_string_pretty(&envelope_for(error)) {
            Ok(body) => println!("{body}"),
            Err(_) => eprintln!("{error:#}"),
        }
    } else {
        eprintln!("error: {error:#}");
    }
}
