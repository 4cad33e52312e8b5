use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use radarloop::{HttpImageSource, RadarLoop, registry, timing};

/// Fetch BOM radar imagery and write an animated loop GIF.
#[derive(Parser, Debug)]
#[command(name = "radarloop", version)]
struct Cli {
    /// Radar location name, e.g. "Sydney" (unknown names list the supported set).
    #[arg(long)]
    location: String,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// Keep running, rewriting the loop at each refresh interval.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let site = registry::lookup(&cli.location)?;
    let source = Arc::new(HttpImageSource::with_timeout(Duration::from_secs(
        cli.timeout_secs,
    ))?);
    let radar = RadarLoop::new(site, source);

    loop {
        let bytes = radar.get_loop().await;
        if let Some(parent) = cli.out.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        tokio::fs::write(&cli.out, &bytes)
            .await
            .with_context(|| format!("write gif '{}'", cli.out.display()))?;
        eprintln!("wrote {} ({} bytes)", cli.out.display(), bytes.len());

        if !cli.watch {
            return Ok(());
        }
        let wait = timing::seconds_until_next(chrono::Utc::now().timestamp(), site.delta);
        tokio::time::sleep(Duration::from_secs(wait)).await;
    }
}
