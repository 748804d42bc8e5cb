use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "voidwire", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the OG image and RSS feed endpoints.
    Serve(ServeArgs),
    /// Render one OG card to a PNG file (for previewing a date locally).
    Og(OgArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8787.
    #[arg(long)]
    bind: Option<String>,

    /// Upstream content API base URL.
    #[arg(long)]
    upstream: Option<String>,
}

#[derive(Parser, Debug)]
struct OgArgs {
    /// Calendar date, YYYY-MM-DD.
    #[arg(long)]
    date: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Upstream content API base URL.
    #[arg(long)]
    upstream: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().context("build tokio runtime")?;
    match cli.cmd {
        Command::Serve(args) => runtime.block_on(cmd_serve(args)),
        Command::Og(args) => runtime.block_on(cmd_og(args)),
    }
}

fn base_config() -> voidwire::ServeConfig {
    voidwire::ServeConfig::default().with_env_overrides()
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = base_config();
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(upstream) = args.upstream {
        config.upstream_url = upstream;
    }
    voidwire::server::serve(config).await.map_err(Into::into)
}

async fn cmd_og(args: OgArgs) -> anyhow::Result<()> {
    let mut config = base_config();
    if let Some(upstream) = args.upstream {
        config.upstream_url = upstream;
    }

    let date = chrono::NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .with_context(|| format!("parse date '{}'", args.date))?;
    let date_str = date.format("%Y-%m-%d").to_string();

    let upstream = voidwire::UpstreamClient::new(config.upstream_url.clone())?;
    let fonts = voidwire::FontStore::new(config.font_dirs.clone()).get()?;

    let (reading, ephemeris) = tokio::join!(
        upstream.fetch_reading(&date_str),
        upstream.fetch_ephemeris(&date_str),
    );

    let wheel = voidwire::compose_wheel(&ephemeris.unwrap_or_default());
    let date_label = date.format("%B %-d, %Y").to_string();
    let reading = reading.into_option();
    let ops = voidwire::compose_card(&date_label, reading.as_ref(), wheel);
    let png = voidwire::rasterize_card(&ops, &fonts)?;

    std::fs::write(&args.out, png)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    tracing::info!(out = %args.out.display(), "card written");
    Ok(())
}
