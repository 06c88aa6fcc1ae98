use std::path::PathBuf;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use clap::Parser;

/// In-memory bookshelf catalog served over HTTP
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    /// Directory holding base.toml and {env}.toml
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Overrides server.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load_with(cli.config_dir).with_context(|| "failed to load bookshelf settings")?;
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        "bookshelf bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    bookshelf_app::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
