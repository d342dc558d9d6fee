//! Entry point for the decentralized file sharing desktop app.

use clap::Parser;
use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

use fileshare_app::cli::Args;
use fileshare_app::components::App;
use fileshare_app::services::{self, Services};

/// CSS styles embedded at compile time.
const STYLES_CSS: &str = include_str!("../assets/styles.css");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    tracing::info!(
        rpc = %config.rpc_url,
        artifact = %config.artifact_path.display(),
        gateway = %config.gateway_origin,
        "Starting Decentralized File Sharing"
    );

    services::install(Services::from_config(config)?);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title("Decentralized File Sharing")
                        .with_inner_size(LogicalSize::new(1100, 800)),
                )
                .with_custom_head(format!("<style>{}</style>", STYLES_CSS)),
        )
        .launch(App);

    Ok(())
}
