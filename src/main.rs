#![forbid(unsafe_code)]

mod config;
mod gateway;
mod options;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::FutureExt;
use gateway::Gateway;
use options::{Command, Options};
use tokio::signal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = Options::parse();
    init_tracing();

    let config = options.config.resolve()?;
    let remote_schemas = mergegate_loader::load_dir(&config.schema_dir, &config.url_resolver())
        .with_context(|| format!("Failed to load schemas from '{}'.", config.schema_dir.display()))?;
    let gateway = Gateway::new(remote_schemas, &config.merge_options()).context("Failed to merge schemas.")?;

    match options.command {
        Command::Compose => {
            print!("{}", gateway.sdl());
            Ok(())
        },
        Command::Start { port } => {
            let mut bind_addr: SocketAddr = config
                .bind
                .parse()
                .with_context(|| format!("Failed to parse bind addr '{}'", config.bind))?;
            if let Some(port) = port {
                bind_addr.set_port(port);
            }

            for upstream in gateway.upstreams() {
                tracing::info!(service = %upstream.name, url = %upstream.url, "Upstream.");
            }

            let routes = gateway::routes(Arc::new(gateway));
            let (addr, server) =
                warp::serve(routes).bind_with_graceful_shutdown(bind_addr, signal::ctrl_c().map(|_| ()));
            tracing::info!(addr = %addr, "Listening");
            server.await;
            tracing::info!("Server shutdown");
            Ok(())
        },
    }
}
