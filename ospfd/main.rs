use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ospfd::config::RouterConfig;
use ospfd::router::Router;
use ospfd::sender::Transport;
use ospfd::{capture, log_success, logging};

#[derive(Debug, Parser)]
#[command(version, about = "OSPFv2/OSPFv3 adjacency daemon")]
struct Args {
    /// Router configuration file (YAML).
    #[arg(short, long, default_value = "ospfd.yaml")]
    config: PathBuf,
    /// Log filter used when RUST_LOG is not set.
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let config = RouterConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let areas: BTreeSet<_> = config.interfaces.iter().map(|iface| iface.area).collect();
    let mut router = Router::new(config.router_id, areas.len() > 1);
    for iface in &config.interfaces {
        router
            .add_interface(iface, |inbound| {
                Ok(Box::new(capture::open(iface, inbound)?) as Box<dyn Transport>)
            })
            .with_context(|| format!("starting interface {}", iface.name))?;
    }
    log_success!("router {} running", config.router_id);

    tokio::signal::ctrl_c().await?;
    log_success!("shutting down");
    router.shutdown().await;
    Ok(())
}
