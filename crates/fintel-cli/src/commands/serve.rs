//! Serve command - start the browser dashboard.

use clap::Args;
use console::style;
use std::net::SocketAddr;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides the config file)
    #[arg(short, long)]
    addr: Option<SocketAddr>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let addr = match args.addr {
        Some(addr) => addr,
        None => config.server.bind_addr.parse()?,
    };

    println!(
        "{} Dashboard available at {}",
        style("ℹ").blue(),
        style(format!("http://{addr}")).bold()
    );

    fintel_server::start_server(addr, config).await
}
