use std::path::PathBuf;

use clap::Args;
use energyai_core::site::start_server;
use energyai_core::Config;

#[derive(Args)]
pub struct ServeArgs {
    /// Directory to serve (defaults to server.root, then the working directory)
    #[arg(long)]
    root: Option<PathBuf>,
    /// Address to bind (defaults to server.host)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (defaults to server.port)
    #[arg(short, long)]
    port: Option<u16>,
}

pub fn run(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let root = args
        .root
        .or(config.server.root)
        .unwrap_or_else(|| PathBuf::from("."));
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);

    println!("Course site running at http://{host}:{port}/ (Ctrl+C to stop)");
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(start_server(&host, port, root))?;
    Ok(())
}
