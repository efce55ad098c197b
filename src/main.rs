//! unir binary entrypoint

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli::context::ServerContext;
use cli::serve::run_serve;
use unir::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_config());

    let ctx = ServerContext::from_cli(&cli)?;
    run_serve(ctx).await?;
    Ok(())
}
