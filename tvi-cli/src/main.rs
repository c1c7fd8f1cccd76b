//! TVI CLI - Command line tool for Sentinel-2 vegetation-index analysis.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tvi-cli",
    version,
    about = "Trnava vegetation-index analysis toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: tvi_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    tvi_cmd::run(cli.command).await
}
