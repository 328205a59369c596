//! HCA CLI - command line tool for analyzing heat cost allocator readings.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "hca-cli",
    version,
    about = "Heat cost allocator consumption toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: hca_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    hca_cmd::run(cli.command).await
}
