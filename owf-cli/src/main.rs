//! OWF CLI - Command line tool for comparing Orinoquia Water Futures scenarios.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "owf-cli",
    version,
    about = "Orinoquia Water Futures scenario toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: owf_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    owf_cmd::run(cli.command).await
}
