// src/main.rs — collapser entry point

use clap::Parser;

use collapser::cli::Cli;
use collapser::infra::config::Config;
use collapser::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging (respects COLLAPSER_LOG)
    logger::init_logging(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    collapser::cli::chain::run_chain(cli, &config).await
}
