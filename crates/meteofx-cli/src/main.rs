mod commands;
mod format;

use std::path::PathBuf;

use argh::FromArgs;
use meteofx_core::{init_tracing, Config};
use meteofx_services::{ApiClient, FileStore, LocalStore};

use commands::Command;

/// meteofx command line client
#[derive(FromArgs)]
struct Args {
    /// path to a config file (defaults to the user config directory)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// meteofx API base URL, overriding the config file
    #[argh(option)]
    api_url: Option<String>,

    #[argh(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let (mut config, validation) = Config::load_validated(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.client.api_url = url;
    }

    init_tracing(config.server.log_format);
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let client = ApiClient::from_config(&config.client)?;
    let store = LocalStore::new(FileStore::open(config.storage.data_dir.clone())?);

    commands::run(args.command, &client, &store).await
}
