use std::path::PathBuf;

use argh::FromArgs;
use meteofx_core::{init_tracing, Config};
use meteofx_server::{app_router, build_state, scheduler};

/// meteofx HTTP server
#[derive(FromArgs)]
struct Args {
    /// path to a config file (defaults to the user config directory)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// address to listen on, overriding the config file
    #[argh(option)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let (mut config, validation) = Config::load_validated(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }

    init_tracing(config.server.log_format);
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let state = build_state(&config)?;
    scheduler::start_rate_limit_purge(state.clone());

    let router = app_router(state);
    tracing::info!("Listening on {}", config.server.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
