use anyhow::Context;
use argh::FromArgs;
use meteofx_services::{ApiClient, ConverterSession, LocalStore};

use super::print_lines;
use crate::format;

/// Convert an amount between two currencies
#[derive(FromArgs)]
#[argh(subcommand, name = "convert")]
pub struct ConvertArgs {
    /// amount to convert (default: 1)
    #[argh(positional)]
    amount: Option<String>,

    /// source currency code (default: USD)
    #[argh(option, short = 'f')]
    from: Option<String>,

    /// target currency code (default: EUR)
    #[argh(option, short = 't')]
    to: Option<String>,

    /// shareable query string, e.g. "amount=50&from=GBP&to=JPY"
    #[argh(option, short = 'q')]
    query: Option<String>,

    /// repeat the conversion at this position in the history (1 = newest)
    #[argh(option)]
    repeat: Option<usize>,

    /// swap the source and target currencies
    #[argh(switch, short = 's')]
    swap: bool,

    /// print the shareable query string for the conversion
    #[argh(switch)]
    share: bool,
}

/// Show the latest exchange rates
#[derive(FromArgs)]
#[argh(subcommand, name = "rates")]
pub struct RatesArgs {}

fn build_session(args: &ConvertArgs, store: &LocalStore) -> anyhow::Result<ConverterSession> {
    let mut session = ConverterSession::new();

    if let Some(position) = args.repeat {
        let history = store.conversion_history();
        let record = position
            .checked_sub(1)
            .and_then(|i| history.get(i))
            .with_context(|| format!("No conversion at history position {}", position))?;
        session.load_from_history(record);
    }

    if let Some(query) = &args.query {
        session.apply_query_string(query);
    }

    if let Some(amount) = &args.amount {
        session.set_amount(amount.as_str());
    }
    if let Some(from) = &args.from {
        session.set_from(from)?;
    }
    if let Some(to) = &args.to {
        session.set_to(to)?;
    }
    if args.swap {
        session.swap();
    }

    Ok(session)
}

pub async fn convert(args: ConvertArgs, client: &ApiClient, store: &LocalStore) -> anyhow::Result<()> {
    let session = build_session(&args, store)?;
    let rates = client.rates().await?;
    let record = session.convert(&rates, store)?;

    println!("{}", format::conversion_line(&record));
    println!("{}", format::rate_line(&record));
    if args.share {
        println!("?{}", session.to_query_string());
    }
    Ok(())
}

pub async fn rates(_args: RatesArgs, client: &ApiClient, store: &LocalStore) -> anyhow::Result<()> {
    let rates = client.rates().await?;
    print_lines(&format::rates_lines(&rates, &store.favorite_currencies()));
    Ok(())
}
