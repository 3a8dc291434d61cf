use argh::FromArgs;
use meteofx_services::{ApiClient, LocalStore};
use meteofx_weather::upcoming_days;

use super::print_lines;
use crate::format;

const FORECAST_DAYS: usize = 5;

/// Show the current weather and a 5-day forecast for a place
#[derive(FromArgs)]
#[argh(subcommand, name = "weather")]
pub struct WeatherArgs {
    /// place name or code, e.g. "Vilnius"
    #[argh(positional)]
    query: Vec<String>,
}

pub async fn weather(args: WeatherArgs, client: &ApiClient, store: &LocalStore) -> anyhow::Result<()> {
    let query = args.query.join(" ");
    if query.trim().is_empty() {
        anyhow::bail!("Place name is required");
    }

    let lookup = client.lookup_weather(&query, store).await?;
    let forecast = &lookup.forecast;

    let Some(current) = forecast.forecast_timestamps.first() else {
        println!("No forecast data for {}", forecast.place.name);
        return Ok(());
    };
    print_lines(&format::current_weather_lines(&forecast.place.name, current));

    let days = upcoming_days(&forecast.forecast_timestamps, FORECAST_DAYS);
    if !days.is_empty() {
        println!();
        println!("{}-day forecast", FORECAST_DAYS);
        for (date, ts) in days {
            println!("{}", format::daily_line(date, ts));
        }
    }
    Ok(())
}
