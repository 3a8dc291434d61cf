//! Subcommands of the `meteofx` binary.

mod convert;
mod lists;
mod weather;

use argh::FromArgs;
use meteofx_services::{ApiClient, LocalStore};

pub use convert::{ConvertArgs, RatesArgs};
pub use lists::{FavoriteArgs, FavoritesArgs, HistoryArgs, SearchesArgs};
pub use weather::WeatherArgs;

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Convert(ConvertArgs),
    Rates(RatesArgs),
    History(HistoryArgs),
    Favorite(FavoriteArgs),
    Favorites(FavoritesArgs),
    Weather(WeatherArgs),
    Searches(SearchesArgs),
}

pub async fn run(command: Command, client: &ApiClient, store: &LocalStore) -> anyhow::Result<()> {
    match command {
        Command::Convert(args) => convert::convert(args, client, store).await,
        Command::Rates(args) => convert::rates(args, client, store).await,
        Command::History(args) => lists::history(args, store),
        Command::Favorite(args) => lists::toggle_favorite(args, store),
        Command::Favorites(args) => lists::favorites(args, store),
        Command::Weather(args) => weather::weather(args, client, store).await,
        Command::Searches(args) => lists::searches(args, store),
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
