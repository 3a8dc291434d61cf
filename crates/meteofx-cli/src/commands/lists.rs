use argh::FromArgs;
use meteofx_currency::sanitize_currency_code;
use meteofx_services::LocalStore;

use super::print_lines;
use crate::format;

/// Show recent conversions
#[derive(FromArgs)]
#[argh(subcommand, name = "history")]
pub struct HistoryArgs {
    /// clear the conversion history
    #[argh(switch)]
    clear: bool,
}

/// Add or remove a favorite currency
#[derive(FromArgs)]
#[argh(subcommand, name = "favorite")]
pub struct FavoriteArgs {
    /// currency code, e.g. "EUR"
    #[argh(positional)]
    code: String,
}

/// Show favorite currencies
#[derive(FromArgs)]
#[argh(subcommand, name = "favorites")]
pub struct FavoritesArgs {
    /// clear all favorites
    #[argh(switch)]
    clear: bool,
}

/// Show recent weather searches
#[derive(FromArgs)]
#[argh(subcommand, name = "searches")]
pub struct SearchesArgs {
    /// clear the search history
    #[argh(switch)]
    clear: bool,
}

pub fn history(args: HistoryArgs, store: &LocalStore) -> anyhow::Result<()> {
    if args.clear {
        store.clear_conversion_history()?;
        println!("Conversion history cleared");
        return Ok(());
    }

    let history = store.conversion_history();
    if history.is_empty() {
        println!("No conversions yet");
    } else {
        print_lines(&format::history_lines(&history));
    }
    Ok(())
}

pub fn toggle_favorite(args: FavoriteArgs, store: &LocalStore) -> anyhow::Result<()> {
    let code = sanitize_currency_code(&args.code)?;
    let favorites = store.toggle_favorite(&code)?;
    println!("Favorites: {}", favorites_summary(&favorites));
    Ok(())
}

pub fn favorites(args: FavoritesArgs, store: &LocalStore) -> anyhow::Result<()> {
    if args.clear {
        store.clear_favorites()?;
        println!("Favorites cleared");
        return Ok(());
    }

    println!("{}", favorites_summary(&store.favorite_currencies()));
    Ok(())
}

pub fn searches(args: SearchesArgs, store: &LocalStore) -> anyhow::Result<()> {
    if args.clear {
        store.clear_search_history()?;
        println!("Search history cleared");
        return Ok(());
    }

    let history = store.search_history();
    if history.is_empty() {
        println!("No recent searches");
    } else {
        print_lines(&format::search_lines(&history));
    }
    Ok(())
}

fn favorites_summary(favorites: &[String]) -> String {
    if favorites.is_empty() {
        "(none)".to_string()
    } else {
        favorites.join(", ")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use meteofx_services::MemoryStore;

    #[test]
    fn test_favorites_summary() {
        assert_eq!(favorites_summary(&[]), "(none)");
        assert_eq!(
            favorites_summary(&["EUR".to_string(), "JPY".to_string()]),
            "EUR, JPY"
        );
    }

    #[test]
    fn test_toggle_and_clear() {
        let store = LocalStore::new(MemoryStore::new());

        toggle_favorite(FavoriteArgs { code: "eur".into() }, &store).unwrap();
        assert_eq!(store.favorite_currencies(), vec!["EUR".to_string()]);

        favorites(FavoritesArgs { clear: true }, &store).unwrap();
        assert!(store.favorite_currencies().is_empty());
    }
}
