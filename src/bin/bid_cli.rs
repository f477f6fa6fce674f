//! Menu-driven CLI for browsing bids held in the index.
//!
//! Usage:
//!   bid_cli [csv_path [bid_key]]
//!
//! The bid key is the id used by the Find and Remove menu entries.
//! Set `RUST_LOG` (e.g. `RUST_LOG=bid_index=debug`) for diagnostics.

use bid_index::{CsvLayout, Index, IndexConfig, Record};
use std::env;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_CSV_PATH: &str = "eBid_Monthly_Sales_Dec_2016.csv";
const DEFAULT_BID_KEY: &str = "98188";

/// Command line settings
struct CliConfig {
    csv_path: String,
    bid_key: String,
}

impl CliConfig {
    fn from_args(args: &[String]) -> Self {
        Self {
            csv_path: args
                .get(1)
                .cloned()
                .unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
            bid_key: args
                .get(2)
                .cloned()
                .unwrap_or_else(|| DEFAULT_BID_KEY.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Load,
    Display,
    Find,
    Remove,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Load),
            "2" => Some(Self::Display),
            "3" => Some(Self::Find),
            "4" => Some(Self::Remove),
            "9" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = CliConfig::from_args(&args);
    let index = Index::new(IndexConfig::default());
    let layout = CsvLayout::default();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();

        let choice = match lines.next() {
            Some(Ok(line)) => Choice::parse(&line),
            Some(Err(e)) => {
                eprintln!("ERROR: Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        match choice {
            Some(Choice::Load) => {
                println!("Loading CSV file {}", config.csv_path);
                let start = Instant::now();
                match index.load_csv(&config.csv_path, &layout) {
                    Ok(report) => {
                        println!("{}", report.header.join(" | "));
                        println!("{} bids read", report.loaded + report.replaced);
                        if report.skipped > 0 {
                            println!("{} rows skipped", report.skipped);
                        }
                    }
                    Err(e) => eprintln!("ERROR: {}", e),
                }
                print_elapsed(start.elapsed());
            }

            Some(Choice::Display) => {
                for bid in index.records() {
                    display_bid(&bid);
                }
            }

            Some(Choice::Find) => {
                let start = Instant::now();
                let found = index.find(&config.bid_key);
                let elapsed = start.elapsed();

                match found {
                    Some(bid) => display_bid(&bid),
                    None => println!("Bid Id {} not found.", config.bid_key),
                }
                print_elapsed(elapsed);
            }

            Some(Choice::Remove) => match index.remove(&config.bid_key) {
                Some(bid) => println!("Removed {}", bid.id),
                None => println!("Bid Id {} not found.", config.bid_key),
            },

            Some(Choice::Exit) => break,

            None => println!("Invalid choice"),
        }
    }

    println!("Good bye.");
}

fn print_menu() {
    println!("Menu:");
    println!("  1. Load Bids");
    println!("  2. Display All Bids");
    println!("  3. Find Bid");
    println!("  4. Remove Bid");
    println!("  9. Exit");
    print!("Enter choice: ");
    let _ = io::stdout().flush();
}

fn display_bid(bid: &Record) {
    println!("{}", bid);
}

fn print_elapsed(elapsed: Duration) {
    println!("time: {:?}", elapsed);
    println!("time: {} seconds", elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_defaults() {
        let config = CliConfig::from_args(&["bid_cli".to_string()]);
        assert_eq!(config.csv_path, DEFAULT_CSV_PATH);
        assert_eq!(config.bid_key, DEFAULT_BID_KEY);

        let args: Vec<String> = ["bid_cli", "bids.csv", "1234"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = CliConfig::from_args(&args);
        assert_eq!(config.csv_path, "bids.csv");
        assert_eq!(config.bid_key, "1234");
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse(" 1\n"), Some(Choice::Load));
        assert_eq!(Choice::parse("9"), Some(Choice::Exit));
        assert_eq!(Choice::parse("5"), None);
        assert_eq!(Choice::parse("abc"), None);
    }
}
