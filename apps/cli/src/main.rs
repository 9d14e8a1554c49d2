//! # payterm
//!
//! Command-line front end over the terminal engine.
//!
//! ## Usage
//! ```bash
//! payterm validate "4532 0151 1283 0366"
//! payterm fees 1000 --channel chip
//! payterm txn-id --count 3
//! payterm batch 100 250.50 75.30 500 150.25
//! payterm authorize 42.00 --tip 5 --channel tap
//! payterm channels
//!
//! # JSON wire format instead of text
//! payterm --json fees 1000 --channel 1
//!
//! # Explicit config file
//! payterm --config ./payterm.toml authorize 10 --channel manual
//! ```
//!
//! Errors are printed on stderr and exit with status 1.

use clap::{Parser, Subcommand};
use payterm_core::PaymentChannel;
use payterm_engine::dto::{error_json, to_json};
use payterm_engine::{init_tracing, ApiResult, Engine, EngineConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "payterm", author, version, about = "Payment terminal calculation engine", long_about = None)]
struct Cli {
    /// Config file (default: payterm.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the JSON wire format instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a card number (format, length, Luhn) and report its brand
    Validate {
        /// Card number; spaces and hyphens are ignored
        card_number: String,
    },

    /// Fee breakdown for a gross amount
    Fees {
        /// Gross amount in major units (e.g. 1000.00)
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// tap | chip | swipe | manual, or the index 0-3
        #[arg(long, short)]
        channel: PaymentChannel,
    },

    /// Issue transaction ids
    TxnId {
        /// How many ids to issue
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
    },

    /// Statistics over a batch of amounts
    Batch {
        /// Amounts in major units; refunds may be negative
        #[arg(allow_negative_numbers = true)]
        amounts: Vec<f64>,
    },

    /// Run the placeholder authorization step
    Authorize {
        /// Payment amount in major units
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        /// Tip in major units
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        tip: f64,

        /// tap | chip | swipe | manual, or the index 0-3
        #[arg(long, short)]
        channel: PaymentChannel,
    },

    /// List the payment channels and their rates
    Channels,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                println!("{}", error_json(&e));
            }
            eprintln!("error: {}", e.message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> ApiResult<String> {
    let config = EngineConfig::load(cli.config.clone())?;
    init_tracing(Some(&config.logging.filter));

    let engine = Engine::new(config);
    debug!(command = ?cli.command, "Running command");

    execute(&engine, &cli.command, cli.json)
}

/// Runs one command and renders its output.
fn execute(engine: &Engine, command: &Command, json: bool) -> ApiResult<String> {
    let output = match command {
        Command::Validate { card_number } => {
            let outcome = engine.validate_card(card_number);
            if json {
                to_json(&outcome)
            } else {
                let mark = if outcome.is_valid { "valid" } else { "invalid" };
                format!("{} ({}): {}", mark, outcome.brand, outcome.message)
            }
        }

        Command::Fees { amount, channel } => {
            let fees = engine.calculate_fees(*amount, channel.index())?;
            if json {
                to_json(&fees)
            } else {
                [
                    format!("Channel:        {}", channel.description()),
                    format!("Fixed fee:      {:.2}", fees.fixed_fee),
                    format!("Percentage fee: {:.2}", fees.percentage_fee),
                    format!("Total fee:      {:.2}", fees.total_fee),
                    format!("Net amount:     {:.2}", fees.net_amount),
                    format!("Effective rate: {:.2}%", fees.effective_rate),
                ]
                .join("\n")
            }
        }

        Command::TxnId { count } => (0..*count)
            .map(|_| {
                let id = engine.next_transaction_id();
                if json {
                    to_json(&id)
                } else {
                    id.transaction_id
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),

        Command::Batch { amounts } => {
            let summary = engine.aggregate_batch(amounts)?;
            if json {
                to_json(&summary)
            } else {
                [
                    format!("Count:   {}", summary.count),
                    format!("Total:   {:.2}", summary.total),
                    format!("Average: {:.2}", summary.average),
                    format!("Max:     {:.2}", summary.max),
                    format!("Min:     {:.2}", summary.min),
                ]
                .join("\n")
            }
        }

        Command::Authorize {
            amount,
            tip,
            channel,
        } => {
            let outcome = engine.authorize(*amount, *tip, channel.index())?;
            if json {
                to_json(&outcome)
            } else {
                outcome.message
            }
        }

        Command::Channels => {
            let channels = engine.channels();
            if json {
                to_json(&channels)
            } else {
                channels
                    .iter()
                    .map(|c| {
                        format!(
                            "{}  {:<16} {:<18} {:>5.2}% + {:.2}",
                            c.index, c.name, c.description, c.percentage_rate, c.fixed_fee
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use payterm_core::WeightedRiskAssessor;
    use payterm_engine::ErrorCode;

    fn engine() -> Engine {
        Engine::with_assessor(
            EngineConfig::default(),
            Box::new(WeightedRiskAssessor::default()),
        )
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("payterm").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_channel_aliases() {
        let cli = parse(&["fees", "1000", "--channel", "chip"]);
        assert!(matches!(
            cli.command,
            Command::Fees {
                channel: PaymentChannel::ChipEmv,
                ..
            }
        ));

        let cli = parse(&["--json", "authorize", "10", "-c", "3"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Authorize {
                channel: PaymentChannel::ManualEntry,
                ..
            }
        ));

        let bad = Cli::try_parse_from(["payterm", "fees", "10", "--channel", "wave"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_fees_json_output() {
        let cli = parse(&["fees", "1000", "--channel", "chip"]);
        let output = execute(&engine(), &cli.command, true).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["total_fee"], 29.15);
        assert_eq!(json["net_amount"], 970.85);
    }

    #[test]
    fn test_fees_text_output() {
        let cli = parse(&["fees", "1000", "--channel", "chip"]);
        let output = execute(&engine(), &cli.command, false).unwrap();
        assert!(output.contains("Total fee:      29.15"));
        assert!(output.contains("Net amount:     970.85"));
    }

    #[test]
    fn test_batch_output() {
        let cli = parse(&["batch", "100", "250.50", "75.30", "500", "150.25"]);
        let output = execute(&engine(), &cli.command, true).unwrap();
        assert_eq!(
            output,
            r#"{"total":1076.05,"average":215.21,"max":500.0,"min":75.3,"count":5}"#
        );
    }

    #[test]
    fn test_empty_batch_fails() {
        let cli = parse(&["batch"]);
        let err = execute(&engine(), &cli.command, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyBatch);
    }

    #[test]
    fn test_negative_amount_is_parsed_then_rejected() {
        let cli = parse(&["fees", "-5", "--channel", "tap"]);
        let err = execute(&engine(), &cli.command, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_txn_id_count() {
        let cli = parse(&["txn-id", "--count", "3"]);
        let output = execute(&engine(), &cli.command, false).unwrap();
        let ids: Vec<&str> = output.lines().collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.starts_with("TXN-")));
    }

    #[test]
    fn test_validate_text_output() {
        let cli = parse(&["validate", "4532-0151-1283-0366"]);
        let output = execute(&engine(), &cli.command, false).unwrap();
        assert_eq!(output, "valid (Visa): Card number is valid");
    }

    #[test]
    fn test_channels_lists_all() {
        let output = execute(&engine(), &Command::Channels, false).unwrap();
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains("Manual entry"));
    }
}
