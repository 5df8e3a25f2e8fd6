//! Command-line client for billing payment methods.
//!
//! # Usage
//!
//! ```bash
//! # List payment methods of the configured market
//! paymethod list
//!
//! # Register a PayPal agreement, defaulting it
//! paymethod add paypal --params '{"default": true, "description": "main"}'
//!
//! # Delete a payment method, given its record
//! paymethod delete '{"id": 42, "paymentType": "paypal"}'
//!
//! # Configure logging level
//! RUST_LOG=debug paymethod types
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `paymethod.toml`)
//! - `TARGET` - Override the market (`EU`, `CA`, `US`)
//! - `ENDPOINT` - Override the API endpoint
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! A `.env` file in the current directory is loaded first.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use paymethod::iban::{Bic, Iban};
use paymethod::{FetchOptions, Market, Params, PaymentMeanType, RawRecord};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use paymethod_cli::build_service;
use paymethod_cli::config::{CliConfig, DEFAULT_CONFIG_PATH};
use paymethod_cli::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "paymethod", version, about = "Manage billing payment methods")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Market to operate on, overriding the configuration.
    #[arg(long)]
    target: Option<Market>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List payment methods.
    List {
        /// Only list valid bank accounts.
        #[arg(long)]
        only_valid: bool,
        /// Print backend records instead of normalized ones.
        #[arg(long)]
        raw: bool,
    },
    /// List the payment method types that may be registered.
    Types,
    /// Show the payment mean types configured for the market.
    Markets,
    /// Register a payment method.
    Add {
        /// Payment mean type (`bankAccount`, `paypal`, `creditCard`, ...).
        kind: PaymentMeanType,
        /// Creation parameters, as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Edit a payment method.
    Edit {
        /// Payment method record, as JSON.
        record: String,
        /// Fields to update, as a JSON object.
        params: String,
    },
    /// Make a payment method the default one.
    SetDefault {
        /// Payment method record, as JSON.
        record: String,
    },
    /// Answer the validation challenge of a payment method.
    Challenge {
        /// Payment method record, as JSON.
        record: String,
        /// Challenge answer.
        challenge: String,
    },
    /// Delete a payment method.
    Delete {
        /// Payment method record, as JSON.
        record: String,
    },
    /// Check an IBAN, and optionally a BIC, before registering a bank account.
    Iban {
        /// IBAN, spaces allowed.
        iban: String,
        /// BIC of the account's bank.
        #[arg(long)]
        bic: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so that stdout only carries JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (output, code) = match run(cli).await {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            (json!(e.payload()), ExitCode::FAILURE)
        }
    };

    let mut stdout = std::io::stdout().lock();
    match serde_json::to_string_pretty(&output) {
        Ok(text) if writeln!(stdout, "{text}").is_ok() => code,
        _ => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli) -> Result<Value, CliError> {
    let mut config = CliConfig::load_from(&cli.config)?;
    if let Some(target) = cli.target {
        config.target = target;
    }
    tracing::debug!(market = %config.target, endpoint = config.endpoint(), "Loaded configuration");

    let service = build_service(&config)?;

    let value = match cli.command {
        Command::List { only_valid, raw } => {
            let options = FetchOptions::default()
                .with_only_valid(only_valid)
                .with_transform(!raw);
            json!(service.get_payment_methods(options).await?)
        }
        Command::Types => json!(service.get_available_payment_method_types().await?),
        Command::Markets => json!(service.market_entries()),
        Command::Add { kind, params } => {
            service.add_payment_method(kind, parse_params(&params)?).await?
        }
        Command::Edit { record, params } => {
            service
                .edit_payment_method(&parse_record(&record)?, parse_params(&params)?)
                .await?
        }
        Command::SetDefault { record } => {
            service.set_payment_method_as_default(&parse_record(&record)?).await?
        }
        Command::Challenge { record, challenge } => {
            service
                .challenge_payment_method(&parse_record(&record)?, challenge)
                .await?
        }
        Command::Delete { record } => service.delete_payment_method(&parse_record(&record)?).await?,
        Command::Iban { iban, bic } => check_iban(&iban, bic.as_deref())?,
    };

    Ok(value)
}

fn parse_record(input: &str) -> Result<RawRecord, CliError> {
    Ok(serde_json::from_str(input)?)
}

fn parse_params(input: &str) -> Result<Params, CliError> {
    Ok(serde_json::from_str(input)?)
}

fn check_iban(iban: &str, bic: Option<&str>) -> Result<Value, CliError> {
    let iban = Iban::parse(iban)?;
    let mut value = json!({
        "iban": iban.as_str(),
        "country": iban.country(),
        "formatted": iban.formatted(),
    });
    if let Some(bic) = bic {
        let bic = Bic::parse(bic)?;
        value["bic"] = json!({
            "bic": bic.as_str(),
            "bank": bic.bank(),
            "country": bic.country(),
            "branch": bic.branch(),
        });
    }
    Ok(value)
}
