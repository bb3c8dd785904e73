use auth::{ApiCredentials, AuthError};
use common::ApiConfig;
use connector_ripio::{ConnectorError, PrivateStream};
use ripio_rest::{NewOrder, OrderQuery, OrderSide, RipioRestClient, RipioRestError, WithdrawalQuery};
use rust_decimal::Decimal;
use serde::Serialize;
use std::process::ExitCode;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info};

const USAGE: &str = "usage: ripio-runner <command>

commands:
  balances
  orders <pair>
  book <pair> [limit]
  withdrawals [currency]
  withdrawal-fee <currency>
  order-cycle <pair> <amount> <price>
  stream";

#[derive(Debug, Error)]
enum RunnerError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Rest(#[from] RipioRestError),

    #[error(transparent)]
    Stream(#[from] ConnectorError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, PartialEq)]
enum Command {
    Balances,
    Orders { pair: String },
    Book { pair: String, limit: Option<u32> },
    Withdrawals { currency: Option<String> },
    WithdrawalFee { currency: String },
    OrderCycle { pair: String, amount: Decimal, price: Decimal },
    Stream,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, RunnerError> {
        let arg = |i: usize, name: &str| {
            args.get(i)
                .cloned()
                .ok_or_else(|| RunnerError::Usage(format!("missing <{}>\n\n{}", name, USAGE)))
        };
        let decimal = |i: usize, name: &str| {
            let raw = arg(i, name)?;
            Decimal::from_str(&raw)
                .map_err(|e| RunnerError::Usage(format!("invalid <{}> '{}': {}", name, raw, e)))
        };

        match args.first().map(String::as_str) {
            Some("balances") => Ok(Self::Balances),
            Some("orders") => Ok(Self::Orders {
                pair: arg(1, "pair")?,
            }),
            Some("book") => {
                let limit: Option<u32> = match args.get(2) {
                    Some(raw) => Some(raw.parse().map_err(|_| {
                        RunnerError::Usage(format!("invalid <limit> '{}'", raw))
                    })?),
                    None => None,
                };
                Ok(Self::Book {
                    pair: arg(1, "pair")?,
                    limit,
                })
            }
            Some("withdrawals") => Ok(Self::Withdrawals {
                currency: args.get(1).cloned(),
            }),
            Some("withdrawal-fee") => Ok(Self::WithdrawalFee {
                currency: arg(1, "currency")?,
            }),
            Some("order-cycle") => Ok(Self::OrderCycle {
                pair: arg(1, "pair")?,
                amount: decimal(2, "amount")?,
                price: decimal(3, "price")?,
            }),
            Some("stream") => Ok(Self::Stream),
            Some(other) => Err(RunnerError::Usage(format!(
                "unknown command '{}'\n\n{}",
                other, USAGE
            ))),
            None => Err(RunnerError::Usage(USAGE.to_string())),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), RunnerError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command) -> Result<(), RunnerError> {
    let credentials = ApiCredentials::from_env()?;
    let config = ApiConfig::from_env();
    info!(
        environment = %config.environment(),
        api_key = %credentials.masked_api_key(),
        "Loaded configuration"
    );

    let client = RipioRestClient::with_config(credentials.clone(), config.clone())?;

    match command {
        Command::Balances => print_json(&client.get_balances().await?),
        Command::Orders { pair } => {
            print_json(&client.list_orders(&OrderQuery::for_pair(pair)).await?)
        }
        Command::Book { pair, limit } => {
            print_json(&client.order_book_level2(&pair, limit, None).await?)
        }
        Command::Withdrawals { currency } => {
            let filter = match currency {
                Some(currency) => WithdrawalQuery::for_currency(currency),
                None => WithdrawalQuery::default(),
            };
            print_json(&client.list_withdrawals(&filter).await?)
        }
        Command::WithdrawalFee { currency } => {
            print_json(&client.estimate_withdrawal_fee(&currency).await?)
        }
        Command::OrderCycle {
            pair,
            amount,
            price,
        } => {
            let order = NewOrder::limit(pair, OrderSide::Buy, amount, price).post_only();
            let placed = client.create_order(&order).await?;
            info!(order_id = %placed.id, "Order placed, cancelling");
            print_json(&placed)?;

            let cancelled = client.cancel_order(&placed.id).await?;
            print_json(&cancelled)
        }
        Command::Stream => {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, initiating shutdown");
                    let _ = shutdown_tx.send(true);
                }
            });

            let mut stream = PrivateStream::new(config, credentials).with_shutdown(shutdown_rx);
            let summary = stream
                .run(&client, |update| {
                    println!("{}", update);
                    Ok(())
                })
                .await?;

            info!(
                updates = summary.updates,
                idle_windows = summary.idle_windows,
                reason = ?summary.close_reason,
                "Stream finished"
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    common::init_logging();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args(&["balances"])).unwrap(), Command::Balances);
        assert_eq!(
            Command::parse(&args(&["book", "BTC_USDC", "20"])).unwrap(),
            Command::Book {
                pair: "BTC_USDC".into(),
                limit: Some(20)
            }
        );
        assert_eq!(
            Command::parse(&args(&["withdrawals"])).unwrap(),
            Command::Withdrawals { currency: None }
        );
        assert_eq!(
            Command::parse(&args(&["order-cycle", "USDC_ARS", "10", "1200.5"])).unwrap(),
            Command::OrderCycle {
                pair: "USDC_ARS".into(),
                amount: Decimal::from(10),
                price: Decimal::from_str("1200.5").unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(Command::parse(&[]), Err(RunnerError::Usage(_))));
        assert!(matches!(
            Command::parse(&args(&["orders"])),
            Err(RunnerError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["book", "BTC_USDC", "many"])),
            Err(RunnerError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["order-cycle", "USDC_ARS", "ten", "1"])),
            Err(RunnerError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["transfer"])),
            Err(RunnerError::Usage(_))
        ));
    }
}
