//! Line-oriented console front end.
//!
//! Each input line is one command; results are printed as pretty JSON.
//!
//! ```text
//! recommendations <userId> [page] [pageSize]
//! highvalueusers <value> [page] [pageSize]
//! topproducts <userId>
//! placeorder <userId> <productId> <quantity>
//! export <queryType> [...same arguments as the query]
//! help
//! exit
//! ```

use rust_decimal::Decimal;
use serde_json::json;
use shopfront_core::export::{QueryKind, collect_records, export_to_csv};
use shopfront_core::input::{parse_amount, required_positive};
use shopfront_core::{
    ExportError, ExportQuery, InputError, OrderRequest, PageRequest, StoreError, Storefront,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Threshold used when `highvalueusers` is given no value.
pub const DEFAULT_THRESHOLD: i64 = 1000;

const PROMPT: &str = "shopfront> ";

const HELP: &str = "\
Commands:
  recommendations <userId> [page] [pageSize]   products the user has not ordered
  highvalueusers <value> [page] [pageSize]     users spending more than <value>
  topproducts <userId>                         the user's most ordered product
  placeorder <userId> <productId> <quantity>   place an order
  export <queryType> [args...]                 write <queryType>.csv
  help                                         show this text
  exit                                         quit";

/// Errors reported for a single console command.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The first word is not a command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// An argument is missing or malformed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The store rejected or failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The export could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The result could not be rendered.
    #[error("Failed to render result: {0}")]
    Render(#[from] serde_json::Error),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a read query and print its rows
    Query(ExportQuery),
    /// Place an order
    PlaceOrder(OrderRequest),
    /// Run a read query and write it to CSV
    Export(ExportQuery),
    /// Print the command list
    Help,
    /// Leave the console
    Exit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnknownCommand`] or [`ConsoleError::Input`].
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name {
            "help" => Self::Help,
            "exit" => Self::Exit,
            "placeorder" => Self::PlaceOrder(parse_order(&args)?),
            "export" => {
                let kind: QueryKind = required_positional(&args, 0, "queryType")?.parse()?;
                Self::Export(parse_query(kind, args.get(1..).unwrap_or_default())?)
            }
            other => match other.parse::<QueryKind>() {
                Ok(kind) => Self::Query(parse_query(kind, &args)?),
                Err(_) => return Err(ConsoleError::UnknownCommand(other.to_string())),
            },
        };
        Ok(Some(command))
    }
}

fn required_positional<'a>(
    args: &[&'a str],
    index: usize,
    field: &'static str,
) -> Result<&'a str, InputError> {
    args.get(index).copied().ok_or(InputError::Missing { field })
}

fn parse_page(args: &[&str]) -> Result<PageRequest, InputError> {
    PageRequest::parse(args.first().copied(), args.get(1).copied())
}

fn parse_query(kind: QueryKind, args: &[&str]) -> Result<ExportQuery, InputError> {
    Ok(match kind {
        QueryKind::Recommendations => ExportQuery::Recommendations {
            user_id: required_positive("userId", args.first().copied())?,
            page: parse_page(args.get(1..).unwrap_or_default())?,
        },
        QueryKind::HighValueUsers => ExportQuery::HighValueUsers {
            threshold: match args.first() {
                Some(value) => parse_amount("value", value)?,
                None => Decimal::from(DEFAULT_THRESHOLD),
            },
            page: parse_page(args.get(1..).unwrap_or_default())?,
        },
        QueryKind::TopProducts => ExportQuery::TopProducts {
            user_id: required_positive("userId", args.first().copied())?,
        },
    })
}

fn parse_order(args: &[&str]) -> Result<OrderRequest, InputError> {
    let request = OrderRequest::new(
        required_positive("userId", args.first().copied())?,
        required_positive("productId", args.get(1).copied())?,
        required_positive("quantity", args.get(2).copied())?,
    );
    request.validate()?;
    Ok(request)
}

/// Console session bound to a store and an export directory.
pub struct Console<'a> {
    store: &'a dyn Storefront,
    export_dir: PathBuf,
}

impl<'a> Console<'a> {
    /// Create a console over `store`, exporting into `export_dir`.
    pub fn new(store: &'a dyn Storefront, export_dir: impl AsRef<Path>) -> Self {
        Self {
            store,
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }

    /// Read commands from `input` until `exit` or end of input.
    ///
    /// Command failures are printed and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input or writing output fails.
    pub async fn run<R, W>(&self, mut input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output
            .write_all(b"Shopfront console. Type 'help' for commands.\n")
            .await?;

        let mut line = String::new();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            line.clear();
            if input.read_line(&mut line).await? == 0 {
                break;
            }

            let reply = match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Exit)) => break,
                Ok(Some(command)) => self.execute(command).await,
                Err(err) => Err(err),
            };

            match reply {
                Ok(text) => output.write_all(text.as_bytes()).await?,
                Err(err @ ConsoleError::UnknownCommand(_)) => {
                    output.write_all(err.to_string().as_bytes()).await?;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Command failed");
                    output.write_all(format!("Error: {err}").as_bytes()).await?;
                }
            }
            output.write_all(b"\n").await?;
        }

        output.write_all(b"Goodbye.\n").await?;
        output.flush().await
    }

    /// Execute one command and render its output.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the store or the export fails.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, command: Command) -> Result<String, ConsoleError> {
        match command {
            Command::Query(query) => self.query(query).await,
            Command::PlaceOrder(request) => {
                let placed = self.store.place_order(request).await?;
                Ok(serde_json::to_string_pretty(&json!({
                    "message": "Order placed successfully",
                    "order": placed,
                }))?)
            }
            Command::Export(query) => {
                let records = collect_records(self.store, &query).await?;
                let path = self.export_dir.join(query.file_name());
                let rows = export_to_csv(&records, &path).await?;
                Ok(format!("Exported {rows} rows to {}", path.display()))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Exit => Ok(String::new()),
        }
    }

    async fn query(&self, query: ExportQuery) -> Result<String, ConsoleError> {
        let rendered = match query {
            ExportQuery::Recommendations { user_id, page } => {
                serde_json::to_string_pretty(&self.store.recommendations(user_id, page).await?)
            }
            ExportQuery::HighValueUsers { threshold, page } => {
                serde_json::to_string_pretty(&self.store.high_value_users(threshold, page).await?)
            }
            ExportQuery::TopProducts { user_id } => {
                let top: Vec<_> = self
                    .store
                    .top_product_per_user(user_id)
                    .await?
                    .into_iter()
                    .collect();
                serde_json::to_string_pretty(&top)
            }
        };
        Ok(rendered?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(Command::parse("   \n").unwrap(), None);
    }

    #[test]
    fn query_arguments_default() {
        assert_eq!(
            Command::parse("recommendations 2").unwrap(),
            Some(Command::Query(ExportQuery::Recommendations {
                user_id: 2,
                page: PageRequest::first(),
            }))
        );
        assert_eq!(
            Command::parse("highvalueusers").unwrap(),
            Some(Command::Query(ExportQuery::HighValueUsers {
                threshold: Decimal::from(1000),
                page: PageRequest::first(),
            }))
        );
    }

    #[test]
    fn export_takes_query_arguments() {
        assert_eq!(
            Command::parse("export recommendations 3 2 1").unwrap(),
            Some(Command::Export(ExportQuery::Recommendations {
                user_id: 3,
                page: PageRequest::new(2, 1).unwrap(),
            }))
        );
        assert!(matches!(
            Command::parse("export bestsellers"),
            Err(ConsoleError::Input(InputError::UnknownQueryType(_)))
        ));
        assert!(matches!(
            Command::parse("export"),
            Err(ConsoleError::Input(InputError::Missing { field: "queryType" }))
        ));
    }

    #[test]
    fn placeorder_requires_three_positive_integers() {
        assert_eq!(
            Command::parse("placeorder 1 2 3").unwrap(),
            Some(Command::PlaceOrder(OrderRequest::new(1, 2, 3)))
        );
        assert!(matches!(
            Command::parse("placeorder 1 2"),
            Err(ConsoleError::Input(InputError::Missing { field: "quantity" }))
        ));
        assert!(matches!(
            Command::parse("placeorder 1 x 3"),
            Err(ConsoleError::Input(InputError::NotAnInteger { field: "productId", .. }))
        ));
        assert!(Command::parse("placeorder 1 2 0").is_err());
    }

    #[test]
    fn unknown_commands_are_named() {
        let err = Command::parse("frobnicate 1").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: frobnicate");
    }
}
