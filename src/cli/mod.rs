//! Command front end - the line protocol served over stdin or TCP.
//!
//! Each connected client gets its own [`Session`]; sessions share nothing but
//! the database pool. One line in, one response out, until `quit` or EOF.

/// Command handlers (account, search, booking)
pub mod commands;
/// Listing formats
pub mod format;
/// Line parser
pub mod parser;

use crate::{
    config::booking::RetryPolicy,
    core::Session,
    errors::{Error, Result},
};
use parser::Command;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Shared data available to every client session.
pub struct AppData {
    /// Database connection for all store operations
    pub database: DatabaseConnection,
    /// Retry policy for conflicting transactions
    pub retry: RetryPolicy,
}

impl AppData {
    /// Bundles the pool and retry policy shared by all sessions.
    #[must_use]
    pub const fn new(database: DatabaseConnection, retry: RetryPolicy) -> Self {
        Self { database, retry }
    }
}

/// Serves one client until it sends `quit` or closes its input.
pub async fn run_session<R, W>(data: &AppData, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new();
    let mut lines = reader.lines();

    writer.write_all(parser::USAGE.as_bytes()).await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let (response, quit) = match parser::parse(&line) {
            Ok(command) => {
                let quit = command == Command::Quit;
                (commands::execute(data, &mut session, command).await, quit)
            }
            Err(Error::InvalidCommand { message }) => (format!("Error: {message}\n"), false),
            Err(err) => (format!("Error: {err}\n"), false),
        };
        writer.write_all(response.as_bytes()).await?;
        writer.flush().await?;
        if quit {
            break;
        }
    }
    Ok(())
}

/// Runs a single session on stdin/stdout.
pub async fn run_stdio(data: &AppData) -> Result<()> {
    run_session(data, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Accepts TCP clients forever, one task and one session per connection.
#[instrument(skip(data))]
pub async fn serve(data: AppData, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    let data = Arc::new(data);

    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "Client connected");
        let data = Arc::clone(&data);

        tokio::spawn(async move {
            let (reader, writer) = stream.into_split();
            if let Err(e) = run_session(&data, BufReader::new(reader), writer).await {
                warn!(%peer, "Session ended with error: {e}");
            }
            info!(%peer, "Client disconnected");
        });
    }
}

#[cfg(test)]
pub(crate) async fn test_app() -> Result<AppData> {
    let database = crate::test_utils::setup_test_db().await?;
    Ok(AppData::new(database, RetryPolicy::no_retry()))
}
