use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::sync::watch;

use crate::args::ServeArgs;
use crate::config::{apply_config, load_config};
use crate::domain::Snapshot;
use crate::error::{AppError, AppResult, ProtocolError, ValidationError};
use crate::page::{HostPage, load_fixture};
use crate::protocol::{Response, dispatch, read_request, send_response};
use crate::session::Session;

/// Runs the stdio command loop until stdin closes or Ctrl+C.
pub(crate) async fn run_serve(args: &ServeArgs) -> AppResult<()> {
    let Some(page_path) = args.page.as_deref() else {
        tracing::error!("Missing page fixture (set --page or TIMESTAMPER_PAGE).");
        return Err(AppError::validation(ValidationError::MissingPage));
    };
    let config = load_config(args.config.as_deref())?;
    let runtime = apply_config(args, config.as_ref())?;
    let page: Arc<dyn HostPage> = Arc::new(load_fixture(Path::new(page_path))?);
    tracing::info!("Serving page {}", page.location());

    let session = Session::new(page, runtime.settings, runtime.retry);
    let watcher = tokio::spawn(log_updates(session.subscribe()));

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    let result = tokio::select! {
        result = serve_stream(&session, &mut reader, &mut writer) => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Interrupted; shutting down");
            Ok(())
        }
    };

    session.shutdown();
    watcher.abort();
    result
}

/// Answers one response line per request line until the reader is exhausted.
///
/// Malformed lines get an `{error}` reply and the loop continues.
///
/// # Errors
///
/// Returns an error when reading or writing the stream itself fails.
pub(crate) async fn serve_stream<R, W>(
    session: &Session,
    reader: &mut R,
    writer: &mut W,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let response = match read_request(reader).await {
            Ok(Some(request)) => dispatch(session, request).await,
            Ok(None) => break,
            Err(AppError::Protocol(err)) if !matches!(err, ProtocolError::Io { .. }) => {
                tracing::warn!("Rejected request: {}", err);
                Response::error(err)
            }
            Err(err) => return Err(err),
        };
        send_response(writer, &response).await?;
    }
    tracing::debug!("Input closed");
    Ok(())
}

async fn log_updates(mut updates: watch::Receiver<Snapshot>) {
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        tracing::debug!(
            "Cache revision {}: {} timestamp(s) for '{}'",
            snapshot.revision,
            snapshot.timestamps.len(),
            snapshot.video_key
        );
    }
}
