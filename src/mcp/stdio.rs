//! Line-delimited MCP transport.
//!
//! Every request runs on its own task, so a slow backend call never holds up
//! the requests read after it. Responses are written by a single task in
//! completion order, one JSON document per line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

/// Serves requests from `reader` until EOF, then waits for in-flight
/// requests to be answered.
pub async fn serve<R, W>(reader: R, writer: W, state: AppState) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<Response>();
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("Received: {}", line);

        match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let state = state.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = handle_mcp_request(request, state).await {
                        // the writer only goes away after a failed write
                        let _ = tx.send(response);
                    }
                });
            }
            Err(parse_error) => {
                error!("JSON parse error: {}", parse_error);
                let _ = tx.send(Response::error(
                    serde_json::Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", parse_error),
                ));
            }
        }
    }

    info!("EOF received, waiting for in-flight requests");
    drop(tx);
    match writer_task.await {
        Ok(result) => result,
        Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
    }
}

async fn write_responses<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<Response>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let response_json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                continue;
            }
        };
        debug!("Sending: {}", response_json);
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
