// crates/matchmaking-server/src/client.rs
// Handles BOTH CSV and JSON line protocols

use matchmaking_core::{Request, Response};
use matchmaking_protocol::csv_codec;
use matchmaking_protocol::json_codec;
use matchmaking_protocol::Protocol;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::types::{ClientId, ClientRegistry, EngineRequest, EngineTx, OutboundRx};

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    engine_tx: EngineTx,
    out_rx: OutboundRx,
    clients: ClientRegistry,
) -> anyhow::Result<()> {
    let (mut read_stream, write_stream) = stream.into_split();

    // Detect protocol by peeking at the first byte.
    let mut first_byte = [0u8; 1];
    let protocol = match read_stream.peek(&mut first_byte).await {
        Ok(n) if n > 0 => Protocol::detect(first_byte[0]),
        _ => Protocol::Csv,
    };
    info!(client = client_id.0, ?protocol, "client protocol detected");

    // Writer task: consume responses and write them in the client's protocol.
    let writer_handle = tokio::spawn(run_writer(client_id, write_stream, out_rx, protocol));

    let result = run_reader(client_id, read_stream, engine_tx, protocol).await;

    // Remove client from registry; this drops the outbound sender and
    // lets the writer drain and exit.
    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }
    let _ = writer_handle.await;

    result
}

async fn run_reader(
    client_id: ClientId,
    read_stream: OwnedReadHalf,
    engine_tx: EngineTx,
    protocol: Protocol,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(read_stream).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(client = client_id.0, ?protocol, line, "received line");

        let Some(request) = decode_line(client_id, protocol, line) else {
            continue;
        };

        let req = EngineRequest { client_id, request };
        if engine_tx.send(req).is_err() {
            warn!(client = client_id.0, "engine channel closed");
            break;
        }
    }

    info!(client = client_id.0, "client disconnected");
    Ok(())
}

/// Parse one line; malformed input is logged and skipped.
fn decode_line(client_id: ClientId, protocol: Protocol, line: &str) -> Option<Request> {
    match protocol {
        Protocol::Csv => {
            let parsed = csv_codec::parse_input_line(line);
            if parsed.is_none() && !line.starts_with('#') {
                warn!(client = client_id.0, line, "invalid CSV line");
            }
            parsed
        }
        Protocol::Json => match json_codec::decode_request(line) {
            Ok(request) => Some(request),
            Err(err) => {
                warn!(client = client_id.0, error = %err, "invalid JSON request");
                None
            }
        },
    }
}

async fn run_writer(
    client_id: ClientId,
    mut write_stream: OwnedWriteHalf,
    mut out_rx: OutboundRx,
    protocol: Protocol,
) {
    while let Some(response) = out_rx.recv().await {
        if let Err(e) = write_response(&mut write_stream, &response, protocol).await {
            warn!(client = client_id.0, error = %e, "client write error");
            break;
        }
    }
}

async fn write_response(
    stream: &mut OwnedWriteHalf,
    response: &Response,
    protocol: Protocol,
) -> anyhow::Result<()> {
    let line = match protocol {
        Protocol::Csv => csv_codec::format_output_csv(response),
        Protocol::Json => json_codec::encode_response(response)?,
    };
    let data = format!("{}\n", line);

    stream.write_all(data.as_bytes()).await?;
    stream.flush().await?;

    debug!(line = line.as_str(), "sent response");
    Ok(())
}
