// crates/matchmaking-client/src/network.rs

use anyhow::Result;
use bytes::BytesMut;
use matchmaking_core::Request;
use matchmaking_protocol::{decode_response, encode_request, WireResponse, WireStatus};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

/// The answer to one request, plus anything else the server sent first.
#[derive(Debug)]
pub struct Reply {
    pub response: WireResponse,
    /// Unsolicited lines (opponent `matched` pushes, late replies), oldest first.
    pub notices: Vec<WireResponse>,
}

/// A JSON-lines connection to the matchmaking server.
pub struct ServerConnection {
    stream: TcpStream,
    read_buffer: BytesMut,
}

impl ServerConnection {
    pub async fn connect(server_addr: &str) -> Result<Self> {
        info!("Connecting to {}...", server_addr);
        let stream = TcpStream::connect(server_addr).await?;
        stream.set_nodelay(true)?;
        info!("Connected");

        Ok(Self {
            stream,
            read_buffer: BytesMut::with_capacity(4096),
        })
    }

    pub async fn send(&mut self, request: &Request) -> Result<()> {
        let mut line = encode_request(request)?;
        line.push('\n');

        self.stream.write_all(line.as_bytes()).await?;
        self.stream.flush().await?;

        debug!("Sent request: {:?}", request);
        Ok(())
    }

    /// Send a request and wait for its reply.
    ///
    /// Whatever the server sent before the request went out is returned as
    /// notices, as is any line that cannot answer this request (wrong
    /// player, or a status the operation never produces).
    pub async fn request(&mut self, request: &Request, wait: Duration) -> Result<Reply> {
        let mut notices = self.drain_buffered()?;
        self.send(request).await?;

        loop {
            let response = timeout(wait, self.read_response())
                .await
                .map_err(|_| anyhow::anyhow!("timed out waiting for server reply"))??
                .ok_or_else(|| anyhow::anyhow!("server closed the connection"))?;

            if response.player_id == request.player_id() && answers(request, response.status) {
                return Ok(Reply { response, notices });
            }
            debug!(
                "Notice for {} while waiting on {}: {:?}",
                response.player_id,
                request.kind(),
                response.status
            );
            notices.push(response);
        }
    }

    /// Read the next response line. `Ok(None)` once the server hangs up.
    pub async fn read_response(&mut self) -> Result<Option<WireResponse>> {
        loop {
            if let Some(response) = self.next_buffered_line()? {
                return Ok(Some(response));
            }

            let mut buf = [0u8; 1024];
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Ok(None);
            }
            self.read_buffer.extend_from_slice(&buf[..n]);
        }
    }
    /// Collect every complete line already sent by the server without
    /// waiting for more.
    fn drain_buffered(&mut self) -> Result<Vec<WireResponse>> {
        let mut buf = [0u8; 1024];
        loop {
            match self.stream.try_read(&mut buf) {
                // Hang-up surfaces on the next blocking read.
                Ok(0) => break,
                Ok(n) => self.read_buffer.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e.into()),
            }
        }

        let mut drained = Vec::new();
        while let Some(response) = self.next_buffered_line()? {
            drained.push(response);
        }
        Ok(drained)
    }

    fn next_buffered_line(&mut self) -> Result<Option<WireResponse>> {
        while let Some(pos) = self.read_buffer.iter().position(|&b| b == b'\n') {
            let line = self.read_buffer.split_to(pos + 1);
            let text = String::from_utf8_lossy(&line);
            if text.trim().is_empty() {
                continue;
            }
            return Ok(Some(decode_response(&text)?));
        }
        Ok(None)
    }
}

/// Whether `status` is something the server replies to `request` with.
fn answers(request: &Request, status: WireStatus) -> bool {
    match request {
        Request::Enqueue { .. } | Request::Status { .. } => matches!(
            status,
            WireStatus::Queued | WireStatus::Matched | WireStatus::None | WireStatus::Rejected
        ),
        Request::Cancel { .. } => matches!(status, WireStatus::Cancelled | WireStatus::Rejected),
        Request::Acknowledge { .. } => {
            matches!(status, WireStatus::Acknowledged | WireStatus::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    use super::*;

    const ALICE_PUSH: &str = r#"{"playerId":"alice","status":"matched","match":{"matchId":"match_1","players":["alice","bob"],"createdAt":5}}"#;
    const ALICE_ACKED: &str = r#"{"playerId":"alice","status":"acknowledged","match":{"matchId":"match_1","players":["alice","bob"],"createdAt":5}}"#;
    const ALICE_QUEUED: &str =
        r#"{"playerId":"alice","status":"queued","enqueuedAt":1,"estimatedWaitSeconds":null}"#;
    const ALICE_NONE: &str = r#"{"playerId":"alice","status":"none"}"#;

    const WAIT: Duration = Duration::from_secs(2);

    fn request(kind: &str) -> Request {
        let player_id = "alice".to_string();
        match kind {
            "enqueue" => Request::Enqueue {
                player_id,
                pet_id: None,
            },
            "status" => Request::Status { player_id },
            _ => Request::Acknowledge { player_id },
        }
    }

    /// Fake server: for each request line it reads, writes the scripted lines.
    async fn fake_server(greeting: Vec<&'static str>, script: Vec<Vec<&'static str>>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();

            for line in greeting {
                write.write_all(format!("{}\n", line).as_bytes()).await.unwrap();
            }
            for replies in script {
                if lines.next_line().await.unwrap().is_none() {
                    return;
                }
                for line in replies {
                    write.write_all(format!("{}\n", line).as_bytes()).await.unwrap();
                }
            }
        });

        addr
    }

    #[tokio::test]
    async fn unsolicited_push_is_not_taken_as_the_ack_reply() {
        let addr = fake_server(vec![ALICE_PUSH], vec![vec![ALICE_ACKED]]).await;
        let mut connection = ServerConnection::connect(&addr).await.unwrap();

        let reply = connection.request(&request("ack"), WAIT).await.unwrap();

        assert_eq!(reply.response.status, WireStatus::Acknowledged);
        assert_eq!(reply.notices.len(), 1);
        assert_eq!(reply.notices[0].status, WireStatus::Matched);
    }

    #[tokio::test]
    async fn replies_stay_aligned_after_a_push() {
        let addr = fake_server(
            vec![],
            vec![
                vec![ALICE_QUEUED, ALICE_PUSH],
                vec![ALICE_ACKED],
                vec![ALICE_NONE],
            ],
        )
        .await;
        let mut connection = ServerConnection::connect(&addr).await.unwrap();

        let queued = connection.request(&request("enqueue"), WAIT).await.unwrap();
        assert_eq!(queued.response.status, WireStatus::Queued);

        let acked = connection.request(&request("ack"), WAIT).await.unwrap();
        assert_eq!(acked.response.status, WireStatus::Acknowledged);
        assert_eq!(acked.notices.len(), 1);
        assert_eq!(acked.notices[0].status, WireStatus::Matched);

        let status = connection.request(&request("status"), WAIT).await.unwrap();
        assert_eq!(status.response.status, WireStatus::None);
        assert!(status.notices.is_empty());
    }

    #[test]
    fn cancel_is_answered_only_by_cancelled_or_rejected() {
        let cancel = Request::Cancel {
            player_id: "alice".to_string(),
        };
        assert!(answers(&cancel, WireStatus::Cancelled));
        assert!(answers(&cancel, WireStatus::Rejected));
        assert!(!answers(&cancel, WireStatus::Matched));
        assert!(!answers(&cancel, WireStatus::Queued));
    }
}
