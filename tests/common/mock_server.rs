/*!
 * Minimal HTTP server answering every request with a canned response.
 *
 * Used to exercise the real Sarvam client (status mapping, timeouts,
 * body parsing) without network access.
 */

use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status and JSON body
    Json { status: u16, body: String },
    /// Read the request and never answer
    Hang,
}

/// One request as received by the server
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// A running canned-response server
pub struct MockServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockServer {
    /// Start a server that answers every request with `reply`
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Listener should have an address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let reply = reply.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    handle(stream, reply, recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Shorthand for a 200 response with the given JSON
    pub async fn ok(body: &str) -> Self {
        Self::start(Reply::Json {
            status: 200,
            body: body.to_string(),
        })
        .await
    }

    /// Shorthand for an error status with the given body
    pub async fn status(status: u16, body: &str) -> Self {
        Self::start(Reply::Json {
            status,
            body: body.to_string(),
        })
        .await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests.lock().clone()
    }
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().expect("Listener should have an address");
    drop(listener);
    format!("http://{}", addr)
}

async fn handle(mut stream: TcpStream, reply: Reply, recorded: Arc<Mutex<Vec<ReceivedRequest>>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    recorded.lock().push(request);

    match reply {
        Reply::Json { status, body } => {
            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<ReceivedRequest> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    Some(ReceivedRequest {
        head,
        body: data[header_end..].to_vec(),
    })
}
