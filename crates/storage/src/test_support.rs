use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Request heads received by an [`HttpStub`], oldest first.
pub type RecordedRequests = Arc<Mutex<Vec<String>>>;

/// One-response-per-connection HTTP server answering every request with the
/// same status and body.
pub struct HttpStub {
    pub base_url: String,
    pub requests: RecordedRequests,
}

impl HttpStub {
    pub async fn spawn(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
        let address = listener.local_addr().expect("stub address");
        let requests = RecordedRequests::default();
        let recorded = requests.clone();
        let response = format!(
            "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut buffer = [0_u8; 1024];
                while !head.windows(4).any(|window| window == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => break,
                        Ok(read) => head.extend_from_slice(&buffer[..read]),
                    }
                }
                recorded.lock().expect("stub lock").push(String::from_utf8_lossy(&head).into_owned());
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base_url: format!("http://{address}"), requests }
    }

    pub fn request_heads(&self) -> Vec<String> {
        self.requests.lock().expect("stub lock").clone()
    }
}

/// Case-insensitive header lookup in a raw request head.
pub fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim().to_string())
    })
}
