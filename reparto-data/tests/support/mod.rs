//! Single-shot HTTP server returning a canned response.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// A local server that answers exactly one request.
///
/// The server thread is detached and exits after its single exchange.
#[derive(Debug)]
pub struct CannedServer {
    base_url: String,
    requests: Receiver<String>,
}

impl CannedServer {
    /// Answer the next request with `status` and `body`.
    pub fn respond(status: u16, body: &str) -> Self {
        let response = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            reason(status),
            body.len()
        );
        Self::spawn(move |stream| {
            let _ = stream.write_all(response.as_bytes());
        })
    }

    /// Accept the next request and hold it open without answering.
    pub fn stall(hold: Duration) -> Self {
        Self::spawn(move |_stream| thread::sleep(hold))
    }

    fn spawn<F>(reply: F) -> Self
    where
        F: FnOnce(&mut std::net::TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind canned server");
        let addr = listener.local_addr().expect("canned server address");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0_u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
            reply(&mut stream);
        });
        Self {
            base_url: format!("http://{addr}"),
            requests: rx,
        }
    }

    /// Base URL to configure the provider with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request line (`GET /path HTTP/1.1`) of the request received.
    pub fn request_line(&self) -> String {
        let request = self
            .requests
            .recv_timeout(Duration::from_secs(5))
            .expect("server received a request");
        request.lines().next().unwrap_or_default().to_owned()
    }
}

/// Base URL of a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
