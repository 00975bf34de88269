//! A throwaway HTTP/1.1 responder standing in for the scanning service.

#![allow(dead_code)]

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

/// What the fake service answers on one path.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Json(u16, &'static str),
    /// Accepts the request and never answers.
    Hang,
}

pub type Requests = Arc<Mutex<Vec<(String, Value)>>>;

pub struct FakeService {
    pub base_url: Url,
    pub requests: Requests,
}

impl FakeService {
    pub async fn start(routes: &[(&'static str, Reply)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<&'static str, Reply>> = Arc::new(routes.iter().copied().collect());
        let requests: Requests = Arc::default();

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(handle(socket, routes.clone(), seen.clone()));
            }
        });

        Self { base_url: Url::parse(&format!("http://{addr}/")).unwrap(), requests }
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(path, _)| path.clone()).collect()
    }
}

/// A base url nothing listens on.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

async fn handle(mut socket: TcpStream, routes: Arc<HashMap<&'static str, Reply>>, seen: Requests) {
    let (path, body) = read_request(&mut socket).await;
    let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
    seen.lock().unwrap().push((path.clone(), parsed));

    let reply = routes.get(path.as_str()).copied().unwrap_or(Reply::Json(404, r#"{"detail": "no route"}"#));
    match reply {
        Reply::Hang => tokio::time::sleep(Duration::from_secs(60)).await,
        Reply::Json(status, payload) => {
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
                payload.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    }
}

async fn read_request(socket: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let mut head_end = None;
    let mut content_length = 0;

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if head_end.is_none() {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                head_end = Some(pos + 4);
                let head = String::from_utf8_lossy(&buf[..pos]).to_string();
                content_length = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse().ok())
                    .unwrap_or(0);
            }
        }
        if let Some(end) = head_end {
            if buf.len() >= end + content_length {
                break;
            }
        }
    }

    let text = String::from_utf8_lossy(&buf).to_string();
    let path = text
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .trim_start_matches('/')
        .to_string();
    let body = head_end.map(|end| String::from_utf8_lossy(&buf[end..]).to_string()).unwrap_or_default();
    (path, body)
}
