//! Helpers shared by unit tests: canned providers and a one-shot HTTP stub.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::core::controller::ChatController;
use crate::core::message::Message;
use crate::core::providers::{
    effective_prompt, ProviderKind, ProviderSettings, RemoteSettings, Resolution, ResolveError,
    ResponseProvider,
};
use crate::core::session::ChatSession;
use crate::core::simulate::SimulatedProvider;

/// Settings with no API keys, fallback on and an instant simulator.
pub fn test_settings() -> ProviderSettings {
    ProviderSettings {
        huggingface: RemoteSettings::default(),
        nlpcloud: RemoteSettings::default(),
        fallback_on_failure: true,
        simulate_delay: Duration::ZERO,
    }
}

/// A session on the welcome conversation backed by an instant simulator.
pub fn create_test_session() -> ChatSession {
    let controller = ChatController::new(Arc::new(SimulatedProvider::new(Duration::ZERO)));
    ChatSession::new(controller, test_settings(), reqwest::Client::new())
}

/// Provider that answers every call with the same result and records the
/// prompts it was asked.
pub struct ScriptedProvider {
    kind: ProviderKind,
    result: Result<Resolution, ResolveError>,
    pub calls: Arc<AtomicUsize>,
    pub prompts: Arc<std::sync::Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn replying(kind: ProviderKind, text: &str) -> Self {
        Self::new(kind, Ok(Resolution::new(text)))
    }

    pub fn failing(kind: ProviderKind, err: ResolveError) -> Self {
        Self::new(kind, Err(err))
    }

    pub fn new(kind: ProviderKind, result: Result<Resolution, ResolveError>) -> Self {
        Self {
            kind,
            result,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResponseProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn resolve(
        &self,
        history: &[Message],
        prompt_override: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push(effective_prompt(history, prompt_override).to_string());
        self.result.clone()
    }
}

#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

/// Accepts a single connection, records the request and replies with a
/// fixed status and body.
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<Result<CapturedRequest, String>>,
}

impl StubServer {
    pub async fn respond(status: u16, body: &str) -> Self {
        Self::respond_after(Duration::ZERO, status, body).await
    }

    /// Like [`StubServer::respond`], but waits `delay` after reading the
    /// request before answering.
    pub async fn respond_after(delay: Duration, status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
            let captured = read_http_request(&mut stream).await?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let reason = reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Unknown");
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
            stream.shutdown().await.map_err(|err| err.to_string())?;
            Ok(captured)
        });

        Self { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn captured(self) -> CapturedRequest {
        self.handle
            .await
            .expect("stub server task panicked")
            .expect("stub server failed")
    }
}

/// URL of a local port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    drop(listener);
    format!("http://{addr}/")
}

async fn read_http_request(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    let mut header_end = None;
    while header_end.is_none() {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        header_end = buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4);
    }

    let header_end = header_end.expect("header end should exist");
    let header_text =
        std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
    let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?
        .to_string();

    let mut headers = Vec::new();
    let mut content_length = 0_usize;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse::<usize>().map_err(|err| err.to_string())?;
        }
        headers.push((name.to_string(), value));
    }

    let mut body = buffer[header_end..].to_vec();
    while body.len() < content_length {
        let mut chunk = vec![0_u8; content_length - body.len()];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP body".to_string());
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(CapturedRequest {
        request_line,
        headers,
        body,
    })
}
