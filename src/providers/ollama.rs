use crate::core::error::ChatError;
use crate::providers::base_client::HttpClient;
use crate::providers::{ChatProvider, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:latest";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Provider for an Ollama-style `/api/chat` endpoint.
#[derive(Clone)]
pub struct OllamaProvider {
    client: HttpClient,
}

impl OllamaProvider {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: HttpClient::new(endpoint),
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    async fn chat(&self, messages: &[Message], model: &str) -> Result<String, ChatError> {
        let payload = ChatRequest {
            model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post("api/chat", &payload)
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        Ok(parsed.message.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn request_body_has_stream_false_and_lowercase_roles() {
        let messages = vec![Message::user("hello"), Message::assistant("hi")];
        let payload = ChatRequest {
            model: "llama3.2:latest",
            messages: &messages,
            stream: false,
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(value["model"], "llama3.2:latest");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][1]["role"], "assistant");
    }

    /// Accepts a single connection, reads the full request, answers with `body`.
    async fn serve_once(listener: TcpListener, status: &'static str, body: &'static str) {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn chat_returns_trimmed_reply_content() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            "200 OK",
            r#"{"model":"llama3.2:latest","message":{"role":"assistant","content":"  hi there\n"},"done":true}"#,
        ));

        let provider = OllamaProvider::new(format!("http://{}", addr));
        let reply = provider
            .chat(&[Message::user("hello")], "llama3.2:latest")
            .await
            .unwrap();

        assert_eq!(reply, "hi there");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            "500 Internal Server Error",
            r#"{"error":"model failed to load"}"#,
        ));

        let provider = OllamaProvider::new(format!("http://{}", addr));
        let err = provider
            .chat(&[Message::user("hello")], "llama3.2:latest")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Api(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OllamaProvider::new(format!("http://{}", addr));
        let err = provider
            .chat(&[Message::user("hello")], "llama3.2:latest")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Network(_)));
    }
}
