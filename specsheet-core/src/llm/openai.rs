//! OpenAI-compatible chat-completions client (blocking)

use super::CompletionClient;
use crate::config::LlmConfig;
use crate::error::{DocumentError, DocumentResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any endpoint speaking the OpenAI chat-completions protocol.
pub struct OpenAiClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl OpenAiClient {
    /// Create a client. Without a key every request fails as a completion error.
    pub fn new(api_key: Option<String>, config: &LlmConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Self {
            agent: builder.build(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Create a client reading the credential from the configured environment variable
    pub fn from_env(config: &LlmConfig) -> Self {
        Self::new(config.api_key(), config)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn request<'a>(&'a self, system: &'a str, user: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        }
    }
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, system: &str, user: &str) -> DocumentResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DocumentError::Completion(format!(
                "API key not set: export {} before running",
                self.api_key_env
            ))
        })?;

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {api_key}"))
            .set("Content-Type", "application/json")
            .send_json(self.request(system, user))
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => {
                    let body = response.into_string().unwrap_or_default();
                    DocumentError::Completion(format!("API error {code}: {body}"))
                }
                other => DocumentError::Completion(format!("request failed: {other}")),
            })?;

        let body: ChatResponse = response
            .into_json()
            .map_err(|e| DocumentError::Completion(format!("failed to parse response: {e}")))?;

        first_choice_content(body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn first_choice_content(body: ChatResponse) -> DocumentResult<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| DocumentError::Completion("no choices in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    #[test]
    fn test_request_shape() {
        let client = OpenAiClient::new(Some("sk-test".to_string()), &LlmConfig::default());
        let json = serde_json::to_value(client.request("sys", "usr")).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_first_choice_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_content(body).unwrap(), "{}");
    }

    #[test]
    fn test_empty_choices_is_completion_error() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            first_choice_content(body),
            Err(DocumentError::Completion(_))
        ));
    }

    #[test]
    fn test_null_content_is_completion_error() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(first_choice_content(body).is_err());
    }

    #[test]
    fn test_missing_key_fails_each_request() {
        let config = LlmConfig {
            api_key_env: "SPECSHEET_TEST_UNSET_KEY".to_string(),
            // Never contacted: the key check comes first
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::from_env(&config);
        assert!(!client.has_api_key());

        match client.complete("sys", "usr") {
            Err(DocumentError::Completion(msg)) => {
                assert_eq!(msg, "API key not set: export SPECSHEET_TEST_UNSET_KEY before running")
            }
            other => panic!("expected completion error, got {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_endpoint_is_completion_error() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout_secs: Some(2),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::new(Some("sk-test".to_string()), &config);
        assert!(matches!(
            client.complete("sys", "usr"),
            Err(DocumentError::Completion(_))
        ));
    }

    // ===== Loopback server =====

    /// Accept one connection, answer with `status` and `body`, hand back the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (format!("http://{addr}/v1/chat/completions"), handle)
    }

    /// Read headers plus a Content-Length body.
    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&data).into_owned();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn client_for(endpoint: String) -> OpenAiClient {
        let config = LlmConfig {
            endpoint,
            timeout_secs: Some(10),
            ..LlmConfig::default()
        };
        OpenAiClient::new(Some("sk-test".to_string()), &config)
    }

    #[test]
    fn test_error_status_maps_to_completion_error() {
        let (endpoint, server) = serve_once(
            "429 Too Many Requests",
            r#"{"error": {"message": "slow down"}}"#,
        );
        let result = client_for(endpoint).complete("sys", "usr");
        let request = server.join().unwrap();

        match result {
            Err(DocumentError::Completion(msg)) => assert_eq!(
                msg,
                r#"API error 429: {"error": {"message": "slow down"}}"#
            ),
            other => panic!("expected completion error, got {other:?}"),
        }
        assert!(request.starts_with("POST /v1/chat/completions"));
    }

    #[test]
    fn test_success_returns_first_choice_and_sends_bearer() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"Loft\": 5}"}}]}"#,
        );
        let result = client_for(endpoint).complete("be strict", "extract this");
        let request = server.join().unwrap();

        assert_eq!(result.unwrap(), r#"{"Loft": 5}"#);
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.contains("authorization: bearer sk-test"));
        assert!(request.contains(r#""role":"system","content":"be strict""#));
        assert!(request.contains(r#""model":"gpt-4o-mini""#));
    }
}
