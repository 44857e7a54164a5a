//! OpenRouter LLM Gateway implementation

use super::error::OpenRouterError;
use super::protocol::{ChatCompletionRequest, parse_error_detail};
use super::sse::{LineDecoder, LineEvent, parse_line};
use super::transport::{BodyStream, HttpRequest, HttpTransport, ReqwestTransport, TransportError};
use crate::config::{FileConfig, FileProviderConfig, resolve_api_key};
use async_trait::async_trait;
use futures::StreamExt;
use qchain_application::{ChatRequest, GatewayError, LlmGateway, StreamNotifier};
use qchain_domain::util::truncate_str;
use secrecy::{ExposeSecret, SecretString};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Error bodies larger than this are cut before parsing.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Request-level settings for the gateway
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    pub endpoint: String,
    /// Sent as `HTTP-Referer`
    pub site_url: Option<String>,
    /// Sent as `X-Title`
    pub site_name: Option<String>,
    /// Longest wait for the response head or for the next body chunk
    pub timeout: Duration,
}

impl OpenRouterSettings {
    pub fn from_config(config: &FileConfig) -> Self {
        Self {
            endpoint: config.provider.endpoint.trim().to_string(),
            site_url: config.provider.site_url.clone(),
            site_name: config.provider.site_name.clone(),
            timeout: config.request_timeout(),
        }
    }
}

/// LLM Gateway implementation for OpenRouter's streaming chat completions
pub struct OpenRouterGateway {
    settings: OpenRouterSettings,
    credentials: FileProviderConfig,
    transport: Arc<dyn HttpTransport>,
}

impl OpenRouterGateway {
    /// Create a gateway with a `reqwest` transport from loaded configuration
    pub fn from_config(config: &FileConfig) -> Result<Self, OpenRouterError> {
        let settings = OpenRouterSettings::from_config(config);
        reqwest::Url::parse(&settings.endpoint)
            .map_err(|e| OpenRouterError::InvalidEndpoint(format!("{}: {e}", settings.endpoint)))?;

        let transport = ReqwestTransport::new(config.connect_timeout())?;
        info!(endpoint = %settings.endpoint, "OpenRouterGateway initialized");

        Ok(Self::with_transport(
            settings,
            config.provider.clone(),
            Arc::new(transport),
        ))
    }

    /// Create a gateway with an existing transport
    ///
    /// `credentials` is consulted on every request, so a key exported after
    /// startup is picked up by the next round.
    pub fn with_transport(
        settings: OpenRouterSettings,
        credentials: FileProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            settings,
            credentials,
            transport,
        }
    }

    pub fn settings(&self) -> &OpenRouterSettings {
        &self.settings
    }

    fn headers(&self, key: &SecretString) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Authorization", format!("Bearer {}", key.expose_secret())),
            ("Content-Type", "application/json".to_string()),
            ("Accept", "text/event-stream".to_string()),
        ];
        if let Some(url) = &self.settings.site_url {
            headers.push(("HTTP-Referer", url.clone()));
        }
        if let Some(name) = &self.settings.site_name {
            headers.push(("X-Title", name.clone()));
        }
        headers
    }

    async fn exchange(
        &self,
        request: HttpRequest,
        notifier: &dyn StreamNotifier,
    ) -> Result<String, GatewayError> {
        let response = self
            .within(self.transport.post(request))
            .await?
            .map_err(connection_error)?;

        if !response.is_success() {
            let status = response.status;
            let body = self.within(read_capped(response.body, ERROR_BODY_LIMIT)).await?;
            let detail = parse_error_detail(&body);
            warn!(status, detail = ?detail, "Endpoint returned an error status");
            return Err(GatewayError::HttpStatus { status, detail });
        }

        let mut decoder = LineDecoder::new();
        let mut text = String::new();
        let mut body = response.body;

        while let Some(chunk) = self.within(body.next()).await? {
            let chunk = chunk.map_err(connection_error)?;
            for line in decoder.push(&chunk) {
                if apply_line(&line, &mut text, notifier).is_break() {
                    debug!("Stream terminated by end marker");
                    return Ok(text);
                }
            }
        }

        if let Some(line) = decoder.finish() {
            let _ = apply_line(&line, &mut text, notifier);
        }
        debug!("Stream closed by server");
        Ok(text)
    }

    /// Run one wait of the exchange under the inactivity timeout.
    ///
    /// Dropping the exchange on timeout releases the connection.
    async fn within<F: Future>(&self, wait: F) -> Result<F::Output, GatewayError> {
        tokio::time::timeout(self.settings.timeout, wait)
            .await
            .map_err(|_| {
                warn!(timeout = ?self.settings.timeout, "Streaming request timed out");
                GatewayError::Timeout(self.settings.timeout)
            })
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn stream_chat(
        &self,
        request: &ChatRequest,
        notifier: &dyn StreamNotifier,
    ) -> Result<String, GatewayError> {
        let key = resolve_api_key(&self.credentials).ok_or_else(|| {
            GatewayError::MissingCredential(self.credentials.api_key_env.clone())
        })?;

        let body = serde_json::to_vec(&ChatCompletionRequest::streaming(request))
            .map_err(|e| GatewayError::InvalidConfiguration(e.to_string()))?;

        let http_request = HttpRequest {
            url: self.settings.endpoint.clone(),
            headers: self.headers(&key.key),
            body,
        };

        debug!(
            model = %request.model(),
            endpoint = %self.settings.endpoint,
            key_source = %key.source.description(),
            "Sending streaming request"
        );

        self.exchange(http_request, notifier).await
    }
}

fn connection_error(error: TransportError) -> GatewayError {
    GatewayError::ConnectionError(error.to_string())
}

/// Fold one stream line into the accumulated text.
fn apply_line(line: &str, text: &mut String, notifier: &dyn StreamNotifier) -> ControlFlow<()> {
    match parse_line(line) {
        LineEvent::Blank => {}
        LineEvent::Done => return ControlFlow::Break(()),
        LineEvent::Delta(delta) => {
            if !delta.is_empty() {
                text.push_str(&delta);
                notifier.on_delta(text);
            }
        }
        LineEvent::MissingDelta(message) => {
            warn!("{}", message);
            notifier.on_warning(&message);
        }
        LineEvent::Malformed => {
            debug!(line = truncate_str(line, 120), "Skipping unparsable stream line");
        }
    }
    ControlFlow::Continue(())
}

async fn read_capped(mut body: BodyStream, limit: usize) -> Vec<u8> {
    let mut buffer = Vec::new();
    while let Some(Ok(chunk)) = body.next().await {
        buffer.extend_from_slice(&chunk);
        if buffer.len() >= limit {
            buffer.truncate(limit);
            break;
        }
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openrouter::transport::HttpResponse;
    use futures::stream;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const UNSET_KEY_VAR: &str = "QCHAIN_TEST_GATEWAY_KEY_NEVER_SET";

    struct RecordedRequest {
        url: String,
        headers: Vec<(&'static str, String)>,
        body: serde_json::Value,
    }

    /// Transport that replays a scripted response
    struct ScriptedTransport {
        status: u16,
        chunks: Vec<Vec<u8>>,
        stall: bool,
        pace: Option<Duration>,
        refuse: bool,
        calls: AtomicUsize,
        last: Mutex<Option<RecordedRequest>>,
    }

    impl ScriptedTransport {
        fn ok(lines: &[&str]) -> Self {
            Self::chunks(200, lines.iter().map(|l| format!("{l}\n").into_bytes()).collect())
        }

        fn chunks(status: u16, chunks: Vec<Vec<u8>>) -> Self {
            Self {
                status,
                chunks,
                stall: false,
                pace: None,
                refuse: false,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }

        fn stalling(mut self) -> Self {
            self.stall = true;
            self
        }

        /// Wait `gap` before every chunk.
        fn paced(mut self, gap: Duration) -> Self {
            self.pace = Some(gap);
            self
        }

        fn refusing() -> Self {
            let mut transport = Self::chunks(200, vec![]);
            transport.refuse = true;
            transport
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(RecordedRequest {
                url: request.url,
                headers: request.headers,
                body: serde_json::from_slice(&request.body).unwrap(),
            });

            if self.refuse {
                return Err(TransportError::Connect("connection refused".into()));
            }

            let chunks = stream::iter(self.chunks.clone().into_iter().map(Ok));
            let chunks = match self.pace {
                Some(gap) => chunks
                    .then(move |chunk| async move {
                        tokio::time::sleep(gap).await;
                        chunk
                    })
                    .boxed(),
                None => chunks.boxed(),
            };
            let body = if self.stall {
                chunks.chain(stream::pending()).boxed()
            } else {
                chunks
            };
            Ok(HttpResponse {
                status: self.status,
                body,
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        deltas: Mutex<Vec<String>>,
        warnings: Mutex<Vec<String>>,
    }

    impl StreamNotifier for Recorder {
        fn on_delta(&self, accumulated: &str) {
            self.deltas.lock().unwrap().push(accumulated.to_string());
        }

        fn on_warning(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }

    fn settings() -> OpenRouterSettings {
        OpenRouterSettings {
            endpoint: "https://router.test/api/v1/chat/completions".to_string(),
            site_url: None,
            site_name: None,
            timeout: Duration::from_secs(5),
        }
    }

    fn credentials(api_key: Option<&str>) -> FileProviderConfig {
        FileProviderConfig {
            api_key_env: UNSET_KEY_VAR.to_string(),
            api_key: api_key.map(String::from),
            ..FileProviderConfig::default()
        }
    }

    fn gateway(transport: Arc<ScriptedTransport>) -> OpenRouterGateway {
        OpenRouterGateway::with_transport(settings(), credentials(Some("sk-test")), transport)
    }

    fn request() -> ChatRequest {
        ChatRequest::user("prompt", qchain_application::GenerationParams::default())
    }

    fn delta(content: &str) -> String {
        format!(
            "data: {}",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
    }

    #[tokio::test]
    async fn accumulates_deltas_until_done() {
        let (a, b, c) = (delta("A"), delta("B"), delta("C"));
        let transport = Arc::new(ScriptedTransport::ok(&[&a, "", &b, "", &c, "", "data: [DONE]"]));
        let recorder = Recorder::default();

        let text = gateway(transport)
            .stream_chat(&request(), &recorder)
            .await
            .unwrap();

        assert_eq!(text, "ABC");
        assert_eq!(*recorder.deltas.lock().unwrap(), vec!["A", "AB", "ABC"]);
        assert!(recorder.warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn skips_malformed_lines_silently() {
        let (a, b) = (delta("A"), delta("B"));
        let transport = Arc::new(ScriptedTransport::ok(&[
            ": OPENROUTER PROCESSING",
            &a,
            "data: {broken",
            &b,
            "data: [DONE]",
        ]));
        let recorder = Recorder::default();

        let text = gateway(transport)
            .stream_chat(&request(), &recorder)
            .await
            .unwrap();

        assert_eq!(text, "AB");
        assert!(recorder.warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_delta_warns_and_continues() {
        let (a, b) = (delta("A"), delta("B"));
        let transport = Arc::new(ScriptedTransport::ok(&[
            &a,
            r#"data: {"choices":[{"finish_reason":null}]}"#,
            &b,
            "data: [DONE]",
        ]));
        let recorder = Recorder::default();

        let text = gateway(transport)
            .stream_chat(&request(), &recorder)
            .await
            .unwrap();

        assert_eq!(text, "AB");
        assert_eq!(recorder.warnings.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_and_role_only_deltas_do_not_notify() {
        let a = delta("A");
        let transport = Arc::new(ScriptedTransport::ok(&[
            r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#,
            &delta(""),
            &a,
            "data: [DONE]",
        ]));
        let recorder = Recorder::default();

        gateway(transport)
            .stream_chat(&request(), &recorder)
            .await
            .unwrap();

        assert_eq!(*recorder.deltas.lock().unwrap(), vec!["A"]);
    }

    #[tokio::test]
    async fn record_split_across_chunks() {
        let line = format!("{}\n", delta("关联逻辑"));
        let bytes = line.into_bytes();
        let (head, tail) = bytes.split_at(20);
        let transport = Arc::new(ScriptedTransport::chunks(
            200,
            vec![head.to_vec(), tail.to_vec(), b"data: [DONE]\n".to_vec()],
        ));

        let text = gateway(transport)
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap();

        assert_eq!(text, "关联逻辑");
    }

    #[tokio::test]
    async fn connection_close_without_done_returns_text() {
        let (a, b) = (delta("A"), delta("B"));
        let transport = Arc::new(ScriptedTransport::ok(&[&a, &b]));

        let text = gateway(transport)
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap();

        assert_eq!(text, "AB");
    }

    #[tokio::test]
    async fn trailing_line_without_newline_is_used() {
        let a = delta("A");
        let transport = Arc::new(ScriptedTransport::chunks(
            200,
            vec![format!("{a}\n").into_bytes(), delta("B").into_bytes()],
        ));

        let text = gateway(transport)
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap();

        assert_eq!(text, "AB");
    }

    #[tokio::test]
    async fn lines_after_done_are_ignored() {
        let (a, b) = (delta("A"), delta("B"));
        let transport = Arc::new(ScriptedTransport::ok(&[&a, "data: [DONE]", &b]));
        let recorder = Recorder::default();

        let text = gateway(transport)
            .stream_chat(&request(), &recorder)
            .await
            .unwrap();

        assert_eq!(text, "A");
        assert_eq!(recorder.deltas.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn http_error_with_structured_detail() {
        let transport = Arc::new(ScriptedTransport::chunks(
            401,
            vec![br#"{"error":{"message":"No auth credentials found","code":401}}"#.to_vec()],
        ));

        let err = gateway(transport)
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap_err();

        match err {
            GatewayError::HttpStatus { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(
                    detail.as_deref(),
                    Some("No auth credentials found (code 401)")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_error_without_json_body() {
        let transport = Arc::new(ScriptedTransport::chunks(
            502,
            vec![b"<html>Bad Gateway</html>".to_vec()],
        ));

        let err = gateway(transport)
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::HttpStatus {
                status: 502,
                detail: None
            }
        ));
        assert_eq!(err.to_string(), "HTTP 502: no error details");
    }

    #[tokio::test]
    async fn missing_credential_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::ok(&["data: [DONE]"]));
        let gateway =
            OpenRouterGateway::with_transport(settings(), credentials(None), transport.clone());

        let err = gateway
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::MissingCredential(ref var) if var == UNSET_KEY_VAR));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn timeout_discards_partial_text() {
        let a = delta("A");
        let transport = Arc::new(ScriptedTransport::ok(&[&a]).stalling());
        let gateway = OpenRouterGateway::with_transport(
            OpenRouterSettings {
                timeout: Duration::from_millis(50),
                ..settings()
            },
            credentials(Some("sk-test")),
            transport,
        );
        let recorder = Recorder::default();

        let err = gateway.stream_chat(&request(), &recorder).await.unwrap_err();

        assert!(matches!(err, GatewayError::Timeout(d) if d == Duration::from_millis(50)));
        // Only the delta seen before the stall was reported.
        assert_eq!(*recorder.deltas.lock().unwrap(), vec!["A"]);
    }

    #[tokio::test]
    async fn steady_stream_outlives_the_timeout() {
        let lines: Vec<String> = (0..10).map(|i| delta(&i.to_string())).collect();
        let mut refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        refs.push("data: [DONE]");
        let transport = Arc::new(ScriptedTransport::ok(&refs).paced(Duration::from_millis(30)));
        let gateway = OpenRouterGateway::with_transport(
            OpenRouterSettings {
                timeout: Duration::from_millis(100),
                ..settings()
            },
            credentials(Some("sk-test")),
            transport,
        );

        let text = gateway
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap();

        assert_eq!(text, "0123456789");
    }

    #[tokio::test]
    async fn connect_failure_is_a_connection_error() {
        let transport = Arc::new(ScriptedTransport::refusing());

        let err = gateway(transport)
            .stream_chat(&request(), &Recorder::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::ConnectionError(ref m) if m.contains("refused")));
    }

    #[tokio::test]
    async fn sends_headers_and_streaming_body() {
        let transport = Arc::new(ScriptedTransport::ok(&["data: [DONE]"]));
        let gateway = OpenRouterGateway::with_transport(
            OpenRouterSettings {
                site_url: Some("https://school.example.com".into()),
                site_name: Some("Question Chain".into()),
                ..settings()
            },
            credentials(Some("sk-test")),
            transport.clone(),
        );
        let chat = ChatRequest::user(
            "出题",
            qchain_application::GenerationParams::default().with_web_search(true),
        );

        gateway.stream_chat(&chat, &Recorder::default()).await.unwrap();

        let last = transport.last.lock().unwrap();
        let recorded = last.as_ref().unwrap();
        assert_eq!(recorded.url, "https://router.test/api/v1/chat/completions");
        assert!(
            recorded
                .headers
                .contains(&("Authorization", "Bearer sk-test".to_string()))
        );
        assert!(
            recorded
                .headers
                .contains(&("Content-Type", "application/json".to_string()))
        );
        assert!(
            recorded
                .headers
                .contains(&("HTTP-Referer", "https://school.example.com".to_string()))
        );
        assert!(
            recorded
                .headers
                .contains(&("X-Title", "Question Chain".to_string()))
        );
        assert_eq!(recorded.body["stream"], true);
        assert_eq!(recorded.body["messages"][0]["content"], "出题");
        assert_eq!(recorded.body["plugins"][0]["id"], "web");
    }

    #[test]
    fn from_config_rejects_unparsable_endpoint() {
        let mut config = FileConfig::default();
        config.provider.endpoint = "http://".to_string();
        assert!(matches!(
            OpenRouterGateway::from_config(&config),
            Err(OpenRouterError::InvalidEndpoint(_))
        ));
    }
}
