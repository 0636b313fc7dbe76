#![allow(dead_code)]

use async_trait::async_trait;
use ionos_processes::configuration::{APP_ID, ConfigValue, MemoryAppConfig};
use ionos_processes::mail_api::EventApi;
use ionos_processes::mailer::Mailer;
use ionos_processes::notifications::{MailEvent, ShareNotification};
use ionos_processes::{ApiClientService, ClientOptions, Error, HttpClient, LIB_LOG_TARGET, ReqwestClientService};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};

pub const MOCK_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
pub const MOCK_SHARE_TOKEN: &str = "mock-token";
pub const MOCK_NOTE: &str = "mock-note";
pub const MOCK_RECIPIENT: &str = "mock-recipient";
pub const MOCK_NODE_NAME: &str = "mock-name";
pub const MOCK_LANGUAGE: &str = "lang_LOCALE";

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
}

#[derive(Clone)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message.unwrap_or_default(),
        });
    }
}

/// Capture log events of the current thread until the guard is dropped.
pub fn capture_logs() -> (tracing::subscriber::DefaultGuard, Arc<Mutex<Vec<CapturedEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { events: events.clone() });
    let guard = tracing::subscriber::set_default(subscriber);
    (guard, events)
}

/// Messages the library logged at `level`.
pub fn messages_at(events: &Arc<Mutex<Vec<CapturedEvent>>>, level: Level) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.level == level && e.target == LIB_LOG_TARGET)
        .map(|e| e.message.clone())
        .collect()
}

pub fn app_config(base_url: &str, user: &str, pass: &str) -> MemoryAppConfig {
    let config = MemoryAppConfig::new();
    config.set_value(APP_ID, "ionos_mail_base_url", ConfigValue::String(base_url.into()));
    config.set_value(APP_ID, "basic_auth_user", ConfigValue::String(user.into()));
    config.set_value(APP_ID, "basic_auth_pass", ConfigValue::String(pass.into()));
    config
}

pub fn share_notification(expiration_date: Option<i64>) -> ShareNotification {
    ShareNotification::builder()
        .sender_user_id(MOCK_USER_ID)
        .file_name(MOCK_NODE_NAME)
        .resource_url("mock-url")
        .note(Some(MOCK_NOTE))
        .expiration_date(expiration_date)
        .language(MOCK_LANGUAGE)
        .receiver_email(MOCK_RECIPIENT)
        .build()
}

/// [`EventApi`] remembering every call, optionally failing them.
#[derive(Clone, Default)]
pub struct RecordingEventApi {
    pub calls: Arc<Mutex<Vec<(String, ShareNotification)>>>,
    pub fail: bool,
}

#[async_trait]
impl EventApi for RecordingEventApi {
    async fn process_share_by_link_event(&self, brand: &str, message: &ShareNotification) -> Result<(), Error> {
        self.calls.lock().unwrap().push((brand.to_string(), message.clone()));
        match self.fail {
            true => Err(Error::MailApiStatus { status: 500, body: "mocked exception".to_string() }),
            false => Ok(()),
        }
    }
}

/// [`ApiClientService`] handing out a [`RecordingEventApi`] and remembering its arguments.
#[derive(Clone, Default)]
pub struct MockApiClientService {
    pub options: Arc<Mutex<Vec<ClientOptions>>>,
    pub base_urls: Arc<Mutex<Vec<String>>>,
    pub api: RecordingEventApi,
}

impl ApiClientService for MockApiClientService {
    fn new_client(&self, options: ClientOptions) -> Result<HttpClient, Error> {
        self.options.lock().unwrap().push(options.clone());
        ReqwestClientService.new_client(options)
    }

    fn new_event_api(&self, client: HttpClient, api_base_url: &str) -> Result<Box<dyn EventApi>, Error> {
        self.base_urls.lock().unwrap().push(api_base_url.to_string());
        ReqwestClientService.new_event_api(client, api_base_url)?;
        Ok(Box::new(self.api.clone()))
    }
}

/// [`Mailer`] remembering every event, optionally failing like a misconfigured mailer.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub events: Arc<Mutex<Vec<MailEvent>>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, event: MailEvent) -> Result<(), Error> {
        self.events.lock().unwrap().push(event);
        match self.fail {
            true => Err(Error::MissingMailerServiceUrl),
            false => Ok(()),
        }
    }
}

/// A request received by [`serve_once`].
#[derive(Debug)]
pub struct ReceivedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Answer a single HTTP request on a local port with `status_line` and `body`.
///
/// Returns the base URL to call and a handle resolving to the received request.
pub async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<ReceivedRequest>) {
    use tokio::io::AsyncWriteExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{}", address), handle)
}

/// Accept a single connection on a local port and never answer it.
///
/// Returns the base URL to call and the task holding the connection open.
pub async fn serve_silently() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    });
    (format!("http://{}", address), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> ReceivedRequest {
    use tokio::io::AsyncReadExt;

    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buffer[..end]).to_string();
            let length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
                .map(|(_, value)| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buffer.len() >= end + 4 + length {
                let mut lines = head.lines();
                let request_line = lines.next().unwrap_or_default().to_string();
                let headers = lines
                    .filter_map(|line| line.split_once(':'))
                    .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
                    .collect();
                let body = String::from_utf8_lossy(&buffer[end + 4..end + 4 + length]).to_string();
                return ReceivedRequest { request_line, headers, body };
            }
        }
    }
    panic!("connection closed before a full request was received");
}
