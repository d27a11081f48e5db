//! Fire-and-forget webhook notifications.
//!
//! Handlers push events on a bounded channel after their write committed. A
//! background task delivers them; delivery failures are logged and dropped.

use std::{path::PathBuf, time::Duration};

use api_types::pdf::FinancialData;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use engine::PDF_MIMETYPE;

const QUEUE_SIZE: usize = 128;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoints notified by the server. A missing URL disables that event.
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub user_created_url: Option<String>,
    pub report_uploaded_url: Option<String>,
    pub timeout: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            user_created_url: None,
            report_uploaded_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    UserCreated {
        user_id: Uuid,
        user_name: String,
        email: String,
    },
    ReportUploaded {
        email: Option<String>,
        filename: String,
        file_path: PathBuf,
        file_size: u64,
        upload_time: DateTime<Utc>,
        financial_data: FinancialData,
    },
}

/// Cheap to clone handle used by request handlers.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    sender: Option<mpsc::Sender<Event>>,
}

impl Notifier {
    /// A notifier that drops every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Start the delivery task and return its handle.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(config: WebhookConfig) -> Result<Self, reqwest::Error> {
        if config.user_created_url.is_none() && config.report_uploaded_url.is_none() {
            tracing::info!("no webhook configured, notifications disabled");
            return Ok(Self::disabled());
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let (sender, receiver) = mpsc::channel(QUEUE_SIZE);
        tokio::spawn(deliver_loop(client, config, receiver));
        Ok(Self {
            sender: Some(sender),
        })
    }

    /// Build a notifier around an existing channel.
    pub fn from_sender(sender: mpsc::Sender<Event>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Queue an event. Never blocks and never fails the caller.
    pub fn notify(&self, event: Event) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("webhook queue full, notification dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("webhook worker stopped, notification dropped");
            }
        }
    }
}

async fn deliver_loop(
    client: reqwest::Client,
    config: WebhookConfig,
    mut receiver: mpsc::Receiver<Event>,
) {
    while let Some(event) = receiver.recv().await {
        let url = match &event {
            Event::UserCreated { .. } => config.user_created_url.as_deref(),
            Event::ReportUploaded { .. } => config.report_uploaded_url.as_deref(),
        };
        let Some(url) = url else {
            continue;
        };
        let Some(payload) = payload(event).await else {
            continue;
        };

        match client.post(url).json(&payload).send().await {
            Ok(res) if res.status().is_success() => {
                tracing::debug!("webhook {url} answered {}", res.status());
            }
            Ok(res) => tracing::warn!("webhook {url} answered {}", res.status()),
            Err(err) => tracing::warn!("webhook {url} failed: {err}"),
        }
    }
    tracing::debug!("webhook worker stopped");
}

async fn payload(event: Event) -> Option<Value> {
    match event {
        Event::UserCreated {
            user_id,
            user_name,
            email,
        } => Some(json!({
            "user_id": user_id,
            "user_name": user_name,
            "email": email,
        })),
        Event::ReportUploaded {
            email,
            filename,
            file_path,
            file_size,
            upload_time,
            financial_data,
        } => {
            let bytes = match tokio::fs::read(&file_path).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!("cannot read {} for webhook: {err}", file_path.display());
                    return None;
                }
            };
            Some(json!({
                "email": email,
                "filename": filename,
                "file_type": PDF_MIMETYPE,
                "file_size": file_size,
                "file_data": STANDARD.encode(bytes),
                "upload_time": upload_time,
                "financial_data": financial_data,
            }))
        }
    }
}
