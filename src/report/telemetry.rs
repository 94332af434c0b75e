// Access events, sent on a best-effort basis.

use crate::report::*;

use chrono::{SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::Serialize;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Who is looking at a report, as given on the login form.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Visitor {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct AccessEvent {
    pub timestamp: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub company: String,
    pub email: String,
    #[serde(rename = "accessCode")]
    pub access_code: String,
}

impl AccessEvent {
    pub fn new(visitor: &Visitor, access_code: &str) -> AccessEvent {
        AccessEvent {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            first_name: visitor.first_name.clone(),
            last_name: visitor.last_name.clone(),
            company: visitor.company.clone(),
            email: visitor.email.clone(),
            access_code: access_code.to_string(),
        }
    }
}

pub trait TelemetrySink: Send + Sync {
    fn send(&self, event: &AccessEvent) -> ReportResult<()>;
}

/// Posts the events as JSON.
pub struct HttpTelemetry {
    url: String,
    client: Client,
}

impl HttpTelemetry {
    pub fn new(url: &str, timeout: Duration) -> ReportResult<HttpTelemetry> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(HttpClientSnafu {})?;
        Ok(HttpTelemetry {
            url: url.to_string(),
            client,
        })
    }
}

impl TelemetrySink for HttpTelemetry {
    fn send(&self, event: &AccessEvent) -> ReportResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .context(TrackingSnafu { url: &self.url })?;
        let status = response.status();
        ensure!(
            status.is_success(),
            TrackingStatusSnafu {
                url: &self.url,
                status: status.as_u16()
            }
        );
        Ok(())
    }
}

/// Sends access events in the background.
///
/// Sending never blocks nor fails the caller: failures are logged and dropped.
pub struct Telemetry {
    sink: Option<Arc<dyn TelemetrySink>>,
    pending: Vec<JoinHandle<()>>,
}

impl Telemetry {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Telemetry {
        Telemetry {
            sink: Some(sink),
            pending: Vec::new(),
        }
    }

    pub fn disabled() -> Telemetry {
        Telemetry {
            sink: None,
            pending: Vec::new(),
        }
    }

    pub fn track(&mut self, event: AccessEvent) {
        let sink = match &self.sink {
            Some(s) => Arc::clone(s),
            None => {
                debug!("Telemetry: disabled, dropping {:?}", event);
                return;
            }
        };
        info!("Telemetry: tracking access with code {:?}", event.access_code);
        let spawned = std::thread::Builder::new()
            .name("telemetry".to_string())
            .spawn(move || match sink.send(&event) {
                Ok(()) => debug!("Telemetry: event sent"),
                Err(e) => warn!("Telemetry: failed to send the access event: {}", e),
            });
        match spawned {
            Ok(handle) => self.pending.push(handle),
            Err(e) => warn!("Telemetry: could not start the sender: {}", e),
        }
    }

    /// Waits for the events still being sent.
    pub fn finish(self) {
        for handle in self.pending {
            if handle.join().is_err() {
                warn!("Telemetry: the sender panicked");
            }
        }
    }
}
