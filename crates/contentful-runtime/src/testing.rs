//! Test doubles for the host and the options source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use contentful_api::OptionsSource;
use contentful_core::models::{ConfigUpdate, OptionsMapping, SelectedConfig};

use crate::host::{ConfigUpdateCallback, HostBridge};

/// In-process host that counts notifications and can pull on demand.
pub struct RecordingHost {
    config: Option<SelectedConfig>,
    callback: Mutex<Option<ConfigUpdateCallback>>,
    notifications: AtomicUsize,
}

impl RecordingHost {
    pub fn new(config: Option<SelectedConfig>) -> Self {
        Self {
            config,
            callback: Mutex::new(None),
            notifications: AtomicUsize::new(0),
        }
    }

    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }

    pub fn pull(&self) -> Option<ConfigUpdate> {
        self.callback.lock().unwrap().as_ref().map(|cb| cb())
    }
}

impl HostBridge for RecordingHost {
    fn current_config(&self) -> Option<SelectedConfig> {
        self.config.clone()
    }

    fn on_request_config_update(&self, callback: ConfigUpdateCallback) {
        *self.callback.lock().unwrap() = Some(callback);
    }

    fn emit_config_update_available(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StubError(String);

#[derive(Clone)]
struct Reply {
    delay: Duration,
    result: Result<OptionsMapping, String>,
}

/// Options source that answers every call with the current canned reply.
pub struct StubSource {
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, String)>>,
    reply: Mutex<Reply>,
}

impl StubSource {
    pub fn ok(mapping: OptionsMapping) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
            reply: Mutex::new(Reply {
                delay: Duration::ZERO,
                result: Ok(mapping),
            }),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.reply.lock().unwrap() = Reply {
            delay: Duration::ZERO,
            result: Err(message.to_string()),
        };
    }

    pub fn respond_after(&self, delay: Duration, mapping: OptionsMapping) {
        *self.reply.lock().unwrap() = Reply {
            delay,
            result: Ok(mapping),
        };
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(space_id, api_key)` of the most recent call.
    pub fn last_call(&self) -> Option<(String, String)> {
        self.last_call.lock().unwrap().clone()
    }
}

impl OptionsSource for StubSource {
    type Error = StubError;

    async fn fetch_options(
        &self,
        space_id: &str,
        api_key: &str,
    ) -> Result<OptionsMapping, StubError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((space_id.to_string(), api_key.to_string()));
        let reply = self.reply.lock().unwrap().clone();
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result.map_err(StubError)
    }
}
