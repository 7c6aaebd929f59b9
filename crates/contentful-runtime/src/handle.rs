//! The mounted form: an actor task that owns [`ConfigForm`] and runs the
//! side effects its `update()` asks for.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use contentful_api::OptionsSource;
use contentful_core::config::FetchSettings;
use contentful_core::models::{ConfigUpdate, SelectedConfig};

use crate::debounce::Debouncer;
use crate::form::{Action, ConfigForm, FetchRequest, FormView, Message};
use crate::host::HostBridge;
use crate::RuntimeError;

/// Cheap, cloneable handle to a mounted config form.
///
/// The form unmounts when the last handle is dropped: the actor stops, and
/// any pending debounce timer is cancelled.
#[derive(Clone)]
pub struct FormHandle {
    tx: mpsc::UnboundedSender<FormCommand>,
    config: watch::Receiver<SelectedConfig>,
}

enum FormCommand {
    Update(Message),
    TimerFired(u64),
    View {
        reply: oneshot::Sender<FormView>,
    },
}

impl FormHandle {
    /// Seed the form from `host`, register the host's pull callback, and
    /// start the actor. Fetches immediately if the seeded credentials are
    /// already usable.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount<S>(host: Arc<dyn HostBridge>, source: Arc<S>, settings: &FetchSettings) -> Self
    where
        S: OptionsSource + 'static,
    {
        let seed = host.current_config();
        let (form, mount_action) = ConfigForm::mount(seed.as_ref(), settings.stale_response_policy);

        let (config_tx, config_rx) = watch::channel(form.snapshot());
        let pull = config_rx.clone();
        host.on_request_config_update(Box::new(move || ConfigUpdate {
            config: pull.borrow().clone(),
        }));

        let (tx, rx) = mpsc::unbounded_channel();
        let actor = FormActor {
            form,
            debouncer: Debouncer::new(settings.debounce()),
            source,
            host,
            config_tx,
            self_tx: tx.downgrade(),
        };
        tracing::debug!(
            debounce_ms = settings.debounce_ms,
            policy = ?settings.stale_response_policy,
            "Config form mounted"
        );
        tokio::spawn(actor.run(rx, mount_action));

        Self {
            tx,
            config: config_rx,
        }
    }

    pub fn edit_api_key(&self, value: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(FormCommand::Update(Message::ApiKeyChanged(value.into())))
    }

    pub fn edit_space_id(&self, value: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(FormCommand::Update(Message::SpaceIdChanged(value.into())))
    }

    pub fn select_map_name(&self, value: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(FormCommand::Update(Message::MapNameSelected(value.into())))
    }

    pub fn select_playlist_id(&self, value: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(FormCommand::Update(Message::PlaylistIdSelected(value.into())))
    }

    /// Current view model, after every command sent before this call.
    pub async fn view(&self) -> Result<FormView, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(FormCommand::View { reply })?;
        rx.await.map_err(|_| RuntimeError::FormClosed)
    }

    /// Latest published config, as the host would pull it.
    pub fn snapshot(&self) -> SelectedConfig {
        self.config.borrow().clone()
    }

    fn send(&self, cmd: FormCommand) -> Result<(), RuntimeError> {
        self.tx.send(cmd).map_err(|_| RuntimeError::FormClosed)
    }
}

struct FormActor<S> {
    form: ConfigForm,
    debouncer: Debouncer,
    source: Arc<S>,
    host: Arc<dyn HostBridge>,
    config_tx: watch::Sender<SelectedConfig>,
    // Weak, so timers and fetches in flight don't keep the form mounted.
    self_tx: mpsc::WeakUnboundedSender<FormCommand>,
}

impl<S> FormActor<S>
where
    S: OptionsSource + 'static,
{
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<FormCommand>, mount_action: Action) {
        self.perform(mount_action);

        while let Some(cmd) = rx.recv().await {
            match cmd {
                FormCommand::Update(msg) => self.handle(msg),
                FormCommand::TimerFired(generation) => {
                    if self.debouncer.take(generation) {
                        self.handle(Message::DebounceElapsed);
                    } else {
                        tracing::trace!(generation, "Ignoring superseded debounce timer");
                    }
                }
                FormCommand::View { reply } => {
                    let _ = reply.send(self.form.view());
                }
            }
        }

        tracing::debug!("Config form unmounted");
    }

    fn handle(&mut self, msg: Message) {
        let action = self.form.update(msg);
        // Publish before notifying so a pull triggered by the notification
        // already sees the new value.
        let snapshot = self.form.snapshot();
        self.config_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
        self.perform(action);
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::ScheduleFetch => {
                let self_tx = self.self_tx.clone();
                let generation = self.debouncer.schedule(move |generation| {
                    if let Some(tx) = self_tx.upgrade() {
                        let _ = tx.send(FormCommand::TimerFired(generation));
                    }
                });
                tracing::trace!(generation, delay = ?self.debouncer.delay(), "Fetch scheduled");
            }
            Action::Fetch(request) => self.spawn_fetch(request),
            Action::NotifyHost => self.host.emit_config_update_available(),
        }
    }

    /// In-flight fetches are never cancelled; the form decides what to do
    /// with a completion when it arrives.
    fn spawn_fetch(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let self_tx = self.self_tx.clone();
        let FetchRequest { id, credentials } = request;
        tracing::debug!(request = id, space_id = %credentials.space_id, "Fetching Contentful options");

        tokio::spawn(async move {
            let result = source
                .fetch_options(&credentials.space_id, &credentials.api_key)
                .await
                .map_err(|e| e.to_string());
            if let Some(tx) = self_tx.upgrade() {
                let _ = tx.send(FormCommand::Update(Message::FetchCompleted {
                    request: id,
                    result,
                }));
            }
        });
    }
}
