use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::api::{
    models::{ChatReply, ChatRequest},
    ChatBackend,
};
use crate::identity::{IdentityStore, KeyValueStore, StorageError};
use crate::ui::{session_label, ChatMessage, ChatView};

pub const FALLBACK_REPLY: &str = "Desculpe, não consegui processar sua mensagem.";
pub const SEND_ERROR_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, or another send was still in flight.
    Ignored,
    Replied,
    Failed,
}

/// Drives one chat widget: identity, health polling and the send cycle.
///
/// Probes and sends may run on different worker threads. The connection flag
/// is only written under the view lock so it always agrees with what the view
/// shows. Only one send may be in flight; health probes may overlap and the
/// last one to finish sets the status.
pub struct ChatController<S: KeyValueStore, V: ChatView> {
    identity: Mutex<IdentityStore<S>>,
    backend: Arc<dyn ChatBackend>,
    view: Mutex<V>,
    connected: AtomicBool,
    sending: AtomicBool,
}

impl<S, V> ChatController<S, V>
where
    S: KeyValueStore + 'static,
    V: ChatView + 'static,
{
    pub fn new(identity: IdentityStore<S>, backend: Arc<dyn ChatBackend>, view: V) -> Arc<Self> {
        Arc::new(Self {
            identity: Mutex::new(identity),
            backend,
            view: Mutex::new(view),
            connected: AtomicBool::new(false),
            sending: AtomicBool::new(false),
        })
    }

    /// Shows the session label and starts health polling: one probe right away,
    /// then one per `interval` for as long as the runtime lives.
    pub fn init(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let label = session_label(&self.session_id());
        self.view().set_session_label(&label);

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let probe = Arc::clone(&controller);
                tokio::spawn(async move {
                    probe.check_health().await;
                });
            }
        })
    }

    pub async fn check_health(&self) -> bool {
        let online = match self.backend.health().await {
            Ok(health) if health.is_alive() => true,
            Ok(health) => {
                warn!("Health check reported status {:?}", health.status);
                false
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                false
            }
        };
        self.set_connection_status(online);
        online
    }

    pub fn set_connection_status(&self, online: bool) {
        let mut view = self.view();
        self.connected.store(online, Ordering::SeqCst);
        view.set_connection_status(online);
    }

    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::Ignored;
        }

        let loading_id = {
            let mut view = self.view();
            view.append_message(ChatMessage::user(message));
            view.clear_input();
            let id = view.show_loading();
            view.set_send_enabled(false);
            id
        };

        let request = {
            let identity = self.identity();
            ChatRequest {
                message: message.to_string(),
                session_id: identity.session_id().to_string(),
                client_id: identity.client_id().to_string(),
            }
        };

        let result = self.backend.chat(&request).await;

        let mut view = self.view();
        view.remove_loading(&loading_id);
        let outcome = match result {
            Ok(reply) => {
                view.append_message(ChatMessage::bot(reply_text(&reply)));
                SubmitOutcome::Replied
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                view.append_message(ChatMessage::error(SEND_ERROR_REPLY));
                SubmitOutcome::Failed
            }
        };

        self.sending.store(false, Ordering::SeqCst);
        view.set_send_enabled(true);
        view.focus_input();
        outcome
    }

    /// Starts a new conversation thread. The client id is kept.
    pub fn reset_session(&self) -> Result<String, StorageError> {
        let session_id = self.identity().reset_session()?.to_string();
        self.view().set_session_label(&session_label(&session_id));
        Ok(session_id)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    pub fn session_id(&self) -> String {
        self.identity().session_id().to_string()
    }

    pub fn client_id(&self) -> String {
        self.identity().client_id().to_string()
    }

    /// Runs `f` against the view, e.g. to read back or export the transcript.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.view())
    }

    fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn identity(&self) -> MutexGuard<'_, IdentityStore<S>> {
        self.identity.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn reply_text(reply: &ChatReply) -> &str {
    reply.text().unwrap_or(FALLBACK_REPLY)
}
