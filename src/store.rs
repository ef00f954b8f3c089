//! # Remote Store Module
//!
//! Gallery file operations over a single, lazily established remote session.
//!
//! The session is reused across operations and conversations: every call
//! first revalidates it with a cheap liveness probe and reconnects (with
//! exponential backoff and jitter) when the probe fails. A watchdog closes
//! the session after an idle period so the bot does not hold a remote login
//! open overnight.
//!
//! All operations are serialized through one mutex, which matches the remote
//! side's single working directory and keeps the session state coherent.

use std::path::Path;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;
use tokio::task;
use tokio::time;
use tracing::{debug, info, warn};

use crate::store_config::{ReconnectConfig, StoreConfig, IDLE_CHECK_INTERVAL_SECS};
use crate::store_errors::StoreError;
use crate::transport::{StoreConnector, StoreSession};

struct ConnectionSlot {
    session: Option<Box<dyn StoreSession>>,
    last_used: Instant,
}

/// Remote store adapter with connection reuse and idle disconnect.
pub struct GalleryStore {
    config: StoreConfig,
    reconnect: ReconnectConfig,
    connector: Arc<dyn StoreConnector>,
    slot: Arc<Mutex<ConnectionSlot>>,
}

impl GalleryStore {
    pub fn new(
        config: StoreConfig,
        reconnect: ReconnectConfig,
        connector: Arc<dyn StoreConnector>,
    ) -> Self {
        let slot = Arc::new(Mutex::new(ConnectionSlot {
            session: None,
            last_used: Instant::now(),
        }));
        tokio::spawn(idle_watchdog(
            Arc::downgrade(&slot),
            Duration::from_secs(reconnect.idle_timeout_secs),
        ));
        Self {
            config,
            reconnect,
            connector,
            slot,
        }
    }

    /// Upload a local file under the given remote name.
    pub async fn upload(&self, local_path: &Path, remote_name: &str) -> Result<(), StoreError> {
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", local_path.display())))?;
        self.upload_bytes(remote_name, data).await
    }

    /// Upload in-memory data under the given remote name.
    pub async fn upload_bytes(&self, remote_name: &str, data: Vec<u8>) -> Result<(), StoreError> {
        let name = remote_name.to_string();
        let size = data.len();
        debug!(remote_name = %name, size, "uploading to remote store");
        self.with_session(move |session| session.upload(&name, &data))
            .await
    }

    /// Rename a remote entry. Renames carry the metadata edits, so this is
    /// the workhorse of the edit flow.
    pub async fn rename(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let (from, to) = (from.to_string(), to.to_string());
        debug!(%from, %to, "renaming remote entry");
        self.with_session(move |session| session.rename(&from, &to))
            .await
    }

    /// Delete a remote entry.
    pub async fn delete(&self, remote_name: &str) -> Result<(), StoreError> {
        let name = remote_name.to_string();
        debug!(remote_name = %name, "deleting remote entry");
        self.with_session(move |session| session.remove(&name))
            .await
    }

    /// Names of all entries in the gallery directory.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        self.with_session(|session| session.list()).await
    }

    /// Fetch a remote entry's content.
    pub async fn download(&self, remote_name: &str) -> Result<Vec<u8>, StoreError> {
        let name = remote_name.to_string();
        debug!(remote_name = %name, "downloading remote entry");
        self.with_session(move |session| session.download(&name))
            .await
    }

    fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.reconnect.operation_timeout_secs)
    }

    /// Run one blocking transport operation against a live session.
    ///
    /// Holding the slot lock for the whole call serializes remote operations
    /// across conversations.
    async fn with_session<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn StoreSession) -> Result<T, StoreError> + Send + 'static,
    {
        let mut slot = self.slot.lock().await;
        self.ensure_session(&mut slot).await?;

        let session = slot.session.take().expect("session was just ensured");
        match run_blocking(session, self.operation_timeout(), op).await {
            Ok((session, result)) => {
                match &result {
                    // A transient failure means the session itself is suspect;
                    // drop it so the next operation reconnects.
                    Err(err) if err.is_transient() => {
                        warn!(error = %err, "dropping store session after transient failure")
                    }
                    _ => slot.session = Some(session),
                }
                slot.last_used = Instant::now();
                result
            }
            Err(err) => {
                // The session was consumed by a timed-out or crashed worker.
                warn!(error = %err, "store operation lost its session");
                Err(err)
            }
        }
    }

    async fn ensure_session(&self, slot: &mut ConnectionSlot) -> Result<(), StoreError> {
        if let Some(session) = slot.session.take() {
            match run_blocking(session, self.operation_timeout(), |s| s.probe()).await {
                Ok((session, Ok(()))) => {
                    slot.session = Some(session);
                    return Ok(());
                }
                Ok((_, Err(err))) => {
                    debug!(error = %err, "liveness probe failed, reconnecting")
                }
                Err(err) => debug!(error = %err, "liveness probe timed out, reconnecting"),
            }
        }
        let session = self.connect_with_backoff().await?;
        slot.session = Some(session);
        slot.last_used = Instant::now();
        Ok(())
    }

    async fn connect_with_backoff(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        let mut delay = Duration::from_millis(self.reconnect.base_retry_delay_ms);
        let max_delay = Duration::from_millis(self.reconnect.max_retry_delay_ms);
        let mut attempt: u32 = 0;
        loop {
            let connector = Arc::clone(&self.connector);
            let config = self.config.clone();
            let connected = task::spawn_blocking(move || connector.connect(&config))
                .await
                .map_err(|e| StoreError::Io(format!("connect worker crashed: {e}")))?;
            match connected {
                Ok(session) => {
                    if attempt > 0 {
                        info!(attempt, "reconnected to remote store");
                    }
                    return Ok(session);
                }
                Err(err) if err.is_transient() && attempt < self.reconnect.max_retries => {
                    let jitter_ms = rand::thread_rng()
                        .gen_range(0..=self.reconnect.base_retry_delay_ms / 2);
                    warn!(
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64 + jitter_ms,
                        "connect to remote store failed, backing off"
                    );
                    time::sleep(delay + Duration::from_millis(jitter_ms)).await;
                    attempt += 1;
                    delay = (delay * 2).min(max_delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Run a blocking session operation on a worker thread, bounded by a
/// deadline. On timeout the session is abandoned with the worker; the caller
/// reconnects on its next operation.
async fn run_blocking<T>(
    mut session: Box<dyn StoreSession>,
    deadline: Duration,
    op: impl FnOnce(&mut dyn StoreSession) -> Result<T, StoreError> + Send + 'static,
) -> Result<(Box<dyn StoreSession>, Result<T, StoreError>), StoreError>
where
    T: Send + 'static,
{
    let worker = task::spawn_blocking(move || {
        let result = op(session.as_mut());
        (session, result)
    });
    match time::timeout(deadline, worker).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(join_err)) => Err(StoreError::Io(format!("store worker crashed: {join_err}"))),
        Err(_) => Err(StoreError::Timeout(format!(
            "no response from remote store within {}s",
            deadline.as_secs()
        ))),
    }
}

/// Closes the session once it has been idle for the configured period.
///
/// Holds only a weak reference so dropping the store ends the task.
async fn idle_watchdog(slot: Weak<Mutex<ConnectionSlot>>, idle_timeout: Duration) {
    let check_interval = Duration::from_secs(IDLE_CHECK_INTERVAL_SECS).min(idle_timeout);
    loop {
        time::sleep(check_interval).await;
        let Some(slot) = slot.upgrade() else { break };
        let mut guard = slot.lock().await;
        if guard.session.is_some() && guard.last_used.elapsed() >= idle_timeout {
            info!(
                idle_secs = guard.last_used.elapsed().as_secs(),
                "closing idle store connection"
            );
            if let Some(mut session) = guard.session.take() {
                task::spawn_blocking(move || {
                    let _ = session.quit();
                });
            }
        }
    }
}
