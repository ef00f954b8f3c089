//! # Store Adapter Tests
//!
//! Exercises the store adapter against scripted sessions: connection reuse,
//! liveness-probe reconnects, idle disconnect and the failure semantics the
//! dialogue engine relies on.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use galeriebot::store::GalleryStore;
use galeriebot::store_config::{ReconnectConfig, StoreConfig};
use galeriebot::store_errors::StoreError;
use galeriebot::transport::{StoreConnector, StoreSession};

/// Remote state and an operation journal shared by all scripted sessions.
#[derive(Default)]
struct RemoteState {
    files: Mutex<Vec<String>>,
    journal: Mutex<Vec<String>>,
}

impl RemoteState {
    fn journal(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    fn files(&self) -> Vec<String> {
        self.files.lock().unwrap().clone()
    }
}

struct MockSession {
    state: Arc<RemoteState>,
    fail_ops: bool,
    fail_next_probe: Arc<AtomicBool>,
}

impl MockSession {
    fn record(&self, entry: String) {
        self.state.journal.lock().unwrap().push(entry);
    }

    fn scripted_failure(&self) -> Result<(), StoreError> {
        if self.fail_ops {
            Err(StoreError::Rejected("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl StoreSession for MockSession {
    fn probe(&mut self) -> Result<(), StoreError> {
        self.record("probe".to_string());
        if self.fail_next_probe.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Connect("scripted probe failure".to_string()));
        }
        Ok(())
    }

    fn upload(&mut self, remote_name: &str, _data: &[u8]) -> Result<(), StoreError> {
        self.record(format!("upload {remote_name}"));
        self.scripted_failure()?;
        self.state.files.lock().unwrap().push(remote_name.to_string());
        Ok(())
    }

    fn download(&mut self, remote_name: &str) -> Result<Vec<u8>, StoreError> {
        self.record(format!("download {remote_name}"));
        self.scripted_failure()?;
        if self.state.files.lock().unwrap().iter().any(|f| f == remote_name) {
            Ok(vec![0u8; 4])
        } else {
            Err(StoreError::NotFound(remote_name.to_string()))
        }
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        self.record(format!("rename {from} -> {to}"));
        self.scripted_failure()?;
        let mut files = self.state.files.lock().unwrap();
        match files.iter_mut().find(|f| *f == from) {
            Some(entry) => {
                *entry = to.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(from.to_string())),
        }
    }

    fn remove(&mut self, remote_name: &str) -> Result<(), StoreError> {
        self.record(format!("remove {remote_name}"));
        self.scripted_failure()?;
        let mut files = self.state.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f != remote_name);
        if files.len() == before {
            return Err(StoreError::NotFound(remote_name.to_string()));
        }
        Ok(())
    }

    fn list(&mut self) -> Result<Vec<String>, StoreError> {
        self.record("list".to_string());
        self.scripted_failure()?;
        Ok(self.state.files())
    }

    fn quit(&mut self) -> Result<(), StoreError> {
        self.record("quit".to_string());
        Ok(())
    }
}

struct MockConnector {
    state: Arc<RemoteState>,
    connects: AtomicUsize,
    fail_connect: bool,
    fail_ops: bool,
    fail_next_probe: Arc<AtomicBool>,
}

impl MockConnector {
    fn new(fail_connect: bool, fail_ops: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(RemoteState::default()),
            connects: AtomicUsize::new(0),
            fail_connect,
            fail_ops,
            fail_next_probe: Arc::new(AtomicBool::new(false)),
        })
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl StoreConnector for MockConnector {
    fn connect(&self, _config: &StoreConfig) -> Result<Box<dyn StoreSession>, StoreError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(StoreError::Connect("scripted connect failure".to_string()));
        }
        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
            fail_ops: self.fail_ops,
            fail_next_probe: Arc::clone(&self.fail_next_probe),
        }))
    }
}

fn store_config() -> StoreConfig {
    StoreConfig {
        host: "gallery.example.org".to_string(),
        port: 21,
        user: "artist".to_string(),
        password: "secret".to_string(),
        remote_dir: "/www/gallery".to_string(),
    }
}

fn fast_reconnect(idle_timeout_secs: u64) -> ReconnectConfig {
    ReconnectConfig {
        max_retries: 1,
        base_retry_delay_ms: 10,
        max_retry_delay_ms: 20,
        operation_timeout_secs: 5,
        idle_timeout_secs,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_is_reused_across_operations() {
    let connector = MockConnector::new(false, false);
    let store = GalleryStore::new(store_config(), fast_reconnect(300), connector.clone());

    store
        .upload_bytes("Sunset_Öl_2024_40x60.jpg", vec![1, 2, 3])
        .await
        .unwrap();
    store
        .upload_bytes("Welle_Acryl_2021_30x30.jpg", vec![4, 5, 6])
        .await
        .unwrap();
    let listing = store.list().await.unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(connector.connects(), 1);

    // Each upload hit the transport exactly once, with the encoded name.
    let uploads: Vec<String> = connector
        .state
        .journal()
        .into_iter()
        .filter(|op| op.starts_with("upload"))
        .collect();
    assert_eq!(
        uploads,
        vec![
            "upload Sunset_Öl_2024_40x60.jpg".to_string(),
            "upload Welle_Acryl_2021_30x30.jpg".to_string(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_probe_triggers_reconnect() {
    let connector = MockConnector::new(false, false);
    let store = GalleryStore::new(store_config(), fast_reconnect(300), connector.clone());

    store
        .upload_bytes("Sunset_Öl_2024_40x60.jpg", vec![1])
        .await
        .unwrap();
    assert_eq!(connector.connects(), 1);

    // The next liveness probe fails; the operation must still succeed on a
    // fresh connection.
    connector.fail_next_probe.store(true, Ordering::SeqCst);
    let listing = store.list().await.unwrap();

    assert_eq!(listing, vec!["Sunset_Öl_2024_40x60.jpg".to_string()]);
    assert_eq!(connector.connects(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connect_failure_surfaces_after_retries() {
    let connector = MockConnector::new(true, false);
    let store = GalleryStore::new(store_config(), fast_reconnect(300), connector.clone());

    let err = store
        .upload_bytes("Sunset_Öl_2024_40x60.jpg", vec![1])
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Connect(_)));
    // One initial attempt plus max_retries backoff attempts.
    assert_eq!(connector.connects(), 2);
}

/// Against a store that fails every call, each operation reports an error and
/// no remote state changes.
#[tokio::test(flavor = "multi_thread")]
async fn test_failing_transport_reports_errors() {
    let connector = MockConnector::new(false, true);
    let store = GalleryStore::new(store_config(), fast_reconnect(300), connector.clone());

    let upload = store.upload_bytes("A_B_2020_10x10.jpg", vec![1]).await;
    assert!(matches!(upload, Err(StoreError::Rejected(_))));

    let rename = store.rename("A_B_2020_10x10.jpg", "C_B_2020_10x10.jpg").await;
    assert!(matches!(rename, Err(StoreError::Rejected(_))));

    let delete = store.delete("A_B_2020_10x10.jpg").await;
    assert!(matches!(delete, Err(StoreError::Rejected(_))));

    let listing = store.list().await;
    assert!(matches!(listing, Err(StoreError::Rejected(_))));

    assert!(connector.state.files().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rename_of_missing_entry_is_not_found() {
    let connector = MockConnector::new(false, false);
    let store = GalleryStore::new(store_config(), fast_reconnect(300), connector.clone());

    let err = store
        .rename("Verschollen_Öl_2019_20x20.jpg", "Neu_Öl_2019_20x20.jpg")
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(!err.is_transient());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_idle_watchdog_closes_the_connection() {
    let connector = MockConnector::new(false, false);
    let store = GalleryStore::new(store_config(), fast_reconnect(1), connector.clone());

    store
        .upload_bytes("Sunset_Öl_2024_40x60.jpg", vec![1])
        .await
        .unwrap();
    assert_eq!(connector.connects(), 1);

    // Let the idle window elapse and the watchdog run.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(connector.state.journal().contains(&"quit".to_string()));

    // The next operation reconnects from scratch.
    let listing = store.list().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(connector.connects(), 2);
}
