//! FTP transport behind the store adapter.
//!
//! The adapter talks to the remote store through the [`StoreSession`] trait so
//! tests can substitute a scripted session. The production implementation
//! wraps the blocking `suppaftp` client; the store adapter drives it from a
//! blocking worker thread.

use std::io::Cursor;
use std::time::Duration;

use suppaftp::{FtpError, FtpStream, Status};
use tracing::debug;

use crate::store_config::StoreConfig;
use crate::store_errors::StoreError;

/// One live, logged-in session with the remote store.
///
/// All methods are blocking; callers run them on a dedicated worker thread.
pub trait StoreSession: Send {
    /// Lightweight liveness check on a reused session.
    fn probe(&mut self) -> Result<(), StoreError>;
    fn upload(&mut self, remote_name: &str, data: &[u8]) -> Result<(), StoreError>;
    fn download(&mut self, remote_name: &str) -> Result<Vec<u8>, StoreError>;
    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError>;
    fn remove(&mut self, remote_name: &str) -> Result<(), StoreError>;
    fn list(&mut self) -> Result<Vec<String>, StoreError>;
    /// Polite session shutdown; errors are ignored by callers.
    fn quit(&mut self) -> Result<(), StoreError>;
}

/// Factory for [`StoreSession`]s. The store adapter calls this lazily on the
/// first operation and again whenever a session is lost.
pub trait StoreConnector: Send + Sync {
    fn connect(&self, config: &StoreConfig) -> Result<Box<dyn StoreSession>, StoreError>;
}

/// Connects to the FTP server that hosts the gallery web space.
pub struct FtpConnector {
    socket_timeout: Duration,
}

impl FtpConnector {
    /// `socket_timeout` bounds individual socket reads and writes so a dead
    /// peer cannot stall the worker thread past the operation deadline.
    pub fn new(socket_timeout: Duration) -> Self {
        Self { socket_timeout }
    }
}

impl StoreConnector for FtpConnector {
    fn connect(&self, config: &StoreConfig) -> Result<Box<dyn StoreSession>, StoreError> {
        let addr = format!("{}:{}", config.host, config.port);
        let mut stream = FtpStream::connect(&addr)
            .map_err(|e| StoreError::Connect(format!("{addr}: {e}")))?;

        stream
            .get_ref()
            .set_read_timeout(Some(self.socket_timeout))
            .map_err(|e| StoreError::Io(e.to_string()))?;
        stream
            .get_ref()
            .set_write_timeout(Some(self.socket_timeout))
            .map_err(|e| StoreError::Io(e.to_string()))?;

        stream.login(&config.user, &config.password).map_err(|e| match e {
            FtpError::UnexpectedResponse(resp) => {
                StoreError::Auth(format!("login as {}: {}", config.user, response_text(&resp)))
            }
            other => map_ftp_error(other),
        })?;
        stream.cwd(&config.remote_dir).map_err(map_ftp_error)?;

        debug!(host = %config.host, dir = %config.remote_dir, "FTP session established");
        Ok(Box::new(FtpSession { stream }))
    }
}

struct FtpSession {
    stream: FtpStream,
}

impl StoreSession for FtpSession {
    fn probe(&mut self) -> Result<(), StoreError> {
        // Asking for the current directory is enough to notice a dead control
        // connection before the real operation is attempted.
        self.stream.pwd().map(|_| ()).map_err(map_ftp_error)
    }

    fn upload(&mut self, remote_name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.stream
            .put_file(remote_name, &mut Cursor::new(data))
            .map(|_| ())
            .map_err(map_ftp_error)
    }

    fn download(&mut self, remote_name: &str) -> Result<Vec<u8>, StoreError> {
        self.stream
            .retr_as_buffer(remote_name)
            .map(|buffer| buffer.into_inner())
            .map_err(map_ftp_error)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        self.stream.rename(from, to).map_err(map_ftp_error)
    }

    fn remove(&mut self, remote_name: &str) -> Result<(), StoreError> {
        self.stream.rm(remote_name).map_err(map_ftp_error)
    }

    fn list(&mut self) -> Result<Vec<String>, StoreError> {
        let entries = self.stream.nlst(None).map_err(map_ftp_error)?;
        // Some servers return paths rather than bare names.
        Ok(entries
            .into_iter()
            .map(|entry| match entry.rsplit_once('/') {
                Some((_, name)) => name.to_string(),
                None => entry,
            })
            .filter(|name| name != "." && name != "..")
            .collect())
    }

    fn quit(&mut self) -> Result<(), StoreError> {
        self.stream.quit().map_err(map_ftp_error)
    }
}

fn response_text(resp: &suppaftp::types::Response) -> String {
    String::from_utf8_lossy(&resp.body).trim().to_string()
}

fn map_ftp_error(err: FtpError) -> StoreError {
    match err {
        FtpError::ConnectionError(e) => StoreError::Connect(e.to_string()),
        FtpError::UnexpectedResponse(resp) => match resp.status {
            Status::NotLoggedIn => StoreError::Auth(response_text(&resp)),
            Status::FileUnavailable => StoreError::NotFound(response_text(&resp)),
            _ => StoreError::Rejected(response_text(&resp)),
        },
        other => StoreError::Io(other.to_string()),
    }
}
