//! # Store Configuration Module
//!
//! Connection settings for the remote gallery store and the reconnect/idle
//! policy applied by the store adapter.

// Constants for the store adapter
pub const DEFAULT_FTP_PORT: u16 = 21;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;
pub const IDLE_CHECK_INTERVAL_SECS: u64 = 30;

/// Where and how to reach the remote gallery store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote host name or address
    pub host: String,
    /// Control-connection port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password
    pub password: String,
    /// Working directory holding the gallery files
    pub remote_dir: String,
}

/// Reconnect and timeout policy for the store adapter
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of reconnect attempts per operation
    pub max_retries: u32,
    /// Base delay between reconnect attempts in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between reconnect attempts in milliseconds
    pub max_retry_delay_ms: u64,
    /// Deadline for a single remote operation in seconds
    pub operation_timeout_secs: u64,
    /// Idle period after which the connection is closed in seconds
    pub idle_timeout_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 500,  // 0.5 seconds
            max_retry_delay_ms: 8000,  // 8 seconds
            operation_timeout_secs: 30,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}
