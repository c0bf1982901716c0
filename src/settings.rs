use std::path::PathBuf;
use std::time::Duration;

use crate::kube::ClusterId;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_REFRESH_SECS: u64 = 15;
pub const DEFAULT_LOG_REFRESH_SECS: u64 = 4;
pub const DEFAULT_LOG_TAIL: usize = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where the topology comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSettings {
    Http {
        api_url: String,
        token: Option<String>,
        timeout: Duration,
    },
    File(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub cluster: ClusterId,
    pub source: SourceSettings,
    pub refresh_interval: Duration,
    pub log_refresh_interval: Duration,
    pub log_tail: usize,
}

impl Settings {
    pub fn describe_source(&self) -> String {
        match &self.source {
            SourceSettings::Http { api_url, .. } => api_url.clone(),
            SourceSettings::File(path) => format!("file {}", path.display()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cluster: ClusterId::new("local"),
            source: SourceSettings::Http {
                api_url: DEFAULT_API_URL.to_owned(),
                token: None,
                timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            log_refresh_interval: Duration::from_secs(DEFAULT_LOG_REFRESH_SECS),
            log_tail: DEFAULT_LOG_TAIL,
        }
    }
}
