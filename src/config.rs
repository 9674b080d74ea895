use crate::ui::{LIKE_LABEL, UNLIKE_LABEL};
use reqwest::Url;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/likes.json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_path: PathBuf,
}

impl ServerConfig {
    /// Reads `PORT` and `APP_DATA_PATH`.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        Self {
            port,
            data_path,
        }
    }
}

/// Texts shown on a like button for each state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub active: String,
    pub inactive: String,
}

impl Labels {
    pub fn for_state(&self, is_active: bool) -> &str {
        if is_active { &self.active } else { &self.inactive }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            active: UNLIKE_LABEL.to_string(),
            inactive: LIKE_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin the page was loaded from; action urls are resolved against it.
    pub base_url: Url,
    pub timeout: Duration,
    pub labels: Labels,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            labels: Labels::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }
}
