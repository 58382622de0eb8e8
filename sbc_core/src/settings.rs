//! Settings read from the environment.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use tracing::{debug, warn};

use crate::{
    refresher::DEFAULT_REFRESH_INTERVAL,
    retry::RetryConfig,
    upstream_client::{DEFAULT_REQUEST_TIMEOUT, URL},
};

pub static ENV_ADDRESS: &str = "ADDRESS";
pub static ENV_UPSTREAM_URL: &str = "UPSTREAM_URL";
pub static ENV_TEMPLATE_PATH: &str = "TEMPLATE_PATH";
pub static ENV_STATIC_DIR: &str = "STATIC_DIR";

pub static DEFAULT_ADDRESS: &str = "začret 69";
pub static DEFAULT_TEMPLATE_PATH: &str = "template.html";
pub static DEFAULT_STATIC_DIR: &str = "static";
pub const LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8081);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// the address sent to Simbio
    pub address: String,
    pub upstream_url: String,
    pub template_path: PathBuf,
    pub static_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    pub refresh_interval: Duration,
}

impl Settings {
    /// Load a `.env` file if there is one, then read the process environment.
    pub fn load() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the settings from `lookup`, falling back to the defaults for missing or blank keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let address = value(ENV_ADDRESS).unwrap_or_else(|| {
            warn!(
                address = DEFAULT_ADDRESS,
                "no ADDRESS environment variable set, using default"
            );
            String::from(DEFAULT_ADDRESS)
        });
        Self {
            address,
            upstream_url: value(ENV_UPSTREAM_URL).unwrap_or_else(|| String::from(URL)),
            template_path: value(ENV_TEMPLATE_PATH)
                .unwrap_or_else(|| String::from(DEFAULT_TEMPLATE_PATH))
                .into(),
            static_dir: value(ENV_STATIC_DIR)
                .unwrap_or_else(|| String::from(DEFAULT_STATIC_DIR))
                .into(),
            listen_addr: LISTEN_ADDR,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryConfig::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Load variables from a `.env` file. A missing file is fine.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        debug!(error = %err, "no .env file loaded");
    }
}
