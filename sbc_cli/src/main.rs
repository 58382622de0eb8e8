use std::{env::current_dir, fs::write, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use sbc_core::{
    settings::{self, ENV_ADDRESS},
    ApiProjection, CacheState, Refresher, Settings, UpstreamClient,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
pub struct Arguments {
    /// the address to query, instead of the ADDRESS environment variable
    #[arg(long)]
    pub address: Option<String>,
    /// where to write the schedule, defaults to schedule.json in the current directory
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Arguments {
    fn settings(&self) -> Settings {
        settings::load_dotenv();
        Settings::from_lookup(|key| match &self.address {
            Some(address) if key == ENV_ADDRESS => Some(address.clone()),
            _ => std::env::var(key).ok(),
        })
    }
}

/// Fetch the schedule once, with retries, and return the API view of it.
async fn fetch(settings: &Settings) -> Result<ApiProjection> {
    let cache = Arc::new(CacheState::new());
    let client = UpstreamClient::new(
        &settings.upstream_url,
        &settings.address,
        settings.request_timeout,
    )?;
    info!(address = client.address(), "fetching schedule");
    let refresher = Refresher::new(Arc::new(client), Arc::clone(&cache), CancellationToken::new())
        .with_retry(settings.retry);
    refresher.refresh().await?;
    Ok(cache.read_api().await)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Arguments::parse();
    let settings = args.settings();
    let schedule = fetch(&settings).await?;
    let path = match args.output {
        Some(path) => path,
        None => {
            let mut path = current_dir()?;
            path.push("schedule.json");
            path
        }
    };
    write(&path, serde_json::to_string_pretty(&schedule)?)?;
    info!(path = %path.display(), "schedule written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sbc_core::{RefreshError, RetryConfig};
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    use super::*;

    fn get_test_settings(mock_server: &MockServer) -> Settings {
        let uri = mock_server.uri();
        let mut settings = Settings::from_lookup(|key| match key {
            "UPSTREAM_URL" => Some(uri.clone()),
            "ADDRESS" => Some("začret 69".to_string()),
            _ => None,
        });
        settings.retry = RetryConfig {
            attempts: 3,
            delay: Duration::from_millis(1),
        };
        settings
    }

    #[test]
    fn test_address_argument_overrides_environment() {
        let args = Arguments::parse_from(["sbc_cli", "--address", "Partizanska cesta 1"]);
        assert_eq!(args.settings().address, "Partizanska cesta 1");
        assert_eq!(args.output, None);
    }

    #[tokio::test]
    async fn test_fetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id":"1","name":"Jane","query":"začret 69","city":"Maribor","next_mko":"2024-01-10","next_emb":"2024-01-12","next_bio":"2024-01-11"}]"#,
            ))
            .mount(&mock_server)
            .await;

        let schedule = fetch(&get_test_settings(&mock_server)).await.unwrap();
        assert_eq!(schedule.city, "Maribor");
        assert_eq!(schedule.bio_date, "2024-01-11");
    }

    #[tokio::test]
    async fn test_fetch_fails_after_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let err = fetch(&get_test_settings(&mock_server)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RefreshError>(),
            Some(RefreshError::RetryExhausted { attempts: 3, .. })
        ));
    }
}
