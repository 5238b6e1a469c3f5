//! Process-wide DynamoDB client.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;
use tokio::sync::OnceCell;

use crate::config::Config;

static CLIENT: OnceCell<Client> = OnceCell::const_new();

/// Returns the shared client, creating it on first use.
///
/// The SDK configuration is resolved once per process; later calls ignore
/// `config`. `Client` is a cheap handle, so the clone shares one connection
/// pool.
pub async fn shared_client(config: &Config) -> Client {
    CLIENT
        .get_or_init(|| build_client(config.region.clone(), config.endpoint_url.clone()))
        .await
        .clone()
}

async fn build_client(region: Option<String>, endpoint_url: Option<String>) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    if let Some(endpoint_url) = endpoint_url {
        tracing::info!(endpoint = %endpoint_url, "Using DynamoDB endpoint override");
        loader = loader.endpoint_url(endpoint_url);
    }

    let sdk_config = loader.load().await;
    tracing::debug!(region = ?sdk_config.region(), "DynamoDB client configured");

    Client::new(&sdk_config)
}
