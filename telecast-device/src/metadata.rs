use std::time::Duration;

use telecast_core::{ChannelMetadata, ChannelState};
use tracing::warn;

use crate::client::ClientError;
use crate::request::{
    ChannelMetadataSearchRequest, PopulateChannelsRequest, PopulateChannelsResponse,
};

/// Client for the channel-metadata web service.
///
/// The metadata store itself is somebody else's problem; this facade only
/// knows the service's two endpoints. Requests are retried up to the
/// configured number of extra attempts — both operations are idempotent.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
    retries: u32,
}

impl MetadataClient {
    /// Creates a builder targeting the given base URL.
    pub fn builder(base_url: impl Into<String>) -> MetadataClientBuilder {
        MetadataClientBuilder {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            retries: 3,
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;
        loop {
            let result = self.try_post_json(&url, body).await;
            match result {
                Ok(value) => return Ok(value),
                // A body that decoded wrongly will decode wrongly again.
                Err(ClientError::Decode(_)) => return result,
                Err(error) if attempt < self.retries => {
                    attempt += 1;
                    warn!(url, attempt, %error, "metadata request failed, retrying");
                }
                Err(_) => return result,
            }
        }
    }

    async fn try_post_json<B, T>(&self, url: &str, body: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        response.json().await.map_err(ClientError::Decode)
    }

    /// Looks up editorial metadata for one channel by name.
    pub async fn metadata_by_channel_name(
        &self,
        channel_name: impl Into<String>,
    ) -> Result<ChannelMetadata, ClientError> {
        self.post_json(
            "/api/v1/channel-metadata/search",
            &ChannelMetadataSearchRequest {
                channel_name: channel_name.into(),
            },
        )
        .await
    }

    /// Bulk-upserts channels into the metadata service.
    pub async fn populate(
        &self,
        channels: Vec<ChannelState>,
    ) -> Result<Vec<ChannelState>, ClientError> {
        let response: PopulateChannelsResponse = self
            .post_json(
                "/api/v1/channel-metadata/populate",
                &PopulateChannelsRequest { channels },
            )
            .await?;
        Ok(response.channels)
    }
}

/// Builder for [`MetadataClient`].
#[derive(Debug, Clone)]
pub struct MetadataClientBuilder {
    base_url: String,
    timeout: Duration,
    retries: u32,
}

impl MetadataClientBuilder {
    /// Transport-level timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after a failed request (0 disables retries).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn build(self) -> Result<MetadataClient, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ClientError::Build)?;
        Ok(MetadataClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            retries: self.retries,
        })
    }
}
