use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use telecast_core::{ChannelList, ChannelState, ForegroundApp, PowerState, VolumeState};
use tracing::debug;

use crate::request::{SetChannelRequest, SetVolumeRequest};

/// Errors from the HTTP clients in this crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The remote side could not be reached (connect failure, timeout,
    /// dropped connection).
    #[error("remote endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    /// The remote side answered with a non-success status.
    #[error("remote endpoint rejected the request with status {0}")]
    Status(reqwest::StatusCode),
    /// The response body did not decode into the expected shape.
    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to construct http client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Client for the television's local control API.
///
/// Thin request/decode wrapper: one method per capability, no retries, no
/// caching. Cloning is cheap — the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeviceClient {
    /// Creates a builder targeting the given base URL.
    pub fn builder(base_url: impl Into<String>) -> DeviceClientBuilder {
        DeviceClientBuilder {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        response.json().await.map_err(ClientError::Decode)
    }

    async fn post_command(&self, path: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        debug!(path, "device command accepted");
        Ok(())
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        debug!(path, "device command accepted");
        Ok(())
    }

    /// Current audio volume.
    pub async fn volume(&self) -> Result<VolumeState, ClientError> {
        self.get_json("/media/volume").await
    }

    /// Raises the volume by one step.
    pub async fn volume_up(&self) -> Result<(), ClientError> {
        self.post_command("/media/volume/up").await
    }

    /// Lowers the volume by one step.
    pub async fn volume_down(&self) -> Result<(), ClientError> {
        self.post_command("/media/volume/down").await
    }

    /// Sets the volume to an absolute level.
    pub async fn set_volume(&self, level: u8) -> Result<(), ClientError> {
        self.post_json("/media/volume", &SetVolumeRequest { level })
            .await
    }

    /// Currently tuned channel.
    pub async fn channel(&self) -> Result<ChannelState, ClientError> {
        self.get_json("/tv/channel").await
    }

    /// Full channel listing from the tuner.
    pub async fn channel_list(&self) -> Result<ChannelList, ClientError> {
        self.get_json("/tv/channels").await
    }

    /// Tunes to the given channel.
    pub async fn set_channel(&self, channel_id: impl Into<String>) -> Result<(), ClientError> {
        self.post_json(
            "/tv/channel",
            &SetChannelRequest {
                channel_id: channel_id.into(),
            },
        )
        .await
    }

    /// Current power state.
    pub async fn power_state(&self) -> Result<PowerState, ClientError> {
        self.get_json("/system/power").await
    }

    /// Application currently in the foreground.
    pub async fn foreground_app(&self) -> Result<ForegroundApp, ClientError> {
        self.get_json("/system/foreground-app").await
    }
}

/// Builder for [`DeviceClient`].
#[derive(Debug, Clone)]
pub struct DeviceClientBuilder {
    base_url: String,
    timeout: Duration,
}

impl DeviceClientBuilder {
    /// Transport-level timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<DeviceClient, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ClientError::Build)?;
        Ok(DeviceClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_owned(),
        })
    }
}
