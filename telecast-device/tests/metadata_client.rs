//! Integration tests for MetadataClient using wiremock.

use std::time::Duration;

use telecast_core::ChannelState;
use telecast_device::{ClientError, MetadataClient};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn channel(name: &str) -> ChannelState {
    ChannelState {
        channel_id: format!("id-{name}"),
        channel_name: name.to_owned(),
        channel_number: "1".to_owned(),
        channel_type_name: None,
    }
}

async fn client_for(server: &MockServer, retries: u32) -> MetadataClient {
    MetadataClient::builder(server.uri())
        .timeout(Duration::from_secs(1))
        .retries(retries)
        .build()
        .unwrap()
}

#[tokio::test]
async fn search_posts_channel_name_and_decodes_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/channel-metadata/search"))
        .and(body_json(serde_json::json!({"channelName": "M1 HD"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "channelName": "M1 HD",
            "channelLogoUrl": "https://logos.example/m1.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = client_for(&server, 0)
        .await
        .metadata_by_channel_name("M1 HD")
        .await
        .unwrap();
    assert_eq!(metadata.channel_name, "M1 HD");
    assert_eq!(
        metadata.channel_logo_url.as_deref(),
        Some("https://logos.example/m1.png")
    );
}

#[tokio::test]
async fn populate_returns_upserted_channels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/channel-metadata/populate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "channels": [
                {"channelId": "id-M1 HD", "channelName": "M1 HD", "channelNumber": "1"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upserted = client_for(&server, 0)
        .await
        .populate(vec![channel("M1 HD")])
        .await
        .unwrap();
    assert_eq!(upserted.len(), 1);
    assert_eq!(upserted[0].channel_name, "M1 HD");
}

#[tokio::test]
async fn transient_server_errors_are_retried() {
    let server = MockServer::start().await;
    // Two failures, then success; with two retries the call succeeds.
    Mock::given(method("POST"))
        .and(path("/api/v1/channel-metadata/search"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/channel-metadata/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "channelName": "M1 HD"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = client_for(&server, 2)
        .await
        .metadata_by_channel_name("M1 HD")
        .await
        .unwrap();
    assert_eq!(metadata.channel_name, "M1 HD");
}

#[tokio::test]
async fn retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/channel-metadata/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // one attempt plus two retries
        .mount(&server)
        .await;

    let error = client_for(&server, 2)
        .await
        .metadata_by_channel_name("M1 HD")
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Status(status) if status.as_u16() == 500));
}
