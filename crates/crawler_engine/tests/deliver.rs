//! Webhook delivery: payload shape and fault mapping.

use std::sync::Once;

use crawler_core::{Engagement, PostRecord};
use crawler_engine::{CrawlError, DeliverySink, WebhookSink};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(crawler_logging::initialize_for_tests);
}

fn sample_record(text: &str) -> PostRecord {
    PostRecord {
        text: text.to_string(),
        author: "someone".to_string(),
        timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        engagement: Engagement {
            likes: "1.2K".to_string(),
            retweets: "0".to_string(),
        },
        images: vec!["https://img/1.jpg".to_string()],
        link: "/someone/status/1".to_string(),
    }
}

#[tokio::test]
async fn delivery_posts_the_expected_json_shape() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "search_term": "#rust",
            "records": [
                { "text": "alpha", "engagement": { "likes": "1.2K" } },
                { "text": "beta" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = WebhookSink::new(format!("{}/hook", server.uri()));
    let records = vec![sample_record("alpha"), sample_record("beta")];
    sink.deliver("#rust", &records)
        .await
        .expect("endpoint accepts the payload");
}

#[tokio::test]
async fn rejected_status_is_surfaced_with_its_code() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let sink = WebhookSink::new(server.uri());
    let err = sink
        .deliver("#rust", &[sample_record("alpha")])
        .await
        .expect_err("404 must fail the delivery");
    assert!(matches!(err, CrawlError::DeliveryStatus(404)));
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_a_transport_fault() {
    init_logging();
    // Port 9 (discard) refuses connections on loopback.
    let sink = WebhookSink::new("http://127.0.0.1:9/hook");
    let err = sink
        .deliver("#rust", &[sample_record("alpha")])
        .await
        .expect_err("nothing is listening there");
    assert!(matches!(err, CrawlError::DeliveryTransport(_)));
}
