use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use svcamount_api::{AmountClient, AmountConfig, TransportError, UsageFetcher};

async fn kafka_usage(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "Bearer token-1");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing token".to_string());
    }
    (
        StatusCode::OK,
        r#"{"items":[{"name":"partitions","used":"3","size":"10"}]}"#.to_string(),
    )
}

async fn spawn_amount_service() -> String {
    let router = Router::new()
        .route("/kafka/events", get(kafka_usage))
        .route("/hdfs", get(|| async { "not json" }))
        .route("/hbase/ns", get(|| async { r#"{"items": "wrong"}"# }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{address}")
}

fn client_for(base_url: &str) -> AmountClient {
    let config = AmountConfig::new(base_url).expect("loopback base url is valid");
    AmountClient::new(&config).expect("client builds")
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, format!("Bearer {token}").parse().expect("header value"));
    headers
}

#[tokio::test]
async fn fetches_usage_and_forwards_authorization() {
    let base_url = spawn_amount_service().await;
    let client = client_for(&base_url);
    assert_eq!(client.base_url(), base_url);

    let report = client
        .fetch_usage("/kafka/events?service=kafka", &bearer("token-1"))
        .await
        .expect("usage fetched");
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].name, "partitions");
    assert_eq!(report.items[0].size.as_deref(), Some("10"));
}

#[tokio::test]
async fn non_success_status_is_surfaced_with_body() {
    let base_url = spawn_amount_service().await;
    let err = client_for(&base_url)
        .fetch_usage("/kafka/events", &HeaderMap::new())
        .await
        .expect_err("unauthorized");
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "missing token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_path_is_a_status_error() {
    let base_url = spawn_amount_service().await;
    let err = client_for(&base_url)
        .fetch_usage("/mongodb/salesdb", &HeaderMap::new())
        .await
        .expect_err("not routed");
    assert!(matches!(err, TransportError::Status { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn invalid_json_and_wrong_shape_are_decode_errors() {
    let base_url = spawn_amount_service().await;
    let client = client_for(&base_url);

    let err = client.fetch_usage("/hdfs?path=/x", &HeaderMap::new()).await.expect_err("not json");
    assert!(matches!(err, TransportError::Json(_)), "{err:?}");

    let err = client.fetch_usage("/hbase/ns", &HeaderMap::new()).await.expect_err("wrong shape");
    assert!(matches!(err, TransportError::Schema(_)), "{err:?}");
}
