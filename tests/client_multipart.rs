use httpmock::prelude::*;
use partition_smoke::client::GeneralApiClient;
use partition_smoke::config::HarnessConfig;
use partition_smoke::contract::{DocumentRequest, OutputFormat, PartitionApi, Strategy};
use partition_smoke::error::SmokeError;
use partition_smoke::fixture::GzipFixture;
use std::fs;

const ROUTE: &str = "/general/v0/general";

#[tokio::test]
async fn posts_multipart_form_with_options() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("fake-text.txt");
    fs::write(&doc, "This is a test document to use for unit tests.").unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ROUTE)
                .body_contains("name=\"files\"")
                .body_contains("filename=\"fake-text.txt\"")
                .body_contains("text/plain")
                .body_contains("This is a test document")
                .body_contains("name=\"strategy\"")
                .body_contains("hi_res")
                .body_contains("name=\"output_format\"")
                .body_contains("text/csv")
                .body_contains("name=\"skip_infer_table_types\"");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body("type,text\nNarrativeText,hello\n");
        })
        .await;

    let client = GeneralApiClient::new(server.url(ROUTE));
    let request = DocumentRequest::new(vec![doc])
        .with_content_type("text/plain")
        .with_strategy(Strategy::HiRes)
        .with_output_format(OutputFormat::Csv)
        .with_skip_infer_table_types(["pdf", "docx"]);

    let response = client.send_document(&request).await.expect("request succeeds");
    mock.assert_async().await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "type,text\nNarrativeText,hello\n");
}

#[tokio::test]
async fn gzip_parts_are_tagged_and_hint_is_sent() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("fake-html.html");
    fs::write(&doc, "<html><body><p>Hello from the gzip test</p></body></html>").unwrap();
    let fixture = GzipFixture::create(&doc).unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(ROUTE)
                .body_contains("application/gzip")
                .body_contains(".html.gz\"")
                .body_contains("name=\"gz_uncompressed_content_type\"")
                .body_contains("name=\"strategy\"")
                .body_contains("auto");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"[{"text": "Hello from the gzip test", "metadata": {}}]"#);
        })
        .await;

    let client = GeneralApiClient::new(server.url(ROUTE));
    let request = DocumentRequest::new(vec![])
        .with_gzipped(vec![fixture.path().to_path_buf()])
        .with_content_type("text/html")
        .with_uncompressed_content_type("text/html");

    let response = client.send_document(&request).await.unwrap();
    mock.assert_async().await;
    assert!(response.is_ok());
}

#[tokio::test]
async fn non_200_is_returned_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("fake.doc");
    fs::write(&doc, "not really a doc").unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(ROUTE);
            then.status(422).body(r#"{"detail": "unsupported"}"#);
        })
        .await;

    let config = HarnessConfig {
        base_url: server.base_url(),
        ..HarnessConfig::default()
    };
    let client = GeneralApiClient::from_config(&config);

    let response = client
        .send_document(&DocumentRequest::new(vec![doc]))
        .await
        .unwrap();
    assert_eq!(response.status, 422);
    assert!(response.ensure_ok().is_err());
}

#[tokio::test]
async fn missing_file_is_a_fixture_error() {
    let client = GeneralApiClient::new("http://127.0.0.1:9/general/v0/general");
    let err = client
        .send_document(&DocumentRequest::new(vec!["/no/such/sample.pdf".into()]))
        .await
        .unwrap_err();
    assert!(matches!(err, SmokeError::Fixture { .. }));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("README.md");
    fs::write(&doc, "# Readme").unwrap();

    // Nothing listens on the discard port locally.
    let client = GeneralApiClient::new("http://127.0.0.1:9/general/v0/general");
    let err = client
        .send_document(&DocumentRequest::new(vec![doc]))
        .await
        .unwrap_err();
    assert!(matches!(err, SmokeError::Transport { .. }));
}

#[tokio::test]
async fn invalid_content_type_fails_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("fake-text.txt");
    fs::write(&doc, "This is a test document to use for unit tests.").unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(ROUTE);
            then.status(200).body("[]");
        })
        .await;

    let client = GeneralApiClient::new(server.url(ROUTE));
    let request = DocumentRequest::new(vec![doc]).with_content_type("not a mime type");
    let err = client.send_document(&request).await.unwrap_err();

    mock.assert_hits_async(0).await;
    match err {
        SmokeError::InvalidContentType { content_type, .. } => {
            assert_eq!(content_type, "not a mime type")
        }
        other => panic!("expected InvalidContentType, got {other:?}"),
    }
}
