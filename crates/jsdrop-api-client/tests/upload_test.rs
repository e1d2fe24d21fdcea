use std::sync::{Arc, Mutex};

use jsdrop_api_client::{
    AlertId, AlertPresenter, AlertSink, AlertStyle, ClientOutcome, SelectedFile, UploadClient,
};
use mockito::{Matcher, Server};

const UPLOAD_PATH: &str = "/api/bundle/js-upload";

#[derive(Default)]
struct RecordingSink {
    mounted: Mutex<Vec<(String, AlertStyle)>>,
}

impl RecordingSink {
    fn mounted(&self) -> Vec<(String, AlertStyle)> {
        self.mounted.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingSink {
    fn mount(&self, _id: AlertId, message: &str, style: AlertStyle) {
        self.mounted
            .lock()
            .unwrap()
            .push((message.to_string(), style));
    }

    fn fade_out(&self, _id: AlertId) {}

    fn detach(&self, _id: AlertId) {}
}

fn bundle() -> SelectedFile {
    SelectedFile::new("bundle.js", "text/javascript", b"console.log(1);".to_vec())
}

#[tokio::test]
async fn test_successful_upload_shows_location() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .match_header("accept", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="JSUpload""#.to_string()),
            Matcher::Regex(r#"filename="bundle.js""#.to_string()),
            Matcher::Regex("console.log".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"image":"bundle-1700000000000.js","location":"http://cdn/bundle-1700000000000.js"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let presenter = AlertPresenter::new(sink.clone());

    let file = bundle();
    let (outcome, _) = client.submit(Some(&file), &presenter).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        ClientOutcome::Uploaded {
            key: "bundle-1700000000000.js".to_string(),
            location: "http://cdn/bundle-1700000000000.js".to_string(),
        }
    );

    let mounted = sink.mounted();
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0].0, "File Uploaded: http://cdn/bundle-1700000000000.js");
    assert_eq!(mounted[0].1.background, "green");
    assert_eq!(mounted[0].1.foreground, "#FFFFFF");
}

#[tokio::test]
async fn test_size_limit_error_shows_max_size() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":{"code":"LIMIT_FILE_SIZE","message":"File too large","field":"JSUpload"}}"#,
        )
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let presenter = AlertPresenter::new(sink.clone());

    let file = bundle();
    let (outcome, _) = client.submit(Some(&file), &presenter).await;

    mock.assert_async().await;
    assert!(matches!(outcome, ClientOutcome::Rejected { code: Some(ref c), .. } if c == "LIMIT_FILE_SIZE"));
    assert_eq!(sink.mounted()[0].0, "Max size: 20MB");
    assert_eq!(sink.mounted()[0].1.background, "red");
}

#[tokio::test]
async fn test_type_rejection_shows_server_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Error: JS Only!"}"#)
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let presenter = AlertPresenter::new(sink.clone());

    let file = SelectedFile::new("logo.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    let (outcome, _) = client.submit(Some(&file), &presenter).await;

    assert_eq!(
        outcome,
        ClientOutcome::Rejected {
            code: None,
            message: "Error: JS Only!".to_string()
        }
    );
    let mounted = sink.mounted();
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0].0, "Error: JS Only!");
    assert_eq!(mounted[0].1.background, "red");
}

#[tokio::test]
async fn test_other_coded_error_shows_server_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":{"code":"LIMIT_UNEXPECTED_FILE","message":"Unexpected field","field":"avatar"}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let presenter = AlertPresenter::new(sink.clone());

    let file = bundle();
    let (outcome, _) = client.submit(Some(&file), &presenter).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        ClientOutcome::Rejected {
            code: Some("LIMIT_UNEXPECTED_FILE".to_string()),
            message: "Unexpected field".to_string()
        }
    );

    let mounted = sink.mounted();
    assert_eq!(mounted.len(), 1);
    assert_eq!(mounted[0].0, "Unexpected field");
    assert_eq!(mounted[0].1.background, "red");
}

#[tokio::test]
async fn test_no_file_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let presenter = AlertPresenter::new(sink.clone());

    let (outcome, _) = client.submit(None, &presenter).await;

    mock.assert_async().await;
    assert_eq!(outcome, ClientOutcome::NoFileSelected);
    assert_eq!(sink.mounted().len(), 1);
    assert_eq!(sink.mounted()[0].0, "Please upload file");
    assert_eq!(sink.mounted()[0].1.background, "red");
}

#[tokio::test]
async fn test_server_error_status_is_transport_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(500)
        .with_body(r#"{"error":"Failed to store file","code":"STORAGE_ERROR"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let sink = Arc::new(RecordingSink::default());
    let presenter = AlertPresenter::new(sink.clone());

    let file = bundle();
    let (outcome, _) = client.submit(Some(&file), &presenter).await;

    // One attempt, no retry
    mock.assert_async().await;
    match outcome {
        ClientOutcome::TransportFailed(message) => {
            assert!(message.contains("API request failed with status 500"));
            assert_eq!(sink.mounted()[0].0, message);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(sink.mounted()[0].1.background, "red");
}

#[tokio::test]
async fn test_unparseable_body_is_transport_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let client = UploadClient::new(server.url()).unwrap();
    let file = bundle();
    let outcome = client.request_upload(Some(&file)).await;

    match outcome {
        ClientOutcome::TransportFailed(message) => {
            assert!(message.contains("Failed to parse response as JSON"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_custom_path_and_field() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/bundles/upload")
        .match_body(Matcher::Regex(r#"name="bundle""#.to_string()))
        .with_status(200)
        .with_body(r#"{"image":"app-1.jsx","location":"http://cdn/app-1.jsx"}"#)
        .create_async()
        .await;

    let client = UploadClient::new(server.url())
        .unwrap()
        .with_upload_path("/bundles/upload")
        .with_field_name("bundle");

    let file = SelectedFile::new("app.jsx", "text/javascript", b"<App />".to_vec());
    let outcome = client.request_upload(Some(&file)).await;

    mock.assert_async().await;
    assert!(outcome.is_uploaded());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    // Port 9 (discard) is not expected to have an HTTP listener
    let client = UploadClient::new("http://127.0.0.1:9").unwrap();
    let file = bundle();

    let outcome = client.request_upload(Some(&file)).await;
    assert!(matches!(outcome, ClientOutcome::TransportFailed(_)));
}
