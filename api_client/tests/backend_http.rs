use api_client::{ApiClient, ApiClientError, PreviewEvent};
use httpmock::prelude::*;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_get_folders_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/invoke/get_folders");
            then.status(200).json_body(json!([
                { "id": "d1", "path": "/dev/sda1/photos", "isImported": true, "photoCount": 3 }
            ]));
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    let folders = client.get_folders().await.unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].path, "/dev/sda1/photos");
    assert!(folders[0].is_imported);
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_photos_request_carries_camel_case_args() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/invoke/get_photos_from_path")
                .json_body(json!({ "path": "d1", "tagFilters": ["dog", "sea"] }));
            then.status(200).json_body(json!({
                "photos": [{ "id": "p1", "path": "d1", "name": "beach.jpg" }],
                "tags": ["dog", "sea"]
            }));
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    let data = client
        .get_photos_from_path("d1", &["dog".to_string(), "sea".to_string()])
        .await
        .unwrap();
    assert_eq!(data.photos[0].name, "beach.jpg");
    assert_eq!(data.tags, vec!["dog", "sea"]);
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_face_clusters_request_sends_folder_paths() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/invoke/get_face_clusters")
                .json_body(json!({ "dirs": ["/home/alice/Pictures"] }));
            then.status(200).json_body(json!({
                "d1": { "c1": ["f1", "f2"] }
            }));
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    let dirs = vec!["/home/alice/Pictures".to_string()];
    let faces = client.get_face_clusters(Some(dirs.as_slice())).await.unwrap();
    assert_eq!(faces.directories()[0].directory, "d1");
    assert_eq!(faces.face_count(), 2);
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_mock_face_clusters_reject_unknown_path() {
    std::env::set_var("MOCK_API_CLIENT", "1");
    let client = ApiClient::new();

    let by_path = vec!["/home/alice/Pictures/2023/Summer".to_string()];
    let faces = client.get_face_clusters(Some(by_path.as_slice())).await.unwrap();
    assert_eq!(faces.face_count(), 6);

    let by_id = vec!["d1".to_string()];
    let err = client.get_face_clusters(Some(by_id.as_slice())).await.unwrap_err();
    assert!(matches!(err, ApiClientError::Backend(ref msg) if msg.contains("d1")));

    std::env::remove_var("MOCK_API_CLIENT");
}

#[tokio::test]
#[serial]
async fn test_backend_error_carries_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/invoke/add_folder");
            then.status(500).body("folder already added");
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    let err = client.add_folder("/tmp/x").await.unwrap_err();
    assert_eq!(err, ApiClientError::Backend("folder already added".into()));
}

#[tokio::test]
#[serial]
async fn test_delete_folder_accepts_empty_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/invoke/delete_folder")
                .json_body(json!({ "path": "/tmp/x" }));
            then.status(200);
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    client.delete_folder("/tmp/x").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
#[serial]
async fn test_malformed_response_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/invoke/get_basic_metadata");
            then.status(200).body("{not json");
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    let err = client
        .get_basic_metadata(&["p1".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiClientError::Decode(_)));
}

#[tokio::test]
#[serial]
async fn test_unreachable_backend_is_request_error() {
    let client = ApiClient::with_base_url("http://127.0.0.1:9".into());
    let err = client.get_folders().await.unwrap_err();
    assert!(matches!(err, ApiClientError::Request(_)));
}

#[tokio::test]
#[serial]
async fn test_event_stream_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/events");
            then.status(200).body(
                "{\"event\":\"preview-start\"}\n\
                 {\"event\":\"preview-progress\",\"payload\":60}\n\
                 {\"event\":\"preview-end\"}\n",
            );
        })
        .await;

    let client = ApiClient::with_base_url(server.base_url());
    let mut sub = client.subscribe_events().await.unwrap();
    assert_eq!(sub.recv().await, Some(PreviewEvent::Start));
    assert_eq!(sub.recv().await, Some(PreviewEvent::Progress(60.0)));
    assert_eq!(sub.recv().await, Some(PreviewEvent::End));
    assert_eq!(sub.recv().await, None);
}

#[tokio::test]
#[serial]
async fn test_mock_backend_answers_all_commands() {
    std::env::set_var("MOCK_API_CLIENT", "1");
    let client = ApiClient::new();

    let folders = client.get_folders().await.unwrap();
    assert_eq!(folders.len(), 2);

    let added = client.add_folder("/media/new").await.unwrap();
    assert_eq!(added.path, "/media/new");
    client.delete_folder("/media/new").await.unwrap();

    let all = client.get_photos_from_path("d1", &[]).await.unwrap();
    assert_eq!(all.photos.len(), 4);
    let dogs = client
        .get_photos_from_path("d1", &["dog".to_string()])
        .await
        .unwrap();
    let names: Vec<&str> = dogs.photos.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["beach.jpg", "forest.jpg"]);

    let faces = client.get_face_clusters(None).await.unwrap();
    assert_eq!(faces.face_count(), 6);

    let summaries = client
        .get_basic_metadata(&["p1".to_string(), "p2".to_string()])
        .await
        .unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].id, "p2");
    assert_eq!(summaries[0].model.as_deref(), Some("X100V"));

    std::env::remove_var("MOCK_API_CLIENT");
}

#[tokio::test]
#[serial]
async fn test_mock_event_subscription() {
    std::env::set_var("MOCK_API_CLIENT", "1");
    let client = ApiClient::new();
    let mut sub = client.subscribe_events().await.unwrap();
    let mut seen = Vec::new();
    while let Some(event) = sub.recv().await {
        seen.push(event);
    }
    assert_eq!(seen.first(), Some(&PreviewEvent::Start));
    assert_eq!(seen.last(), Some(&PreviewEvent::End));
    assert_eq!(seen.len(), 5);
    std::env::remove_var("MOCK_API_CLIENT");
}
