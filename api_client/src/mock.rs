//! Canned backend answers used when `MOCK_API_CLIENT` is set.

use crate::events::PreviewEvent;
use crate::ApiClientError;
use serde_json::{json, Value};

pub const MOCK_ENV: &str = "MOCK_API_CLIENT";

const SUMMER_PATH: &str = "/home/alice/Pictures/2023/Summer";
const WINDOWS_PATH: &str = "C:\\Users\\Alice\\Pictures";

pub fn enabled() -> bool {
    std::env::var(MOCK_ENV).is_ok()
}

fn photos_body(tag_filters: &[String]) -> Value {
    let photos = [
        ("p1", "beach.jpg", &["sea", "dog"][..]),
        ("p2", "city.jpg", &["car"][..]),
        ("p3", "forest.jpg", &["tree", "dog"][..]),
        ("p4", "kitchen.jpg", &["cat"][..]),
    ];
    let list: Vec<Value> = photos
        .iter()
        .filter(|(_, _, tags)| tag_filters.iter().all(|t| tags.contains(&t.as_str())))
        .map(|(id, name, _)| json!({ "id": id, "path": "d1", "name": name }))
        .collect();
    json!({
        "photos": list,
        "tags": ["car", "cat", "dog", "sea", "tree"]
    })
}

pub fn respond(command: &str, args: &Value) -> Result<Value, ApiClientError> {
    tracing::debug!(command, "answering from mock backend");
    match command {
        "get_folders" => Ok(json!([
            {
                "id": "d1",
                "path": SUMMER_PATH,
                "isImported": true,
                "photoCount": 4
            },
            {
                "id": "d2",
                "path": WINDOWS_PATH,
                "isImported": false,
                "photoCount": 0
            }
        ])),
        "add_folder" => {
            let path = args
                .get("path")
                .and_then(Value::as_str)
                .ok_or_else(|| ApiClientError::Other("missing path".into()))?;
            Ok(json!({
                "id": "d3",
                "path": path,
                "isImported": false,
                "photoCount": 0
            }))
        }
        "delete_folder" => Ok(Value::Null),
        "get_photos_from_path" => {
            let tags: Vec<String> = args
                .get("tagFilters")
                .cloned()
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| ApiClientError::Decode(e.to_string()))?
                .unwrap_or_default();
            Ok(photos_body(&tags))
        }
        "get_face_clusters" => {
            let d1 = json!({
                "c1": ["f1"],
                "c2": ["f2", "f3", "f4"],
                "c3": ["f5", "f6"]
            });
            let Some(dirs) = args.get("dirs").and_then(Value::as_array) else {
                return Ok(json!({ "d1": d1 }));
            };
            let mut found = serde_json::Map::new();
            for dir in dirs {
                let path = dir.as_str().unwrap_or_default();
                match path {
                    SUMMER_PATH => found.insert("d1".into(), d1.clone()),
                    WINDOWS_PATH => found.insert("d2".into(), json!({})),
                    other => {
                        return Err(ApiClientError::Backend(format!(
                            "No UUID found for path: {}",
                            other
                        )))
                    }
                };
            }
            Ok(Value::Object(found))
        }
        "get_basic_metadata" => {
            let ids = args
                .get("photoIds")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            Ok(Value::Array(
                ids.into_iter()
                    .map(|id| {
                        json!({
                            "id": id,
                            "make": "FUJIFILM",
                            "model": "X100V",
                            "date_time_original": "2023-07-14T18:03:00",
                            "width": 6240,
                            "height": 4160,
                            "iso_speed": 160,
                            "aperture": 2.0,
                            "shutter_speed": "1/500",
                            "focal_length": 23.0
                        })
                    })
                    .collect(),
            ))
        }
        other => Err(ApiClientError::Backend(format!("unknown command: {}", other))),
    }
}

pub fn preview_events() -> Vec<PreviewEvent> {
    vec![
        PreviewEvent::Start,
        PreviewEvent::Progress(25.0),
        PreviewEvent::Progress(50.0),
        PreviewEvent::Progress(100.0),
        PreviewEvent::End,
    ]
}
