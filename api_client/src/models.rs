//! Types exchanged with the native backend.

use chrono::NaiveDateTime;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directory tracked by the backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub path: String,
    pub is_imported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FolderEntry>>,
    #[serde(default)]
    pub photo_count: u32,
}

/// Nested entry of a folder: either a sub-folder or a photo.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FolderEntry {
    Folder(Folder),
    Photo(Photo),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub path: String,
    pub name: String,
}

/// Photos of a folder plus the tags usable as filters for it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhotoData {
    pub photos: Vec<Photo>,
    pub tags: Vec<String>,
}

/// EXIF-derived summary of one photo.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PhotoSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub date_time_original: Option<NaiveDateTime>,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub iso_speed: Option<i32>,
    #[serde(default)]
    pub aperture: Option<f64>,
    #[serde(default)]
    pub shutter_speed: Option<String>,
    #[serde(default)]
    pub focal_length: Option<f64>,
    #[serde(default)]
    pub gps_latitude: Option<String>,
    #[serde(default)]
    pub gps_longitude: Option<String>,
}

/// Faces of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCluster {
    pub id: String,
    pub faces: Vec<String>,
}

/// All clusters found in one directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryClusters {
    pub directory: String,
    pub clusters: Vec<FaceCluster>,
}

/// Face clusters grouped by directory id.
///
/// On the wire this is a JSON object `{dir: {cluster: [face, ...]}}`. Keys are
/// kept in the order the backend sent them so that equal-sized clusters are
/// displayed in a stable order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceClusters {
    directories: Vec<DirectoryClusters>,
}

impl FaceClusters {
    /// Build from plain `(directory, [(cluster, faces)])` pairs.
    pub fn from_entries<D, C>(entries: D) -> Self
    where
        D: IntoIterator<Item = (String, C)>,
        C: IntoIterator<Item = (String, Vec<String>)>,
    {
        let directories = entries
            .into_iter()
            .map(|(directory, clusters)| DirectoryClusters {
                directory,
                clusters: clusters
                    .into_iter()
                    .map(|(id, faces)| FaceCluster { id, faces })
                    .collect(),
            })
            .collect();
        Self { directories }
    }

    pub fn directories(&self) -> &[DirectoryClusters] {
        &self.directories
    }

    pub fn is_empty(&self) -> bool {
        self.directories.iter().all(|d| d.clusters.is_empty())
    }

    pub fn face_count(&self) -> usize {
        self.directories
            .iter()
            .flat_map(|d| d.clusters.iter())
            .map(|c| c.faces.len())
            .sum()
    }
}

struct ClusterMap<'a>(&'a [FaceCluster]);

impl Serialize for ClusterMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for cluster in self.0 {
            map.serialize_entry(&cluster.id, &cluster.faces)?;
        }
        map.end()
    }
}

impl Serialize for FaceClusters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.directories.len()))?;
        for dir in &self.directories {
            map.serialize_entry(&dir.directory, &ClusterMap(&dir.clusters))?;
        }
        map.end()
    }
}

struct OrderedClusters(Vec<FaceCluster>);

impl<'de> Deserialize<'de> for OrderedClusters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClustersVisitor;

        impl<'de> Visitor<'de> for ClustersVisitor {
            type Value = Vec<FaceCluster>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of cluster ids to face ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut clusters = Vec::new();
                while let Some((id, faces)) = map.next_entry::<String, Vec<String>>()? {
                    clusters.push(FaceCluster { id, faces });
                }
                Ok(clusters)
            }
        }

        deserializer.deserialize_map(ClustersVisitor).map(OrderedClusters)
    }
}

impl<'de> Deserialize<'de> for FaceClusters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoriesVisitor;

        impl<'de> Visitor<'de> for DirectoriesVisitor {
            type Value = Vec<DirectoryClusters>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of directory ids to face clusters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut directories = Vec::new();
                while let Some((directory, clusters)) =
                    map.next_entry::<String, OrderedClusters>()?
                {
                    directories.push(DirectoryClusters {
                        directory,
                        clusters: clusters.0,
                    });
                }
                Ok(directories)
            }
        }

        deserializer
            .deserialize_map(DirectoriesVisitor)
            .map(|directories| FaceClusters { directories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_folder_with_children() {
        let json = r#"[
            {
                "id": "d1",
                "path": "/home/alice/Pictures",
                "isImported": true,
                "photoCount": 2,
                "children": [
                    { "id": "d2", "path": "/home/alice/Pictures/2023", "isImported": false },
                    { "id": "p1", "path": "d1", "name": "cat.jpg" }
                ]
            }
        ]"#;

        let folders: Vec<Folder> = serde_json::from_str(json).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].photo_count, 2);
        let children = folders[0].children.as_ref().unwrap();
        assert!(matches!(&children[0], FolderEntry::Folder(f) if f.id == "d2" && f.photo_count == 0));
        assert!(matches!(&children[1], FolderEntry::Photo(p) if p.name == "cat.jpg"));
    }

    #[test]
    fn test_parse_summary_with_missing_fields() {
        let json = r#"{
            "id": "p1",
            "make": "FUJIFILM",
            "date_time_original": "2023-05-01T10:20:30",
            "aperture": 2.8,
            "gps_latitude": null
        }"#;

        let summary: PhotoSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.make.as_deref(), Some("FUJIFILM"));
        assert_eq!(summary.aperture, Some(2.8));
        assert!(summary.model.is_none());
        assert_eq!(
            summary.date_time_original.unwrap().to_string(),
            "2023-05-01 10:20:30"
        );
    }

    #[test]
    fn test_face_clusters_keep_wire_order() {
        let json = r#"{
            "dir-b": { "z": ["f1"], "a": ["f2", "f3"] },
            "dir-a": { "m": ["f4"] }
        }"#;

        let clusters: FaceClusters = serde_json::from_str(json).unwrap();
        let dirs = clusters.directories();
        assert_eq!(dirs[0].directory, "dir-b");
        assert_eq!(dirs[1].directory, "dir-a");
        let ids: Vec<&str> = dirs[0].clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(clusters.face_count(), 4);

        let back = serde_json::to_string(&clusters).unwrap();
        assert!(back.find("dir-b").unwrap() < back.find("dir-a").unwrap());
    }
}
