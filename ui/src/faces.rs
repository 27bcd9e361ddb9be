//! Face cluster ordering and expand/collapse state.

use api_client::{DirectoryClusters, FaceClusters};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directories by descending total faces, clusters by descending member
/// count. Equal counts keep the order the backend sent.
pub fn sort_clusters(clusters: &FaceClusters) -> Vec<DirectoryClusters> {
    let mut directories: Vec<DirectoryClusters> = clusters.directories().to_vec();
    for dir in directories.iter_mut() {
        dir.clusters.sort_by(|a, b| b.faces.len().cmp(&a.faces.len()));
    }
    directories.sort_by_key(|d| std::cmp::Reverse(total_faces(d)));
    directories
}

pub fn total_faces(dir: &DirectoryClusters) -> usize {
    dir.clusters.iter().map(|c| c.faces.len()).sum()
}

pub fn face_crop_path(previews_dir: &Path, directory: &str, face_id: &str) -> PathBuf {
    previews_dir
        .join(directory)
        .join("faces")
        .join(format!("{}.webp", face_id))
}

/// Which clusters are showing all their members.
#[derive(Debug, Clone, Default)]
pub struct FaceGroupsState {
    expanded: HashSet<(String, String)>,
}

impl FaceGroupsState {
    /// Flip a cluster open or closed. Single-face clusters never expand.
    pub fn toggle(&mut self, directory: &str, cluster: &str, member_count: usize) -> bool {
        let key = (directory.to_string(), cluster.to_string());
        if self.expanded.remove(&key) {
            return false;
        }
        if member_count > 1 {
            self.expanded.insert(key);
            return true;
        }
        false
    }

    pub fn is_expanded(&self, directory: &str, cluster: &str) -> bool {
        self.expanded
            .contains(&(directory.to_string(), cluster.to_string()))
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters(entries: Vec<(&str, Vec<(&str, usize)>)>) -> FaceClusters {
        FaceClusters::from_entries(entries.into_iter().map(|(dir, cs)| {
            (
                dir.to_string(),
                cs.into_iter()
                    .map(|(id, n)| (id.to_string(), (0..n).map(|i| format!("{}{}", id, i)).collect()))
                    .collect::<Vec<_>>(),
            )
        }))
    }

    #[test]
    fn test_clusters_sorted_by_member_count() {
        let input = clusters(vec![("d", vec![("B", 1), ("A", 3)])]);
        let sorted = sort_clusters(&input);
        let ids: Vec<&str> = sorted[0].clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_ties_keep_wire_order() {
        let input = clusters(vec![
            ("small", vec![("x", 1)]),
            ("d1", vec![("z", 2), ("a", 2), ("m", 5)]),
            ("d2", vec![("q", 9)]),
        ]);
        let sorted = sort_clusters(&input);
        let dirs: Vec<&str> = sorted.iter().map(|d| d.directory.as_str()).collect();
        assert_eq!(dirs, vec!["d1", "d2", "small"]);
        let ids: Vec<&str> = sorted[0].clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["m", "z", "a"]);
    }

    #[test]
    fn test_expand_requires_more_than_one_face() {
        let mut state = FaceGroupsState::default();
        assert!(!state.toggle("d", "single", 1));
        assert!(!state.is_expanded("d", "single"));
        assert!(state.toggle("d", "group", 3));
        assert!(state.is_expanded("d", "group"));
        assert!(!state.toggle("d", "group", 3));
        assert!(!state.is_expanded("d", "group"));
    }

    #[test]
    fn test_face_crop_path() {
        let path = face_crop_path(Path::new("/p"), "d1", "f9");
        assert_eq!(path, PathBuf::from("/p/d1/faces/f9.webp"));
    }
}
