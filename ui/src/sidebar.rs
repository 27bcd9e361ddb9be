//! Folder tree: grouping by drive and compact path labels.

use api_client::Folder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const OTHER_GROUP: &str = "Other";

static WINDOWS_DRIVE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^([A-Za-z]):\\").ok());
static UNIX_DEVICE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^/dev/([^/]+)").ok());

/// Drive or device label for `path`; [`OTHER_GROUP`] when neither matches.
pub fn drive_of(path: &str) -> String {
    if let Some(caps) = WINDOWS_DRIVE.as_ref().and_then(|re| re.captures(path)) {
        return format!("{}:\\", caps[1].to_ascii_uppercase());
    }
    if let Some(caps) = UNIX_DEVICE.as_ref().and_then(|re| re.captures(path)) {
        return format!("/dev/{}", &caps[1]);
    }
    OTHER_GROUP.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderGroup<'a> {
    pub name: String,
    pub folders: Vec<&'a Folder>,
}

/// Groups in order of first appearance, with [`OTHER_GROUP`] always last.
pub fn group_by_drive(folders: &[Folder]) -> Vec<FolderGroup<'_>> {
    let mut groups: Vec<FolderGroup<'_>> = Vec::new();
    let mut other: Vec<&Folder> = Vec::new();
    for folder in folders {
        let drive = drive_of(&folder.path);
        if drive == OTHER_GROUP {
            other.push(folder);
            continue;
        }
        match groups.iter_mut().find(|g| g.name == drive) {
            Some(group) => group.folders.push(folder),
            None => groups.push(FolderGroup {
                name: drive,
                folders: vec![folder],
            }),
        }
    }
    if !other.is_empty() {
        groups.push(FolderGroup {
            name: OTHER_GROUP.to_string(),
            folders: other,
        });
    }
    groups
}

/// Collapse a long path to `first/.../last`, keeping its root.
///
/// Paths with at most two segments are returned unchanged.
pub fn ellipsis_path(path: &str) -> String {
    let windows = path.contains('\\') && !path.contains('/');
    let sep = if windows { '\\' } else { '/' };

    let (root, rest) = match WINDOWS_DRIVE.as_ref().and_then(|re| re.find(path)) {
        Some(m) => (&path[..m.end()], &path[m.end()..]),
        None if path.starts_with(sep) => (&path[..1], &path[1..]),
        None => ("", path),
    };

    let segments: Vec<&str> = rest.split(sep).filter(|s| !s.is_empty()).collect();
    if segments.len() <= 2 {
        return path.to_string();
    }
    format!(
        "{root}{first}{sep}...{sep}{last}",
        first = segments[0],
        last = segments[segments.len() - 1],
    )
}

/// Expand/collapse state of the drive groups and the context-menu target.
#[derive(Debug, Clone, Default)]
pub struct SidebarState {
    collapsed: HashSet<String>,
    context_target: Option<Folder>,
}

impl SidebarState {
    pub fn toggle_group(&mut self, name: &str) {
        if !self.collapsed.remove(name) {
            self.collapsed.insert(name.to_string());
        }
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        !self.collapsed.contains(name)
    }

    /// Right-click target. Does not change the current folder.
    pub fn set_context_target(&mut self, folder: Folder) {
        self.context_target = Some(folder);
    }

    pub fn clear_context_target(&mut self) {
        self.context_target = None;
    }

    pub fn context_target(&self) -> Option<&Folder> {
        self.context_target.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, path: &str) -> Folder {
        Folder {
            id: id.into(),
            path: path.into(),
            is_imported: true,
            children: None,
            photo_count: 0,
        }
    }

    #[test]
    fn test_ellipsis_path() {
        assert_eq!(ellipsis_path("/a/b/c/d"), "/a/.../d");
        assert_eq!(ellipsis_path("/a/b"), "/a/b");
        assert_eq!(ellipsis_path("C:\\Users\\Alice\\Docs\\file"), "C:\\Users\\...\\file");
        assert_eq!(ellipsis_path("C:\\Users"), "C:\\Users");
        assert_eq!(ellipsis_path("a/b/c"), "a/.../c");
        assert_eq!(ellipsis_path(""), "");
    }

    #[test]
    fn test_drive_detection() {
        assert_eq!(drive_of("c:\\Photos"), "C:\\");
        assert_eq!(drive_of("/dev/sda1/photos"), "/dev/sda1");
        assert_eq!(drive_of("/home/alice"), OTHER_GROUP);
        assert_eq!(drive_of("\\\\server\\share"), OTHER_GROUP);
    }

    #[test]
    fn test_group_by_drive_keeps_order_other_last() {
        let folders = vec![
            folder("1", "/home/alice"),
            folder("2", "D:\\Pics"),
            folder("3", "/dev/sdb/x"),
            folder("4", "D:\\More"),
        ];
        let groups = group_by_drive(&folders);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["D:\\", "/dev/sdb", "Other"]);
        let d_ids: Vec<&str> = groups[0].folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(d_ids, vec!["2", "4"]);
        assert!(group_by_drive(&[]).is_empty());
    }

    #[test]
    fn test_context_target_and_groups() {
        let mut state = SidebarState::default();
        assert!(state.is_expanded("Other"));
        state.toggle_group("Other");
        assert!(!state.is_expanded("Other"));
        state.toggle_group("Other");
        assert!(state.is_expanded("Other"));

        state.set_context_target(folder("1", "/x"));
        assert_eq!(state.context_target().map(|f| f.id.as_str()), Some("1"));
        state.clear_context_target();
        assert!(state.context_target().is_none());
    }
}
