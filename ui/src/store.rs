//! Application state container.
//!
//! All mutation goes through [`Store::dispatch`]; views read through the
//! selector methods.

use api_client::{FaceClusters, Folder, Photo};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct PathState {
    pub folder: Option<Folder>,
    pub previews_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct PhotosState {
    pub photos: Vec<Photo>,
    pub tags: Vec<String>,
    pub selected_tags: Vec<String>,
    pub selected_photo: Option<Photo>,
    pub selected_photo_index: Option<usize>,
    pub face_clusters: FaceClusters,
}

#[derive(Debug, Clone)]
pub enum Action {
    SetPath(Folder),
    ClearPath,
    SetPreviewsDir(PathBuf),
    SetPhotos(Vec<Photo>),
    SetTags(Vec<String>),
    AddTagFilter(String),
    RemoveTagFilter(String),
    ClearSelectedTags,
    SetSelectedPhoto { photo: Photo, index: usize },
    NextPhoto,
    PreviousPhoto,
    ClearSelectedPhotos,
    SetFaceClusters(FaceClusters),
}

#[derive(Debug, Default)]
pub struct Store {
    path: PathState,
    photos: PhotosState,
}

impl Store {
    pub fn new(previews_dir: PathBuf) -> Self {
        Self {
            path: PathState {
                folder: None,
                previews_dir,
            },
            photos: PhotosState::default(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, "dispatch");
        match action {
            Action::SetPath(folder) => self.path.folder = Some(folder),
            Action::ClearPath => self.path.folder = None,
            Action::SetPreviewsDir(dir) => self.path.previews_dir = dir,
            Action::SetPhotos(photos) => {
                self.photos.photos = photos;
                self.reconcile_selection();
            }
            Action::SetTags(tags) => self.photos.tags = tags,
            Action::AddTagFilter(tag) => {
                if !self.photos.selected_tags.contains(&tag) {
                    self.photos.selected_tags.push(tag);
                }
            }
            Action::RemoveTagFilter(tag) => {
                if let Some(pos) = self.photos.selected_tags.iter().position(|t| *t == tag) {
                    self.photos.selected_tags.remove(pos);
                }
            }
            Action::ClearSelectedTags => self.photos.selected_tags.clear(),
            Action::SetSelectedPhoto { photo, index } => {
                let index = if self.photos.photos.get(index) == Some(&photo) {
                    Some(index)
                } else {
                    self.photos.photos.iter().position(|p| p.id == photo.id)
                };
                if let Some(index) = index {
                    self.photos.selected_photo_index = Some(index);
                    self.photos.selected_photo = Some(self.photos.photos[index].clone());
                }
            }
            Action::NextPhoto => self.step_selection(1),
            Action::PreviousPhoto => self.step_selection(-1),
            Action::ClearSelectedPhotos => {
                self.photos.selected_photo = None;
                self.photos.selected_photo_index = None;
            }
            Action::SetFaceClusters(clusters) => self.photos.face_clusters = clusters,
        }
    }

    fn step_selection(&mut self, delta: isize) {
        let len = self.photos.photos.len();
        let Some(current) = self.photos.selected_photo_index else {
            return;
        };
        if len == 0 {
            return;
        }
        let next = (current as isize + delta).rem_euclid(len as isize) as usize;
        self.photos.selected_photo_index = Some(next);
        self.photos.selected_photo = Some(self.photos.photos[next].clone());
    }

    // Keep the selection pointing at the same photo after the list changed.
    fn reconcile_selection(&mut self) {
        let Some(selected) = &self.photos.selected_photo else {
            return;
        };
        match self.photos.photos.iter().position(|p| p.id == selected.id) {
            Some(index) => self.photos.selected_photo_index = Some(index),
            None => {
                self.photos.selected_photo = None;
                self.photos.selected_photo_index = None;
            }
        }
    }

    pub fn path(&self) -> &PathState {
        &self.path
    }

    pub fn photos_state(&self) -> &PhotosState {
        &self.photos
    }

    pub fn current_folder(&self) -> Option<&Folder> {
        self.path.folder.as_ref()
    }

    pub fn current_path(&self) -> Option<&str> {
        self.path.folder.as_ref().map(|f| f.path.as_str())
    }

    pub fn preview_dir(&self) -> &PathBuf {
        &self.path.previews_dir
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos.photos
    }

    pub fn tags(&self) -> &[String] {
        &self.photos.tags
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.photos.selected_tags
    }

    pub fn face_clusters(&self) -> &FaceClusters {
        &self.photos.face_clusters
    }

    pub fn current_photo(&self) -> Option<(usize, &Photo)> {
        let index = self.photos.selected_photo_index?;
        self.photos.photos.get(index).map(|p| (index, p))
    }

    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.photos.photos.iter().position(|p| p.name == name)
    }
}
