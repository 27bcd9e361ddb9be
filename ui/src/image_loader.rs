//! Reading backend-generated previews, face crops and original photos from
//! disk.

use iced::widget::image::Handle;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Semaphore;

/// Concurrent file reads allowed at once.
const MAX_CONCURRENT_READS: usize = 4;

#[derive(Debug, Error)]
pub enum ImageLoaderError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("semaphore closed")]
    SemaphoreClosed,
}

#[derive(Debug, Clone)]
pub struct ImageLoader {
    previews_dir: PathBuf,
    semaphore: Arc<Semaphore>,
}

impl ImageLoader {
    pub fn new(previews_dir: PathBuf) -> Self {
        Self {
            previews_dir,
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_READS)),
        }
    }

    pub fn previews_dir(&self) -> &Path {
        &self.previews_dir
    }

    /// `{previews}/{directory}/{photo}.preview.webp`
    pub fn preview_path(&self, directory_id: &str, photo_id: &str) -> PathBuf {
        self.previews_dir
            .join(directory_id)
            .join(format!("{}.preview.webp", photo_id))
    }

    pub fn face_path(&self, directory_id: &str, face_id: &str) -> PathBuf {
        crate::faces::face_crop_path(&self.previews_dir, directory_id, face_id)
    }

    pub fn photo_path(folder_path: &str, photo_name: &str) -> PathBuf {
        Path::new(folder_path).join(photo_name)
    }

    async fn read(&self, path: &Path) -> Result<Handle, ImageLoaderError> {
        let start = Instant::now();
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ImageLoaderError::SemaphoreClosed)?;

        let bytes = fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImageLoaderError::NotFound(path.display().to_string()),
            _ => ImageLoaderError::Io(e.to_string()),
        })?;

        tracing::debug!("image_read_time_ms" = %start.elapsed().as_millis(), "bytes" = bytes.len());
        Ok(Handle::from_memory(bytes))
    }

    pub async fn load_preview(
        &self,
        directory_id: &str,
        photo_id: &str,
    ) -> Result<Handle, ImageLoaderError> {
        self.read(&self.preview_path(directory_id, photo_id)).await
    }

    pub async fn load_face(
        &self,
        directory_id: &str,
        face_id: &str,
    ) -> Result<Handle, ImageLoaderError> {
        self.read(&self.face_path(directory_id, face_id)).await
    }

    /// Original, full-resolution photo.
    pub async fn load_full_image(
        &self,
        folder_path: &str,
        photo_name: &str,
    ) -> Result<Handle, ImageLoaderError> {
        self.read(&Self::photo_path(folder_path, photo_name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::ImageLoader;
    use std::path::PathBuf;

    #[test]
    fn test_paths() {
        let loader = ImageLoader::new(PathBuf::from("/data/lightbox"));
        assert_eq!(
            loader.preview_path("d1", "p1"),
            PathBuf::from("/data/lightbox/d1/p1.preview.webp")
        );
        assert_eq!(
            loader.face_path("d1", "f1"),
            PathBuf::from("/data/lightbox/d1/faces/f1.webp")
        );
        assert_eq!(
            ImageLoader::photo_path("/home/alice/Pictures", "cat.jpg"),
            PathBuf::from("/home/alice/Pictures/cat.jpg")
        );
    }
}
