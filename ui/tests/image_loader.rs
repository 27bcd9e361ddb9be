use tempfile::tempdir;
use ui::{ImageLoader, ImageLoaderError};

#[tokio::test]
async fn test_preview_loaded_from_previews_dir() {
    let dir = tempdir().unwrap();
    let preview_dir = dir.path().join("d1");
    std::fs::create_dir_all(&preview_dir).unwrap();
    std::fs::write(preview_dir.join("p1.preview.webp"), b"webp").unwrap();

    let loader = ImageLoader::new(dir.path().to_path_buf());
    assert!(loader.load_preview("d1", "p1").await.is_ok());
}

#[tokio::test]
async fn test_missing_preview_is_not_found() {
    let dir = tempdir().unwrap();
    let loader = ImageLoader::new(dir.path().to_path_buf());
    let err = loader.load_preview("d1", "missing").await.unwrap_err();
    assert!(matches!(err, ImageLoaderError::NotFound(_)));
}

#[tokio::test]
async fn test_face_crop_loaded() {
    let dir = tempdir().unwrap();
    let faces = dir.path().join("d1").join("faces");
    std::fs::create_dir_all(&faces).unwrap();
    std::fs::write(faces.join("f1.webp"), b"face").unwrap();

    let loader = ImageLoader::new(dir.path().to_path_buf());
    assert!(loader.load_face("d1", "f1").await.is_ok());
    assert!(loader.load_face("d1", "f2").await.is_err());
}

#[tokio::test]
async fn test_full_image_read_from_folder_path() {
    let photos = tempdir().unwrap();
    std::fs::write(photos.path().join("cat.jpg"), b"jpeg").unwrap();

    let previews = tempdir().unwrap();
    let loader = ImageLoader::new(previews.path().to_path_buf());
    let folder = photos.path().to_string_lossy().to_string();
    assert!(loader.load_full_image(&folder, "cat.jpg").await.is_ok());
    assert!(matches!(
        loader.load_full_image(&folder, "dog.jpg").await,
        Err(ImageLoaderError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_reads() {
    let dir = tempdir().unwrap();
    let preview_dir = dir.path().join("d1");
    std::fs::create_dir_all(&preview_dir).unwrap();
    for i in 0..12 {
        std::fs::write(preview_dir.join(format!("p{}.preview.webp", i)), b"x").unwrap();
    }
    let loader = ImageLoader::new(dir.path().to_path_buf());
    let results = futures::future::join_all((0..12).map(|i| {
        let loader = loader.clone();
        async move { loader.load_preview("d1", &format!("p{}", i)).await }
    }))
    .await;
    assert!(results.iter().all(|r| r.is_ok()));
}
