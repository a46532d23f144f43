use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::{errors::CustomError, utils::random_string};

const LESSON_IMAGE_DIR: &str = "lesson-images";
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
const FILE_NAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path:&str, bytes:&[u8]) -> Result<(), CustomError>;

    /// Deleting a missing blob is not an error.
    async fn delete(&self, path:&str) -> Result<(), CustomError>;

    fn public_url(&self, path:&str) -> String;

    /// Inverse of `public_url`; `None` for URLs this store did not hand out.
    fn path_for_url(&self, url:&str) -> Option<String>;
}

/// Stores blobs under a local directory that is served at `public_base`.
pub struct LocalBlobStore{
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore{
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self{
        LocalBlobStore{ root, public_base: public_base.into() }
    }

    fn resolve(&self, path:&str) -> Result<PathBuf, CustomError>{
        let relative = Path::new(path);

        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if path.is_empty() || !is_plain {
            return Err(CustomError::bad_request("Invalid storage path"));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore{
    async fn upload(&self, path:&str, bytes:&[u8]) -> Result<(), CustomError>{
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!(error = %e, path = %parent.display(), "could not create storage directory");
                CustomError::internal("Error while uploading the image")
            })?;
        }

        tokio::fs::write(&target, bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = %target.display(), "could not write blob");
            CustomError::internal("Error while uploading the image")
        })
    }

    async fn delete(&self, path:&str) -> Result<(), CustomError>{
        let target = self.resolve(path)?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, path = %target.display(), "could not delete blob");
                Err(CustomError::internal("Error while deleting the image"))
            }
        }
    }

    fn public_url(&self, path:&str) -> String{
        format!("{}/{}", self.public_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn path_for_url(&self, url:&str) -> Option<String>{
        url.strip_prefix(self.public_base.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}

/// Builds a fresh storage path for an uploaded lesson image, keeping only
/// the extension of the client's file name.
pub fn lesson_image_path(file_name:&str) -> Result<String, CustomError>{

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| CustomError::bad_request("Only png, jpg, jpeg, gif and webp images can be uploaded"))?;

    Ok(format!("{}/{}.{}", LESSON_IMAGE_DIR, random_string(FILE_NAME_CHARSET, 16), extension))
}
