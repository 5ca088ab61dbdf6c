//! Local storage for files attached to messages.
//!
//! Files are written under the configured directory with a generated name
//! and addressed by `{public_path}/{name}`.

use std::path::{Path, PathBuf};

use huddle_chats::AttachmentMeta;
use huddle_config::UploadConfig;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::GatewayResult;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const MAX_EXTENSION_LENGTH: usize = 16;

#[derive(Debug, Clone)]
pub struct UploadStore {
    directory: PathBuf,
    public_path: String,
    max_file_bytes: usize,
}

/// A file written to disk whose reference has not necessarily been persisted.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub meta: AttachmentMeta,
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            public_path: config.public_path.trim_end_matches('/').to_string(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    pub async fn ensure_directory(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.directory).await
    }

    pub async fn save(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> GatewayResult<StoredFile> {
        let name = match original_name.and_then(extension_of) {
            Some(extension) => format!("{}.{}", Uuid::new_v4(), extension),
            None => Uuid::new_v4().to_string(),
        };

        self.ensure_directory().await?;
        let path = self.directory.join(&name);
        fs::write(&path, bytes).await?;

        let mime_type = content_type
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        debug!(path = %path.display(), size = bytes.len(), %mime_type, "stored upload");

        Ok(StoredFile {
            path,
            meta: AttachmentMeta {
                url: format!("{}/{}", self.public_path, name),
                mime_type,
                size_bytes: i64::try_from(bytes.len()).unwrap_or(i64::MAX),
            },
        })
    }

    /// Best-effort removal of a file whose message was never persisted.
    pub async fn discard(&self, file: &StoredFile) {
        if let Err(e) = fs::remove_file(&file.path).await {
            warn!(path = %file.path.display(), error = %e, "failed to remove orphaned upload");
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    let extension = Path::new(name).extension()?.to_str()?;
    let valid = !extension.is_empty()
        && extension.len() <= MAX_EXTENSION_LENGTH
        && extension.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| extension.to_ascii_lowercase())
}
