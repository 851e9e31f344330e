//! Image upload seam (NGO banners, donor profile pictures).
//!
//! Clients send images inside the JSON body as a base64 data URL
//! (`data:image/png;base64,...`) or as bare base64. The payload is decoded,
//! sniffed by magic bytes, and handed to an `ImageStore`, which returns the
//! public URL that gets saved on the profile.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image is required")]
    Missing,
    #[error("image data is not valid base64")]
    InvalidData,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("image store io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// A decoded, validated image ready to be stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn decode(raw: &str, max_bytes: usize) -> Result<Self, ImageError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ImageError::Missing);
        }

        let payload = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (meta, data) = rest.split_once(',').ok_or(ImageError::InvalidData)?;
                let (mime, encoding) = meta.split_once(';').unwrap_or((meta, ""));
                if !mime.starts_with("image/") {
                    return Err(ImageError::UnsupportedType(mime.to_string()));
                }
                if encoding != "base64" {
                    return Err(ImageError::InvalidData);
                }
                data
            }
            None => raw,
        };

        // base64 inflates by 4/3; reject before decoding anything huge
        if payload.len() / 4 * 3 > max_bytes + 3 {
            return Err(ImageError::TooLarge {
                size: payload.len() / 4 * 3,
                limit: max_bytes,
            });
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| ImageError::InvalidData)?;
        if bytes.len() > max_bytes {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        let kind = ImageKind::sniff(&bytes)
            .ok_or_else(|| ImageError::UnsupportedType("unknown".to_string()))?;

        Ok(Self { kind, bytes })
    }

    /// Content-addressed file name: identical uploads map to the same file.
    pub fn file_name(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("{}.{}", hex, self.kind.extension())
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the image under `folder` and returns its public URL.
    async fn put(&self, folder: &str, image: &ImageUpload) -> Result<String, ImageError>;
}

/// Writes images below `root` and serves them from `{public_base_url}/uploads/`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: Url,
}

impl LocalImageStore {
    pub const URL_PREFIX: &'static str = "uploads";

    pub fn new(root: impl Into<PathBuf>, public_base_url: Url) -> Self {
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn public_url(&self, folder: &str, file: &str) -> String {
        let mut base = self.public_base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        match base.join(&format!("{}/{}/{}", Self::URL_PREFIX, folder, file)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("/{}/{}/{}", Self::URL_PREFIX, folder, file),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, folder: &str, image: &ImageUpload) -> Result<String, ImageError> {
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;

        let file = image.file_name();
        tokio::fs::write(dir.join(&file), &image.bytes).await?;
        tracing::debug!(folder, file = %file, bytes = image.bytes.len(), "image stored");

        Ok(self.public_url(folder, &file))
    }
}
