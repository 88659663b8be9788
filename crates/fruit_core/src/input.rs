//! Image selection: MIME detection, validation and preview decoding.

use crate::error::{ClassifierError, Result};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Longest side of the decoded preview.
pub const PREVIEW_MAX_SIDE: u32 = 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

/// An image picked by the user, ready to preview and upload.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub name: String,
    pub path: Option<PathBuf>,
    pub mime: String,
    bytes: Arc<[u8]>,
    preview: RgbaImage,
}

impl SelectedImage {
    /// Reads and validates a file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mut selected = Self::from_bytes(name, bytes, None)?;
        selected.path = Some(path.to_path_buf());
        Ok(selected)
    }

    /// Validates in-memory bytes. A non-empty `mime_hint` takes precedence
    /// over sniffing.
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        mime_hint: Option<&str>,
    ) -> Result<Self> {
        let name = name.into();
        let bytes: Arc<[u8]> = bytes.into();
        let mime = detect_mime(&name, &bytes, mime_hint);
        if !mime.starts_with("image/") {
            tracing::debug!("Rejected {name}: {mime}");
            return Err(ClassifierError::InvalidFileType { mime });
        }
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| ClassifierError::Decode(e.to_string()))?;
        let preview = if decoded.width() > PREVIEW_MAX_SIDE || decoded.height() > PREVIEW_MAX_SIDE
        {
            decoded.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE).to_rgba8()
        } else {
            decoded.to_rgba8()
        };
        Ok(Self {
            name,
            path: None,
            mime,
            bytes,
            preview,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn preview(&self) -> &RgbaImage {
        &self.preview
    }
}

/// A picked or dropped file that still has to be read and decoded.
#[derive(Debug, Clone)]
pub enum PickedFile {
    Path(PathBuf),
    Bytes {
        name: String,
        bytes: Arc<[u8]>,
        mime_hint: Option<String>,
    },
}

impl PickedFile {
    pub fn load(self) -> Result<SelectedImage> {
        match self {
            PickedFile::Path(path) => SelectedImage::from_path(path),
            PickedFile::Bytes {
                name,
                bytes,
                mime_hint,
            } => SelectedImage::from_bytes(name, bytes, mime_hint.as_deref()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            PickedFile::Path(path) => path.display().to_string(),
            PickedFile::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Resolves the MIME type: hint, then content sniffing, then extension.
pub fn detect_mime(name: &str, bytes: &[u8], hint: Option<&str>) -> String {
    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        return hint.to_ascii_lowercase();
    }
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    match ImageFormat::from_path(name) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => FALLBACK_MIME.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use std::io::Cursor;
    let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
