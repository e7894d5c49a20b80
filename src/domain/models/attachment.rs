#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use tokio::fs;

use super::Media;
use super::MediaKind;

/// Where an attachment came from. Inline captures, such as recorded voice
/// clips, have their own size ceiling separate from picked files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentSource {
    File,
    Inline,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub source: AttachmentSource,
}

impl Attachment {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Attachment {
        return Attachment {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
            source: AttachmentSource::File,
        };
    }

    pub async fn from_path(path: &Path, source: AttachmentSource) -> Result<Attachment> {
        let bytes = fs::read(path)
            .await
            .with_context(|| return format!("Failed to read attachment {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or_else(|| return "attachment".to_string());

        return Ok(Attachment {
            mime_type: mime_type_for(&file_name).to_string(),
            file_name,
            bytes,
            source,
        });
    }

    pub fn size(&self) -> usize {
        return self.bytes.len();
    }

    /// Images and audio clips are shown inline in the chat they were sent in.
    pub fn to_media(&self) -> Option<Media> {
        let kind = if self.mime_type.starts_with("image/") {
            MediaKind::Image
        } else if self.mime_type.starts_with("audio/") {
            MediaKind::Audio
        } else {
            return None;
        };

        return Some(Media {
            kind,
            url: format!("data:{};base64,{}", self.mime_type, b64.encode(&self.bytes)),
        });
    }

    /// One line summary handed to the model in place of the raw bytes.
    pub fn describe(&self) -> String {
        return format!(
            "[Attached file: {} ({}, {} bytes)]",
            self.file_name,
            self.mime_type,
            self.size()
        );
    }
}

pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| return ext.to_lowercase())
        .unwrap_or_default();

    return match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "webm" => "audio/webm",
        "m4a" => "audio/mp4",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    };
}
