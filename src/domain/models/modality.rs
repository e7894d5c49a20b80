use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Output kind of a generated response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Audio,
}

/// Modality of media attached to a message. Text never travels as media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl Modality {
    pub fn media_kind(&self) -> Option<MediaKind> {
        return match self {
            Modality::Text => None,
            Modality::Image => Some(MediaKind::Image),
            Modality::Audio => Some(MediaKind::Audio),
        };
    }
}
