//! Seals, their samples, and attached proof images

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;
use std::path::Path;

use crate::core::files::{classify, FileCategory};
use crate::entities::{Step, StepForm};

/// Caller-assigned numeric key of a seal or sample
///
/// Kept as the JSON number it arrived as; the engine never checks it for
/// uniqueness or ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Number);

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        ItemId(Number::from(n))
    }
}

impl ItemId {
    /// Numeric equality, so `1` and `1.0` name the same item
    ///
    /// Floats are compared by value only when one side is a float; two
    /// integers are compared exactly, which keeps large millisecond ids apart.
    pub fn matches(&self, other: &Number) -> bool {
        if self.0.is_f64() || other.is_f64() {
            matches!((self.0.as_f64(), other.as_f64()), (Some(a), Some(b)) if a == b)
        } else {
            self.0 == *other
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File-like attachment: name, MIME type and size, never the bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub name: String,

    /// Declared MIME type
    #[serde(rename = "type")]
    pub mime: String,

    /// Size in bytes
    pub size: u64,

    /// Modification time in milliseconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl ImageFile {
    /// Describe a file on disk without reading its contents
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .and_then(|d| i64::try_from(d.as_millis()).ok());

        Ok(Self {
            name,
            mime,
            size: metadata.len(),
            last_modified,
        })
    }

    pub fn category(&self) -> FileCategory {
        classify(&self.name, &self.mime)
    }
}

/// A sample taken from a seal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: ItemId,

    /// Sampling date, `YYYY-MM-DD`
    pub date: String,

    /// Sampling time slot, `HH:MM:00`
    pub time: String,

    pub description: String,

    /// Requested analysis, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// A sealed evidence container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seal {
    pub id: ItemId,

    /// Date the seal was received, `YYYY-MM-DD`
    pub reception_date: String,

    /// Observed state of the seal on reception
    pub seal_state: String,

    /// Proof-of-seal photos, at least one
    pub images: Vec<ImageFile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<Sample>>,
}

impl Seal {
    /// Samples of the seal, empty when none were recorded
    pub fn samples(&self) -> &[Sample] {
        self.samples.as_deref().unwrap_or_default()
    }
}

/// Validated seals step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealList {
    pub seals: Vec<Seal>,
}

impl StepForm for SealList {
    const STEP: Step = Step::Seals;
}
