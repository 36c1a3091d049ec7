//! Model artifact persistence
//!
//! The trained classifier and its label codec are serialized together: a
//! codec fit on different data than it decodes is an invariant violation,
//! so the two travel as one artifact. A short header makes the file
//! self-describing, so foreign or truncated content is rejected instead of
//! being fed to the decoder blindly.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::ml::encoding::LabelCodec;
use crate::ml::model::IrrigationClassifier;

/// Identifies the artifact encoding
const ARTIFACT_MAGIC: [u8; 8] = *b"FSMMODEL";

/// Bumped whenever the serialized layout changes
const ARTIFACT_VERSION: u16 = 1;

/// A trained model, its codec, and identifying metadata
#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub codec: LabelCodec,
    pub model: IrrigationClassifier,
}

/// Borrowed mirror of [`ModelArtifact`] so saving does not require cloning
/// the ensemble; field order must match the owned struct.
#[derive(Serialize)]
struct ModelArtifactRef<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    codec: &'a LabelCodec,
    model: &'a IrrigationClassifier,
}

/// Serialize the model and codec to `path`, creating parent directories
/// as needed. Returns the artifact id.
pub fn save_model(
    codec: &LabelCodec,
    model: &IrrigationClassifier,
    path: impl AsRef<Path>,
) -> AppResult<Uuid> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("creating {}: {}", parent.display(), e)))?;
        }
    }

    let artifact = ModelArtifactRef {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        codec,
        model,
    };
    let body = bincode::serialize(&artifact)
        .map_err(|e| AppError::Storage(format!("encoding model artifact: {}", e)))?;

    let mut bytes = Vec::with_capacity(ARTIFACT_MAGIC.len() + 2 + body.len());
    bytes.extend_from_slice(&ARTIFACT_MAGIC);
    bytes.extend_from_slice(&ARTIFACT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);

    fs::write(path, bytes)
        .map_err(|e| AppError::Storage(format!("writing {}: {}", path.display(), e)))?;

    Ok(artifact.id)
}

/// Read an artifact back from `path`
pub fn load_model(path: impl AsRef<Path>) -> AppResult<ModelArtifact> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => AppError::Storage(format!("reading {}: {}", path.display(), e)),
    })?;

    let header_len = ARTIFACT_MAGIC.len() + 2;
    if bytes.len() < header_len || bytes[..ARTIFACT_MAGIC.len()] != ARTIFACT_MAGIC {
        return Err(AppError::CorruptArtifact(format!(
            "{} is not a model artifact",
            path.display()
        )));
    }

    let version = u16::from_le_bytes([bytes[ARTIFACT_MAGIC.len()], bytes[ARTIFACT_MAGIC.len() + 1]]);
    if version != ARTIFACT_VERSION {
        return Err(AppError::CorruptArtifact(format!(
            "unsupported artifact version {}",
            version
        )));
    }

    bincode::deserialize(&bytes[header_len..])
        .map_err(|e| AppError::CorruptArtifact(format!("{}: {}", path.display(), e)))
}
