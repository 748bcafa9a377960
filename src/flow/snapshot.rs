use super::model::Step;
use crate::error::{ImportError, SnapshotError};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Format version written into every exported snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

/// A deep, order-preserving copy of a flow graph, tagged with a format version.
///
/// The JSON shape is `{ "steps": [...], "version": "1.0" }`. `steps` is required on import;
/// a missing `version` is read as the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub steps: Vec<Step>,
    #[serde(default = "default_version")]
    pub version: String,
}

impl FlowSnapshot {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            version: default_version(),
        }
    }

    /// Parses and validates a JSON payload.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let snapshot: FlowSnapshot =
            serde_json::from_str(json).map_err(|e| ImportError::Parse(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Encodes the snapshot in the compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decodes and validates a snapshot from the compact binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: FlowSnapshot = decode_from_slice(bytes, standard())
            .map(|(snapshot, _)| snapshot) // bincode 2 returns (data, bytes_read)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Writes the snapshot to `path`: pretty JSON for `.json` files, binary otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let bytes = if is_json_path(path) {
            self.to_json_pretty()?.into_bytes()
        } else {
            self.to_bytes()?
        };
        fs::write(path, bytes).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads a snapshot written by [`FlowSnapshot::save`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if is_json_path(path) {
            let snapshot: FlowSnapshot = serde_json::from_slice(&bytes)
                .map_err(|e| ImportError::Parse(e.to_string()))?;
            snapshot.validate()?;
            Ok(snapshot)
        } else {
            Self::from_bytes(&bytes)
        }
    }

    /// Checks what the engine relies on: a known major version and unique ids.
    pub fn validate(&self) -> Result<(), ImportError> {
        let major = self.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(ImportError::UnsupportedVersion(self.version.clone()));
        }

        if let Some(step) = self.steps.iter().duplicates_by(|s| &s.id).next() {
            return Err(ImportError::DuplicateStepId(step.id.clone()));
        }

        for step in &self.steps {
            if let Some(sub_step) = step.sub_steps.iter().duplicates_by(|s| &s.id).next() {
                return Err(ImportError::DuplicateSubStepId {
                    step_id: step.id.clone(),
                    sub_step_id: sub_step.id.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
