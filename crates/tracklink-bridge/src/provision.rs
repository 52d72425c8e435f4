use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Ensures a current companion binary exists before launch.
///
/// The bridge only consumes the fetch-if-stale interface; the download
/// mechanics (HTTP, retries) are the embedder's concern. A provisioning
/// failure is non-fatal when a previously-provisioned binary is still
/// usable locally.
pub trait Provisioner: Send {
    /// Make sure a ready companion binary exists and return its path.
    fn provide(&self) -> Result<PathBuf>;
}

/// Remote manifest shape describing the expected companion binary.
///
/// Embedders implementing fetch-if-stale compare `executable_hash`
/// against a digest of the local binary and re-download on mismatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Hex digest of the current companion binary.
    pub executable_hash: String,
}

impl Manifest {
    /// Parse a manifest from its JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| BridgeError::Provisioning(format!("invalid manifest: {err}")))
    }

    /// Whether a local digest matches the manifest. Hash case is not
    /// significant.
    pub fn matches(&self, local_digest: &str) -> bool {
        self.executable_hash.eq_ignore_ascii_case(local_digest)
    }
}

/// Provisioner that trusts an already-present local binary.
///
/// Used as the default when no fetch-if-stale implementation is wired in:
/// "ready" simply means the file exists.
#[derive(Debug, Clone)]
pub struct LocalExecutable {
    path: PathBuf,
}

impl LocalExecutable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Provisioner for LocalExecutable {
    fn provide(&self) -> Result<PathBuf> {
        if self.path.is_file() {
            Ok(self.path.clone())
        } else {
            Err(BridgeError::Provisioning(format!(
                "companion binary not found: {}",
                self.path.display()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_and_compares_case_insensitively() {
        let manifest =
            Manifest::from_json(r#"{"executable_hash":"D41D8CD98F00B204E9800998ECF8427E"}"#)
                .unwrap();
        assert!(manifest.matches("d41d8cd98f00b204e9800998ecf8427e"));
        assert!(!manifest.matches("0000000000000000000000000000dead"));
    }

    #[test]
    fn invalid_manifest_is_a_provisioning_error() {
        let err = Manifest::from_json("not json").unwrap_err();
        assert!(matches!(err, BridgeError::Provisioning(_)));
    }

    #[test]
    fn local_executable_requires_existing_file() {
        let missing = LocalExecutable::new("/nonexistent/player-agent");
        let err = missing.provide().unwrap_err();
        assert!(matches!(err, BridgeError::Provisioning(_)));
    }

    #[test]
    fn local_executable_accepts_existing_file() {
        let dir = std::env::temp_dir().join(format!("tracklink-provision-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("player-agent");
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();

        let provisioner = LocalExecutable::new(&path);
        assert_eq!(provisioner.provide().unwrap(), path);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
