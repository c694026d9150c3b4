//! Logo asset access.
//!
//! The renderer reads logos through [`AssetSource`] so it never touches the
//! filesystem directly; tests hand in [`MemoryAssetSource`].

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Failure to produce the bytes behind an asset reference.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("invalid asset reference: {0}")]
    InvalidReference(String),

    #[error("failed to read asset {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
}

/// Synchronous read access to stored assets.
pub trait AssetSource: Send + Sync {
    fn read_asset(&self, reference: &str) -> Result<Vec<u8>, AssetError>;
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// Assets stored under a root directory. References are relative paths and
/// may not escape the root.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference onto a path below the root.
    fn resolve(&self, reference: &str) -> Result<PathBuf, AssetError> {
        let invalid = || AssetError::InvalidReference(reference.to_string());
        if reference.trim().is_empty() {
            return Err(invalid());
        }
        let mut path = self.root.clone();
        for component in Path::new(reference).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid())
                }
            }
        }
        if path == self.root {
            return Err(invalid());
        }
        Ok(path)
    }
}

impl AssetSource for FsAssetSource {
    fn read_asset(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(reference)?;
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(reference.to_string()),
            _ => AssetError::Io {
                reference: reference.to_string(),
                source: e,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Fixed set of assets keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.assets.insert(reference.into(), bytes);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn read_asset(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        self.assets
            .get(reference)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(reference.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
