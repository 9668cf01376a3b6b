// src/core/workspace.rs — Per-run output directory
//
// Layout:
//   <output_root>/<run-id>/generated/NN.png
//   <output_root>/<run-id>/corrected/NN.png   (only when correcting)

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::ArtifactKind;
use crate::infra::errors::CollapserError;

#[derive(Debug, Clone)]
pub struct Workspace {
    pub id: String,
    pub root: PathBuf,
    with_corrected: bool,
}

impl Workspace {
    /// Create a fresh, uniquely named workspace under `output_root`.
    pub async fn create(output_root: &Path, with_corrected: bool) -> Result<Self, CollapserError> {
        Self::create_with(output_root, with_corrected, || uuid::Uuid::new_v4().to_string()).await
    }

    /// Same as [`Workspace::create`] with a caller-supplied id generator.
    ///
    /// The run directory is claimed with a single `create_dir`, so two runs can
    /// never end up sharing one. An existing name just draws a new id.
    pub async fn create_with(
        output_root: &Path,
        with_corrected: bool,
        mut next_id: impl FnMut() -> String,
    ) -> Result<Self, CollapserError> {
        tokio::fs::create_dir_all(output_root).await?;

        let (id, root) = loop {
            let id = next_id();
            let root = output_root.join(&id);
            match tokio::fs::create_dir(&root).await {
                Ok(()) => break (id, root),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(id = %id, "Workspace name taken, drawing another");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        };

        tokio::fs::create_dir(root.join(ArtifactKind::Generated.dir_name())).await?;
        if with_corrected {
            tokio::fs::create_dir(root.join(ArtifactKind::Corrected.dir_name())).await?;
        }

        tracing::info!(path = %root.display(), "Created output directory");
        Ok(Self {
            id,
            root,
            with_corrected,
        })
    }

    pub fn has_corrected(&self) -> bool {
        self.with_corrected
    }

    pub fn artifact_path(&self, kind: ArtifactKind, iteration: usize) -> PathBuf {
        self.root
            .join(kind.dir_name())
            .join(artifact_file_name(iteration))
    }
}

/// `01.png`, `02.png`, … Width grows past two digits instead of wrapping.
pub fn artifact_file_name(iteration: usize) -> String {
    format!("{iteration:02}.png")
}
