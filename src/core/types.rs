// src/core/types.rs — Core domain types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What one chain invocation is asked to do.
#[derive(Debug, Clone)]
pub struct ChainRequest {
    pub base_image: PathBuf,
    pub instruction: String,
    /// Number of iterations. Zero runs nothing and is not an error.
    pub iterations: usize,
    /// Run the color correction after each edit and feed its output forward.
    pub correct: bool,
}

impl ChainRequest {
    pub fn new(
        base_image: impl Into<PathBuf>,
        instruction: impl Into<String>,
        iterations: usize,
    ) -> Self {
        Self {
            base_image: base_image.into(),
            instruction: instruction.into(),
            iterations,
            correct: false,
        }
    }

    pub fn with_correction(mut self, correct: bool) -> Self {
        self.correct = correct;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Generated,
    Corrected,
}

impl ArtifactKind {
    /// Subdirectory of the run workspace holding this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Generated => "generated",
            ArtifactKind::Corrected => "corrected",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One image written by an iteration. Never rewritten once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    /// 1-based iteration index.
    pub iteration: usize,
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Outcome of one chain invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRun {
    pub id: String,
    pub workspace: PathBuf,
    pub base_image: PathBuf,
    pub instruction: String,
    pub iterations_requested: usize,
    pub correct: bool,
    pub artifacts: Vec<ImageArtifact>,
    /// Iteration at which retries ran out or were declined.
    pub stopped_at: Option<usize>,
}

impl ChainRun {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.artifacts.iter().map(|a| a.path.clone()).collect()
    }

    /// Number of iterations that produced their artifacts.
    pub fn completed_iterations(&self) -> usize {
        self.artifacts.last().map(|a| a.iteration).unwrap_or(0)
    }

    pub fn is_complete(&self) -> bool {
        self.stopped_at.is_none() && self.completed_iterations() == self.iterations_requested
    }

    /// One-line summary for the UI boundary.
    pub fn status_message(&self) -> String {
        let count = self.artifacts.len();
        match self.stopped_at {
            _ if count == 0 => "No images were generated".to_string(),
            Some(iteration) => {
                format!("Stopped after iteration {iteration}: {count} images generated")
            }
            None => format!("Successfully generated {count} images"),
        }
    }
}

/// Lifecycle events emitted by the orchestrator for live display.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    WorkspaceCreated {
        path: PathBuf,
    },
    AttemptStart {
        iteration: usize,
        total: usize,
        attempt: u32,
        input: PathBuf,
    },
    ArtifactSaved {
        iteration: usize,
        kind: ArtifactKind,
        path: PathBuf,
    },
    AttemptFailed {
        iteration: usize,
        attempt: u32,
        error: String,
    },
    Stopped {
        iteration: usize,
        artifacts: usize,
    },
    Complete {
        artifacts: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(
        artifacts: Vec<ImageArtifact>,
        requested: usize,
        stopped_at: Option<usize>,
    ) -> ChainRun {
        ChainRun {
            id: "run".into(),
            workspace: PathBuf::from("run"),
            base_image: PathBuf::from("base.png"),
            instruction: "add a hat".into(),
            iterations_requested: requested,
            correct: false,
            artifacts,
            stopped_at,
        }
    }

    fn generated(i: usize) -> ImageArtifact {
        ImageArtifact {
            iteration: i,
            kind: ArtifactKind::Generated,
            path: PathBuf::from(format!("run/generated/{i:02}.png")),
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ArtifactKind::Generated.to_string(), "generated");
        assert_eq!(ArtifactKind::Corrected.dir_name(), "corrected");
    }

    #[test]
    fn test_status_empty() {
        let run = run_with(vec![], 3, Some(1));
        assert_eq!(run.status_message(), "No images were generated");
        assert_eq!(run.completed_iterations(), 0);
        assert!(!run.is_complete());
    }

    #[test]
    fn test_status_complete() {
        let run = run_with(vec![generated(1), generated(2)], 2, None);
        assert_eq!(run.status_message(), "Successfully generated 2 images");
        assert!(run.is_complete());
        assert_eq!(run.completed_iterations(), 2);
    }

    #[test]
    fn test_status_truncated() {
        let run = run_with(vec![generated(1)], 3, Some(2));
        assert_eq!(
            run.status_message(),
            "Stopped after iteration 2: 1 images generated"
        );
        assert_eq!(run.completed_iterations(), 1);
        assert!(!run.is_complete());
    }

    #[test]
    fn test_zero_iterations_is_complete() {
        let run = run_with(vec![], 0, None);
        assert!(run.is_complete());
        assert!(run.paths().is_empty());
    }

    #[test]
    fn test_request_builder() {
        let req = ChainRequest::new("base.png", "add a hat", 3).with_correction(true);
        assert_eq!(req.iterations, 3);
        assert!(req.correct);
    }
}
