// src/core/orchestrator.rs — Chain controller

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use image::ImageFormat;

use super::retry::RetryPolicy;
use super::types::*;
use super::workspace::Workspace;
use crate::correction;
use crate::infra::errors::CollapserError;
use crate::provider::{EditRequest, EditSettings, ImageEditProvider};

/// Drives the edit → persist → (correct) → feed-forward loop.
pub struct ChainOrchestrator {
    provider: Arc<dyn ImageEditProvider>,
    settings: EditSettings,
    /// Parent directory for run workspaces.
    output_root: PathBuf,
    on_progress: Option<Box<dyn Fn(ProgressEvent) + Send + Sync>>,
}

impl ChainOrchestrator {
    pub fn new(
        provider: Arc<dyn ImageEditProvider>,
        settings: EditSettings,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            settings,
            output_root: output_root.into(),
            on_progress: None,
        }
    }

    /// Set a callback for real-time progress events.
    pub fn with_progress(mut self, cb: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    /// Run the chain.
    ///
    /// Per-attempt failures go to `policy`; when it declines, the run stops and
    /// whatever was produced so far is returned as a normal result. Only
    /// workspace creation and fatal errors (a missing API key) come back as `Err`.
    pub async fn run(
        &self,
        request: &ChainRequest,
        policy: &dyn RetryPolicy,
    ) -> Result<ChainRun, CollapserError> {
        let start = Instant::now();
        let workspace = Workspace::create(&self.output_root, request.correct).await?;
        self.emit(ProgressEvent::WorkspaceCreated {
            path: workspace.root.clone(),
        });

        let mut run = ChainRun {
            id: workspace.id.clone(),
            workspace: workspace.root.clone(),
            base_image: request.base_image.clone(),
            instruction: request.instruction.clone(),
            iterations_requested: request.iterations,
            correct: request.correct,
            artifacts: Vec::new(),
            stopped_at: None,
        };

        let mut input = request.base_image.clone();

        for i in 1..=request.iterations {
            let mut attempt: u32 = 0;
            loop {
                self.emit(ProgressEvent::AttemptStart {
                    iteration: i,
                    total: request.iterations,
                    attempt: attempt + 1,
                    input: input.clone(),
                });

                match self.attempt(&workspace, request, i, &input).await {
                    Ok(produced) => {
                        if let Some(last) = produced.last() {
                            input = last.path.clone();
                        }
                        run.artifacts.extend(produced);
                        break;
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        attempt += 1;
                        self.emit(ProgressEvent::AttemptFailed {
                            iteration: i,
                            attempt,
                            error: e.to_string(),
                        });

                        if policy.should_retry(i, attempt, &e) {
                            continue;
                        }

                        tracing::info!(
                            provider = self.provider.id(),
                            iteration = i,
                            attempts = attempt,
                            artifacts = run.artifacts.len(),
                            "Chain stopped early"
                        );
                        run.stopped_at = Some(i);
                        self.emit(ProgressEvent::Stopped {
                            iteration: i,
                            artifacts: run.artifacts.len(),
                        });
                        return Ok(run);
                    }
                }
            }
        }

        tracing::info!(
            run = %run.id,
            provider = self.provider.id(),
            artifacts = run.artifacts.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        self.emit(ProgressEvent::Complete {
            artifacts: run.artifacts.len(),
        });
        Ok(run)
    }

    /// One attempt at iteration `i`. Returns the artifacts in write order;
    /// the last one is the next iteration's input.
    async fn attempt(
        &self,
        workspace: &Workspace,
        request: &ChainRequest,
        i: usize,
        input: &Path,
    ) -> Result<Vec<ImageArtifact>, CollapserError> {
        let bytes = tokio::fs::read(input).await?;
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".into());

        let edited = self
            .provider
            .edit(EditRequest {
                image: bytes,
                file_name,
                prompt: request.instruction.clone(),
                settings: self.settings.clone(),
                n: 1,
            })
            .await?;

        let gen_path = workspace.artifact_path(ArtifactKind::Generated, i);
        let corr_path = (request.correct && workspace.has_corrected())
            .then(|| workspace.artifact_path(ArtifactKind::Corrected, i));

        // Decoding, correction and PNG encoding are CPU-bound.
        let (generated, corrected) = (gen_path.clone(), corr_path.clone());
        tokio::task::spawn_blocking(move || {
            persist(&edited.bytes, &generated, corrected.as_deref())
        })
        .await??;
        tracing::info!(
            provider = self.provider.id(),
            iteration = i,
            corrected = corr_path.is_some(),
            path = %gen_path.display(),
            "Saved generated image"
        );

        let mut produced = vec![ImageArtifact {
            iteration: i,
            kind: ArtifactKind::Generated,
            path: gen_path,
        }];
        if let Some(path) = corr_path {
            produced.push(ImageArtifact {
                iteration: i,
                kind: ArtifactKind::Corrected,
                path,
            });
        }

        for artifact in &produced {
            self.emit(ProgressEvent::ArtifactSaved {
                iteration: artifact.iteration,
                kind: artifact.kind,
                path: artifact.path.clone(),
            });
        }

        Ok(produced)
    }
}

/// Decode the edited bytes and write them as PNG, plus the corrected copy
/// when `corrected` is set.
fn persist(
    bytes: &[u8],
    generated: &Path,
    corrected: Option<&Path>,
) -> Result<(), CollapserError> {
    let img = image::load_from_memory(bytes)?;
    img.save_with_format(generated, ImageFormat::Png)?;

    if let Some(path) = corrected {
        correction::correct(&img).save_with_format(path, ImageFormat::Png)?;
        tracing::debug!(path = %path.display(), "Saved color-corrected image");
    }
    Ok(())
}
