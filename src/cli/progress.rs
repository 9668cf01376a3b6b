// src/cli/progress.rs — Terminal progress renderer for chain runs

use crate::core::types::ProgressEvent;

/// Build a progress callback that writes formatted output to stderr.
///
/// stdout stays reserved for the final artifact list.
pub fn terminal_progress() -> impl Fn(ProgressEvent) + Send + Sync + 'static {
    move |event| eprintln!("{}", format_event(&event))
}

pub fn format_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::WorkspaceCreated { path } => {
            format!("Created output directory: {}", path.display())
        }
        ProgressEvent::AttemptStart {
            iteration,
            total,
            attempt,
            input,
        } => format!(
            "Iteration {}/{}: editing image '{}' (attempt {})",
            iteration,
            total,
            input.display(),
            attempt
        ),
        ProgressEvent::ArtifactSaved {
            iteration,
            kind,
            path,
        } => format!(
            "Iteration {}: saved {} image to '{}'",
            iteration,
            kind,
            path.display()
        ),
        ProgressEvent::AttemptFailed {
            iteration,
            attempt,
            error,
        } => format!(
            "Iteration {} attempt {} failed: {}",
            iteration, attempt, error
        ),
        ProgressEvent::Stopped {
            iteration,
            artifacts,
        } => format!(
            "Stopped at iteration {} with {} image(s) written",
            iteration, artifacts
        ),
        ProgressEvent::Complete { artifacts } => {
            format!("Generation complete: {} image(s) written", artifacts)
        }
    }
}
