// src/core/retry.rs — Retry decisions for failed chain attempts
//
// Every failure is treated alike: the policy never looks at the error class.
// Attempt numbers count failures within one iteration, starting at 1.

use crate::infra::errors::CollapserError;

/// Decides whether a failed attempt should be repeated.
pub trait RetryPolicy: Send + Sync {
    fn should_retry(&self, iteration: usize, attempt: u32, error: &CollapserError) -> bool;
}

/// Build the policy for an optional retry budget. `None` means ask the user.
pub fn policy_for(retries: Option<u32>) -> Box<dyn RetryPolicy> {
    match retries {
        Some(budget) => Box::new(BoundedRetry::new(budget)),
        None => Box::new(InteractiveRetry::new(InquirePrompter)),
    }
}

/// Retry automatically up to a fixed budget per iteration.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRetry {
    budget: u32,
}

impl BoundedRetry {
    pub fn new(budget: u32) -> Self {
        Self { budget }
    }
}

impl RetryPolicy for BoundedRetry {
    fn should_retry(&self, iteration: usize, attempt: u32, error: &CollapserError) -> bool {
        if attempt <= self.budget {
            tracing::warn!(
                iteration,
                attempt,
                budget = self.budget,
                "Error on iteration {}, attempt {}/{}: {}. Retrying...",
                iteration,
                attempt,
                self.budget,
                error
            );
            true
        } else {
            tracing::warn!(
                iteration,
                "Iteration {} failed after {} retries: {}. Aborting.",
                iteration,
                self.budget,
                error
            );
            false
        }
    }
}

/// Yes/no question asked of whoever is driving the run.
pub trait Prompter: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Terminal prompt. Any prompt error (closed stdin, Ctrl-C) counts as "no".
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str) -> bool {
        inquire::Confirm::new(message)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

/// Ask on every failure. Blocks the run until answered.
pub struct InteractiveRetry<P: Prompter> {
    prompter: P,
}

impl<P: Prompter> InteractiveRetry<P> {
    pub fn new(prompter: P) -> Self {
        Self { prompter }
    }
}

impl<P: Prompter> RetryPolicy for InteractiveRetry<P> {
    fn should_retry(&self, iteration: usize, attempt: u32, error: &CollapserError) -> bool {
        let question = format!("Iteration {iteration} failed with error: {error}. Retry?");
        let retry = self.prompter.confirm(&question);
        if !retry {
            tracing::info!(iteration, attempt, "Aborting.");
        }
        retry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn err() -> CollapserError {
        CollapserError::Provider {
            provider: "test".into(),
            message: "HTTP 500".into(),
        }
    }

    struct ScriptedPrompter {
        answers: Mutex<Vec<bool>>,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedPrompter {
        fn new(mut answers: Vec<bool>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&self, message: &str) -> bool {
            self.asked.lock().unwrap().push(message.to_string());
            self.answers.lock().unwrap().pop().unwrap_or(false)
        }
    }

    #[test]
    fn test_bounded_allows_budget_then_stops() {
        let policy = BoundedRetry::new(2);
        assert!(policy.should_retry(1, 1, &err()));
        assert!(policy.should_retry(1, 2, &err()));
        assert!(!policy.should_retry(1, 3, &err()));
    }

    #[test]
    fn test_bounded_zero_never_retries() {
        let policy = BoundedRetry::new(0);
        assert!(!policy.should_retry(1, 1, &err()));
    }

    #[test]
    fn test_bounded_ignores_error_class() {
        let policy = BoundedRetry::new(1);
        let rejected = CollapserError::Provider {
            provider: "test".into(),
            message: "HTTP 400".into(),
        };
        assert!(policy.should_retry(4, 1, &rejected));
    }

    #[test]
    fn test_bounded_is_per_iteration() {
        // Same attempt number in a later iteration gets the same answer.
        let policy = BoundedRetry::new(1);
        assert!(policy.should_retry(1, 1, &err()));
        assert!(policy.should_retry(2, 1, &err()));
    }

    #[test]
    fn test_interactive_follows_answers() {
        let policy = InteractiveRetry::new(ScriptedPrompter::new(vec![true, false]));
        assert!(policy.should_retry(2, 1, &err()));
        assert!(!policy.should_retry(2, 2, &err()));

        let asked = policy.prompter.asked.lock().unwrap();
        assert_eq!(asked.len(), 2);
        assert!(asked[0].starts_with("Iteration 2 failed with error:"));
        assert!(asked[0].contains("HTTP 500"));
    }

    #[test]
    fn test_interactive_defaults_to_no() {
        let policy = InteractiveRetry::new(ScriptedPrompter::new(vec![]));
        assert!(!policy.should_retry(1, 1, &err()));
    }

    #[test]
    fn test_policy_for_budget() {
        let policy = policy_for(Some(1));
        assert!(policy.should_retry(1, 1, &err()));
        assert!(!policy.should_retry(1, 2, &err()));
    }
}
