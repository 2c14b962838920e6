//! Ordered fallback execution: try attempts in sequence, stop at the first
//! success, fail only after the whole chain is exhausted. Shared by the
//! artifact-name fallback and the Debian escalation tiers.

use anyhow::{Result, anyhow};

use crate::ui;

/// One step of a fallback chain.
pub struct Attempt<'a, T> {
    label: String,
    action: Box<dyn FnOnce() -> Result<T> + 'a>,
}

impl<'a, T> Attempt<'a, T> {
    pub fn new(label: impl Into<String>, action: impl FnOnce() -> Result<T> + 'a) -> Self {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }
}

/// Run attempts in order. Each failure is reported and the next attempt
/// starts; exhaustion yields an error naming the goal and the last failure.
pub fn run_chain<T>(goal: &str, attempts: Vec<Attempt<'_, T>>) -> Result<T> {
    let total = attempts.len();
    let mut last_error = None;

    for (index, attempt) in attempts.into_iter().enumerate() {
        let label = attempt.label;
        match (attempt.action)() {
            Ok(value) => {
                if index > 0 {
                    ui::info(format!("{label} succeeded"));
                }
                return Ok(value);
            }
            Err(err) => {
                if index + 1 < total {
                    ui::warn(format!("{label} failed ({err}), trying the next approach"));
                } else {
                    ui::warn(format!("{label} failed ({err})"));
                }
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) => Err(anyhow!("could not {goal}: all {total} attempts failed ({err})")),
        None => Err(anyhow!("could not {goal}: nothing to attempt")),
    }
}
