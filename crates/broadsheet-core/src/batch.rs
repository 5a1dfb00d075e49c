//! Bounded-concurrency runner applying one async operation to independent items.

use std::fmt::Display;
use std::future::Future;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::error::{BroadsheetError, Result};

/// What to do when an item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and keep going.
    Isolate,
    /// Stop scheduling further items after the first failure.
    Abort,
}

/// Result of one item.
#[derive(Debug)]
pub enum ItemOutcome<T> {
    Done { key: String, value: T },
    Failed { key: String, error: BroadsheetError },
}

impl<T> ItemOutcome<T> {
    pub fn key(&self) -> &str {
        match self {
            ItemOutcome::Done { key, .. } | ItemOutcome::Failed { key, .. } => key,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub outcomes: Vec<ItemOutcome<T>>,
    /// True when an `Abort` policy stopped the batch early.
    pub aborted: bool,
}

impl<T> BatchReport<T> {
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &T)> {
        self.outcomes.iter().filter_map(|o| match o {
            ItemOutcome::Done { key, value } => Some((key.as_str(), value)),
            ItemOutcome::Failed { .. } => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &BroadsheetError)> {
        self.outcomes.iter().filter_map(|o| match o {
            ItemOutcome::Failed { key, error } => Some((key.as_str(), error)),
            ItemOutcome::Done { .. } => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// All values in input order, or the first error.
    pub fn into_result(self) -> Result<Vec<T>> {
        self.outcomes
            .into_iter()
            .map(|o| match o {
                ItemOutcome::Done { value, .. } => Ok(value),
                ItemOutcome::Failed { error, .. } => Err(error),
            })
            .collect()
    }
}

/// Runs an operation over a collection with at most `concurrency` items in flight.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    concurrency: usize,
    policy: FailurePolicy,
}

impl BatchRunner {
    /// Create a runner; a concurrency of zero is treated as one.
    pub fn new(concurrency: usize, policy: FailurePolicy) -> Self {
        Self {
            concurrency: concurrency.max(1),
            policy,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Apply `op` to every item.
    pub async fn run<K, T, F, Fut>(&self, items: impl IntoIterator<Item = K>, op: F) -> BatchReport<T>
    where
        K: Display,
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_with_progress(items, op, |_| {}).await
    }

    /// Apply `op` to every item, calling `on_done` as each outcome is collected.
    pub async fn run_with_progress<K, T, F, Fut, P>(
        &self,
        items: impl IntoIterator<Item = K>,
        op: F,
        mut on_done: P,
    ) -> BatchReport<T>
    where
        K: Display,
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<T>>,
        P: FnMut(&ItemOutcome<T>),
    {
        let mut outcomes = Vec::new();
        let mut aborted = false;

        let mut results = stream::iter(items)
            .map(|item| {
                let key = item.to_string();
                let fut = op(item);
                async move {
                    match fut.await {
                        Ok(value) => ItemOutcome::Done { key, value },
                        Err(error) => ItemOutcome::Failed { key, error },
                    }
                }
            })
            .buffered(self.concurrency);

        while let Some(outcome) = results.next().await {
            on_done(&outcome);

            let failed = outcome.is_failed();
            if let ItemOutcome::Failed { key, error } = &outcome {
                warn!("Item {} failed: {}", key, error);
            }
            outcomes.push(outcome);

            if failed && self.policy == FailurePolicy::Abort {
                aborted = true;
                break;
            }
        }

        debug!(
            "Batch finished: {} outcomes, aborted={}",
            outcomes.len(),
            aborted
        );

        BatchReport { outcomes, aborted }
    }
}
