//! Outcome types for the remote fan-out.
//!
//! This module provides the pure accumulation logic that runs after the join
//! barrier, decoupled from the network I/O that produces the outcomes.

use std::collections::BTreeSet;

use crate::error::AppError;
use crate::models::Record;

/// Terminal state of one remote call. Exactly one per configured endpoint.
#[derive(Debug)]
pub enum CallOutcome {
    /// The endpoint answered with a valid record.
    Success(Record),
    /// The call failed for any reason; `cause` is kept for logging only.
    Failure { label: String, cause: AppError },
}

impl CallOutcome {
    pub fn failure(label: impl Into<String>, cause: AppError) -> Self {
        CallOutcome::Failure {
            label: label.into(),
            cause,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }
}

/// Partial, best-effort result of one aggregation.
///
/// `records` is in completion order, which varies between runs. Callers must
/// not rely on it matching directory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationResult {
    records: Vec<Record>,
    failed_labels: BTreeSet<String>,
}

impl AggregationResult {
    /// Folds settled outcomes into a result.
    ///
    /// A `Success` carrying a record with a blank id is dropped and its
    /// record name (the endpoint label) is reported as failed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoDataAvailable` with every failed label if no
    /// valid record remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use bankbridge_core::{AggregationResult, AppError, CallOutcome, Record};
    ///
    /// let result = AggregationResult::from_outcomes(vec![
    ///     CallOutcome::Success(Record::new("5678", "Credit Sweets").unwrap()),
    ///     CallOutcome::failure("Banco de espiritu santo", AppError::InvalidRecord("no bic".into())),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(result.records().len(), 1);
    /// assert!(result.failed_labels().contains("Banco de espiritu santo"));
    /// ```
    pub fn from_outcomes<I>(outcomes: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = CallOutcome>,
    {
        let mut records = Vec::new();
        let mut failed_labels = BTreeSet::new();

        for outcome in outcomes {
            match outcome {
                CallOutcome::Success(record) if record.is_valid() => records.push(record),
                CallOutcome::Success(record) => {
                    failed_labels.insert(record.name);
                }
                CallOutcome::Failure { label, .. } => {
                    failed_labels.insert(label);
                }
            }
        }

        if records.is_empty() {
            return Err(AppError::NoDataAvailable {
                failed_labels: failed_labels.into_iter().collect(),
            });
        }

        Ok(Self {
            records,
            failed_labels,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn failed_labels(&self) -> &BTreeSet<String> {
        &self.failed_labels
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn successful_count(&self) -> usize {
        self.records.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed_labels.len()
    }
}
