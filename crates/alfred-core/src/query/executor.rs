/// In-memory list executor
///
/// Runs a [`QueryOption`] over a collection: filter, then sort, then page.
use super::option::QueryOption;
use super::sort::sort_records;
use crate::error::{Error, Result};
use crate::record::Record;

/// Result of evaluating the filters against one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Kept,
    Rejected,
    Errored(Error),
}

impl RecordOutcome {
    pub fn is_kept(&self) -> bool {
        matches!(self, RecordOutcome::Kept)
    }
}

/// Evaluate the option's filters against a single record.
pub fn evaluate<R: Record>(record: &R, option: &QueryOption) -> RecordOutcome {
    match option.filters.keep(record) {
        Ok(true) => RecordOutcome::Kept,
        Ok(false) => RecordOutcome::Rejected,
        Err(err) => RecordOutcome::Errored(err),
    }
}

/// Evaluation failure for the record at `index` of the input
#[derive(Debug, Clone, PartialEq)]
pub struct RecordError {
    pub index: usize,
    pub error: Error,
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    /// Records on this page, in sorted order
    pub items: Vec<R>,
    /// Number of kept records before pagination
    pub total: usize,
    /// Number of records the filters rejected
    pub rejected: usize,
    /// Records whose evaluation failed; they are not part of `items`
    pub errors: Vec<RecordError>,
}

impl<R> Page<R> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Executes query options over owned collections
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    fail_fast: bool,
}

impl Executor {
    /// Executor that collects per-record errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop at the first record whose evaluation fails
    pub fn fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Filter, sort and paginate `records`.
    ///
    /// Sorting errors always abort. Filter errors abort only in fail-fast
    /// mode; otherwise they are reported in [`Page::errors`].
    pub fn execute<R: Record>(&self, records: Vec<R>, option: &QueryOption) -> Result<Page<R>> {
        let input = records.len();
        let mut kept = Vec::with_capacity(input);
        let mut rejected = 0;
        let mut errors = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match evaluate(&record, option) {
                RecordOutcome::Kept => kept.push(record),
                RecordOutcome::Rejected => rejected += 1,
                RecordOutcome::Errored(error) => {
                    if self.fail_fast {
                        return Err(error);
                    }
                    tracing::debug!(index, error = %error, "record evaluation failed");
                    errors.push(RecordError { index, error });
                }
            }
        }

        sort_records(&mut kept, option)?;

        let total = kept.len();
        let items = paginate(kept, option);
        tracing::debug!(
            input,
            total,
            rejected,
            errors = errors.len(),
            page = items.len(),
            "executed query option"
        );

        Ok(Page {
            items,
            total,
            rejected,
            errors,
        })
    }
}

/// Apply offset and limit
pub fn paginate<R>(records: Vec<R>, option: &QueryOption) -> Vec<R> {
    let rows = records.into_iter().skip(option.offset);
    match option.page_limit() {
        Some(limit) => rows.take(limit).collect(),
        None => rows.collect(),
    }
}
