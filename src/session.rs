use serde::Serialize;

use crate::api::Pagination;
use crate::domain::{Study, VariantRecord};
use crate::query::{QueryResult, RangeQuery};

/// Where a study load currently stands. A failed or superseded load never
/// reports its dataset as complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadState {
    Idle,
    Loading,
    Complete,
    Failed(String),
}

/// Bookkeeping of the paged fetch, 1-based as the server reports it.
/// `total_pages` is only meaningful after the first successful page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Token identifying one load chain. Mutations carry the token they were
/// issued under; a token from a superseded chain is refused, so a slow page
/// response for a previous study can never land in the current dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Request-scoped accumulator for one study's dataset.
///
/// Owns the ordered record collection, the load/pagination bookkeeping, and
/// the last executed query. All state is session-local; dropping the session
/// discards everything. The dataset has one writer (the load chain) while
/// `Loading` and is read-only thereafter.
#[derive(Debug)]
pub struct StudySession {
    study: Option<Study>,
    records: Vec<VariantRecord>,
    state: LoadState,
    pagination: Option<PaginationState>,
    rejected_records: usize,
    query_result: Option<QueryResult>,
    last_query: Option<RangeQuery>,
    generation: u64,
}

impl StudySession {
    pub fn new() -> Self {
        Self {
            study: None,
            records: Vec::new(),
            state: LoadState::Idle,
            pagination: None,
            rejected_records: 0,
            query_result: None,
            last_query: None,
            generation: 0,
        }
    }

    pub fn study(&self) -> Option<&Study> {
        self.study.as_ref()
    }

    /// Ordered snapshot of the accumulated dataset: server page-then-record
    /// order, duplicates preserved if the server ever returns overlapping
    /// pages.
    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn pagination(&self) -> Option<&PaginationState> {
        self.pagination.as_ref()
    }

    pub fn rejected_records(&self) -> usize {
        self.rejected_records
    }

    pub fn query_result(&self) -> Option<&QueryResult> {
        self.query_result.as_ref()
    }

    pub fn last_query(&self) -> Option<&RangeQuery> {
        self.last_query.as_ref()
    }

    /// Starts a new load chain: clears every trace of the previous study
    /// (dataset, query state, pagination) and invalidates all outstanding
    /// generation tokens. Returns the token the new chain must present.
    pub fn begin_load(&mut self) -> Generation {
        self.study = None;
        self.records.clear();
        self.pagination = None;
        self.rejected_records = 0;
        self.query_result = None;
        self.last_query = None;
        self.state = LoadState::Loading;
        self.generation += 1;
        Generation(self.generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation.0
    }

    /// Records the resolved study. Refused (returns false) for a stale token.
    pub fn set_study(&mut self, generation: Generation, study: Study) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.study = Some(study);
        true
    }

    /// Appends one normalized page in order and updates pagination. Refused
    /// (returns false, nothing mutated) for a stale token.
    pub fn append_page(
        &mut self,
        generation: Generation,
        page_size: u32,
        records: Vec<VariantRecord>,
        rejected: usize,
        pagination: Pagination,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.records.extend(records);
        self.rejected_records += rejected;
        self.pagination = Some(PaginationState {
            page_size,
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
        });
        true
    }

    /// Marks the chain complete; the dataset becomes a read-only snapshot.
    pub fn complete_load(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.state = LoadState::Complete;
        true
    }

    /// Marks the chain failed. Already-appended records stay in place but the
    /// dataset is no longer presented as complete.
    pub fn fail_load(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.state = LoadState::Failed(message.into());
        true
    }

    /// Runs a validated query against the current snapshot and stores the
    /// outcome. Purely a read of the dataset; the records themselves are
    /// untouched.
    pub fn apply_query(&mut self, query: RangeQuery) -> QueryResult {
        let result = query.filter(&self.records);
        self.last_query = Some(query);
        self.query_result = Some(result.clone());
        result
    }

    /// Clears the executed query and its `no_results` flag, restoring the
    /// "show unfiltered dataset" presentation state. The dataset is untouched.
    pub fn reset_query(&mut self) {
        self.query_result = None;
        self.last_query = None;
    }
}

impl Default for StudySession {
    fn default() -> Self {
        Self::new()
    }
}
