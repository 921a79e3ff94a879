use std::time::Duration;

use serde::Serialize;

use crate::api::{PAGE_SIZE, StudyApi, normalize_page};
use crate::domain::{ChromosomeRange, VariantRecord};
use crate::error::PepkbError;
use crate::query::{RangeQuery, chromosome_range};
use crate::session::StudySession;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Summary of a completed study load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub study_id: String,
    pub study_name: String,
    pub records: usize,
    pub pages: u32,
    pub rejected_records: usize,
    pub fetched_at: String,
}

/// Outcome of a chromosome/range query against a loaded study.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub study_name: String,
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub matches: Vec<VariantRecord>,
    pub no_results: bool,
}

/// Derived position bounds for one chromosome of a loaded study.
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub study_name: String,
    pub chromosome: String,
    pub range: Option<ChromosomeRange>,
}

#[derive(Clone)]
pub struct App<C: StudyApi> {
    api: C,
}

impl<C: StudyApi> App<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }

    /// Resolves `study_name` and retrieves its full dataset into `session`.
    ///
    /// Pages are fetched strictly in ascending order; page N+1 is never
    /// requested before page N's records are appended. Any page failure
    /// aborts the chain: appended records stay in the session but the state
    /// becomes `Failed` and the error propagates. If the session is
    /// retargeted while the chain runs, stale results are discarded and the
    /// chain stops quietly.
    pub fn load(
        &self,
        study_name: &str,
        session: &mut StudySession,
        sink: &dyn ProgressSink,
    ) -> Result<(), PepkbError> {
        let generation = session.begin_load();

        sink.event(ProgressEvent {
            message: format!("phase=Resolve; study {study_name}"),
            elapsed: None,
        });
        let study = match self.api.resolve_study(study_name) {
            Ok(study) => study,
            Err(err) => {
                session.fail_load(generation, err.to_string());
                return Err(err);
            }
        };
        if !session.set_study(generation, study.clone()) {
            return Ok(());
        }

        let mut page = 1u32;
        loop {
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; page {page}"),
                elapsed: None,
            });
            let start = std::time::Instant::now();
            let fetched = match self.api.fetch_page(&study.id, page, PAGE_SIZE) {
                Ok(fetched) => fetched,
                Err(err) => {
                    session.fail_load(generation, err.to_string());
                    return Err(err);
                }
            };
            let latency = start.elapsed().as_millis();

            let normalized = normalize_page(&fetched.data);
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Fetch; page {}/{} records={} rejected={} latency_ms={latency}",
                    fetched.pagination.current_page,
                    fetched.pagination.total_pages,
                    normalized.records.len(),
                    normalized.rejected,
                ),
                elapsed: None,
            });
            if !session.append_page(
                generation,
                PAGE_SIZE,
                normalized.records,
                normalized.rejected,
                fetched.pagination,
            ) {
                return Ok(());
            }

            if page >= fetched.pagination.total_pages {
                break;
            }
            page += 1;
        }

        session.complete_load(generation);
        Ok(())
    }

    /// Loads the study and reports the full dataset summary.
    pub fn fetch(
        &self,
        study_name: &str,
        session: &mut StudySession,
        sink: &dyn ProgressSink,
    ) -> Result<LoadReport, PepkbError> {
        self.load(study_name, session, sink)?;
        Ok(build_load_report(session))
    }

    /// Loads the study, then runs the validated range query against the
    /// snapshot. The query was validated before any network activity; a
    /// query can never mutate the dataset.
    pub fn query(
        &self,
        study_name: &str,
        query: RangeQuery,
        session: &mut StudySession,
        sink: &dyn ProgressSink,
    ) -> Result<QueryReport, PepkbError> {
        self.load(study_name, session, sink)?;
        sink.event(ProgressEvent {
            message: format!(
                "phase=Query; chromosome={} start={} end={}",
                query.chromosome, query.start, query.end
            ),
            elapsed: None,
        });
        let result = session.apply_query(query.clone());
        Ok(QueryReport {
            study_name: session
                .study()
                .map(|study| study.name.clone())
                .unwrap_or_else(|| study_name.to_string()),
            chromosome: query.chromosome,
            start: query.start,
            end: query.end,
            matches: result.records,
            no_results: result.no_results,
        })
    }

    /// Loads the study and derives the observed min/max position for one
    /// chromosome, the hint the search form shows next to its inputs.
    pub fn range(
        &self,
        study_name: &str,
        chromosome: &str,
        session: &mut StudySession,
        sink: &dyn ProgressSink,
    ) -> Result<RangeReport, PepkbError> {
        self.load(study_name, session, sink)?;
        sink.event(ProgressEvent {
            message: format!("phase=Range; chromosome={chromosome}"),
            elapsed: None,
        });
        Ok(RangeReport {
            study_name: session
                .study()
                .map(|study| study.name.clone())
                .unwrap_or_else(|| study_name.to_string()),
            chromosome: chromosome.to_string(),
            range: chromosome_range(session.records(), chromosome),
        })
    }
}

fn build_load_report(session: &StudySession) -> LoadReport {
    let (study_id, study_name) = session
        .study()
        .map(|study| (study.id.as_str().to_string(), study.name.clone()))
        .unwrap_or_default();
    LoadReport {
        study_id,
        study_name,
        records: session.records().len(),
        pages: session
            .pagination()
            .map(|pagination| pagination.total_pages)
            .unwrap_or(0),
        rejected_records: session.rejected_records(),
        fetched_at: iso_timestamp(),
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
