//! SNP marker query client for the PepperKB genomics knowledge base.
//!
//! Resolves a study by name, retrieves its variant records from the paged
//! `/snp` feed into an in-memory session, and answers chromosome /
//! position-range queries against the accumulated dataset.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod query;
pub mod session;
