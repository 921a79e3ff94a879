use std::io::{self, Write};

use serde::Serialize;

use crate::app::{LoadReport, ProgressEvent, ProgressSink, QueryReport, RangeReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

/// Machine-readable presenter: one pretty-printed JSON document on stdout,
/// progress swallowed.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_load(report: &LoadReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn print_query(report: &QueryReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn print_range(report: &RangeReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Human-readable presenter: progress lines on stderr, colored summaries on
/// stdout. This is the terminal stand-in for the heatmap/visualizer pages.
pub struct TextOutput;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

impl TextOutput {
    pub fn print_load(report: &LoadReport) {
        println!("{CYAN}🧬 {} (study {}){RESET}", report.study_name, report.study_id);
        println!(
            "{GREEN}✅ {} records across {} page(s){RESET}",
            report.records, report.pages
        );
        if report.rejected_records > 0 {
            println!(
                "{YELLOW}⚠️ {} record(s) rejected for malformed positions{RESET}",
                report.rejected_records
            );
        }
        println!("{DIM}fetched at {}{RESET}", report.fetched_at);
    }

    pub fn print_query(report: &QueryReport) {
        println!(
            "{CYAN}🔍 {}: chromosome {} positions {}..={}{RESET}",
            report.study_name, report.chromosome, report.start, report.end
        );
        if report.no_results {
            println!("{YELLOW}no SNP markers matched{RESET}");
            return;
        }
        println!("{GREEN}✅ {} match(es){RESET}", report.matches.len());
        for record in &report.matches {
            println!(
                "  {} {} {} {}>{}",
                record.chromosome,
                record.position,
                if record.variant_id.is_empty() {
                    "."
                } else {
                    record.variant_id.as_str()
                },
                record.reference_allele,
                record.alternate_display(),
            );
        }
    }

    pub fn print_range(report: &RangeReport) {
        match &report.range {
            Some(range) => println!(
                "{GREEN}{}: chromosome {} spans {}..={}{RESET}",
                report.study_name, range.chromosome, range.min_position, range.max_position
            ),
            None => println!(
                "{YELLOW}{}: no records on chromosome {}{RESET}",
                report.study_name, report.chromosome
            ),
        }
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        eprintln!("{DIM}{}{RESET}", event.message);
    }
}
