use std::fmt::Write as _;
use std::io::{self, Write};

use serde::Serialize;

use crate::app::{CurationResult, FetchAction, InspectResult, ProgressEvent, ProgressSink};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_curation(result: &CurationResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_inspect(result: &InspectResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Prints progress lines as they happen.
pub struct ConsoleOutput;

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => println!("{} ({} ms)", event.message, elapsed.as_millis()),
            None => println!("{}", event.message),
        }
    }
}

fn flag(found: bool) -> &'static str {
    if found { "True" } else { "NA" }
}

pub fn render_curation(result: &CurationResult) -> String {
    let source = match result.matrix.action {
        FetchAction::Cached => "cached",
        FetchAction::Downloaded => "downloaded",
    };
    let mut out = String::new();
    let _ = writeln!(out, "Curation Summary");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "Study ID        : {}", result.study_id);
    let _ = writeln!(out, "Matrix          : {} ({source})", result.matrix.path);
    let _ = writeln!(out, "Genes           : {}", result.genes);
    let _ = writeln!(out, "Samples         : {}", result.samples);
    let _ = writeln!(out, "Rows written    : {}", result.rows_written);
    let _ = writeln!(out, "Output          : {}", result.output);
    out
}

/// Metadata summary followed by the field availability check. Flags are
/// shown as `True` or `NA`.
pub fn render_inspect(result: &InspectResult) -> String {
    let meta = &result.metadata;
    let availability = &result.availability;
    let mut out = String::new();
    let _ = writeln!(out, "Sample Metadata Summary");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "Sample ID       : {}", result.sample_id);
    let _ = writeln!(out, "Title           : {}", meta.title);
    let _ = writeln!(out, "Organism        : {}", meta.organism);
    let _ = writeln!(out, "Platform        : {}", meta.platform);
    let _ = writeln!(out, "Library Strategy: {}", meta.library_strategy);
    let _ = writeln!(out, "Instrument Model: {}", meta.instrument_model);
    let _ = writeln!(out, "\nCharacteristics:");
    for characteristic in &meta.characteristics {
        let _ = writeln!(out, " - {characteristic}");
    }

    let _ = writeln!(out, "\nField Availability Check");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "Sex Found       : {}", flag(availability.has_sex));
    let _ = writeln!(out, "Age Found       : {}", flag(availability.has_age));
    let _ = writeln!(out, "Patient ID Found: {}", flag(availability.has_patient));

    if availability.none_found() {
        let _ = writeln!(out, "\nNo demographic (sex, age) or patient-level metadata found.");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soft::{FieldAvailability, SampleMetadata};

    #[test]
    fn flags_render_true_or_na() {
        assert_eq!(flag(true), "True");
        assert_eq!(flag(false), "NA");
    }

    #[test]
    fn empty_metadata_prints_notice() {
        let result = InspectResult {
            sample_id: "GSM4284531".to_string(),
            metadata: SampleMetadata::default(),
            availability: FieldAvailability::default(),
        };
        let text = render_inspect(&result);
        assert!(text.contains("Sample ID       : GSM4284531"));
        assert!(text.contains("Sex Found       : NA"));
        assert!(text.contains("No demographic (sex, age) or patient-level metadata found."));
    }
}
