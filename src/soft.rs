use serde::Serialize;

const TITLE: &str = "!Sample_title";
const CHARACTERISTICS: &str = "!Sample_characteristics_ch1";
const ORGANISM: &str = "!Sample_organism_ch1";
const PLATFORM: &str = "!Sample_platform_id";
const LIBRARY_STRATEGY: &str = "!Sample_library_strategy";
const INSTRUMENT_MODEL: &str = "!Sample_instrument_model";

/// Fields pulled from a sample SOFT record. Single-valued fields keep the
/// last matching line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleMetadata {
    pub title: String,
    pub characteristics: Vec<String>,
    pub organism: String,
    pub platform: String,
    pub library_strategy: String,
    pub instrument_model: String,
}

fn soft_value(line: &str) -> Option<String> {
    line.split_once('=').map(|(_, value)| value.trim().to_string())
}

pub fn extract_sample_metadata<I, S>(lines: I) -> SampleMetadata
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut meta = SampleMetadata::default();
    for line in lines {
        let line = line.as_ref();
        let slot = if line.starts_with(TITLE) {
            &mut meta.title
        } else if line.starts_with(CHARACTERISTICS) {
            if let Some(value) = soft_value(line) {
                meta.characteristics.push(value);
            }
            continue;
        } else if line.starts_with(ORGANISM) {
            &mut meta.organism
        } else if line.starts_with(PLATFORM) {
            &mut meta.platform
        } else if line.starts_with(LIBRARY_STRATEGY) {
            &mut meta.library_strategy
        } else if line.starts_with(INSTRUMENT_MODEL) {
            &mut meta.instrument_model
        } else {
            continue;
        };
        if let Some(value) = soft_value(line) {
            *slot = value;
        }
    }
    meta
}

/// Which demographic fields the characteristics appear to mention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldAvailability {
    pub has_age: bool,
    pub has_sex: bool,
    pub has_patient: bool,
}

impl FieldAvailability {
    pub fn from_characteristics(characteristics: &[String]) -> Self {
        let lowered: Vec<String> = characteristics.iter().map(|c| c.to_lowercase()).collect();
        Self {
            has_age: mentions(&lowered, &["age"]),
            has_sex: mentions(&lowered, &["sex", "gender"]),
            has_patient: mentions(&lowered, &["patient"]),
        }
    }

    pub fn none_found(&self) -> bool {
        !(self.has_age || self.has_sex || self.has_patient)
    }
}

fn mentions(lowered: &[String], needles: &[&str]) -> bool {
    lowered
        .iter()
        .any(|c| needles.iter().any(|needle| c.contains(needle)))
}
