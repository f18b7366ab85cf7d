use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurateError;

/// Sentinel written wherever a value is missing or could not be derived.
pub const NA: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoSeriesAccession(String);

impl GeoSeriesAccession {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// GEO groups series directories by thousands, e.g. `GSE144nnn`.
    pub fn directory_prefix(&self) -> String {
        let digits = self.0.trim_start_matches("GSE");
        if digits.len() <= 3 {
            return "GSEnnn".to_string();
        }
        let head = &digits[..digits.len() - 3];
        format!("GSE{}nnn", head)
    }
}

impl fmt::Display for GeoSeriesAccession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GeoSeriesAccession {
    type Err = CurateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        if !has_numeric_suffix(&normalized, "GSE") {
            return Err(CurateError::InvalidSeriesAccession(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoSampleAccession(String);

impl GeoSampleAccession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeoSampleAccession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GeoSampleAccession {
    type Err = CurateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        if !has_numeric_suffix(&normalized, "GSM") {
            return Err(CurateError::InvalidSampleAccession(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

fn has_numeric_suffix(value: &str, prefix: &str) -> bool {
    value
        .strip_prefix(prefix)
        .map(|rest| !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pathology {
    Normal,
    Primary,
    Metastatic,
}

impl Pathology {
    pub fn from_tissue_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(Pathology::Normal),
            'T' => Some(Pathology::Primary),
            'M' => Some(Pathology::Metastatic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pathology::Normal => "NORMAL",
            Pathology::Primary => "PRIMARY",
            Pathology::Metastatic => "METASTATIC",
        }
    }
}

impl fmt::Display for Pathology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Patient code and tissue pathology derived from a sample column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLabels {
    pub patient_id: String,
    pub pathology: String,
}

impl SampleLabels {
    fn unknown() -> Self {
        Self {
            patient_id: NA.to_string(),
            pathology: NA.to_string(),
        }
    }
}

/// Splits `CRC<digits><N|T|M>` into patient code and pathology label.
///
/// The match is anchored at the start and case-sensitive; anything after the
/// tissue code is ignored. Identifiers that do not follow the convention get
/// `NA` for both fields instead of an error.
pub fn parse_sample_id(sample_id: &str) -> SampleLabels {
    let Some(rest) = sample_id.strip_prefix("CRC") else {
        return SampleLabels::unknown();
    };
    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return SampleLabels::unknown();
    }
    let Some(pathology) = rest[digits..]
        .chars()
        .next()
        .and_then(Pathology::from_tissue_code)
    else {
        return SampleLabels::unknown();
    };
    SampleLabels {
        patient_id: sample_id[..3 + digits].to_string(),
        pathology: pathology.to_string(),
    }
}
