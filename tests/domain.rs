use assert_matches::assert_matches;

use kira_expression_curator::domain::{
    GeoSampleAccession, GeoSeriesAccession, Pathology, parse_sample_id,
};
use kira_expression_curator::error::CurateError;

#[test]
fn parse_series_accession_valid() {
    let acc: GeoSeriesAccession = "GSE144259".parse().unwrap();
    assert_eq!(acc.as_str(), "GSE144259");
    assert_eq!(acc.directory_prefix(), "GSE144nnn");
}

#[test]
fn parse_series_accession_invalid() {
    let err = "GSM4284531".parse::<GeoSeriesAccession>().unwrap_err();
    assert_matches!(err, CurateError::InvalidSeriesAccession(_));
}

#[test]
fn parse_sample_accession_valid() {
    let acc: GeoSampleAccession = "gsm4284531".parse().unwrap();
    assert_eq!(acc.as_str(), "GSM4284531");
}

#[test]
fn tissue_codes_map_to_pathology() {
    assert_eq!(Pathology::from_tissue_code('N'), Some(Pathology::Normal));
    assert_eq!(Pathology::from_tissue_code('T'), Some(Pathology::Primary));
    assert_eq!(Pathology::from_tissue_code('M'), Some(Pathology::Metastatic));
    assert_eq!(Pathology::from_tissue_code('X'), None);
}

#[test]
fn sample_ids_split_into_patient_and_pathology() {
    let cases = [
        ("CRC007T", "CRC007", "PRIMARY"),
        ("CRC012N", "CRC012", "NORMAL"),
        ("CRC020M", "CRC020", "METASTATIC"),
        ("XYZ1", "NA", "NA"),
        ("CRC12t", "NA", "NA"),
    ];
    for (input, patient, pathology) in cases {
        let labels = parse_sample_id(input);
        assert_eq!(labels.patient_id, patient, "{input}");
        assert_eq!(labels.pathology, pathology, "{input}");
    }
}
