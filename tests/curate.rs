use kira_expression_curator::curate::{CURATED_COLUMNS, assemble, write_csv};
use kira_expression_curator::domain::GeoSeriesAccession;
use kira_expression_curator::matrix::ExpressionMatrix;

const WIDE: &str = "GeneID\tCRC007T\tCRC012N\tPool1\n\
                    TP53\t12.5\tNaN\t3\n\
                    \t1\t2\t\n";

fn read_back(path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

#[test]
fn table_has_fixed_columns_and_na_sentinels() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("curated_data.csv");
    let study: GeoSeriesAccession = "GSE144259".parse().unwrap();

    let matrix = ExpressionMatrix::from_reader(WIDE.as_bytes()).unwrap();
    let rows = assemble(&study, &matrix.melt());
    let written = write_csv(&path, &rows).unwrap();
    assert_eq!(written, 6);

    let (headers, records) = read_back(&path);
    assert_eq!(headers.iter().collect::<Vec<_>>(), CURATED_COLUMNS.to_vec());
    assert_eq!(records.len(), 6);
    for record in &records {
        assert_eq!(record.len(), 12);
        assert!(record.iter().all(|cell| !cell.is_empty()));
    }

    assert_eq!(
        records[0].iter().collect::<Vec<_>>(),
        vec![
            "GSE144259",
            "CRC007",
            "GSE144259_CRC007T",
            "NA",
            "NA",
            "CRC007T",
            "PRIMARY",
            "RNA",
            "TP53",
            "12.5",
            "FPKM",
            "NA",
        ]
    );
    // unnamed gene row
    assert_eq!(&records[1][8], "NA");
    // NaN cell
    assert_eq!(&records[2][9], "NA");
    assert_eq!(&records[2][6], "NORMAL");
    // sample outside the naming convention
    assert_eq!(&records[4][1], "NA");
    assert_eq!(&records[4][6], "NA");
    assert_eq!(&records[5][9], "NA");
}

#[test]
fn empty_table_still_has_header() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("curated_data.csv");
    assert_eq!(write_csv(&path, &[]).unwrap(), 0);

    let (headers, records) = read_back(&path);
    assert_eq!(headers.len(), 12);
    assert_eq!(&headers[0], "STUDY_ID");
    assert_eq!(&headers[11], "STATUS");
    assert!(records.is_empty());
}

#[test]
fn existing_output_is_overwritten() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("curated_data.csv");
    std::fs::write(&path, "stale,content\nfrom,before\nand,more\n").unwrap();

    write_csv(&path, &[]).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(!content.contains("stale"));
}
