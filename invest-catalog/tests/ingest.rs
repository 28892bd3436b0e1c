use invest_catalog::{
    ingest::{load_catalog, read_catalog, write_catalog, RecordSchema},
    Catalog, Item,
};
use std::io::Write;

#[test]
fn test_absolute_schema() {
    let csv = "name,price,profit\nShare-A,20.5,4.1\nShare-B,10,1\n";
    let ingested = read_catalog(csv.as_bytes()).unwrap();
    assert!(matches!(ingested.schema, RecordSchema::Absolute { .. }));
    assert_eq!(ingested.rejected, 0);
    assert_eq!(
        ingested.catalog.items(),
        &[
            Item::new("Share-A", 20.5, 4.1).unwrap(),
            Item::new("Share-B", 10.0, 1.0).unwrap(),
        ]
    );
}

#[test]
fn test_percentage_schema_converts_to_absolute_profit() {
    let csv = "Actions #,Coût par action (en euros),Bénéfice (après 2 ans)\n\
               Action-1,20,5%\n\
               Action-2,30,10 %\n\
               Action-3,50,15\n";
    let ingested = read_catalog(csv.as_bytes()).unwrap();
    assert!(matches!(ingested.schema, RecordSchema::Percentage { .. }));
    let profits: Vec<f64> = ingested.catalog.items().iter().map(|i| i.profit).collect();
    assert_eq!(profits, vec![1.0, 3.0, 7.5]);
}

#[test]
fn test_column_order_does_not_matter() {
    let csv = "profit,name,price\n2,X,8\n";
    let ingested = read_catalog(csv.as_bytes()).unwrap();
    assert_eq!(ingested.catalog.items(), &[Item::new("X", 8.0, 2.0).unwrap()]);
}

#[test]
fn test_invalid_rows_are_skipped_and_counted() {
    let csv = "name,price,profit\n\
               good,10,2\n\
               zero,0,2\n\
               negative,-5,2\n\
               loss,10,-1\n\
               text,abc,2\n\
               short,10\n\
               ,10,2\n\
               nan,NaN,2\n\
               also_good,0.5,0.1\n";
    let ingested = read_catalog(csv.as_bytes()).unwrap();
    assert_eq!(ingested.rejected, 7);
    let ids: Vec<&str> = ingested.catalog.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["good", "also_good"]);
}

#[test]
fn test_undecodable_row_is_skipped() {
    let mut csv = b"name,price,profit\nA,1,1\n".to_vec();
    csv.extend_from_slice(b"\xff\xfe,2,2\n");
    csv.extend_from_slice(b"B,3,1\n");
    let ingested = read_catalog(csv.as_slice()).unwrap();
    assert_eq!(ingested.rejected, 1);
    let ids: Vec<&str> = ingested.catalog.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[test]
fn test_costs_are_held_in_whole_cents() {
    let csv = "name,price,profit\nA,0.335,1\nB,0.004,1\n";
    let ingested = read_catalog(csv.as_bytes()).unwrap();
    assert_eq!(ingested.rejected, 1);
    assert_eq!(ingested.catalog.items()[0].cost, 0.34);
}

#[test]
fn test_unknown_headers_are_an_error() {
    assert!(read_catalog("ticker,cost\nA,1\n".as_bytes()).is_err());
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let csv = "\u{feff}name,price,profit\nA,1,1\n";
    assert_eq!(read_catalog(csv.as_bytes()).unwrap().catalog.len(), 1);
}

#[test]
fn test_written_catalog_reads_back() {
    let catalog = Catalog::new(vec![
        Item::new("Share-0001", 12.34, 1.5).unwrap(),
        Item::new("Share-0002", 99.99, 20.0).unwrap(),
    ])
    .unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut buffer = Vec::new();
    write_catalog(&mut buffer, &catalog).unwrap();
    file.write_all(&buffer).unwrap();

    let ingested = load_catalog(file.path()).unwrap();
    assert_eq!(ingested.catalog, catalog);
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(load_catalog("/definitely/not/here.csv").is_err());
}
