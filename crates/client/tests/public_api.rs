//! Integration tests through the crate's public surface only.
//!
//! A mock server stands in for both Google hosts; every test drives
//! `SheetClient` / `SheetLoader` the way a library user would.

use std::sync::mpsc;
use std::time::Duration;

use gsheet_client::{ClientOptions, FetchError, LoadOptions, SheetClient, SheetLoader, SheetSource};
use httpmock::prelude::*;

const INVENTORY_CSV: &str = "sku,qty,bin\r\nA-1,4,R1\r\nB-2,0,R7\r\nC-3,12,R2\r\n";

fn client_for(server: &MockServer) -> SheetClient {
    SheetClient::with_options(ClientOptions {
        timeout: Duration::from_secs(5),
        export_base: server.base_url(),
        api_base: server.base_url(),
    })
    .unwrap()
}

#[test]
fn rows_and_columns_agree_after_load() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spreadsheets/d/e/inv/pub");
        then.status(200).body(INVENTORY_CSV);
    });

    let sheet = client_for(&server)
        .load(&SheetSource::export("inv"), true)
        .unwrap();

    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.col_count(), 3);
    for row in sheet.iter_rows() {
        for (c, name) in sheet.header_names().unwrap().iter().enumerate() {
            assert_eq!(row.get(name.as_str()).unwrap(), &row[c]);
            assert_eq!(sheet.get(c, row.index()).unwrap(), &row[c]);
        }
    }
    assert_eq!(sheet.col("qty").unwrap(), ["4", "0", "12"]);
}

#[test]
fn payload_round_trips_through_csv_serializer() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spreadsheets/d/e/inv/pub");
        then.status(200).body(INVENTORY_CSV);
    });

    let client = client_for(&server);
    let source = SheetSource::export("inv");
    let payload = client.fetch_payload(&source).unwrap();
    let sheet = client.load(&source, true).unwrap();

    let normalized = payload.replace("\r\n", "\n");
    assert_eq!(sheet.to_csv_string(), normalized.trim_end_matches('\n'));
}

#[test]
fn loader_reports_transport_failure_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v4/spreadsheets/1abc/values/Stock");
        then.status(429).body("quota exceeded");
    });

    let (tx, rx) = mpsc::channel();
    SheetLoader::new(client_for(&server))
        .from_api(
            "1abc",
            "Stock",
            "k",
            None,
            LoadOptions::new().on_load(move |result| tx.send(result).unwrap()),
        )
        .join()
        .unwrap();

    mock.assert_calls(1);
    let results: Vec<_> = rx.try_iter().collect();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].as_ref().unwrap_err(),
        &FetchError::Http(429, "quota exceeded".into())
    );
}
