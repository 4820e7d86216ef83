pub mod ingest_csv_request;
pub mod ingest_csv_route;
