// Dugout front end: configuration, player-file ingestion, CLI and report
// output around the dugout-baseball core.

pub mod cli;
pub mod config;
pub mod ingest;
pub mod report;
