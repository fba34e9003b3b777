//! Text ingestion front end.
//!
//! Feeds device and link lines into a [`TopologyModel`]. Lines that parse as
//! neither are skipped and counted, never fatal.

pub mod parser;

pub use parser::{parse_line, ParsedLine};

use crate::topology::TopologyModel;

/// Counts of what an ingestion pass added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub devices: usize,
    pub links: usize,
    /// (1-based line number, line text) of every unrecognised line
    pub skipped: Vec<(usize, String)>,
}

/// Parse `lines` into `model`, stopping at a `done` line
pub fn ingest_lines<I, S>(model: &mut TopologyModel, lines: I) -> IngestSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = IngestSummary::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        match parse_line(line) {
            ParsedLine::Device(device) => {
                if model.add_node(device) {
                    summary.devices += 1;
                }
            }
            ParsedLine::Link(link) => {
                if model.add_link(link) {
                    summary.links += 1;
                }
            }
            ParsedLine::Blank => {}
            ParsedLine::Done => break,
            ParsedLine::Unrecognized => {
                log::warn!("Line {}: unrecognised input {:?}, skipping", index + 1, line);
                summary.skipped.push((index + 1, line.to_string()));
            }
        }
    }

    log::info!(
        "Parsed {} device(s) and {} link(s), skipped {} line(s)",
        summary.devices,
        summary.links,
        summary.skipped.len()
    );
    summary
}
