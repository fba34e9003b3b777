//! Pipeline orchestrator.
//!
//! Each entry point is one stage of the pipeline run against a persisted
//! topology document: ingest text into a document, allocate link addresses,
//! synthesize per-device configuration. Stages can be invoked independently
//! and repeatedly.

use crate::config::PipelineConfig;
use crate::ingest::{ingest_lines, IngestSummary};
use crate::ip::{allocate_links, AllocationError, AllocationReport};
use crate::synth::{write_artifacts, Synthesizer};
use crate::topology::{load_document, save_document, TopologyModel};
use crate::utils::validation::{validate_document, ValidationReport};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a text description into a fresh topology document
pub fn ingest(input_path: &Path, document_path: &Path, name: &str) -> Result<IngestSummary> {
    let content = fs::read_to_string(input_path)
        .wrap_err_with(|| format!("Failed to read input '{}'", input_path.display()))?;

    let mut model = TopologyModel::new(name);
    let summary = ingest_lines(&mut model, content.lines());

    model
        .save(document_path)
        .wrap_err_with(|| format!("Failed to save topology '{}'", name))?;
    log::info!("Topology document written to {}", document_path.display());

    Ok(summary)
}

/// Allocate addresses for every link of the document at `document_path`
/// and write the annotated document back.
///
/// With `deny_collisions` set, a pass that finds subnet collisions fails and
/// the document is left unchanged.
pub fn allocate(document_path: &Path, config: &PipelineConfig) -> Result<AllocationReport> {
    let document = load_document(document_path)
        .wrap_err_with(|| format!("Allocation aborted for '{}'", document_path.display()))?;

    validate_document(&document).log_warnings();

    let allocation = allocate_links(&document, &config.addressing);
    let report = allocation.report;

    if config.addressing.deny_collisions {
        let mut collisions = report.collisions();
        if let Some(first) = collisions.next() {
            return Err(AllocationError::CollisionsDenied {
                count: 1 + collisions.count(),
                first: first.clone(),
            })
            .wrap_err_with(|| format!("Allocation aborted for '{}'", document_path.display()));
        }
    }

    save_document(document_path, &allocation.document)
        .wrap_err_with(|| format!("Allocation aborted for '{}'", document_path.display()))?;

    Ok(report)
}

/// Render every device of the document at `document_path` into
/// `<output_dir>/<device_id>.txt`.
///
/// All devices are rendered before any file is written, so a strict-mode
/// failure leaves `output_dir` untouched.
pub fn synthesize(document_path: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let document = load_document(document_path)
        .wrap_err_with(|| format!("Synthesis aborted for '{}'", document_path.display()))?;

    validate_document(&document).log_warnings();

    let artifacts = Synthesizer::new(&config.synthesis)
        .render_document(&document)
        .wrap_err_with(|| format!("Synthesis aborted for '{}'", document_path.display()))?;

    let paths = write_artifacts(&artifacts, output_dir)
        .wrap_err_with(|| format!("Failed to write configurations to '{}'", output_dir.display()))?;

    log::info!("Wrote {} configuration file(s) to {}", paths.len(), output_dir.display());
    Ok(paths)
}

/// Load the document and report its data-quality findings
pub fn check(document_path: &Path) -> Result<ValidationReport> {
    let document = load_document(document_path)
        .wrap_err_with(|| format!("Check aborted for '{}'", document_path.display()))?;
    Ok(validate_document(&document))
}

/// Summary of a full pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ingest: IngestSummary,
    pub allocation: AllocationReport,
    pub artifacts: Vec<PathBuf>,
}

/// Ingest, allocate and synthesize in one go
pub fn run(
    input_path: &Path,
    document_path: &Path,
    output_dir: &Path,
    name: &str,
    config: &PipelineConfig,
) -> Result<RunSummary> {
    let ingest = ingest(input_path, document_path, name)?;
    let allocation = allocate(document_path, config)?;
    let artifacts = synthesize(document_path, output_dir, config)?;

    Ok(RunSummary {
        ingest,
        allocation,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strictness;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("input.txt");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_allocate_missing_document() {
        let dir = TempDir::new().unwrap();
        let document = dir.path().join("missing.json");

        let err = allocate(&document, &PipelineConfig::default()).unwrap_err();
        assert!(format!("{:?}", err).contains("missing.json"));
        assert!(!document.exists());
    }

    #[test]
    fn test_deny_collisions_leaves_document_unchanged() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "R1,Cisco,Router\nR234,Cisco,Router\nR12,Cisco,Router\nR34,Cisco,Router\n\
             R1:Gi0/0 - R234:Gi0/0\nR12:Gi0/1 - R34:Gi0/1\n",
        );
        let document = dir.path().join("lab.json");
        ingest(&input, &document, "lab").unwrap();
        let before = fs::read_to_string(&document).unwrap();

        let mut config = PipelineConfig::default();
        config.addressing.deny_collisions = true;
        let err = allocate(&document, &config).unwrap_err();

        assert!(err.downcast_ref::<AllocationError>().is_some());
        assert_eq!(fs::read_to_string(&document).unwrap(), before);
    }

    #[test]
    fn test_strict_synthesis_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "R1,Cisco,Router\nJ2,Juniper,Router\nR1:Gi0/0 - J2:ge-0/0/0\n");
        let document = dir.path().join("lab.json");
        let output = dir.path().join("configs");
        ingest(&input, &document, "lab").unwrap();

        let mut config = PipelineConfig::default();
        config.synthesis.strictness = Strictness::Strict;
        assert!(synthesize(&document, &output, &config).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_check_reports_issues() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "R1,Cisco,Router\nR1:Gi0/0 - R2:Gi0/0\n");
        let document = dir.path().join("lab.json");
        ingest(&input, &document, "lab").unwrap();

        let report = check(&document).unwrap();
        assert!(!report.is_clean());
    }
}
