//! # Topogen - Topology-driven network configuration generator
//!
//! This library turns a declarative description of a lab network (devices
//! and the point-to-point links between them) into per-device vendor
//! configuration text.
//!
//! ## Overview
//!
//! The pipeline has three stages, each a pure transformation over a
//! persisted JSON topology document:
//!
//! 1. **Ingest**: text lines such as `R1,Cisco,Router` and
//!    `R1:Gi0/1 <-> SW3:Et1` become a topology document
//! 2. **Allocate**: every link receives a /30 subnet and two endpoint
//!    addresses derived from the digits in the device ids
//! 3. **Synthesize**: every device is rendered into `<device_id>.txt` using
//!    its vendor's dialect (Cisco IOS, Arista EOS, Palo Alto PAN-OS)
//!
//! ## Architecture
//!
//! - `topology`: Document model, in-memory builder and JSON store
//! - `ip`: Link address allocation and subnet ownership tracking
//! - `synth`: Vendor dialects, peer resolution and artifact output
//! - `ingest`: Line parser for pasted topology descriptions
//! - `config`: Typed pipeline configuration
//! - `config_loader`: YAML configuration loading and CLI overrides
//! - `utils`: IPv4 helpers and document validation
//! - `orchestrator`: High-level pipeline entry points
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use topogen::{config::PipelineConfig, orchestrator};
//!
//! let config = PipelineConfig::default();
//! let document = Path::new("topology_data.json");
//!
//! // Annotate every link with its subnet and endpoint addresses
//! let report = orchestrator::allocate(document, &config)?;
//! assert!(!report.has_collisions());
//!
//! // Render configs/<device_id>.txt for every device
//! orchestrator::synthesize(document, Path::new("configs"), &config)?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Topology Document
//!
//! ```json
//! {
//!     "topology_name": "Network_Lab",
//!     "nodes": [
//!         {"id": "R1", "brand": "cisco", "type": "Router"},
//!         {"id": "R2", "brand": "cisco", "type": "Router"}
//!     ],
//!     "links": [
//!         {"source": "R1:Gi0/0", "target": "R2:Gi0/0",
//!          "network": "192.168.12.0/30",
//!          "source_ip": "192.168.12.1", "target_ip": "192.168.12.2"}
//!     ]
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library modules return typed `thiserror` errors. The orchestrator and the
//! binary use `color_eyre` and attach the path and stage to every failure.
//! Data-quality problems (unknown peers, subnet collisions, malformed
//! entries) are reported and logged, never fatal.

pub mod config;
pub mod config_loader;
pub mod ingest;
pub mod ip;
pub mod orchestrator;
pub mod synth;
pub mod topology;
pub mod utils;
