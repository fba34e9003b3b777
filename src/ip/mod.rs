//! IP address allocation module.
//!
//! This module derives the point-to-point /30 addressing plan from device
//! designators and tracks which device pair owns each subnet.

pub mod registry;
pub mod allocator;

// Re-export commonly used types
pub use registry::{DesignatorPair, SubnetCollision, SubnetRegistry};
pub use allocator::{
    allocate_links, discriminator, extract_designator, Allocation, AllocationError, AllocationIssue,
    AllocationReport, LinkAssignment, SUBNET_PREFIX_LEN,
};
