//! Subnet registry.
//!
//! This file tracks which unordered designator pair claimed each subnet
//! discriminator during an allocation pass, so that two different device
//! pairs landing on the same /30 are detected instead of silently sharing it.

use std::collections::BTreeMap;
use std::fmt;

/// An unordered pair of device designators, stored sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DesignatorPair {
    pub lo: u32,
    pub hi: u32,
}

impl DesignatorPair {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }
}

impl fmt::Display for DesignatorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

/// Two different designator pairs that produced the same discriminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetCollision {
    pub discriminator: u64,
    /// Pair that claimed the discriminator first
    pub existing: DesignatorPair,
    /// Pair that arrived later and collided
    pub incoming: DesignatorPair,
    /// Index into the document's `links` of the colliding link
    pub link_index: usize,
}

impl fmt::Display for SubnetCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "discriminator {} claimed by designators {} is reused by {} (link #{})",
            self.discriminator, self.existing, self.incoming, self.link_index
        )
    }
}

/// Registry of discriminators claimed during one allocation pass
#[derive(Debug, Default)]
pub struct SubnetRegistry {
    /// Discriminator -> designator pair that claimed it
    claims: BTreeMap<u64, DesignatorPair>,
    collisions: Vec<SubnetCollision>,
}

impl SubnetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a discriminator for a designator pair.
    ///
    /// Claiming again for the same pair is fine (parallel links between the
    /// same two devices share their subnet). A different pair is recorded
    /// and returned as a collision; the first claimant keeps ownership.
    pub fn claim(
        &mut self,
        discriminator: u64,
        pair: DesignatorPair,
        link_index: usize,
    ) -> Result<(), SubnetCollision> {
        match self.claims.get(&discriminator) {
            None => {
                self.claims.insert(discriminator, pair);
                Ok(())
            }
            Some(existing) if *existing == pair => Ok(()),
            Some(existing) => {
                let collision = SubnetCollision {
                    discriminator,
                    existing: *existing,
                    incoming: pair,
                    link_index,
                };
                self.collisions.push(collision.clone());
                Err(collision)
            }
        }
    }

    /// Get the pair owning a discriminator
    pub fn owner(&self, discriminator: u64) -> Option<DesignatorPair> {
        self.claims.get(&discriminator).copied()
    }

    pub fn collisions(&self) -> &[SubnetCollision] {
        &self.collisions
    }

    /// Number of distinct subnets handed out
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
