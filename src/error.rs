//! Setup-time configuration errors.
//!
//! Evaluation itself never fails; everything that can go wrong is caught when
//! the choreography is checked against the stage table and the part registry.

use crate::params::{Attribute, BindingTarget};
use crate::parts::PartId;

/// Fatal configuration problem detected before the first frame
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No stages declared at all
    #[error("choreography declares no stages")]
    EmptyStages,

    /// First stage does not start at 0
    #[error("first stage starts at {0}, expected 0")]
    PartitionStart(f32),

    /// Last stage does not end at 1
    #[error("last stage ends at {0}, expected 1")]
    PartitionEnd(f32),

    /// Stage `index` does not begin where the previous one ended
    #[error("stage {index} starts at {found}, expected {expected}")]
    GapInPartition {
        index: usize,
        expected: f32,
        found: f32,
    },

    /// Stage with zero or negative width
    #[error("stage '{name}' has an empty progress interval")]
    EmptyStage { name: String },

    /// Binding or effect refers to a part the registry does not hold
    #[error("part '{0}' is not in the registry")]
    UnknownPart(PartId),

    /// Part declared twice in the registry
    #[error("part '{0}' is declared more than once")]
    DuplicatePart(PartId),

    /// Part exists but lacks the emissive material or light the binding drives
    #[error("part '{part}' has no channel for {attribute:?}")]
    MissingChannel { part: PartId, attribute: Attribute },

    /// Attribute makes no sense for the target (e.g. camera emissive)
    #[error("{attribute:?} cannot be bound on {target:?}")]
    UnsupportedAttribute {
        target: BindingTarget,
        attribute: Attribute,
    },
}
