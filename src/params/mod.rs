//! Parameter definitions with units and documented semantics.
//!
//! All choreography numbers live here as data:
//! - Stage boundaries, easing curves and source/target values
//! - Initial off-stage poses for every part
//! - Camera, scroll and rendering constants

mod camera;
mod choreography;
mod render;

// Re-export all types
pub use camera::{CameraConfig, ScrollConfig};
pub use choreography::{
    Attribute, Binding, BindingTarget, ChoreographyConfig, ChoreographyPreset, IdleSpin,
    PartSpec, SpinClock, StageConfig, StageEffect,
};
pub use render::RenderConfig;
