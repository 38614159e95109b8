//! Raptor reveal library - scroll-driven rocket engine assembly choreography

pub mod camera;
pub mod choreography;
pub mod cli;
pub mod clock;
pub mod driver;
pub mod easing;
pub mod error;
pub mod mesh;
pub mod params;
pub mod parts;
pub mod progress;
pub mod rendering;
pub mod stages;
