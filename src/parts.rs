//! Part registry: the animatable engine components and the camera.
//!
//! The registry is built once at scene setup and lives for the whole view.
//! The choreography only mutates transforms and material/light scalars; parts
//! are never added or removed while scrolling.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::camera::CameraState;
use crate::error::ConfigError;
use crate::params::PartSpec;

/// Stable identifier of an engine component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartId {
    BaseRing,
    Chamber,
    Turbopump,
    Pipe1,
    Pipe2,
    Core,
    Nozzle,
    ExhaustRing,
    /// Thrust-vector-control actuator (actuated preset only)
    TvcRod,
}

impl PartId {
    pub const COUNT: usize = 9;

    pub const ALL: [PartId; Self::COUNT] = [
        PartId::BaseRing,
        PartId::Chamber,
        PartId::Turbopump,
        PartId::Pipe1,
        PartId::Pipe2,
        PartId::Core,
        PartId::Nozzle,
        PartId::ExhaustRing,
        PartId::TvcRod,
    ];

    /// Scene-graph name of the part
    pub fn name(self) -> &'static str {
        match self {
            PartId::BaseRing => "baseRing",
            PartId::Chamber => "chamber",
            PartId::Turbopump => "turbopump",
            PartId::Pipe1 => "pipe1",
            PartId::Pipe2 => "pipe2",
            PartId::Core => "core",
            PartId::Nozzle => "nozzle",
            PartId::ExhaustRing => "exhaustRing",
            PartId::TvcRod => "tvcRod",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PartId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown part '{}'", s))
    }
}

/// Position, Euler rotation (radians, XYZ) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Point light attached to a part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub intensity: f32,
    /// Range in world units
    pub distance: f32,
}

/// A registered engine component
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub transform: Transform,
    /// Off-stage pose, restored whenever progress returns to 0
    pub initial: Transform,
    /// Emissive intensity, if the part has a glowing material
    pub emissive: Option<f32>,
    pub light: Option<PointLight>,
    initial_light: Option<PointLight>,
    /// Box half-extents used when drawing
    pub extents: Vec3,
}

impl Part {
    fn from_spec(spec: &PartSpec) -> Self {
        // Lights start dark regardless of the declared intensity
        let initial_light = spec.light.map(|light| PointLight {
            intensity: 0.0,
            ..light
        });
        Self {
            id: spec.id,
            transform: spec.initial,
            initial: spec.initial,
            emissive: spec.emissive.then_some(0.0),
            light: initial_light,
            initial_light,
            extents: spec.extents,
        }
    }

    fn reset(&mut self) {
        self.transform = self.initial;
        if let Some(emissive) = self.emissive.as_mut() {
            *emissive = 0.0;
        }
        self.light = self.initial_light;
    }
}

/// Read-only copy of the registry taken between frames
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    pub camera: CameraState,
    pub parts: Vec<Part>,
}

impl SceneSnapshot {
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }
}

/// Owned registry of every animated part plus the camera
#[derive(Debug, Clone)]
pub struct PartRegistry {
    parts: Vec<Part>,
    slots: [Option<usize>; PartId::COUNT],
    camera: CameraState,
    camera_start: Vec3,
}

impl PartRegistry {
    /// Empty registry with the camera parked at `camera_start`
    pub fn new(camera_start: Vec3, aspect: f32) -> Self {
        Self {
            parts: Vec::new(),
            slots: [None; PartId::COUNT],
            camera: CameraState::new(camera_start, aspect),
            camera_start,
        }
    }

    /// Build a registry from declared part specs, in declaration order
    pub fn from_specs(
        specs: &[PartSpec],
        camera_start: Vec3,
        aspect: f32,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new(camera_start, aspect);
        for spec in specs {
            registry.insert(spec)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, spec: &PartSpec) -> Result<(), ConfigError> {
        if self.contains(spec.id) {
            return Err(ConfigError::DuplicatePart(spec.id));
        }
        self.slots[spec.id.slot()] = Some(self.parts.len());
        self.parts.push(Part::from_spec(spec));
        Ok(())
    }

    pub fn contains(&self, id: PartId) -> bool {
        self.slots[id.slot()].is_some()
    }

    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.slots[id.slot()].map(|index| &self.parts[index])
    }

    pub fn get_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.slots[id.slot()].map(|index| &mut self.parts[index])
    }

    /// Parts in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Part> {
        self.parts.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    /// Force every part, the camera and all glow/light to the off-stage pose
    pub fn reset_to_initial(&mut self) {
        for part in &mut self.parts {
            part.reset();
        }
        self.camera.position = self.camera_start;
        self.camera.target = Vec3::ZERO;
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            camera: self.camera,
            parts: self.parts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ChoreographyPreset;

    fn registry() -> PartRegistry {
        let config = ChoreographyPreset::Standard.config();
        PartRegistry::from_specs(&config.parts, config.camera_start, 16.0 / 9.0).unwrap()
    }

    #[test]
    fn test_part_names_round_trip() {
        for id in PartId::ALL {
            assert_eq!(id.name().parse::<PartId>().unwrap(), id);
        }
        assert!("flux_capacitor".parse::<PartId>().is_err());
    }

    #[test]
    fn test_registry_keeps_declaration_order() {
        let registry = registry();
        let order: Vec<PartId> = registry.iter().map(|part| part.id).collect();
        assert_eq!(order[0], PartId::BaseRing);
        assert_eq!(order.last(), Some(&PartId::ExhaustRing));
        assert!(!registry.contains(PartId::TvcRod));
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let config = ChoreographyPreset::Standard.config();
        let mut registry = registry();
        let err = registry.insert(&config.parts[0]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicatePart(PartId::BaseRing));
    }

    #[test]
    fn test_reset_restores_initial_pose_and_darkens_glow() {
        let mut registry = registry();
        {
            let core = registry.get_mut(PartId::Core).unwrap();
            core.transform.scale = Vec3::splat(1.05);
            core.emissive = Some(2.0);
            core.light = Some(PointLight {
                intensity: 3.0,
                distance: 30.0,
            });
        }
        registry.get_mut(PartId::BaseRing).unwrap().transform.rotation.y = 7.0;
        registry.camera_mut().position = Vec3::new(5.0, 5.0, 20.0);

        registry.reset_to_initial();

        let core = registry.get(PartId::Core).unwrap();
        assert_eq!(core.transform, core.initial);
        assert_eq!(core.emissive, Some(0.0));
        assert_eq!(core.light.unwrap().intensity, 0.0);
        assert_eq!(core.light.unwrap().distance, 10.0);
        let ring = registry.get(PartId::BaseRing).unwrap();
        assert_eq!(ring.transform, ring.initial);
        assert_eq!(registry.camera().position, Vec3::new(0.0, 2.0, 25.0));
    }
}
