//! Choreography data tables and the two reveal presets.
//!
//! The evaluator has no numbers of its own: every source/target value, stage
//! boundary and idle-effect rate comes from a `ChoreographyConfig`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::str::FromStr;

use glam::Vec3;

use crate::easing::Easing;
use crate::parts::{PartId, PointLight, Transform};

/// What a binding writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    Camera,
    Part(PartId),
}

/// Scalar channel written by a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    /// Uniform scale on all three axes
    Scale,
    /// Material emissive intensity
    Emissive,
    LightIntensity,
    /// Point light range
    LightDistance,
}

/// `target.attribute = lerp(from, to, eased)` within one stage
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub target: BindingTarget,
    pub attribute: Attribute,
    pub from: f32,
    pub to: f32,
    /// Overrides the stage easing for this binding only
    pub easing: Option<Easing>,
}

impl Binding {
    pub fn part(id: PartId, attribute: Attribute, from: f32, to: f32) -> Self {
        Self {
            target: BindingTarget::Part(id),
            attribute,
            from,
            to,
            easing: None,
        }
    }

    pub fn camera(attribute: Attribute, from: f32, to: f32) -> Self {
        Self {
            target: BindingTarget::Camera,
            attribute,
            from,
            to,
            easing: None,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// Compound per-stage formulas that are not plain interpolations
#[derive(Debug, Clone, PartialEq)]
pub enum StageEffect {
    /// Camera circles the Y axis: `x = sin(e*sweep)*radius`,
    /// `z = center_z + cos(e*sweep)*radius`
    Orbit {
        radius: f32,
        center_z: f32,
        /// Total angle swept over the stage (radians)
        sweep: f32,
    },

    /// Every part's position rotates rigidly about world Y by `e*sweep`
    Revolve { sweep: f32 },

    /// Uniform scale `1 + sin(ms*rate_per_ms)*amplitude*e`
    Pulse {
        part: PartId,
        rate_per_ms: f32,
        amplitude: f32,
    },

    /// Emissive `base + sin(ms*rate_per_ms)*amplitude`, independent of progress
    Glow {
        part: PartId,
        base: f32,
        amplitude: f32,
        rate_per_ms: f32,
        /// Lower clamp on the resulting intensity
        floor: Option<f32>,
    },
}

/// Continuous idle spin added to every part's rotation.y while a stage is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleSpin {
    /// Spin per display frame at the reference frame rate (radians)
    pub rad_per_frame: f32,
}

/// How idle spin accumulates between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinClock {
    /// Frame-rate independent: `rad_per_frame * reference_fps * dt_seconds`
    WallClock { reference_fps: f32 },

    /// Literal per-tick increment; faster displays spin faster
    PerFrame,
}

impl Default for SpinClock {
    fn default() -> Self {
        Self::WallClock {
            reference_fps: 60.0,
        }
    }
}

impl FromStr for SpinClock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wall" | "wallclock" => Ok(Self::default()),
            "frame" | "perframe" => Ok(Self::PerFrame),
            other => Err(format!("unknown spin clock '{}'", other)),
        }
    }
}

/// One contiguous slice `[start, end)` of scroll progress
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub name: String,

    /// Text shown by the presentation layer while the stage is active
    pub label: String,

    pub start: f32,
    pub end: f32,

    pub easing: Easing,
    pub bindings: Vec<Binding>,
    pub effects: Vec<StageEffect>,
    pub idle_spin: Option<IdleSpin>,
}

impl StageConfig {
    pub fn new(name: &str, label: &str, start: f32, end: f32) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            start,
            end,
            easing: Easing::default(),
            bindings: Vec::new(),
            effects: Vec::new(),
            idle_spin: None,
        }
    }

    fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    fn bind(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    fn effect(mut self, effect: StageEffect) -> Self {
        self.effects.push(effect);
        self
    }

    fn spin(mut self, rad_per_frame: f32) -> Self {
        self.idle_spin = Some(IdleSpin { rad_per_frame });
        self
    }
}

/// Declared part: identity, off-stage pose and optional glow channels
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub id: PartId,
    pub initial: Transform,
    /// Part carries an emissive material
    pub emissive: bool,
    pub light: Option<PointLight>,
    /// Half-extents of the drawn box (world units, before rotation)
    pub extents: Vec3,
}

impl PartSpec {
    fn new(id: PartId, initial: Transform, extents: Vec3) -> Self {
        Self {
            id,
            initial,
            emissive: false,
            light: None,
            extents,
        }
    }
}

/// Complete choreography: parts, camera start and ordered stages
#[derive(Debug, Clone, PartialEq)]
pub struct ChoreographyConfig {
    pub parts: Vec<PartSpec>,
    pub camera_start: Vec3,

    /// Label shown only at progress exactly 0
    pub initial_label: String,

    pub stages: Vec<StageConfig>,
}

/// Named choreography variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoreographyPreset {
    /// Single cubic easing, nozzle rises from -20, camera pulls back 13→20
    #[default]
    Standard,

    /// Mixed per-track easings, nozzle rises from -10, TVC actuator part,
    /// camera pulls back 15→20 and rises from below
    Actuated,
}

impl FromStr for ChoreographyPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "actuated" => Ok(Self::Actuated),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}

impl ChoreographyPreset {
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Actuated => "actuated",
        }
    }

    pub fn config(self) -> ChoreographyConfig {
        match self {
            Self::Standard => standard(),
            Self::Actuated => actuated(),
        }
    }
}

const STAGE_LABELS: [&str; 5] = [
    "APPROACH SEQUENCE",
    "COMPONENT ASSEMBLY",
    "CORE IGNITION",
    "FINAL ASSEMBLY",
    "RAPTOR 1 ONLINE",
];

const INITIAL_LABEL: &str = "INITIALIZING";

/// Parts shared by both presets; `nozzle` is appended by each preset
fn engine_parts() -> Vec<PartSpec> {
    use PartId::*;

    let mut core = PartSpec::new(
        Core,
        Transform::at(Vec3::new(0.0, 1.0, 0.0)),
        Vec3::splat(0.8),
    );
    core.emissive = true;
    core.light = Some(PointLight {
        intensity: 0.0,
        distance: 10.0,
    });

    vec![
        PartSpec::new(
            BaseRing,
            Transform::at(Vec3::new(-20.0, -2.0, 0.0))
                .with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
            Vec3::new(3.3, 3.3, 0.3),
        ),
        PartSpec::new(
            Chamber,
            Transform::at(Vec3::new(0.0, 15.0, 0.0)),
            Vec3::new(2.5, 2.0, 2.5),
        ),
        PartSpec::new(
            Turbopump,
            Transform::at(Vec3::new(20.0, 1.0, 0.0)).with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2)),
            Vec3::new(0.8, 1.0, 0.8),
        ),
        PartSpec::new(
            Pipe1,
            Transform::at(Vec3::new(-15.0, 1.0, 1.0)).with_rotation(Vec3::new(PI / 4.0, 0.0, 0.0)),
            Vec3::new(0.2, 1.5, 0.2),
        ),
        PartSpec::new(
            Pipe2,
            Transform::at(Vec3::new(-15.0, 1.0, -1.0))
                .with_rotation(Vec3::new(-PI / 4.0, 0.0, 0.0)),
            Vec3::new(0.2, 1.5, 0.2),
        ),
        core,
    ]
}

fn exhaust_ring() -> PartSpec {
    PartSpec::new(
        PartId::ExhaustRing,
        Transform::at(Vec3::new(0.0, -25.0, 0.0)).with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
        Vec3::new(2.7, 2.7, 0.2),
    )
}

fn standard() -> ChoreographyConfig {
    use Attribute::*;
    use PartId::*;

    let mut parts = engine_parts();
    // Lathe-profile bell, flipped so the wide end points down
    parts.push(PartSpec::new(
        Nozzle,
        Transform::at(Vec3::new(0.0, -20.0, 0.0)).with_rotation(Vec3::new(PI, 0.0, 0.0)),
        Vec3::new(4.5, 3.6, 4.5),
    ));
    parts.push(exhaust_ring());

    let stages = vec![
        StageConfig::new("Approach", STAGE_LABELS[0], 0.0, 0.2)
            .bind(Binding::camera(PositionZ, 25.0, 15.0))
            .bind(Binding::camera(PositionY, 2.0, 3.0))
            .bind(Binding::part(BaseRing, PositionX, -20.0, 0.0))
            .bind(Binding::part(BaseRing, RotationY, 0.0, TAU)),
        StageConfig::new("Assembly", STAGE_LABELS[1], 0.2, 0.4)
            .bind(Binding::part(Chamber, PositionY, 15.0, 1.0))
            .bind(Binding::part(Turbopump, PositionX, 20.0, 3.5))
            .bind(Binding::part(Turbopump, RotationY, 0.0, PI))
            .bind(Binding::part(Pipe1, PositionX, -15.0, -2.5))
            .bind(Binding::part(Pipe2, PositionX, -15.0, -2.5))
            .bind(Binding::part(Nozzle, PositionY, -20.0, -4.0))
            .bind(Binding::part(ExhaustRing, PositionY, -25.0, -6.0)),
        StageConfig::new("Ignition", STAGE_LABELS[2], 0.4, 0.6)
            .bind(Binding::part(Core, Emissive, 0.0, 2.0))
            .bind(Binding::part(Core, LightIntensity, 0.0, 3.0))
            .bind(Binding::part(Core, LightDistance, 10.0, 30.0))
            .bind(Binding::camera(PositionZ, 15.0, 13.0))
            .effect(StageEffect::Pulse {
                part: Core,
                rate_per_ms: 0.003,
                amplitude: 0.05,
            }),
        StageConfig::new("Reveal", STAGE_LABELS[3], 0.6, 0.8)
            .effect(StageEffect::Revolve { sweep: TAU })
            .effect(StageEffect::Orbit {
                radius: 5.0,
                center_z: 13.0,
                sweep: FRAC_PI_2,
            })
            .spin(0.002),
        StageConfig::new("Final", STAGE_LABELS[4], 0.8, 1.0)
            .bind(Binding::camera(PositionZ, 13.0, 20.0))
            .bind(Binding::camera(PositionY, 3.0, 5.0))
            .effect(StageEffect::Glow {
                part: Core,
                base: 2.0,
                amplitude: 0.5,
                rate_per_ms: 0.002,
                floor: None,
            })
            .spin(0.001),
    ];

    ChoreographyConfig {
        parts,
        camera_start: Vec3::new(0.0, 2.0, 25.0),
        initial_label: INITIAL_LABEL.to_string(),
        stages,
    }
}

fn actuated() -> ChoreographyConfig {
    use Attribute::*;
    use Easing::*;
    use PartId::*;

    let mut parts = engine_parts();
    parts.push(PartSpec::new(
        Nozzle,
        Transform::at(Vec3::new(0.0, -10.0, 0.0)),
        Vec3::new(3.5, 2.5, 3.5),
    ));
    parts.push(exhaust_ring());
    parts.push(PartSpec::new(
        TvcRod,
        Transform::at(Vec3::new(12.0, -3.0, 0.0)).with_rotation(Vec3::new(0.0, 0.0, PI / 6.0)),
        Vec3::new(0.15, 1.2, 0.15),
    ));

    let stages = vec![
        StageConfig::new("Approach", STAGE_LABELS[0], 0.0, 0.2)
            .bind(Binding::camera(PositionZ, 25.0, 15.0).eased(EaseInOutQuad))
            .bind(Binding::camera(PositionY, 2.0, 3.0).eased(EaseInOutQuad))
            .bind(Binding::part(BaseRing, PositionX, -20.0, 0.0).eased(EaseOutCubic))
            .bind(Binding::part(BaseRing, RotationY, 0.0, TAU).eased(Linear)),
        StageConfig::new("Assembly", STAGE_LABELS[1], 0.2, 0.4)
            .with_easing(EaseInOutQuad)
            .bind(Binding::part(Chamber, PositionY, 15.0, 1.0))
            .bind(Binding::part(Nozzle, PositionY, -10.0, -4.0))
            .bind(Binding::part(ExhaustRing, PositionY, -25.0, -6.0))
            .bind(Binding::part(Turbopump, PositionX, 20.0, 3.5).eased(EaseOutBack))
            .bind(Binding::part(Pipe1, PositionX, -15.0, -2.5).eased(EaseOutQuad))
            .bind(Binding::part(Pipe2, PositionX, -15.0, -2.5).eased(EaseOutQuad))
            .bind(Binding::part(TvcRod, PositionX, 12.0, 2.2).eased(EaseOutCubic)),
        StageConfig::new("Ignition", STAGE_LABELS[2], 0.4, 0.6)
            .with_easing(EaseInOutQuad)
            .bind(Binding::part(Core, Emissive, 0.0, 2.0))
            .bind(Binding::part(Core, LightIntensity, 0.0, 3.0))
            .bind(Binding::part(Core, LightDistance, 10.0, 30.0))
            .bind(Binding::camera(PositionZ, 15.0, 13.0))
            .effect(StageEffect::Pulse {
                part: Core,
                rate_per_ms: 0.003,
                amplitude: 0.05,
            }),
        StageConfig::new("Reveal", STAGE_LABELS[3], 0.6, 0.8)
            .with_easing(EaseInOutQuad)
            .effect(StageEffect::Revolve { sweep: TAU })
            .effect(StageEffect::Orbit {
                radius: 5.0,
                center_z: 13.0,
                sweep: FRAC_PI_2,
            })
            .spin(0.002),
        StageConfig::new("Final", STAGE_LABELS[4], 0.8, 1.0)
            .with_easing(EaseInOutQuad)
            .bind(Binding::camera(PositionX, 5.0, 0.0))
            .bind(Binding::camera(PositionZ, 15.0, 20.0))
            .bind(Binding::camera(PositionY, -5.0, 5.0))
            .effect(StageEffect::Glow {
                part: Core,
                base: 2.0,
                amplitude: 0.3,
                rate_per_ms: 0.002,
                floor: Some(0.0),
            })
            .spin(0.001),
    ];

    ChoreographyConfig {
        parts,
        camera_start: Vec3::new(0.0, 2.0, 25.0),
        initial_label: INITIAL_LABEL.to_string(),
        stages,
    }
}
