//! Choreography evaluator: scroll progress → full scene state.
//!
//! Every call derives the scene from scratch. The registry is reset to the
//! off-stage pose, each completed stage is applied at local progress 1, the
//! active stage at its eased local progress, and finally the accumulated idle
//! spin is layered onto every part. Only the spin angle and the clock carry
//! state between frames; both come in through `IdleInputs`.

use crate::easing::lerp;
use crate::error::ConfigError;
use crate::params::{
    Attribute, Binding, BindingTarget, ChoreographyConfig, StageConfig, StageEffect,
};
use crate::parts::{Part, PartRegistry};
use crate::stages::{clamp_progress, StageDisplay, StagePartition, StageSample};

/// Time-driven inputs layered on top of the progress mapping
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IdleInputs {
    /// Animation clock (milliseconds since start)
    pub clock_ms: f64,
    /// Accumulated idle spin added to every part's rotation.y (radians)
    pub spin_y: f32,
}

/// Validated choreography, ready to evaluate
#[derive(Debug, Clone)]
pub struct Choreography {
    config: ChoreographyConfig,
    partition: StagePartition,
}

impl Choreography {
    /// Validate the stage table and every binding against the registry
    pub fn new(config: ChoreographyConfig, registry: &PartRegistry) -> Result<Self, ConfigError> {
        let partition = StagePartition::new(&config.stages)?;
        let choreography = Self { config, partition };
        choreography.check_registry(registry)?;
        Ok(choreography)
    }

    /// Check that `registry` has every part and channel the stages write to
    ///
    /// Evaluating against a registry that fails this check would silently drop
    /// writes, so anything that pairs a choreography with a registry runs it.
    pub fn check_registry(&self, registry: &PartRegistry) -> Result<(), ConfigError> {
        for stage in &self.config.stages {
            for binding in &stage.bindings {
                check_binding(binding, registry)?;
            }
            for effect in &stage.effects {
                check_effect(effect, registry)?;
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &ChoreographyConfig {
        &self.config
    }

    pub fn stages(&self) -> &[StageConfig] {
        &self.config.stages
    }

    pub fn locate(&self, progress: f32) -> StageSample {
        self.partition.locate(progress)
    }

    pub fn display(&self, progress: f32) -> StageDisplay {
        StageDisplay::for_progress(progress, &self.partition, &self.config)
    }

    /// Write the scene state for `progress` into `registry`
    ///
    /// `registry` must have passed [`Choreography::check_registry`];
    /// `FrameDriver::new` enforces this.
    ///
    /// Progress exactly 0 restores every part and the camera to the off-stage
    /// pose with all glow dark, ignoring `idle.spin_y`.
    pub fn evaluate(
        &self,
        progress: f32,
        idle: IdleInputs,
        registry: &mut PartRegistry,
    ) -> StageSample {
        let p = clamp_progress(progress);
        let sample = self.partition.locate(p);

        registry.reset_to_initial();
        if p == 0.0 {
            return sample;
        }

        for (index, stage) in self.config.stages.iter().enumerate().take(sample.index + 1) {
            let local = if index < sample.index { 1.0 } else { sample.local };
            apply_stage(stage, local, idle.clock_ms, registry);
        }

        if idle.spin_y != 0.0 {
            for part in registry.iter_mut() {
                part.transform.rotation.y += idle.spin_y;
            }
        }

        sample
    }
}

fn check_binding(binding: &Binding, registry: &PartRegistry) -> Result<(), ConfigError> {
    use Attribute::*;

    match binding.target {
        BindingTarget::Camera => match binding.attribute {
            PositionX | PositionY | PositionZ => Ok(()),
            attribute => Err(ConfigError::UnsupportedAttribute {
                target: binding.target,
                attribute,
            }),
        },
        BindingTarget::Part(id) => {
            let part = registry.get(id).ok_or(ConfigError::UnknownPart(id))?;
            let has_channel = match binding.attribute {
                Emissive => part.emissive.is_some(),
                LightIntensity | LightDistance => part.light.is_some(),
                _ => true,
            };
            if has_channel {
                Ok(())
            } else {
                Err(ConfigError::MissingChannel {
                    part: id,
                    attribute: binding.attribute,
                })
            }
        }
    }
}

fn check_effect(effect: &StageEffect, registry: &PartRegistry) -> Result<(), ConfigError> {
    match *effect {
        StageEffect::Pulse { part, .. } => registry
            .get(part)
            .map(|_| ())
            .ok_or(ConfigError::UnknownPart(part)),
        StageEffect::Glow { part, .. } => {
            let found = registry.get(part).ok_or(ConfigError::UnknownPart(part))?;
            if found.emissive.is_some() {
                Ok(())
            } else {
                Err(ConfigError::MissingChannel {
                    part,
                    attribute: Attribute::Emissive,
                })
            }
        }
        StageEffect::Orbit { .. } | StageEffect::Revolve { .. } => Ok(()),
    }
}

fn apply_stage(stage: &StageConfig, local: f32, clock_ms: f64, registry: &mut PartRegistry) {
    let eased = stage.easing.apply(local);

    for binding in &stage.bindings {
        let curve = binding.easing.unwrap_or(stage.easing);
        let value = lerp(binding.from, binding.to, curve.apply(local));
        write_binding(binding, value, registry);
    }

    for effect in &stage.effects {
        apply_effect(effect, eased, clock_ms, registry);
    }
}

fn write_binding(binding: &Binding, value: f32, registry: &mut PartRegistry) {
    match binding.target {
        BindingTarget::Camera => {
            let position = &mut registry.camera_mut().position;
            match binding.attribute {
                Attribute::PositionX => position.x = value,
                Attribute::PositionY => position.y = value,
                Attribute::PositionZ => position.z = value,
                // Rejected by validation
                _ => {}
            }
        }
        BindingTarget::Part(id) => {
            if let Some(part) = registry.get_mut(id) {
                write_part(part, binding.attribute, value);
            }
        }
    }
}

fn write_part(part: &mut Part, attribute: Attribute, value: f32) {
    let transform = &mut part.transform;
    match attribute {
        Attribute::PositionX => transform.position.x = value,
        Attribute::PositionY => transform.position.y = value,
        Attribute::PositionZ => transform.position.z = value,
        Attribute::RotationX => transform.rotation.x = value,
        Attribute::RotationY => transform.rotation.y = value,
        Attribute::RotationZ => transform.rotation.z = value,
        Attribute::Scale => transform.scale = glam::Vec3::splat(value),
        Attribute::Emissive => {
            if let Some(emissive) = part.emissive.as_mut() {
                *emissive = value;
            }
        }
        Attribute::LightIntensity => {
            if let Some(light) = part.light.as_mut() {
                light.intensity = value;
            }
        }
        Attribute::LightDistance => {
            if let Some(light) = part.light.as_mut() {
                light.distance = value;
            }
        }
    }
}

fn apply_effect(effect: &StageEffect, eased: f32, clock_ms: f64, registry: &mut PartRegistry) {
    match *effect {
        StageEffect::Orbit {
            radius,
            center_z,
            sweep,
        } => {
            let angle = eased * sweep;
            let camera = registry.camera_mut();
            camera.position.x = angle.sin() * radius;
            camera.position.z = center_z + angle.cos() * radius;
        }
        StageEffect::Revolve { sweep } => {
            let turn = eased * sweep;
            for part in registry.iter_mut() {
                let position = &mut part.transform.position;
                let radius = position.x.hypot(position.z);
                // Parts on the Y axis stay put
                if radius == 0.0 {
                    continue;
                }
                let angle = position.z.atan2(position.x);
                position.x = (angle + turn).cos() * radius;
                position.z = (angle + turn).sin() * radius;
            }
        }
        StageEffect::Pulse {
            part,
            rate_per_ms,
            amplitude,
        } => {
            let wave = oscillate(clock_ms, rate_per_ms);
            if let Some(part) = registry.get_mut(part) {
                part.transform.scale = glam::Vec3::splat(1.0 + wave * amplitude * eased);
            }
        }
        StageEffect::Glow {
            part,
            base,
            amplitude,
            rate_per_ms,
            floor,
        } => {
            let mut intensity = base + oscillate(clock_ms, rate_per_ms) * amplitude;
            if let Some(floor) = floor {
                intensity = intensity.max(floor);
            }
            if let Some(emissive) = registry.get_mut(part).and_then(|p| p.emissive.as_mut()) {
                *emissive = intensity;
            }
        }
    }
}

/// `sin(clock_ms * rate)`, computed in f64 so long sessions keep precision
fn oscillate(clock_ms: f64, rate_per_ms: f32) -> f32 {
    (clock_ms * rate_per_ms as f64).sin() as f32
}
