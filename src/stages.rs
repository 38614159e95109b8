//! Stage partitioner: global progress → (active stage, local progress).
//!
//! Stages are half-open `[start, end)`; the last one is closed at 1. At an
//! exact boundary the later stage wins.

use crate::error::ConfigError;
use crate::params::{ChoreographyConfig, StageConfig};

/// Clamp host progress into [0,1]. NaN maps to 0.
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Active stage and stage-local progress for one global progress value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSample {
    /// Index into the stage table
    pub index: usize,
    /// Progress within the stage, in [0,1]
    pub local: f32,
}

/// Validated, ordered list of stage boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct StagePartition {
    bounds: Vec<(f32, f32)>,
}

impl StagePartition {
    /// Check that the stages tile [0,1] exactly, with no gaps or overlaps
    pub fn new(stages: &[StageConfig]) -> Result<Self, ConfigError> {
        let (first, last) = match (stages.first(), stages.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ConfigError::EmptyStages),
        };
        if first.start != 0.0 {
            return Err(ConfigError::PartitionStart(first.start));
        }
        if last.end != 1.0 {
            return Err(ConfigError::PartitionEnd(last.end));
        }

        let mut expected = 0.0;
        for (index, stage) in stages.iter().enumerate() {
            if stage.start != expected {
                return Err(ConfigError::GapInPartition {
                    index,
                    expected,
                    found: stage.start,
                });
            }
            if !(stage.end > stage.start) {
                return Err(ConfigError::EmptyStage {
                    name: stage.name.clone(),
                });
            }
            expected = stage.end;
        }

        Ok(Self {
            bounds: stages.iter().map(|stage| (stage.start, stage.end)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Select the stage containing `progress` (clamped first)
    pub fn locate(&self, progress: f32) -> StageSample {
        let p = clamp_progress(progress);
        let last = self.bounds.len() - 1;
        let index = self
            .bounds
            .iter()
            .position(|&(_, end)| p < end)
            .unwrap_or(last);
        let (start, end) = self.bounds[index];
        StageSample {
            index,
            local: ((p - start) / (end - start)).clamp(0.0, 1.0),
        }
    }
}

/// Stage label and percentage for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct StageDisplay {
    /// 0 = initializing (progress exactly 0), otherwise stage index + 1
    pub index: usize,
    pub label: String,
    /// Rounded percentage, 0–100
    pub percent: u8,
}

impl StageDisplay {
    pub fn for_progress(
        progress: f32,
        partition: &StagePartition,
        config: &ChoreographyConfig,
    ) -> Self {
        let p = clamp_progress(progress);
        let percent = (p * 100.0).round() as u8;
        if p == 0.0 {
            return Self {
                index: 0,
                label: config.initial_label.clone(),
                percent,
            };
        }
        let sample = partition.locate(p);
        Self {
            index: sample.index + 1,
            label: config.stages[sample.index].label.clone(),
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ChoreographyPreset;

    fn partition() -> StagePartition {
        StagePartition::new(&ChoreographyPreset::Standard.config().stages).unwrap()
    }

    #[test]
    fn test_boundary_selects_later_stage() {
        let partition = partition();
        assert_eq!(partition.locate(0.0).index, 0);
        assert_eq!(partition.locate(0.2).index, 1);
        assert_eq!(partition.locate(0.2).local, 0.0);
        assert_eq!(partition.locate(0.4).index, 2);
        assert_eq!(partition.locate(0.6).index, 3);
        assert_eq!(partition.locate(0.8).index, 4);
    }

    #[test]
    fn test_last_stage_is_closed() {
        let sample = partition().locate(1.0);
        assert_eq!(sample.index, 4);
        assert_eq!(sample.local, 1.0);
    }

    #[test]
    fn test_every_progress_selects_one_stage_with_unit_local() {
        let partition = partition();
        for i in 0..=10_000 {
            let p = i as f32 / 10_000.0;
            let sample = partition.locate(p);
            assert!(sample.index < partition.len());
            assert!(
                (0.0..=1.0).contains(&sample.local),
                "local {} at p={}",
                sample.local,
                p
            );
        }
    }

    #[test]
    fn test_overscroll_is_clamped() {
        let partition = partition();
        assert_eq!(partition.locate(-0.3), partition.locate(0.0));
        assert_eq!(partition.locate(1.02), partition.locate(1.0));
        assert_eq!(partition.locate(f32::NAN), partition.locate(0.0));
    }

    #[test]
    fn test_mid_stage_local_progress() {
        let sample = partition().locate(0.1);
        assert_eq!(sample.index, 0);
        assert!((sample.local - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gap_rejected() {
        let mut stages = ChoreographyPreset::Standard.config().stages;
        stages[2].start = 0.45;
        assert_eq!(
            StagePartition::new(&stages),
            Err(ConfigError::GapInPartition {
                index: 2,
                expected: 0.4,
                found: 0.45
            })
        );
    }

    #[test]
    fn test_partition_must_span_unit_interval() {
        let mut stages = ChoreographyPreset::Standard.config().stages;
        stages[4].end = 0.95;
        assert_eq!(
            StagePartition::new(&stages),
            Err(ConfigError::PartitionEnd(0.95))
        );

        let mut stages = ChoreographyPreset::Standard.config().stages;
        stages[0].start = 0.05;
        assert_eq!(
            StagePartition::new(&stages),
            Err(ConfigError::PartitionStart(0.05))
        );

        assert_eq!(StagePartition::new(&[]), Err(ConfigError::EmptyStages));
    }

    #[test]
    fn test_empty_stage_rejected() {
        let mut stages = ChoreographyPreset::Standard.config().stages;
        stages[1].end = 0.2;
        stages[2].start = 0.2;
        assert!(matches!(
            StagePartition::new(&stages),
            Err(ConfigError::EmptyStage { .. })
        ));
    }

    #[test]
    fn test_display_labels_and_percent() {
        let config = ChoreographyPreset::Standard.config();
        let partition = StagePartition::new(&config.stages).unwrap();

        let start = StageDisplay::for_progress(0.0, &partition, &config);
        assert_eq!(start.index, 0);
        assert_eq!(start.label, "INITIALIZING");
        assert_eq!(start.percent, 0);

        let ignition = StageDisplay::for_progress(0.456, &partition, &config);
        assert_eq!(ignition.index, 3);
        assert_eq!(ignition.label, "CORE IGNITION");
        assert_eq!(ignition.percent, 46);

        let done = StageDisplay::for_progress(1.0, &partition, &config);
        assert_eq!(done.index, 5);
        assert_eq!(done.label, "RAPTOR 1 ONLINE");
        assert_eq!(done.percent, 100);

        assert_eq!(StageDisplay::for_progress(0.001, &partition, &config).index, 1);
    }
}
