//! Command-line argument parsing.

use clap::Parser;

use crate::params::{ChoreographyPreset, SpinClock};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "raptor-reveal")]
#[command(about = "Scroll-driven rocket engine assembly reveal", long_about = None)]
pub struct Args {
    /// Choreography preset: standard (default), actuated
    #[arg(long, value_name = "PRESET", default_value = "standard")]
    pub preset: String,

    /// Idle spin clock: wall (frame-rate independent, default), frame
    #[arg(long, value_name = "CLOCK", default_value = "wall")]
    pub spin: String,

    /// Evaluate once at this progress (0..1), print the scene and exit
    #[arg(long, value_name = "PROGRESS", allow_negative_numbers = true)]
    pub scrub: Option<f32>,

    /// Animation clock for --scrub (milliseconds since start)
    #[arg(long, value_name = "MS", default_value = "0", requires = "scrub")]
    pub time_ms: f64,
}

impl Args {
    /// Parse the choreography preset, falling back to standard
    pub fn parse_preset(&self) -> ChoreographyPreset {
        match self.preset.parse() {
            Ok(preset) => preset,
            Err(e) => {
                log::warn!("{}, using standard", e);
                ChoreographyPreset::Standard
            }
        }
    }

    /// Parse the idle spin clock, falling back to wall clock
    pub fn parse_spin_clock(&self) -> SpinClock {
        match self.spin.parse() {
            Ok(clock) => clock,
            Err(e) => {
                log::warn!("{}, using wall clock", e);
                SpinClock::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["raptor-reveal"]);
        assert_eq!(args.parse_preset(), ChoreographyPreset::Standard);
        assert_eq!(args.parse_spin_clock(), SpinClock::default());
        assert_eq!(args.scrub, None);
    }

    #[test]
    fn test_scrub_with_time() {
        let args = Args::parse_from([
            "raptor-reveal",
            "--preset",
            "actuated",
            "--spin",
            "frame",
            "--scrub",
            "0.45",
            "--time-ms",
            "1200",
        ]);
        assert_eq!(args.parse_preset(), ChoreographyPreset::Actuated);
        assert_eq!(args.parse_spin_clock(), SpinClock::PerFrame);
        assert_eq!(args.scrub, Some(0.45));
        assert_eq!(args.time_ms, 1200.0);
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        let args = Args::parse_from(["raptor-reveal", "--preset", "merlin"]);
        assert_eq!(args.parse_preset(), ChoreographyPreset::Standard);
    }

    #[test]
    fn test_time_requires_scrub() {
        assert!(Args::try_parse_from(["raptor-reveal", "--time-ms", "5"]).is_err());
    }
}
