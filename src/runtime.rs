// Copyright (c) 2025 rezk_nightky

use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// Every tunable constant of the spiral engine in one place.
///
/// `Default` gives the stock look of the animation: a seed of 7,
/// three arms, fifty particles and two years of months.
#[derive(Clone, Debug, PartialEq)]
pub struct SpiralConfig {
    pub seed: u64,
    pub n_arms: usize,
    pub r_min: f64,
    /// Outer radius of the nominal field. Only checked against `r_min`;
    /// trails keep winding outward past it.
    pub r_max: f64,
    pub spiral_k: f64,
    pub base_dtheta: f64,
    pub jitter: f64,
    pub n_particles_max: usize,
    pub tail_max: usize,
    pub frames_per_month: usize,
    pub month_limit: usize,
    pub rain_low_mm: f64,
    pub rain_high_mm: f64,
    pub frame_interval: Duration,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            n_arms: 3,
            r_min: 0.15,
            r_max: 1.10,
            spiral_k: 0.085,
            base_dtheta: 0.04,
            jitter: 0.035,
            n_particles_max: 50,
            tail_max: 48,
            frames_per_month: 26,
            month_limit: 24,
            rain_low_mm: 50.0,
            rain_high_mm: 300.0,
            frame_interval: Duration::from_millis(15),
        }
    }
}

impl SpiralConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_arms == 0 {
            return Err(Error::Config("n_arms must be at least 1".to_string()));
        }
        if self.n_particles_max == 0 {
            return Err(Error::Config(
                "n_particles_max must be at least 1".to_string(),
            ));
        }
        if self.tail_max == 0 {
            return Err(Error::Config("tail_max must be at least 1".to_string()));
        }
        if self.frames_per_month == 0 {
            return Err(Error::Config(
                "frames_per_month must be at least 1".to_string(),
            ));
        }
        for (name, v) in [
            ("r_min", self.r_min),
            ("r_max", self.r_max),
            ("spiral_k", self.spiral_k),
            ("base_dtheta", self.base_dtheta),
            ("jitter", self.jitter),
            ("rain_low_mm", self.rain_low_mm),
            ("rain_high_mm", self.rain_high_mm),
        ] {
            if !v.is_finite() {
                return Err(Error::Config(format!("{} must be finite, got {}", name, v)));
            }
        }
        if self.r_min < 0.0 || self.r_min >= self.r_max {
            return Err(Error::Config(format!(
                "radius range must satisfy 0 <= r_min < r_max (got {} .. {})",
                self.r_min, self.r_max
            )));
        }
        if self.jitter < 0.0 {
            return Err(Error::Config(format!(
                "jitter must not be negative, got {}",
                self.jitter
            )));
        }
        if self.rain_high_mm <= self.rain_low_mm {
            return Err(Error::Config(format!(
                "rainfall bounds must satisfy low < high (got {} .. {})",
                self.rain_low_mm, self.rain_high_mm
            )));
        }
        Ok(())
    }
}
