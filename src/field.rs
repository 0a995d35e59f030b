// Copyright (c) 2026 rezky_nightky

use std::f64::consts::TAU;

use crate::rng::{RandomSource, SeededSource};
use crate::runtime::SpiralConfig;

/// Width of the band `r_base` is drawn from, starting at `r_min`.
const R_BASE_SPREAD: f64 = 0.6;
const SCALE_MIN: f64 = 0.6;
const SCALE_MAX: f64 = 1.5;
/// Offset applied to the seed for the independent size stream.
const SCALE_SEED_OFFSET: u64 = 99;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub theta0: f64,
    pub arm_index: usize,
    pub arm_phase: f64,
    pub dtheta: f64,
    pub r_base: f64,
    pub scale: f64,
}

impl Particle {
    /// Angle on the particle's trajectory at frame `t`.
    pub fn theta_at(&self, t: f64) -> f64 {
        self.theta0 + self.dtheta * t + self.arm_phase
    }
}

/// The fixed pool of particles plus the spiral constants they share.
#[derive(Clone, Debug)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub n_arms: usize,
    pub r_min: f64,
    pub spiral_k: f64,
    pub base_dtheta: f64,
}

impl ParticleField {
    /// Generates the field from `cfg.seed` with the crate's default generator.
    pub fn generate(cfg: &SpiralConfig) -> Self {
        let mut primary = SeededSource::new(cfg.seed);
        let mut sizes = SeededSource::new(cfg.seed.wrapping_add(SCALE_SEED_OFFSET));
        Self::generate_with(cfg, &mut primary, &mut sizes)
    }

    /// Each parameter is drawn for the whole pool before the next one, so the
    /// order of draws matches across implementations of `RandomSource`.
    pub fn generate_with<P, S>(cfg: &SpiralConfig, primary: &mut P, sizes: &mut S) -> Self
    where
        P: RandomSource + ?Sized,
        S: RandomSource + ?Sized,
    {
        let n = cfg.n_particles_max;
        let n_arms = cfg.n_arms.max(1);

        let theta0: Vec<f64> = (0..n).map(|_| primary.uniform(0.0, TAU)).collect();
        let arm_index: Vec<usize> = (0..n).map(|_| primary.integer(0, n_arms)).collect();
        let dtheta: Vec<f64> = (0..n)
            .map(|_| cfg.base_dtheta + primary.uniform(-cfg.jitter, cfg.jitter))
            .collect();
        let r_base: Vec<f64> = (0..n)
            .map(|_| cfg.r_min + R_BASE_SPREAD * primary.uniform(0.0, 1.0))
            .collect();
        let scale: Vec<f64> = (0..n).map(|_| sizes.uniform(SCALE_MIN, SCALE_MAX)).collect();

        let particles = (0..n)
            .map(|i| Particle {
                theta0: theta0[i],
                arm_index: arm_index[i],
                arm_phase: TAU * arm_index[i] as f64 / n_arms as f64,
                dtheta: dtheta[i],
                r_base: r_base[i],
                scale: scale[i],
            })
            .collect();

        Self {
            particles,
            n_arms,
            r_min: cfg.r_min,
            spiral_k: cfg.spiral_k,
            base_dtheta: cfg.base_dtheta,
        }
    }

    pub fn get(&self, i: usize) -> Option<&Particle> {
        self.particles.get(i)
    }
}
