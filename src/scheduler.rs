// Copyright (c) 2026 rezky_nightky

use std::ops::Range;

use crate::color::RainNorm;

const BASE_PARTICLES: f64 = 12.0;
const EXTRA_PARTICLES: f64 = 38.0;

/// Number of particles a month with intensity `rain` asks for.
pub fn target_count(rain: RainNorm) -> usize {
    (BASE_PARTICLES + EXTRA_PARTICLES * rain.value()).round() as usize
}

/// Centered run of indices a month wants lit. Grows and shrinks symmetrically
/// around the middle of the pool as rainfall changes.
pub fn activation_band(n_particles: usize, n_max: usize) -> Range<usize> {
    if n_particles < n_max {
        let start = (n_max - n_particles) / 2;
        start..start + n_particles
    } else {
        0..n_max
    }
}

/// One-way activation record for every particle in the field.
#[derive(Clone, Debug)]
pub struct ActivationState {
    activated_frame: Vec<Option<u64>>,
}

impl ActivationState {
    pub fn new(n_max: usize) -> Self {
        Self {
            activated_frame: vec![None; n_max],
        }
    }

    /// Lights the month's band at `current_frame`. Particles that are already
    /// lit keep their original frame and nothing is ever switched off, so a
    /// dry month after a wet one leaves the wide band in place.
    ///
    /// Returns how many particles were newly activated.
    pub fn activate_for_month(&mut self, rain: RainNorm, current_frame: u64) -> usize {
        let band = activation_band(target_count(rain), self.activated_frame.len());
        let mut added = 0;
        for slot in &mut self.activated_frame[band] {
            if slot.is_none() {
                *slot = Some(current_frame);
                added += 1;
            }
        }
        added
    }

    pub fn activated_frame(&self, i: usize) -> Option<u64> {
        self.activated_frame.get(i).copied().flatten()
    }

    /// Every index ever activated, ascending.
    pub fn active_indices(&self) -> Vec<usize> {
        self.activated_frame
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.map(|_| i))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.activated_frame.iter().filter(|f| f.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(mm: f64) -> RainNorm {
        RainNorm::from_rainfall(mm, 50.0, 300.0).unwrap()
    }

    #[test]
    fn wet_month_lights_centered_band() {
        let rain = norm(180.0);
        assert_eq!(target_count(rain), 32);
        assert_eq!(activation_band(32, 50), 9..41);

        let mut state = ActivationState::new(50);
        assert_eq!(state.activate_for_month(rain, 0), 32);
        assert_eq!(state.active_indices(), (9..41).collect::<Vec<_>>());
        assert_eq!(state.activated_frame(8), None);
        assert!(state.activated_frame(9).is_some());
        assert_eq!(state.activated_frame(41), None);
    }

    #[test]
    fn dry_month_lights_twelve() {
        let rain = norm(10.0);
        assert_eq!(target_count(rain), 12);
        assert_eq!(activation_band(12, 50), 19..31);
    }

    #[test]
    fn saturated_month_lights_everything() {
        let mut state = ActivationState::new(50);
        state.activate_for_month(RainNorm::FULL, 5);
        assert_eq!(state.active_count(), 50);
        assert_eq!(activation_band(60, 50), 0..50);
    }

    #[test]
    fn activation_is_permanent_and_keeps_first_frame() {
        let mut state = ActivationState::new(50);
        state.activate_for_month(norm(300.0), 0);
        assert_eq!(state.activate_for_month(norm(0.0), 26), 0);
        assert_eq!(state.active_count(), 50);
        assert_eq!(state.activated_frame(0), Some(0));
        assert_eq!(state.activated_frame(25), Some(0));
    }

    #[test]
    fn growing_band_stamps_only_new_particles() {
        let mut state = ActivationState::new(50);
        state.activate_for_month(norm(10.0), 0);
        let added = state.activate_for_month(norm(180.0), 26);
        assert_eq!(added, 32 - 12);
        assert_eq!(state.activated_frame(19), Some(0));
        assert_eq!(state.activated_frame(9), Some(26));
        assert_eq!(state.activated_frame(40), Some(26));
        assert_eq!(state.activated_frame(8), None);
    }

    #[test]
    fn active_set_never_shrinks() {
        let months = [120.0, 20.0, 400.0, 60.0, 0.0, 250.0, 75.0];
        let mut state = ActivationState::new(50);
        let mut prev: Vec<usize> = Vec::new();
        for (m, mm) in months.iter().enumerate() {
            state.activate_for_month(norm(*mm), m as u64 * 26);
            let now = state.active_indices();
            assert!(now.len() >= prev.len());
            for i in &prev {
                assert!(
                    state.activated_frame(*i).is_some(),
                    "particle {} was deactivated",
                    i
                );
            }
            prev = now;
        }
    }

    #[test]
    fn out_of_range_index_is_inactive() {
        let state = ActivationState::new(4);
        assert_eq!(state.activated_frame(10), None);
    }
}
