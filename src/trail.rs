// Copyright (c) 2026 rezky_nightky

use crate::color::{map_color, ColorBranch, RainNorm};
use crate::field::ParticleField;
use crate::scheduler::ActivationState;

const FADE_GAMMA: f64 = 2.2;
const ALPHA_FLOOR: f64 = 0.02;
/// Channel value a fully aged trail point settles at.
const GRAY_LEVEL: f64 = 0.7;

/// One drawable point. `size` is an area in the renderer's point units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rgba: [f64; 4],
}

/// Linear fade along a trail: 1 at the head, approaching 0 at `tail_max`.
pub fn fade(j: usize, tail_max: usize) -> f64 {
    1.0 - j as f64 / tail_max as f64
}

pub fn alpha_for(fade: f64) -> f64 {
    ALPHA_FLOOR + (1.0 - ALPHA_FLOOR) * fade.powf(FADE_GAMMA)
}

/// Head and tail point sizes for the month.
pub fn size_range(rain: RainNorm) -> (f64, f64) {
    let n = rain.value();
    (0.8 + 5.0 * n, 30.0 + 60.0 * n)
}

/// Fills `out` with the trails of every particle in `active` at
/// `current_frame`.
///
/// Each particle contributes its points head first, so fade decreases along
/// each run. Trails never reach back before the frame a particle was
/// activated; a new particle starts with a single point and grows one point
/// per frame up to `tail_max`.
pub fn render_frame(
    field: &ParticleField,
    activation: &ActivationState,
    current_frame: u64,
    active: &[usize],
    rain: RainNorm,
    tail_max: usize,
    out: &mut Vec<TrailPoint>,
) {
    out.clear();
    let (min_size, max_size) = size_range(rain);

    for &i in active {
        let (Some(p), Some(born)) = (field.get(i), activation.activated_frame(i)) else {
            continue;
        };
        let Some(age) = current_frame.checked_sub(born) else {
            continue;
        };
        let tail_len = (tail_max as u64).min(age + 1) as usize;
        let base = map_color(rain, ColorBranch::for_index(i));

        for j in 0..tail_len {
            let t = current_frame - j as u64;
            if t < born {
                continue;
            }
            let theta = p.theta_at(t as f64);
            let r = p.r_base + field.spiral_k * theta;
            let f = fade(j, tail_max);
            let rgb = base.map(|c| GRAY_LEVEL + (1.0 - GRAY_LEVEL) * f * c);

            out.push(TrailPoint {
                x: r * theta.cos(),
                y: r * theta.sin(),
                size: (min_size + (max_size - min_size) * f) * p.scale,
                rgba: [rgb.r, rgb.g, rgb.b, alpha_for(f)],
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SpiralConfig;

    fn setup(mm: f64) -> (ParticleField, ActivationState, RainNorm) {
        let cfg = SpiralConfig::default();
        let field = ParticleField::generate(&cfg);
        let mut state = ActivationState::new(cfg.n_particles_max);
        let rain = RainNorm::from_rainfall(mm, 50.0, 300.0).unwrap();
        state.activate_for_month(rain, 100);
        (field, state, rain)
    }

    #[test]
    fn trail_grows_then_caps() {
        let (field, state, rain) = setup(10.0);
        let active = state.active_indices();
        let mut out = Vec::new();

        render_frame(&field, &state, 100, &active, rain, 48, &mut out);
        assert_eq!(out.len(), active.len());

        render_frame(&field, &state, 104, &active, rain, 48, &mut out);
        assert_eq!(out.len(), active.len() * 5);

        render_frame(&field, &state, 500, &active, rain, 48, &mut out);
        assert_eq!(out.len(), active.len() * 48);
    }

    #[test]
    fn nothing_rendered_before_activation() {
        let (field, state, rain) = setup(10.0);
        let active = state.active_indices();
        let mut out = vec![TrailPoint {
            x: 0.0,
            y: 0.0,
            size: 0.0,
            rgba: [0.0; 4],
        }];
        render_frame(&field, &state, 99, &active, rain, 48, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn fade_is_strictly_decreasing_and_alpha_bounded() {
        let mut prev = f64::INFINITY;
        for j in 0..48 {
            let f = fade(j, 48);
            assert!(f < prev);
            prev = f;
            let a = alpha_for(f);
            assert!((0.02..=1.0).contains(&a), "alpha {} out of range", a);
        }
        assert!((alpha_for(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn head_point_follows_archimedean_spiral() {
        let (field, state, rain) = setup(180.0);
        let active = state.active_indices();
        let mut out = Vec::new();
        render_frame(&field, &state, 100, &active, rain, 48, &mut out);

        let i = active[0];
        let p = field.get(i).unwrap();
        let theta = p.theta0 + p.dtheta * 100.0 + p.arm_phase;
        let r = p.r_base + 0.085 * theta;
        let head = out[0];
        assert!((head.x - r * theta.cos()).abs() < 1e-9);
        assert!((head.y - r * theta.sin()).abs() < 1e-9);
        let (_, max_size) = size_range(rain);
        assert!((head.size - max_size * p.scale).abs() < 1e-9);
        assert!((head.rgba[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn points_fade_along_each_trail() {
        let (field, state, rain) = setup(180.0);
        let active = state.active_indices();
        let mut out = Vec::new();
        render_frame(&field, &state, 130, &active, rain, 48, &mut out);

        let per = out.len() / active.len();
        assert_eq!(per, 31);
        for trail in out.chunks(per) {
            for pair in trail.windows(2) {
                assert!(pair[0].rgba[3] > pair[1].rgba[3]);
                assert!(pair[0].size > pair[1].size);
            }
        }
    }

    #[test]
    fn dry_month_renders_white_heads() {
        let (field, state, rain) = setup(10.0);
        let active = state.active_indices();
        let mut out = Vec::new();
        render_frame(&field, &state, 100, &active, rain, 48, &mut out);
        for p in &out {
            for c in &p.rgba[..3] {
                assert!((c - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn aged_points_drift_towards_gray() {
        let (field, state, rain) = setup(300.0);
        let active = state.active_indices();
        let mut out = Vec::new();
        render_frame(&field, &state, 147, &active, rain, 48, &mut out);

        // particle 0 is on the cool branch: base (0, 0.3, 1)
        let tail = out[47];
        let f = fade(47, 48);
        assert!((tail.rgba[0] - 0.7).abs() < 1e-12);
        assert!((tail.rgba[2] - (0.7 + 0.3 * f)).abs() < 1e-12);
    }
}
