// Copyright (c) 2026 rezky_nightky

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const PURPLE: Rgb = Rgb::new(0.7, 0.2, 1.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.1, 0.1);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, to: Rgb, t: f64) -> Rgb {
        Rgb::new(
            self.r + (to.r - self.r) * t,
            self.g + (to.g - self.g) * t,
            self.b + (to.b - self.b) * t,
        )
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Rgb {
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }

    #[cfg(test)]
    pub fn approx_eq(self, other: Rgb, eps: f64) -> bool {
        (self.r - other.r).abs() <= eps
            && (self.g - other.g).abs() <= eps
            && (self.b - other.b).abs() <= eps
    }
}

/// Rainfall intensity in `[0, 1]`.
///
/// Construction is the only place the range is enforced; everything
/// downstream takes the value as given.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct RainNorm(f64);

impl RainNorm {
    pub const ZERO: RainNorm = RainNorm(0.0);
    #[cfg(test)]
    pub const FULL: RainNorm = RainNorm(1.0);

    /// Clamps a finite value into `[0, 1]`.
    pub fn new(v: f64) -> Result<Self> {
        if !v.is_finite() {
            return Err(Error::NonFiniteRain(v));
        }
        Ok(Self(v.clamp(0.0, 1.0)))
    }

    /// Linear normalization of a monthly total over `[low_mm, high_mm]`,
    /// saturating at both ends.
    pub fn from_rainfall(total_mm: f64, low_mm: f64, high_mm: f64) -> Result<Self> {
        if !total_mm.is_finite() {
            return Err(Error::NonFiniteRain(total_mm));
        }
        Self::new((total_mm - low_mm) / (high_mm - low_mm))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorBranch {
    /// white → blue
    Cool,
    /// white → purple → red
    Warm,
}

impl ColorBranch {
    pub fn for_index(i: usize) -> Self {
        if i % 2 == 0 {
            ColorBranch::Cool
        } else {
            ColorBranch::Warm
        }
    }
}

/// Base color of a particle for the month's rainfall.
///
/// Dry months are white for every particle. Otherwise even-indexed particles
/// drift towards blue while odd ones pass through purple into red, so a wet
/// month shows both families at once.
pub fn map_color(rain: RainNorm, branch: ColorBranch) -> Rgb {
    if rain <= RainNorm::ZERO {
        return Rgb::WHITE;
    }
    let n = rain.value();
    match branch {
        // green eases out on its own curve instead of a straight RGB blend
        ColorBranch::Cool => Rgb::new(0.0, 0.3 + 0.7 * (1.0 - n), 1.0),
        ColorBranch::Warm => {
            let excess = (n * 1.5).min(1.0);
            if excess < 0.5 {
                Rgb::WHITE.lerp(Rgb::PURPLE, excess / 0.5)
            } else {
                Rgb::PURPLE.lerp(Rgb::RED, (excess - 0.5) / 0.5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn dry_month_is_white_on_both_branches() {
        assert_eq!(map_color(RainNorm::ZERO, ColorBranch::Cool), Rgb::WHITE);
        assert_eq!(map_color(RainNorm::ZERO, ColorBranch::Warm), Rgb::WHITE);
    }

    #[test]
    fn saturated_month_endpoints() {
        let cool = map_color(RainNorm::FULL, ColorBranch::Cool);
        assert!(cool.approx_eq(Rgb::new(0.0, 0.3, 1.0), EPS));
        let warm = map_color(RainNorm::FULL, ColorBranch::Warm);
        assert!(warm.approx_eq(Rgb::RED, EPS));
    }

    #[test]
    fn warm_branch_passes_through_purple() {
        // excess = 0.5 exactly at n = 1/3
        let c = map_color(RainNorm::new(1.0 / 3.0).unwrap(), ColorBranch::Warm);
        assert!(c.approx_eq(Rgb::PURPLE, 1e-9));

        // first segment, halfway to purple
        let c = map_color(RainNorm::new(0.5 / 3.0).unwrap(), ColorBranch::Warm);
        assert!(c.approx_eq(Rgb::new(0.85, 0.6, 1.0), 1e-9));
    }

    #[test]
    fn cool_branch_green_channel_desaturates() {
        let lo = map_color(RainNorm::new(0.1).unwrap(), ColorBranch::Cool);
        let hi = map_color(RainNorm::new(0.9).unwrap(), ColorBranch::Cool);
        assert_eq!(lo.r, 0.0);
        assert_eq!(lo.b, 1.0);
        assert!(lo.g > hi.g);
    }

    #[test]
    fn branch_follows_index_parity() {
        assert_eq!(ColorBranch::for_index(0), ColorBranch::Cool);
        assert_eq!(ColorBranch::for_index(7), ColorBranch::Warm);
        assert_eq!(ColorBranch::for_index(40), ColorBranch::Cool);
    }

    #[test]
    fn normalization_window() {
        let n = RainNorm::from_rainfall(180.0, 50.0, 300.0).unwrap();
        assert!((n.value() - 0.52).abs() < EPS);
        assert_eq!(RainNorm::from_rainfall(10.0, 50.0, 300.0).unwrap(), RainNorm::ZERO);
        assert_eq!(RainNorm::from_rainfall(50.0, 50.0, 300.0).unwrap(), RainNorm::ZERO);
        assert_eq!(RainNorm::from_rainfall(900.0, 50.0, 300.0).unwrap(), RainNorm::FULL);
    }

    #[test]
    fn non_finite_intensity_is_rejected() {
        assert!(matches!(RainNorm::new(f64::NAN), Err(Error::NonFiniteRain(_))));
        assert!(RainNorm::from_rainfall(f64::INFINITY, 50.0, 300.0).is_err());
    }
}
