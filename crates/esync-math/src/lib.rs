//! Numeric primitives shared by the esync crates.
//!
//! Node state is stored as one flat dynamic vector, node-major. Phases are
//! kept in (−π, π] and summed as unit complex numbers.

use nalgebra as na;
use std::f64::consts::{PI, TAU};

pub use na::Complex;

/// Dynamic vector.
pub type DVec = na::DVector<f64>;
/// Dynamic matrix.
pub type DMat = na::DMatrix<f64>;

/// Wrap an angle into (−π, π].
#[inline]
pub fn wrap_phase(theta: f64) -> f64 {
    let wrapped = theta - TAU * ((theta + PI) / TAU).floor();
    // floor leaves exactly −π for odd multiples of π
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Shortest signed angular distance from `a` to `b`, in (−π, π].
#[inline]
pub fn phase_difference(a: f64, b: f64) -> f64 {
    wrap_phase(b - a)
}

/// Unit phasor e^{iθ}.
#[inline]
pub fn phasor(theta: f64) -> Complex<f64> {
    let (s, c) = theta.sin_cos();
    Complex::new(c, s)
}

/// Sum of unit phasors over `phases`.
pub fn phasor_sum(phases: &[f64]) -> Complex<f64> {
    phases
        .iter()
        .fold(Complex::new(0.0, 0.0), |acc, &theta| acc + phasor(theta))
}

/// Index of the first non-finite component, if any.
pub fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_phase_range() {
        for k in -20..=20 {
            let theta = 0.37 * k as f64;
            let w = wrap_phase(theta);
            assert!(w > -PI && w <= PI, "wrap({theta}) = {w}");
            assert_relative_eq!(w.sin(), theta.sin(), epsilon = 1e-12);
            assert_relative_eq!(w.cos(), theta.cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wrap_phase_boundaries() {
        assert_relative_eq!(wrap_phase(PI), PI);
        assert_relative_eq!(wrap_phase(-PI), PI);
        assert_relative_eq!(wrap_phase(3.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_phase(0.0), 0.0);
    }

    #[test]
    fn test_phase_difference_shortest() {
        assert_relative_eq!(phase_difference(3.0, -3.0), TAU - 6.0, epsilon = 1e-12);
        assert_relative_eq!(phase_difference(0.5, 0.25), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_phasor_sum_cancels() {
        let phases = [0.0, PI / 2.0, PI, -PI / 2.0];
        let z = phasor_sum(&phases);
        assert!(z.norm() < 1e-12);
    }

    #[test]
    fn test_first_non_finite() {
        assert_eq!(first_non_finite(&[1.0, 2.0]), None);
        assert_eq!(first_non_finite(&[1.0, f64::NAN, f64::INFINITY]), Some(1));
    }
}
