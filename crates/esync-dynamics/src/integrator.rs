//! Fixed-step explicit integrators.
//!
//! All schemes advance the flat network state in place and share the
//! [`VectorField`] interface, so callers switch schemes by changing one
//! [`Scheme`] value. Stage buffers are allocated once in
//! [`Integrator::new`] and reused every step.

use esync_math::DVec;
use serde::{Deserialize, Serialize};

use crate::field::VectorField;

/// Integration scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Forward Euler, one evaluation per step.
    Euler,
    /// Explicit trapezoidal predictor-corrector, two evaluations per step.
    Heun,
    /// Classical 4th-order Runge-Kutta, four evaluations per step.
    #[default]
    Rk4,
    /// Runge-Kutta-Fehlberg, fifth-order solution at a fixed step (no error control).
    Rkf45,
}

impl Scheme {
    /// Vector-field evaluations per step.
    pub fn stages(&self) -> usize {
        match self {
            Scheme::Euler => 1,
            Scheme::Heun => 2,
            Scheme::Rk4 => 4,
            Scheme::Rkf45 => 6,
        }
    }
}

/// Stepper with pre-sized stage buffers for one state length.
#[derive(Debug, Clone)]
pub struct Integrator {
    scheme: Scheme,
    k: [DVec; 6],
    tmp: DVec,
}

impl Integrator {
    pub fn new(scheme: Scheme, len: usize) -> Self {
        Self {
            scheme,
            k: std::array::from_fn(|_| DVec::zeros(len)),
            tmp: DVec::zeros(len),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Advance `x` from `t` to `t + dt`, then apply the field's `post_step`.
    pub fn step<F: VectorField + ?Sized>(&mut self, field: &mut F, x: &mut DVec, t: f64, dt: f64) {
        debug_assert_eq!(x.len(), self.tmp.len());

        match self.scheme {
            Scheme::Euler => self.euler(field, x, t, dt),
            Scheme::Heun => self.heun(field, x, t, dt),
            Scheme::Rk4 => self.rk4(field, x, t, dt),
            Scheme::Rkf45 => self.rkf45(field, x, t, dt),
        }

        field.post_step(x.as_mut_slice());
    }

    fn euler<F: VectorField + ?Sized>(&mut self, field: &mut F, x: &mut DVec, t: f64, dt: f64) {
        let k1 = &mut self.k[0];
        field.eval(t, x.as_slice(), k1.as_mut_slice());
        x.axpy(dt, k1, 1.0);
    }

    fn heun<F: VectorField + ?Sized>(&mut self, field: &mut F, x: &mut DVec, t: f64, dt: f64) {
        let [k1, k2, ..] = &mut self.k;
        let pred = &mut self.tmp;

        field.eval(t, x.as_slice(), k1.as_mut_slice());

        // Euler predictor
        pred.copy_from(x);
        pred.axpy(dt, k1, 1.0);
        field.eval(t + dt, pred.as_slice(), k2.as_mut_slice());

        x.axpy(0.5 * dt, k1, 1.0);
        x.axpy(0.5 * dt, k2, 1.0);
    }

    fn rk4<F: VectorField + ?Sized>(&mut self, field: &mut F, x: &mut DVec, t: f64, dt: f64) {
        let [k1, k2, k3, k4, ..] = &mut self.k;
        let s = &mut self.tmp;
        let half = 0.5 * dt;

        field.eval(t, x.as_slice(), k1.as_mut_slice());

        s.copy_from(x);
        s.axpy(half, k1, 1.0);
        field.eval(t + half, s.as_slice(), k2.as_mut_slice());

        s.copy_from(x);
        s.axpy(half, k2, 1.0);
        field.eval(t + half, s.as_slice(), k3.as_mut_slice());

        s.copy_from(x);
        s.axpy(dt, k3, 1.0);
        field.eval(t + dt, s.as_slice(), k4.as_mut_slice());

        // x += dt/6 (k1 + 2 k2 + 2 k3 + k4)
        s.copy_from(k1);
        s.axpy(2.0, k2, 1.0);
        s.axpy(2.0, k3, 1.0);
        s.axpy(1.0, k4, 1.0);
        x.axpy(dt / 6.0, s, 1.0);
    }

    fn rkf45<F: VectorField + ?Sized>(&mut self, field: &mut F, x: &mut DVec, t: f64, dt: f64) {
        // Fehlberg tableau
        const C: [f64; 6] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];
        const A: [&[f64]; 6] = [
            &[],
            &[1.0 / 4.0],
            &[3.0 / 32.0, 9.0 / 32.0],
            &[1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0],
            &[439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0],
            &[-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
        ];
        // Fifth-order weights
        const B: [f64; 6] = [
            16.0 / 135.0,
            0.0,
            6656.0 / 12825.0,
            28561.0 / 56430.0,
            -9.0 / 50.0,
            2.0 / 55.0,
        ];

        for stage in 0..6 {
            let (done, rest) = self.k.split_at_mut(stage);
            self.tmp.copy_from(x);
            for (a, k) in A[stage].iter().zip(done.iter()) {
                self.tmp.axpy(a * dt, k, 1.0);
            }
            field.eval(t + C[stage] * dt, self.tmp.as_slice(), rest[0].as_mut_slice());
        }

        for (b, k) in B.iter().zip(self.k.iter()) {
            if *b != 0.0 {
                x.axpy(b * dt, k, 1.0);
            }
        }
    }
}
