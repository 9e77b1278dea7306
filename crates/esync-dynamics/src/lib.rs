//! Oscillator dynamics on sparse networks.
//!
//! This crate provides:
//! - A pairwise coupling evaluator over a directed edge list
//! - Piecewise-Rössler and Kuramoto vector fields
//! - Fixed-step explicit integrators (Euler, Heun, RK4, RKF45)
//! - Global and local (in-neighborhood) order parameters

pub mod coupling;
pub mod error;
pub mod field;
pub mod integrator;
pub mod order;

pub use coupling::Coupling;
pub use error::{DynamicsError, Result};
pub use field::{
    FrequencyProfile, KuramotoField, KuramotoParams, Model, RosslerField, RosslerParams,
    VectorField,
};
pub use integrator::{Integrator, Scheme};
pub use order::{LocalOrder, OrderParameter, global_order};
