//! Shared fixtures for integration tests.

#![allow(dead_code)]

use esync::{Network, generate};

pub fn ring(n: usize) -> Network {
    generate::ring(n).unwrap()
}

pub fn preferential_attachment(n: usize, m: usize, seed: u64) -> Network {
    generate::preferential_attachment(n, m, seed).unwrap()
}
