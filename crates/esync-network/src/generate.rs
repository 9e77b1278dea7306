//! Small topology builders for demos and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{NetworkError, Result};
use crate::Network;

/// Undirected ring `0 - 1 - … - (n-1) - 0`. Needs `n >= 3`.
pub fn ring(n: usize) -> Result<Network> {
    if n < 3 {
        return Err(NetworkError::Generator(format!(
            "ring needs at least 3 nodes, got {n}"
        )));
    }
    let pairs: Vec<_> = (0..n).map(|j| (j, (j + 1) % n)).collect();
    Network::undirected(n, &pairs)
}

/// Preferential-attachment graph.
///
/// Starts from a complete core of `m + 1` nodes. Each later node links to
/// `m` distinct existing nodes, picked with probability proportional to
/// their degree. Deterministic for a given `seed`.
pub fn preferential_attachment(n: usize, m: usize, seed: u64) -> Result<Network> {
    if m == 0 || n <= m {
        return Err(NetworkError::Generator(format!(
            "preferential attachment needs 1 <= m < n, got m = {m}, n = {n}"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pairs = Vec::new();
    // one entry per edge endpoint, so a uniform pick is degree-weighted
    let mut endpoints = Vec::new();

    for a in 0..=m {
        for b in (a + 1)..=m {
            pairs.push((a, b));
            endpoints.extend([a, b]);
        }
    }

    let mut chosen = Vec::with_capacity(m);
    for new in (m + 1)..n {
        chosen.clear();
        while chosen.len() < m {
            let candidate = endpoints[rng.gen_range(0..endpoints.len())];
            if !chosen.contains(&candidate) {
                chosen.push(candidate);
            }
        }
        for &old in &chosen {
            pairs.push((new, old));
            endpoints.extend([new, old]);
        }
    }

    Network::undirected(n, &pairs)
}
