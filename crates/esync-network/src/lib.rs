//! Network topology consumed by the coupling evaluator and order-parameter estimator.
//!
//! A [`Network`] is a pair of equal-length index arrays `(source, target)`,
//! one entry per directed edge, plus a per-node degree. Undirected
//! topologies carry both orientations of every connection. The degree of a
//! node is its in-degree, which equals its neighbor count for undirected
//! graphs.

mod error;
pub mod generate;

pub use error::{NetworkError, Result};

use esync_math::DMat;
use serde::{Deserialize, Serialize};

/// Immutable directed edge list with per-node degree.
///
/// Deserialization goes through [`NetworkSpec`], so a loaded network is
/// validated exactly like one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkSpec", into = "NetworkSpec")]
pub struct Network {
    n: usize,
    source: Vec<usize>,
    target: Vec<usize>,
    degree: Vec<f64>,
}

impl Network {
    /// Build from directed edges `source[e] → target[e]`, computing in-degree.
    pub fn from_edges(n: usize, source: Vec<usize>, target: Vec<usize>) -> Result<Self> {
        check_edges(n, &source, &target)?;
        let degree = in_degree(n, &target);
        Ok(Self {
            n,
            source,
            target,
            degree,
        })
    }

    /// Build from directed edges with a caller-supplied degree sequence.
    ///
    /// The supplied degree must agree with the in-degree implied by the edge
    /// list; a mismatch is a malformed topology.
    pub fn with_degree(
        n: usize,
        source: Vec<usize>,
        target: Vec<usize>,
        degree: Vec<f64>,
    ) -> Result<Self> {
        check_edges(n, &source, &target)?;
        if degree.len() != n {
            return Err(NetworkError::DegreeLength {
                expected: n,
                got: degree.len(),
            });
        }
        let counted = in_degree(n, &target);
        for (node, (&given, &count)) in degree.iter().zip(&counted).enumerate() {
            if !given.is_finite() || (given - count).abs() > 1e-9 {
                return Err(NetworkError::DegreeMismatch {
                    node,
                    given,
                    counted: count,
                });
            }
        }
        Ok(Self {
            n,
            source,
            target,
            degree,
        })
    }

    /// Build from undirected pairs, inserting both orientations of each.
    pub fn undirected(n: usize, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut source = Vec::with_capacity(pairs.len() * 2);
        let mut target = Vec::with_capacity(pairs.len() * 2);
        for &(a, b) in pairs {
            source.push(a);
            target.push(b);
            source.push(b);
            target.push(a);
        }
        Self::from_edges(n, source, target)
    }

    /// Build from an adjacency matrix.
    ///
    /// Every nonzero entry `A[(i, j)]` is the edge `j → i`: row `i` lists the
    /// nodes that drive node `i`. A symmetric matrix gives an undirected graph.
    /// NaN or infinite entries are rejected.
    pub fn from_adjacency(adjacency: &DMat) -> Result<Self> {
        let (rows, cols) = adjacency.shape();
        if rows != cols {
            return Err(NetworkError::NotSquare { rows, cols });
        }
        let mut source = Vec::new();
        let mut target = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                let a = adjacency[(i, j)];
                if !a.is_finite() {
                    return Err(NetworkError::NonFiniteEntry { row: i, col: j });
                }
                if a != 0.0 {
                    source.push(j);
                    target.push(i);
                }
            }
        }
        Self::from_edges(rows, source, target)
    }

    /// Network of `n` isolated nodes.
    pub fn empty(n: usize) -> Result<Self> {
        Self::from_edges(n, Vec::new(), Vec::new())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: construction rejects zero-node networks.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.source.len()
    }

    pub fn source(&self) -> &[usize] {
        &self.source
    }

    pub fn target(&self) -> &[usize] {
        &self.target
    }

    /// Per-node degree.
    pub fn degree(&self) -> &[f64] {
        &self.degree
    }

    /// Iterate directed edges as `(source, target)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.source.iter().copied().zip(self.target.iter().copied())
    }

    pub fn max_degree(&self) -> f64 {
        self.degree.iter().copied().fold(0.0, f64::max)
    }

    pub fn mean_degree(&self) -> f64 {
        self.degree.iter().sum::<f64>() / self.n as f64
    }

    /// Nodes with no incoming edges.
    pub fn isolated_nodes(&self) -> Vec<usize> {
        self.degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0.0)
            .map(|(j, _)| j)
            .collect()
    }
}

/// Serialized form of a [`Network`]. `degree` is recomputed when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub n: usize,
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<Vec<f64>>,
}

impl TryFrom<NetworkSpec> for Network {
    type Error = NetworkError;

    fn try_from(spec: NetworkSpec) -> Result<Self> {
        match spec.degree {
            Some(degree) => Network::with_degree(spec.n, spec.source, spec.target, degree),
            None => Network::from_edges(spec.n, spec.source, spec.target),
        }
    }
}

impl From<Network> for NetworkSpec {
    fn from(net: Network) -> Self {
        Self {
            n: net.n,
            source: net.source,
            target: net.target,
            degree: Some(net.degree),
        }
    }
}

fn check_edges(n: usize, source: &[usize], target: &[usize]) -> Result<()> {
    if n == 0 {
        return Err(NetworkError::NoNodes);
    }
    if source.len() != target.len() {
        return Err(NetworkError::EdgeLength {
            sources: source.len(),
            targets: target.len(),
        });
    }
    for (edge, (&s, &t)) in source.iter().zip(target).enumerate() {
        if s >= n || t >= n {
            return Err(NetworkError::IndexOutOfRange {
                edge,
                from: s,
                to: t,
                n,
            });
        }
        if s == t {
            return Err(NetworkError::SelfLoop { edge, node: s });
        }
    }
    Ok(())
}

fn in_degree(n: usize, target: &[usize]) -> Vec<f64> {
    let mut degree = vec![0.0; n];
    for &t in target {
        degree[t] += 1.0;
    }
    degree
}
