//! One-dimensional isolation forest.
//!
//! Trees split on a uniform random cut between the node's min and max. Points
//! that isolate in few splits score close to 1; typical points score near or
//! below 0.5.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Euler–Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug)]
enum Node {
    Split {
        cut: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

impl Node {
    fn build(samples: &[f64], depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
        if samples.len() <= 1 || depth >= max_depth {
            return Node::Leaf {
                size: samples.len(),
            };
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let spread = max - min;
        if !(spread.is_finite() && spread > 0.0) {
            return Node::Leaf {
                size: samples.len(),
            };
        }

        let cut = rng.random_range(min..max);
        let (left, right): (Vec<f64>, Vec<f64>) = samples.iter().partition(|v| **v < cut);

        Node::Split {
            cut,
            left: Box::new(Node::build(&left, depth + 1, max_depth, rng)),
            right: Box::new(Node::build(&right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, value: f64) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split { cut, left, right } => {
                    node = if value < *cut { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// An ensemble of isolation trees fitted to one series.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit `trees` trees, each on a sub-sample of at most `sample_size` values.
    ///
    /// The same `seed` and input always produce the same forest.
    pub fn fit(values: &[f64], trees: usize, sample_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample_size = sample_size.min(values.len());
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;

        let trees = (0..trees)
            .map(|_| {
                let sample: Vec<f64> =
                    rand::seq::index::sample(&mut rng, values.len(), sample_size)
                        .iter()
                        .map(|i| values[i])
                        .collect();
                Node::build(&sample, 0, max_depth, &mut rng)
            })
            .collect();

        IsolationForest { trees, sample_size }
    }

    /// Anomaly score `2^(-E[h(x)] / c(ψ))` in (0, 1].
    pub fn score(&self, value: f64) -> f64 {
        let normalizer = average_path_length(self.sample_size);
        if self.trees.is_empty() || normalizer <= 0.0 {
            return 0.5;
        }
        let mean_path = self
            .trees
            .iter()
            .map(|tree| tree.path_length(value))
            .sum::<f64>()
            / self.trees.len() as f64;
        2f64.powf(-mean_path / normalizer)
    }
}
