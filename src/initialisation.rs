use crate::distance::Distance;
use num_traits::Float;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strategies for choosing the initial centroids. Randomised strategies take an explicit
/// seed, so the same seed always produces the same initial centroids.
///
/// To supply the initial centroids directly, use `KMeans::with_initial_centroids`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Initialisation {
    /// The first K data points, in input order.
    FirstK,
    /// K distinct data points sampled uniformly at random.
    Random { seed: u64 },
    /// k-means++. The first centroid is a uniformly random data point, each further
    /// centroid is a data point drawn with probability proportional to its squared
    /// distance from the nearest centroid chosen so far.
    PlusPlus { seed: u64 },
}

impl Initialisation {
    /// The same strategy with its seed replaced. `FirstK` has no seed and is unchanged.
    pub(crate) fn reseeded(&self, seed: u64) -> Self {
        match self {
            Self::FirstK => Self::FirstK,
            Self::Random { .. } => Self::Random { seed },
            Self::PlusPlus { .. } => Self::PlusPlus { seed },
        }
    }

    /// Expects `1 <= k <= data.len()`, which is checked by validation beforehand.
    pub(crate) fn init_centroids<T, D>(&self, data: &[Vec<T>], k: usize, distance: &D)
        -> Vec<Vec<T>>
    where
        T: Float,
        D: Distance<T>,
    {
        match *self {
            Self::FirstK => data[..k].to_vec(),
            Self::Random { seed } => random_sample(data, k, seed),
            Self::PlusPlus { seed } => plus_plus(data, k, seed, distance),
        }
    }
}

fn random_sample<T: Float>(data: &[Vec<T>], k: usize, seed: u64) -> Vec<Vec<T>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    index::sample(&mut rng, data.len(), k)
        .into_iter()
        .map(|n| data[n].clone())
        .collect()
}

fn plus_plus<T, D>(data: &[Vec<T>], k: usize, seed: u64, distance: &D) -> Vec<Vec<T>>
where
    T: Float,
    D: Distance<T>,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_samples = data.len();
    let mut chosen = vec![false; n_samples];
    let mut centroids = Vec::with_capacity(k);

    let first = rng.gen_range(0..n_samples);
    chosen[first] = true;
    centroids.push(data[first].clone());
    debug!(centroid = 0, point = first, "k-means++ picked initial centroid");

    let mut min_dists = vec![f64::INFINITY; n_samples];
    for c in 1..k {
        let latest = &centroids[c - 1];
        for (n, datapoint) in data.iter().enumerate() {
            let dist = distance.distance(datapoint, latest).to_f64().unwrap_or(f64::INFINITY);
            if dist < min_dists[n] {
                min_dists[n] = dist;
            }
        }
        let next = pick_next(&min_dists, &chosen, &mut rng).unwrap_or(c);
        chosen[next] = true;
        centroids.push(data[next].clone());
        debug!(centroid = c, point = next, "k-means++ picked initial centroid");
    }
    centroids
}

/// Draws an unchosen point with probability proportional to its squared distance from the
/// nearest centroid. Distances are divided by the largest one before squaring, so weights
/// never overflow. If some distances are infinite the first such point is taken.
fn pick_next<R: Rng>(min_dists: &[f64], chosen: &[bool], rng: &mut R) -> Option<usize> {
    let unchosen = || {
        min_dists
            .iter()
            .zip(chosen)
            .enumerate()
            .filter(|&(_, (_, &is_chosen))| !is_chosen)
            .map(|(n, (&dist, _))| (n, dist))
    };
    let max_dist = unchosen().map(|(_, dist)| dist).fold(0.0, f64::max);
    if max_dist.is_infinite() {
        return unchosen().find(|(_, dist)| dist.is_infinite()).map(|(n, _)| n);
    }
    let weights = min_dists.iter().zip(chosen).map(|(&dist, &is_chosen)| {
        if is_chosen || max_dist == 0.0 {
            0.0
        } else {
            (dist / max_dist).powi(2)
        }
    });

    // All weights are zero when every remaining point duplicates a centroid
    match WeightedIndex::new(weights) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => unchosen().next().map(|(n, _)| n),
    }
}
