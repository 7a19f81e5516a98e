//! Restarting K-means from several seeds and keeping the best result.
//!
//! K-means only finds a local minimum of the distortion, and which one depends on the
//! initial centroids. Running independently seeded instances and keeping the result with
//! the lowest distortion is the usual remedy. Instances share no state, so with the
//! `parallel` feature they can run on rayon's thread pool.

use crate::{ConfigurationError, Initialisation, KMeans, KMeansHyperParams, KMeansResult};
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

/// Runs one clusterer per seed, one after another, and returns the result with the lowest
/// distortion. Ties go to the earliest seed.
///
/// Each seed replaces the seed of the configured `Random` or `PlusPlus` initialisation.
///
/// # Parameters
/// * `data` - the data to cluster
/// * `hyper_params` - the hyper parameter configuration shared by every run
/// * `seeds` - one seed per run, at least one
///
/// # Returns
/// * the best result, or an error if `seeds` is empty or the configuration is invalid
///
/// # Examples
/// ```
///use kmeans::{Initialisation, KMeansHyperParams};
///use kmeans::restarts;
///
///let data: Vec<Vec<f64>> = vec![
///    vec![0.0, 0.0],
///    vec![0.1, 0.1],
///    vec![5.0, 5.0],
///    vec![5.1, 5.1],
///];
///let hyper_params = KMeansHyperParams::builder()
///    .n_clusters(2)
///    .init(Initialisation::Random { seed: 0 })
///    .build();
///let result = restarts::best_of(&data, &hyper_params, &[1, 2, 3]).unwrap();
///assert!(result.converged());
/// ```
pub fn best_of<T: Float>(
    data: &[Vec<T>],
    hyper_params: &KMeansHyperParams,
    seeds: &[u64],
) -> Result<KMeansResult<T>, ConfigurationError> {
    check_restarts(hyper_params, seeds)?;
    let results = seeds
        .iter()
        .map(|&seed| run_seeded(data, hyper_params, seed))
        .collect::<Result<Vec<_>, _>>()?;
    select_best(results)
}

/// Parallel version of [`best_of`]. Returns exactly the same result.
#[cfg(feature = "parallel")]
pub fn best_of_par<T: Float + Send + Sync>(
    data: &[Vec<T>],
    hyper_params: &KMeansHyperParams,
    seeds: &[u64],
) -> Result<KMeansResult<T>, ConfigurationError> {
    check_restarts(hyper_params, seeds)?;
    let results = seeds
        .par_iter()
        .map(|&seed| run_seeded(data, hyper_params, seed))
        .collect::<Result<Vec<_>, _>>()?;
    select_best(results)
}

fn check_restarts(hyper_params: &KMeansHyperParams, seeds: &[u64])
    -> Result<(), ConfigurationError> {
    if seeds.is_empty() {
        return Err(ConfigurationError::NoRestartSeeds);
    }
    if hyper_params.init == Initialisation::FirstK && seeds.len() > 1 {
        warn!("FirstK initialisation ignores seeds, every restart will give the same result");
    }
    Ok(())
}

fn run_seeded<T: Float>(data: &[Vec<T>], hyper_params: &KMeansHyperParams, seed: u64)
    -> Result<KMeansResult<T>, ConfigurationError> {
    let result = KMeans::new(data, hyper_params.reseeded(seed))?.run();
    debug!(seed, distortion = result.distortion.to_f64(), "Finished K-means restart");
    Ok(result)
}

fn select_best<T: Float>(results: Vec<KMeansResult<T>>)
    -> Result<KMeansResult<T>, ConfigurationError> {
    results
        .into_iter()
        .reduce(|best, result| if result.distortion < best.distortion { result } else { best })
        .ok_or(ConfigurationError::NoRestartSeeds)
}
