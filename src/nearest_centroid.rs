use crate::distance::Distance;
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

// Above this many clusters Auto switches from brute force to a k-d tree
const BRUTE_FORCE_N_CLUSTERS_LIMIT: usize = 64;

/// The nearest centroid algorithm options. Whichever is chosen, a point that is equally
/// distant from several centroids is assigned to the one with the lowest index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NnAlgorithm {
    /// K-means internally selects the algorithm based on the number of clusters
    /// and the distance metric
    Auto,
    /// Computes the distance between each point and every centroid
    BruteForce,
    /// K-dimensional tree over the centroids, rebuilt every iteration. Only usable with
    /// the built in distance metrics; custom distance functions fall back to brute force.
    KdTree,
}

/// Runs the assignment step: labels every data point with the index of its nearest
/// centroid.
pub(crate) struct NearestCentroid<'a, T, D> {
    data: &'a [Vec<T>],
    distance: &'a D,
    use_kd_tree: bool,
}

impl<'a, T: Float, D: Distance<T>> NearestCentroid<'a, T, D> {
    pub(crate) fn new(
        data: &'a [Vec<T>],
        distance: &'a D,
        nn_algo: &NnAlgorithm,
        n_clusters: usize,
    ) -> Self {
        let use_kd_tree = match nn_algo {
            NnAlgorithm::BruteForce => false,
            NnAlgorithm::Auto => {
                n_clusters > BRUTE_FORCE_N_CLUSTERS_LIMIT && distance.supports_spatial_index()
            }
            NnAlgorithm::KdTree if distance.supports_spatial_index() => true,
            NnAlgorithm::KdTree => {
                warn!("KdTree nearest centroid search does not support a custom distance \
                    function, falling back to brute force");
                false
            }
        };
        Self { data, distance, use_kd_tree }
    }

    pub(crate) fn assign(&self, centroids: &[Vec<T>]) -> Vec<usize> {
        if self.use_kd_tree {
            if let Some(assignment) = KdTree::assign(self.data, centroids, self.distance) {
                return assignment;
            }
            warn!("Failed to build KdTree over centroids, falling back to brute force");
        }
        BruteForce::assign(self.data, centroids, self.distance)
    }
}

pub(crate) struct BruteForce;

impl BruteForce {
    pub(crate) fn assign<T, D>(data: &[Vec<T>], centroids: &[Vec<T>], distance: &D) -> Vec<usize>
    where
        T: Float,
        D: Distance<T>,
    {
        data.iter()
            .map(|datapoint| nearest_index(datapoint, centroids, distance))
            .collect()
    }
}

/// The index of the centroid closest to `point`. Scans in index order and only moves on
/// for a strictly smaller distance, so ties keep the lowest index.
pub(crate) fn nearest_index<T, D>(point: &[T], centroids: &[Vec<T>], distance: &D) -> usize
where
    T: Float,
    D: Distance<T>,
{
    let mut min_dist = T::infinity();
    let mut nearest = 0;
    for (j, centroid) in centroids.iter().enumerate() {
        let dist = distance.distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = j;
        }
    }
    nearest
}

pub(crate) struct KdTree;

impl KdTree {
    /// Returns `None` if the tree could not be built or queried.
    fn assign<T, D>(data: &[Vec<T>], centroids: &[Vec<T>], distance: &D) -> Option<Vec<usize>>
    where
        T: Float,
        D: Distance<T>,
    {
        let n_dims = centroids.first()?.len();
        let mut tree: kdtree::KdTree<T, usize, &Vec<T>> = kdtree::KdTree::new(n_dims);
        for (j, centroid) in centroids.iter().enumerate() {
            tree.add(centroid, j).ok()?;
        }
        let dist_func = |a: &[T], b: &[T]| distance.distance(a, b);
        data.iter()
            .map(|datapoint| Self::nearest_lowest_index(&tree, datapoint, centroids.len(), &dist_func))
            .collect()
    }

    /// The tree returns equidistant centroids in no particular order, so widen the query
    /// until it contains a centroid strictly further away than the nearest. At that point
    /// every centroid tied for nearest is in the result.
    fn nearest_lowest_index<T, F>(
        tree: &kdtree::KdTree<T, usize, &Vec<T>>,
        point: &[T],
        n_clusters: usize,
        dist_func: &F,
    ) -> Option<usize>
    where
        T: Float,
        F: Fn(&[T], &[T]) -> T,
    {
        let mut num = 2.min(n_clusters);
        loop {
            let result = tree.nearest(point, num, dist_func).ok()?;
            let min_dist = result.first()?.0;
            let tied = result.iter().take_while(|(dist, _)| *dist <= min_dist).count();
            if tied < result.len() || num == n_clusters {
                return result[..tied].iter().map(|&(_, &j)| j).min();
            }
            num = (num * 2).min(n_clusters);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DistanceMetric;

    fn grid_centroids() -> Vec<Vec<f64>> {
        (0..100)
            .map(|n| vec![(n % 10) as f64, (n / 10) as f64])
            .collect()
    }

    #[test]
    fn brute_force_assigns_nearest() {
        let data = vec![vec![0.1, 0.0], vec![9.0, 1.0], vec![4.0, 0.2]];
        let centroids = vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![5.0, 0.0]];
        let assignment = BruteForce::assign(&data, &centroids, &DistanceMetric::Euclidean);
        assert_eq!(vec![0, 1, 2], assignment);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let data = vec![vec![5.0, 0.0]];
        let centroids = vec![vec![10.0, 0.0], vec![0.0, 0.0], vec![5.0, 5.0]];
        let assignment = BruteForce::assign(&data, &centroids, &DistanceMetric::Euclidean);
        assert_eq!(vec![0], assignment);
    }

    #[test]
    fn kd_tree_matches_brute_force() {
        let centroids = grid_centroids();
        let data: Vec<Vec<f64>> = (0..200)
            .map(|n| vec![(n as f64 * 0.37) % 10.0, (n as f64 * 0.61) % 10.0])
            .collect();
        for metric in [
            DistanceMetric::Euclidean,
            DistanceMetric::SquaredEuclidean,
            DistanceMetric::Manhattan,
            DistanceMetric::Chebyshev,
        ] {
            let brute = BruteForce::assign(&data, &centroids, &metric);
            let tree = KdTree::assign(&data, &centroids, &metric).unwrap();
            assert_eq!(brute, tree, "{metric:?}");
        }
    }

    #[test]
    fn kd_tree_ties_go_to_lowest_index() {
        // Halfway points sit exactly between grid centroids
        let centroids = grid_centroids();
        let data = vec![vec![4.5, 4.5], vec![0.5, 0.0], vec![9.0, 8.5]];
        let assignment = KdTree::assign(&data, &centroids, &DistanceMetric::Euclidean).unwrap();
        assert_eq!(vec![44, 0, 89], assignment);
    }

    #[test]
    fn custom_distance_falls_back_to_brute_force() {
        let data = vec![vec![0.0_f64, 0.0]];
        let dist = |a: &[f64], b: &[f64]| (a[0] - b[0]).abs();
        let nc = NearestCentroid::new(&data, &dist, &NnAlgorithm::KdTree, 100);
        assert!(!nc.use_kd_tree);
    }

    #[test]
    fn auto_selects_by_cluster_count() {
        let data = vec![vec![0.0_f64, 0.0]];
        let metric = DistanceMetric::Euclidean;
        assert!(!NearestCentroid::new(&data, &metric, &NnAlgorithm::Auto, 8).use_kd_tree);
        assert!(NearestCentroid::new(&data, &metric, &NnAlgorithm::Auto, 100).use_kd_tree);
    }
}
