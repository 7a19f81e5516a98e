use num_traits::Float;

/// The output of one update step.
pub(crate) struct CentroidUpdate<T> {
    pub(crate) centroids: Vec<Vec<T>>,
    pub(crate) cluster_sizes: Vec<usize>,
}

impl<T> CentroidUpdate<T> {
    pub(crate) fn n_empty(&self) -> usize {
        self.cluster_sizes.iter().filter(|&&size| size == 0).count()
    }
}

/// Moves every centroid to the elementwise mean of the data points assigned to it.
/// The output is not guaranteed to be an observed data point.
///
/// A centroid with no assigned points keeps the exact coordinates it had in `previous`.
pub(crate) fn update_centroids<T: Float>(
    data: &[Vec<T>],
    assignment: &[usize],
    previous: &[Vec<T>],
) -> CentroidUpdate<T> {
    assert_eq!(data.len(), assignment.len());
    let n_clusters = previous.len();

    // Running means stay inside the span of the members, so they cannot overflow
    let mut centroids = previous.to_vec();
    let mut cluster_sizes = vec![0_usize; n_clusters];
    for (datapoint, &cluster_id) in data.iter().zip(assignment) {
        cluster_sizes[cluster_id] += 1;
        let centroid = &mut centroids[cluster_id];
        if cluster_sizes[cluster_id] == 1 {
            centroid.copy_from_slice(datapoint);
            continue;
        }
        // Counts always fit in a float, if imprecisely
        let count = T::from(cluster_sizes[cluster_id]).unwrap_or_else(T::max_value);
        for (mean, &element) in centroid.iter_mut().zip(datapoint) {
            *mean = *mean + (element - *mean) / count;
        }
    }

    CentroidUpdate { centroids, cluster_sizes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_of_members() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ];
        let previous = vec![vec![0.0, 0.0], vec![10.0, 0.0]];
        let update = update_centroids(&data, &[0, 0, 1, 1], &previous);
        assert_eq!(vec![vec![0.0, 0.5], vec![10.0, 0.5]], update.centroids);
        assert_eq!(vec![2, 2], update.cluster_sizes);
        assert_eq!(0, update.n_empty());
    }

    #[test]
    fn empty_cluster_is_frozen() {
        let data = vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]];
        let previous = vec![vec![2.0, 3.0], vec![-7.25, 100.125]];
        let update = update_centroids(&data, &[0, 0], &previous);
        assert_eq!(vec![2.0, 3.0], update.centroids[0]);
        assert_eq!(vec![-7.25, 100.125], update.centroids[1]);
        assert_eq!(vec![2, 0], update.cluster_sizes);
        assert_eq!(1, update.n_empty());
    }

    #[test]
    fn mean_of_huge_coordinates_is_finite() {
        let data = vec![vec![f64::MAX], vec![f64::MAX], vec![f64::MAX / 2.0]];
        let previous = vec![vec![0.0]];
        let update = update_centroids(&data, &[0, 0, 0], &previous);
        assert!(update.centroids[0][0].is_finite());
        assert!(update.centroids[0][0] > f64::MAX / 2.0);
    }
}
