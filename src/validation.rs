use crate::{ConfigurationError, KMeansHyperParams};
use num_traits::Float;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DataValidator<'a, T> {
    data: &'a [Vec<T>],
    hp: &'a KMeansHyperParams,
}

impl<'a, T: Float> DataValidator<'a, T> {
    pub(crate) fn new(data: &'a [Vec<T>], hp: &'a KMeansHyperParams) -> Self {
        Self { data, hp }
    }

    pub(crate) fn validate_input_data(&self) -> Result<(), ConfigurationError> {
        if self.data.is_empty() {
            return Err(ConfigurationError::EmptyDataset);
        }
        let dims_0th = self.data[0].len();
        if dims_0th == 0 {
            return Err(ConfigurationError::ZeroDimensions);
        }
        for (n, datapoint) in self.data.iter().enumerate() {
            if datapoint.iter().any(|element| !element.is_finite()) {
                return Err(ConfigurationError::NonFiniteCoordinate(format!(
                    "{n}th vector contains non-finite element(s)"
                )));
            }
            let dims_nth = datapoint.len();
            if dims_nth != dims_0th {
                return Err(ConfigurationError::WrongDimension(format!(
                    "0th data point has {dims_0th} dimensions, but {n}th has {dims_nth}"
                )));
            }
        }
        self.validate_spans(dims_0th)?;
        self.validate_hyper_params()
    }

    /// Differences between any two points in a dimension must be finite, so that every
    /// distance and every mean of the data is.
    fn validate_spans(&self, n_dims: usize) -> Result<(), ConfigurationError> {
        for dim in 0..n_dims {
            let (min, max) = self.data.iter()
                .map(|datapoint| datapoint[dim])
                .fold((T::infinity(), T::neg_infinity()), |(min, max), element| {
                    (min.min(element), max.max(element))
                });
            if !(max - min).is_finite() {
                return Err(ConfigurationError::NonFiniteCoordinate(format!(
                    "coordinates in dimension {dim} span more than the largest finite value"
                )));
            }
        }
        Ok(())
    }

    fn validate_hyper_params(&self) -> Result<(), ConfigurationError> {
        let k = self.hp.n_clusters;
        let n_samples = self.data.len();
        if k < 1 {
            return Err(ConfigurationError::InvalidClusterCount(String::from(
                "at least one cluster is required",
            )));
        }
        if k > n_samples {
            return Err(ConfigurationError::InvalidClusterCount(format!(
                "{k} clusters requested but there are only {n_samples} data points"
            )));
        }
        if self.hp.max_iter < 1 {
            return Err(ConfigurationError::InvalidMaxIterations);
        }
        Ok(())
    }

    /// Expects `validate_input_data` to have passed.
    pub(crate) fn validate_initial_centroids(&self, centroids: &[Vec<T>])
        -> Result<(), ConfigurationError> {
        let k = self.hp.n_clusters;
        if centroids.len() != k {
            return Err(ConfigurationError::InvalidClusterCount(format!(
                "{k} clusters requested but {} initial centroids were given",
                centroids.len()
            )));
        }
        validate_centroids(centroids, self.data[0].len())
    }
}

/// At least one centroid, each with `n_dims` finite coordinates.
pub(crate) fn validate_centroids<T: Float>(centroids: &[Vec<T>], n_dims: usize)
    -> Result<(), ConfigurationError> {
    if centroids.is_empty() {
        return Err(ConfigurationError::InvalidClusterCount(String::from(
            "at least one centroid is required",
        )));
    }
    if n_dims == 0 {
        return Err(ConfigurationError::ZeroDimensions);
    }
    for (j, centroid) in centroids.iter().enumerate() {
        if centroid.len() != n_dims {
            return Err(ConfigurationError::WrongDimension(format!(
                "data points have {n_dims} dimensions, but {j}th centroid has {}",
                centroid.len()
            )));
        }
        if centroid.iter().any(|element| !element.is_finite()) {
            return Err(ConfigurationError::NonFiniteCoordinate(format!(
                "{j}th centroid contains non-finite element(s)"
            )));
        }
    }
    Ok(())
}

/// Points to label against centroids with `n_dims` coordinates.
pub(crate) fn validate_points<T: Float>(points: &[Vec<T>], n_dims: usize)
    -> Result<(), ConfigurationError> {
    for (n, point) in points.iter().enumerate() {
        if point.len() != n_dims {
            return Err(ConfigurationError::WrongDimension(format!(
                "centroids have {n_dims} dimensions, but {n}th point has {}",
                point.len()
            )));
        }
        if point.iter().any(|element| !element.is_finite()) {
            return Err(ConfigurationError::NonFiniteCoordinate(format!(
                "{n}th point contains non-finite element(s)"
            )));
        }
    }
    Ok(())
}

/// One label per data point, each naming one of `n_clusters` centroids.
pub(crate) fn validate_assignment(assignment: &[usize], n_samples: usize, n_clusters: usize)
    -> Result<(), ConfigurationError> {
    if assignment.len() != n_samples {
        return Err(ConfigurationError::InvalidAssignment(format!(
            "{} labels given for {n_samples} data points",
            assignment.len()
        )));
    }
    let out_of_range = assignment.iter()
        .enumerate()
        .find(|&(_, &label)| label >= n_clusters);
    if let Some((n, label)) = out_of_range {
        return Err(ConfigurationError::InvalidAssignment(format!(
            "{n}th data point is labelled {label} but there are only {n_clusters} centroids"
        )));
    }
    Ok(())
}
