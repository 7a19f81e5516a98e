#![cfg(feature = "parallel")]
use kmeans::restarts;
use kmeans::{ConfigurationError, Initialisation, KMeansHyperParams};

fn data() -> Vec<Vec<f64>> {
    (0..300)
        .map(|n| {
            let n = n as f64;
            vec![(n * 7.31) % 30.0, (n * 3.17) % 30.0]
        })
        .collect()
}

#[test]
fn parallel_matches_serial() {
    let data = data();
    let hyper_params = KMeansHyperParams::builder()
        .n_clusters(6)
        .init(Initialisation::PlusPlus { seed: 0 })
        .build();
    let seeds: Vec<u64> = (0..16).collect();
    let serial = restarts::best_of(&data, &hyper_params, &seeds).unwrap();
    let parallel = restarts::best_of_par(&data, &hyper_params, &seeds).unwrap();
    assert_eq!(serial, parallel);
}

#[test]
fn parallel_no_seeds() {
    let data = data();
    let hyper_params = KMeansHyperParams::builder().n_clusters(2).build();
    let result = restarts::best_of_par(&data, &hyper_params, &[]);
    assert!(matches!(result, Err(ConfigurationError::NoRestartSeeds)));
}
