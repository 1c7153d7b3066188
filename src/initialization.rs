use std::rc::Rc;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cluster::{Cluster, Record};
use crate::error::Result;
use crate::vector::Vector;

/// Seeds the initial cluster set for fixed-count training.
///
/// Shuffles the records into a random permutation, keeps only the first
/// occurrence of each distinct feature vector, and turns the first
/// `clusters_number` of those into singleton clusters with ids `0..k-1`.
///
/// When fewer distinct feature vectors exist than requested, the result is
/// silently smaller than `clusters_number`.
pub(crate) fn initialize_clusters<T, R: Rng>(
    records: &[Rc<Record<T>>],
    clusters_number: usize,
    rng: &mut R,
) -> Result<Vec<Cluster<T>>> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.shuffle(rng);

    let clusters = order
        .into_iter()
        .map(|i| &records[i])
        .unique_by(|record| feature_key(record.features()))
        .take(clusters_number)
        .enumerate()
        .map(|(id, record)| Cluster::new(id, vec![Rc::clone(record)]))
        .collect::<Result<Vec<_>>>()?;

    log::info!("initialized {} seed clusters", clusters.len());
    Ok(clusters)
}

// Bit-pattern key so feature vectors can be deduplicated through a hash set.
fn feature_key(features: &Vector) -> Vec<u64> {
    features.values().iter().map(|x| x.to_bits()).collect()
}
