use std::collections::BTreeMap;
use std::rc::Rc;

use crate::cluster::{Cluster, Record};
use crate::error::{ClusteringError, Result};
use crate::vector::Vector;

/// Returns the cluster whose centroid is nearest to `features`.
///
/// Clusters are scanned in ascending-id order and the first cluster at the
/// minimum distance wins ties, so assignment is deterministic and
/// order-stable. Clusters without records (and therefore without a centroid)
/// are skipped.
pub(crate) fn assign_to_nearest<'a, T>(
    clusters: &'a [Cluster<T>],
    features: &Vector,
) -> Result<&'a Cluster<T>> {
    let mut nearest: Option<(&Cluster<T>, f64)> = None;

    for cluster in clusters {
        let centroid = match cluster.centroid() {
            Some(centroid) => centroid,
            None => continue,
        };
        let distance = centroid.distance(features)?;
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((cluster, distance)),
        }
    }

    nearest
        .map(|(cluster, _)| cluster)
        .ok_or(ClusteringError::NotTrained)
}

/// One Lloyd step: reassigns every record to its nearest cluster, drops
/// clusters that receive no records, and renumbers the survivors densely in
/// their original id order.
///
/// The cluster count can shrink here; it never grows.
pub(crate) fn recluster_once<T>(
    clusters: &[Cluster<T>],
    records: &[Rc<Record<T>>],
) -> Result<Vec<Cluster<T>>> {
    let mut groups: BTreeMap<usize, Vec<Rc<Record<T>>>> = BTreeMap::new();

    for record in records {
        let nearest = assign_to_nearest(clusters, record.features())?;
        groups
            .entry(nearest.id())
            .or_default()
            .push(Rc::clone(record));
    }

    groups
        .into_values()
        .enumerate()
        .map(|(id, members)| Cluster::new(id, members))
        .collect()
}

/// Structural equality of two cluster generations: same count, and at each
/// position the same records by identity, in the same order.
pub(crate) fn clusters_equal<T>(a: &[Cluster<T>], b: &[Cluster<T>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| cluster_equal(x, y))
}

fn cluster_equal<T>(a: &Cluster<T>, b: &Cluster<T>) -> bool {
    a.records().len() == b.records().len()
        && a.records()
            .iter()
            .zip(b.records())
            .all(|(x, y)| Rc::ptr_eq(x, y))
}

/// Applies [`recluster_once`] until a fixed point, or until `max_iterations`
/// passes have been applied if a cap is given.
///
/// Termination without a cap is guaranteed: a finite record set has finitely
/// many partitions, and the fixed-point check compares against the previous
/// state every pass.
pub(crate) fn train_to_convergence<T>(
    clusters: Vec<Cluster<T>>,
    records: &[Rc<Record<T>>],
    max_iterations: Option<usize>,
) -> Result<Vec<Cluster<T>>> {
    let mut current = clusters;
    let mut passes = 0usize;

    while max_iterations.map_or(true, |max| passes < max) {
        let next = recluster_once(&current, records)?;
        passes += 1;

        if passes % 10 == 0 {
            log::info!("finished re-clustering pass {}", passes);
        }

        if clusters_equal(&current, &next) {
            log::info!("converged after {} passes", passes);
            return Ok(current);
        }

        current = next;
    }

    Ok(current)
}

/// Grows the cluster set by repeatedly splitting off the most statistically
/// extreme record until every cluster's worst standard score is at most
/// `max_standard_score`, or the cluster count reaches
/// `min(max_clusters_number, records.len())`.
pub(crate) fn train_auto<T>(
    clusters: Vec<Cluster<T>>,
    records: &[Rc<Record<T>>],
    max_clusters_number: Option<usize>,
    max_standard_score: f64,
) -> Result<Vec<Cluster<T>>> {
    let cap = max_clusters_number.map_or(records.len(), |max| max.min(records.len()));
    let mut current = clusters;

    loop {
        current = train_to_convergence(current, records, None)?;
        if current.len() >= cap {
            return Ok(current);
        }

        let (farthest, score) = match farthest_record(&current) {
            Some(found) => found,
            None => return Ok(current),
        };
        if score <= max_standard_score {
            return Ok(current);
        }

        log::info!(
            "splitting off record with standard score {:.3} into cluster {}",
            score,
            current.len()
        );
        current = split_off(&current, &farthest)?;
    }
}

/// The record with the maximum standard score relative to its own cluster.
/// The first record encountered (cluster-id order, then within-cluster record
/// order) wins ties.
fn farthest_record<T>(clusters: &[Cluster<T>]) -> Option<(Rc<Record<T>>, f64)> {
    let mut farthest: Option<(Rc<Record<T>>, f64)> = None;

    for cluster in clusters {
        let deviation = match cluster.deviation() {
            Some(deviation) => deviation,
            None => continue,
        };
        for record in deviation.records() {
            match &farthest {
                Some((_, best)) if record.standard_score() <= *best => {}
                _ => farthest = Some((Rc::clone(record.record()), record.standard_score())),
            }
        }
    }

    farthest
}

/// Removes `target` from its current cluster (dropping the cluster entirely
/// if it becomes empty) and appends a new singleton cluster for it, with id
/// equal to the pre-split cluster count.
fn split_off<T>(clusters: &[Cluster<T>], target: &Rc<Record<T>>) -> Result<Vec<Cluster<T>>> {
    let pre_split_count = clusters.len();
    let mut next = Vec::with_capacity(pre_split_count + 1);

    for cluster in clusters {
        let remaining: Vec<Rc<Record<T>>> = cluster
            .records()
            .iter()
            .filter(|record| !Rc::ptr_eq(record, target))
            .map(Rc::clone)
            .collect();
        if remaining.is_empty() {
            continue;
        }
        next.push(Cluster::new(cluster.id(), remaining)?);
    }

    next.push(Cluster::new(pre_split_count, vec![Rc::clone(target)])?);
    Ok(next)
}
