use std::fmt;
use std::rc::Rc;

use crate::deviation::DeviationModel;
use crate::error::Result;
use crate::vector::Vector;

/// A domain element paired with its feature vector.
///
/// Features are extracted once, when the record enters a model, and cached
/// here. Membership comparisons during clustering use the record's identity
/// (its `Rc` allocation), never its feature value, so two elements with
/// identical features stay distinct.
pub struct Record<T> {
    element: T,
    features: Vector,
}

impl<T> Record<T> {
    pub(crate) fn new(element: T, features: Vector) -> Self {
        Self { element, features }
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn features(&self) -> &Vector {
        &self.features
    }
}

/// An identified, immutable group of records with its own deviation
/// statistics.
///
/// Ids are dense and sequential within one generation of clusters, but a
/// re-clustering pass renumbers, so they are not stable across generations.
/// "Updating" a cluster means constructing a new one.
pub struct Cluster<T> {
    id: usize,
    records: Vec<Rc<Record<T>>>,
    deviation: Option<DeviationModel<T>>,
}

impl<T> Cluster<T> {
    /// Builds a cluster over `records`. An empty record set is tolerated
    /// transiently during training; such a cluster has no deviation model and
    /// no centroid.
    pub(crate) fn new(id: usize, records: Vec<Rc<Record<T>>>) -> Result<Self> {
        let deviation = if records.is_empty() {
            None
        } else {
            Some(DeviationModel::from_records(records.clone())?)
        };

        Ok(Self {
            id,
            records,
            deviation,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn records(&self) -> &[Rc<Record<T>>] {
        &self.records
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Deviation statistics over this cluster's own records, if any.
    pub fn deviation(&self) -> Option<&DeviationModel<T>> {
        self.deviation.as_ref()
    }

    /// The mean feature vector of this cluster's records.
    pub fn centroid(&self) -> Option<&Vector> {
        self.deviation.as_ref().and_then(|d| d.mean())
    }
}

impl<T> Clone for Cluster<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            records: self.records.clone(),
            deviation: self.deviation.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("element", &self.element)
            .field("features", &self.features)
            .finish()
    }
}

impl<T> fmt::Debug for Cluster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("id", &self.id)
            .field("records", &self.records.len())
            .field("centroid", &self.centroid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(point: Vec<f64>) -> Rc<Record<&'static str>> {
        Rc::new(Record::new("point", Vector::new(point)))
    }

    #[test]
    fn centroid_is_the_deviation_mean() {
        let cluster =
            Cluster::new(0, vec![record(vec![0.0, 0.0]), record(vec![4.0, 6.0])]).unwrap();

        assert_eq!(cluster.id(), 0);
        assert!(cluster.has_records());
        assert_eq!(cluster.centroid(), Some(&Vector::new(vec![2.0, 3.0])));
        assert_eq!(
            cluster.centroid(),
            cluster.deviation().unwrap().mean(),
        );
    }

    #[test]
    fn empty_cluster_has_no_centroid() {
        let cluster = Cluster::<&str>::new(3, Vec::new()).unwrap();
        assert!(!cluster.has_records());
        assert!(cluster.deviation().is_none());
        assert!(cluster.centroid().is_none());
    }

    #[test]
    fn records_with_equal_features_stay_distinct() {
        let a = record(vec![1.0, 1.0]);
        let b = record(vec![1.0, 1.0]);
        let cluster = Cluster::new(0, vec![Rc::clone(&a), Rc::clone(&b)]).unwrap();

        assert_eq!(cluster.records().len(), 2);
        assert!(Rc::ptr_eq(&cluster.records()[0], &a));
        assert!(Rc::ptr_eq(&cluster.records()[1], &b));
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
