use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithm::{assign_to_nearest, train_auto, train_to_convergence};
use crate::cluster::{Cluster, Record};
use crate::error::{ClusteringError, Result};
use crate::initialization::initialize_clusters;
use crate::vector::Vector;

/// Threshold used by [`AutoClusteringModel::train_with_defaults`]: the
/// one-sided 95% z-score.
pub const DEFAULT_MAX_STANDARD_SCORE: f64 = 1.645;

/// The caller-supplied feature extractor, fixed for a model's lifetime.
pub type FeatureExtractor<T> = Rc<dyn Fn(&T) -> Vector>;

/// The surface shared by both model variants: inspecting clusters and
/// records, and routing a single element to its nearest centroid.
pub trait ClusterModel<T> {
    fn clusters(&self) -> &[Cluster<T>];

    fn records(&self) -> &[Rc<Record<T>>];

    /// Extracts the features of `element` with this model's extractor.
    fn features_of(&self, element: &T) -> Vector;

    fn is_trained(&self) -> bool {
        !self.clusters().is_empty()
    }

    /// Routes `element` to the cluster with the nearest centroid, without
    /// adding it to the model's history.
    fn assign(&self, element: &T) -> Result<&Cluster<T>> {
        if self.clusters().is_empty() {
            return Err(ClusteringError::NotTrained);
        }

        assign_to_nearest(self.clusters(), &self.features_of(element))
    }

    /// The clustered elements, cluster by cluster.
    fn element_groups(&self) -> Vec<Vec<&T>> {
        self.clusters()
            .iter()
            .map(|cluster| cluster.records().iter().map(|r| r.element()).collect())
            .collect()
    }

    /// The clustered elements with clusters ordered by their mean sort key
    /// and elements within each cluster ordered by key.
    fn element_groups_sorted_by<F>(&self, sort_key: F) -> Vec<Vec<&T>>
    where
        F: Fn(&T) -> f64,
        Self: Sized,
    {
        let mut groups: Vec<(f64, Vec<&T>)> = self
            .clusters()
            .iter()
            .filter(|cluster| cluster.has_records())
            .map(|cluster| {
                let mut elements: Vec<&T> =
                    cluster.records().iter().map(|r| r.element()).collect();
                elements.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));

                let total: f64 = cluster.records().iter().map(|r| sort_key(r.element())).sum();
                (total / cluster.records().len() as f64, elements)
            })
            .collect();

        groups.sort_by(|a, b| a.0.total_cmp(&b.0));
        groups.into_iter().map(|(_, elements)| elements).collect()
    }
}

/// Clustering model with a caller-fixed target cluster count.
///
/// The model is an immutable snapshot: [`train`](Self::train) returns a new
/// instance layering the new records onto this one, and the original stays
/// valid. Note that the target count is a ceiling, not a guarantee: a
/// re-clustering pass drops clusters that receive no records, and seeding
/// shrinks silently when fewer distinct feature vectors exist than requested.
pub struct ClusteringModel<T> {
    features_of: FeatureExtractor<T>,
    clusters: Vec<Cluster<T>>,
    records: Vec<Rc<Record<T>>>,
    clusters_number: usize,
    random_state: Option<u64>,
}

impl<T> ClusteringModel<T> {
    /// Creates an empty model with a fixed target cluster count.
    pub fn from_number<F>(features_of: F, clusters_number: usize) -> Result<Self>
    where
        F: Fn(&T) -> Vector + 'static,
    {
        if clusters_number == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "the number of clusters must be positive",
            ));
        }

        Ok(Self {
            features_of: Rc::new(features_of),
            clusters: Vec::new(),
            records: Vec::new(),
            clusters_number,
            random_state: None,
        })
    }

    /// Fixes the seed of the random source used for cluster initialization,
    /// making training reproducible.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn clusters_number(&self) -> usize {
        self.clusters_number
    }

    /// Extracts features for every element of `source`, appends them to the
    /// history, and re-runs the convergence loop from the current clusters
    /// (seeding fresh clusters on the first call). Returns the new snapshot.
    pub fn train<I>(&self, source: I, max_iterations: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let records = merge_records(&self.records, self.features_of.as_ref(), source);
        if records.is_empty() {
            return Err(ClusteringError::EmptyInput(
                "training requires at least one record",
            ));
        }

        let initial = if self.clusters.is_empty() {
            let mut rng = match self.random_state {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            initialize_clusters(&records, self.clusters_number, &mut rng)?
        } else {
            self.clusters.clone()
        };

        let clusters = train_to_convergence(initial, &records, max_iterations)?;

        Ok(Self {
            features_of: Rc::clone(&self.features_of),
            clusters,
            records,
            clusters_number: self.clusters_number,
            random_state: self.random_state,
        })
    }
}

impl<T> ClusterModel<T> for ClusteringModel<T> {
    fn clusters(&self) -> &[Cluster<T>] {
        &self.clusters
    }

    fn records(&self) -> &[Rc<Record<T>>] {
        &self.records
    }

    fn features_of(&self, element: &T) -> Vector {
        (self.features_of.as_ref())(element)
    }
}

/// Clustering model that discovers its cluster count by splitting off the
/// most statistically extreme record until every cluster's worst standard
/// score falls below a threshold.
///
/// Immutable snapshot semantics as for [`ClusteringModel`].
pub struct AutoClusteringModel<T> {
    features_of: FeatureExtractor<T>,
    clusters: Vec<Cluster<T>>,
    records: Vec<Rc<Record<T>>>,
}

impl<T> AutoClusteringModel<T> {
    /// Creates an empty model in which the cluster count is discovered
    /// automatically at training time.
    pub fn auto<F>(features_of: F) -> Self
    where
        F: Fn(&T) -> Vector + 'static,
    {
        Self {
            features_of: Rc::new(features_of),
            clusters: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Extracts features for every element of `source`, appends them to the
    /// history, and runs the auto-discovery loop from the current clusters.
    /// On the first call the loop is bootstrapped with a single cluster
    /// holding the first record.
    ///
    /// The cluster count never exceeds
    /// `min(max_clusters_number, records.len())`.
    pub fn train<I>(
        &self,
        source: I,
        max_clusters_number: Option<usize>,
        max_standard_score: f64,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let records = merge_records(&self.records, self.features_of.as_ref(), source);
        if records.is_empty() {
            return Err(ClusteringError::EmptyInput(
                "training requires at least one record",
            ));
        }

        let initial = if self.clusters.is_empty() {
            vec![Cluster::new(0, vec![Rc::clone(&records[0])])?]
        } else {
            self.clusters.clone()
        };

        let clusters = train_auto(initial, &records, max_clusters_number, max_standard_score)?;

        Ok(Self {
            features_of: Rc::clone(&self.features_of),
            clusters,
            records,
        })
    }

    /// [`train`](Self::train) with no cluster cap and
    /// [`DEFAULT_MAX_STANDARD_SCORE`] as the threshold.
    pub fn train_with_defaults<I>(&self, source: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        self.train(source, None, DEFAULT_MAX_STANDARD_SCORE)
    }
}

impl<T> ClusterModel<T> for AutoClusteringModel<T> {
    fn clusters(&self) -> &[Cluster<T>] {
        &self.clusters
    }

    fn records(&self) -> &[Rc<Record<T>>] {
        &self.records
    }

    fn features_of(&self, element: &T) -> Vector {
        (self.features_of.as_ref())(element)
    }
}

fn merge_records<T, I>(
    history: &[Rc<Record<T>>],
    features_of: &dyn Fn(&T) -> Vector,
    source: I,
) -> Vec<Rc<Record<T>>>
where
    I: IntoIterator<Item = T>,
{
    let mut records = history.to_vec();
    records.extend(source.into_iter().map(|element| {
        let features = features_of(&element);
        Rc::new(Record::new(element, features))
    }));
    records
}
