//! Incremental k-means clustering with deviation-driven automatic
//! cluster-count discovery.
//!
//! Elements of any domain type are mapped to fixed-dimension feature vectors
//! by a caller-supplied extractor and grouped by iterative nearest-centroid
//! assignment (a Lloyd's-algorithm variant). The cluster count is either
//! fixed by the caller ([`ClusteringModel`]) or discovered automatically by
//! repeatedly splitting off the most statistically extreme record until
//! every cluster's worst standard score falls below a threshold
//! ([`AutoClusteringModel`]).
//!
//! Models are immutable snapshots: every `train` call returns a new model
//! layering the new records onto the previous history, and the original
//! instance stays valid. Each cluster carries a [`DeviationModel`] over its
//! own records, which doubles as the outlier report (per-record deviation
//! and standard score) and as the splitting criterion for auto-discovery.
//!
//! ```
//! use kmeans_incremental_autosplit::{AutoClusteringModel, ClusterModel, Vector};
//!
//! let points = vec![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
//! let model = AutoClusteringModel::auto(|p: &[f64; 2]| Vector::new(p.to_vec()))
//!     .train(points, None, 1.0)
//!     .unwrap();
//!
//! assert_eq!(model.clusters().len(), 2);
//! let cluster = model.assign(&[9.0, 9.0]).unwrap();
//! assert_eq!(cluster.records().len(), 2);
//! ```

mod algorithm;
mod cluster;
mod deviation;
mod error;
mod initialization;
mod model;
mod vector;

pub use cluster::{Cluster, Record};
pub use deviation::{DeviationModel, DeviationRecord};
pub use error::{ClusteringError, Result};
pub use model::{
    AutoClusteringModel, ClusterModel, ClusteringModel, FeatureExtractor,
    DEFAULT_MAX_STANDARD_SCORE,
};
pub use vector::Vector;
