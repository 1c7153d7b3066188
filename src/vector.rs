use ndarray::Array1;

use crate::error::{ClusteringError, Result};

/// An immutable, fixed-dimension feature vector.
///
/// Two vectors are equal iff all components are pairwise equal.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    components: Array1<f64>,
}

impl Vector {
    /// Builds a vector from its components.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty; a feature vector has at least one
    /// dimension.
    pub fn new(components: Vec<f64>) -> Self {
        assert!(
            !components.is_empty(),
            "a feature vector must have at least one component"
        );

        Self {
            components: Array1::from_vec(components),
        }
    }

    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.components
    }

    /// Euclidean (L2) distance to `other`.
    pub fn distance(&self, other: &Vector) -> Result<f64> {
        if self.dimension() != other.dimension() {
            return Err(ClusteringError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }

        let diff = &self.components - &other.components;
        Ok(diff.mapv(|x| x * x).sum().sqrt())
    }

    /// Component-wise arithmetic mean of `vectors`.
    pub fn average(vectors: &[Vector]) -> Result<Vector> {
        let first = vectors
            .first()
            .ok_or(ClusteringError::EmptyInput("cannot average zero vectors"))?;

        let mut sum = Array1::<f64>::zeros(first.dimension());
        for vector in vectors {
            if vector.dimension() != first.dimension() {
                return Err(ClusteringError::DimensionMismatch {
                    expected: first.dimension(),
                    actual: vector.dimension(),
                });
            }
            sum += &vector.components;
        }

        Ok(Vector {
            components: sum / vectors.len() as f64,
        })
    }
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Vector::new(components)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(components: [f64; N]) -> Self {
        Vector::new(components.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let v = Vector::new(vec![3.0, -1.5, 7.25]);
        assert_eq!(v.distance(&v).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Vector::new(vec![0.0, 0.0]);
        let b = Vector::new(vec![3.0, 4.0]);
        assert_eq!(a.distance(&b).unwrap(), 5.0);
        assert_eq!(b.distance(&a).unwrap(), 5.0);
    }

    #[test]
    fn distance_rejects_dimension_mismatch() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(
            a.distance(&b),
            Err(ClusteringError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn average_is_componentwise_mean() {
        let vectors = [
            Vector::new(vec![1.0, 10.0]),
            Vector::new(vec![2.0, 20.0]),
            Vector::new(vec![3.0, 30.0]),
        ];
        let mean = Vector::average(&vectors).unwrap();
        assert_eq!(mean, Vector::new(vec![2.0, 20.0]));
    }

    #[test]
    fn average_of_single_vector_is_itself() {
        let v = Vector::new(vec![4.5, -2.0]);
        assert_eq!(Vector::average(std::slice::from_ref(&v)).unwrap(), v);
    }

    #[test]
    fn average_rejects_empty_input() {
        assert!(matches!(
            Vector::average(&[]),
            Err(ClusteringError::EmptyInput(_))
        ));
    }

    #[test]
    fn average_rejects_ragged_input() {
        let vectors = [Vector::new(vec![1.0]), Vector::new(vec![1.0, 2.0])];
        assert_eq!(
            Vector::average(&vectors),
            Err(ClusteringError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn vectors_are_value_equal() {
        assert_eq!(Vector::from([1.0, 2.0]), Vector::new(vec![1.0, 2.0]));
        assert_ne!(Vector::from([1.0, 2.0]), Vector::from([1.0, 2.5]));
    }

    #[test]
    #[should_panic]
    fn empty_vector_is_rejected() {
        Vector::new(Vec::new());
    }
}
