use std::fmt;
use std::rc::Rc;

use crate::cluster::Record;
use crate::error::Result;
use crate::vector::Vector;

/// Deviation statistics over an ordered set of records.
///
/// The model owns a single scalar standard deviation: the root mean square of
/// the per-record Euclidean distances from the mean vector. Every derived
/// value is computed once at construction; the model is immutable afterwards.
///
/// An empty record set yields a valid but empty model (`has_records()` is
/// false, `mean()` is `None`, `standard_deviation()` is NaN) so that callers
/// scanning many models can skip empty ones cleanly.
pub struct DeviationModel<T> {
    records: Vec<DeviationRecord<T>>,
    mean: Option<Vector>,
    standard_deviation: f64,
}

impl<T> DeviationModel<T> {
    /// Builds the model from domain elements, extracting each element's
    /// features with `features_of`.
    pub fn from_elements<I, F>(elements: I, features_of: F) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Vector,
    {
        let records = elements
            .into_iter()
            .map(|element| {
                let features = features_of(&element);
                Rc::new(Record::new(element, features))
            })
            .collect();

        Self::from_records(records)
    }

    /// Builds the model from already-extracted records.
    pub fn from_records(records: Vec<Rc<Record<T>>>) -> Result<Self> {
        if records.is_empty() {
            return Ok(Self {
                records: Vec::new(),
                mean: None,
                standard_deviation: f64::NAN,
            });
        }

        let features: Vec<Vector> = records.iter().map(|r| r.features().clone()).collect();
        let mean = Vector::average(&features)?;

        let deviations = records
            .iter()
            .map(|r| mean.distance(r.features()))
            .collect::<Result<Vec<f64>>>()?;
        let standard_deviation =
            (deviations.iter().map(|d| d * d).sum::<f64>() / records.len() as f64).sqrt();

        let records = records
            .into_iter()
            .zip(deviations)
            .map(|(record, deviation)| {
                // A record coincident with the mean scores zero even when the
                // rest of the model has zero variance.
                let standard_score = if deviation == 0.0 {
                    0.0
                } else {
                    deviation / standard_deviation
                };
                DeviationRecord {
                    record,
                    deviation,
                    standard_score,
                }
            })
            .collect();

        Ok(Self {
            records,
            mean: Some(mean),
            standard_deviation,
        })
    }

    pub fn records(&self) -> &[DeviationRecord<T>] {
        &self.records
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Mean feature vector, or `None` for an empty model.
    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    /// Scalar population standard deviation; NaN for an empty model.
    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }
}

impl<T> fmt::Debug for DeviationModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviationModel")
            .field("records", &self.records.len())
            .field("mean", &self.mean)
            .field("standard_deviation", &self.standard_deviation)
            .finish()
    }
}

impl<T> Clone for DeviationModel<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            mean: self.mean.clone(),
            standard_deviation: self.standard_deviation,
        }
    }
}

/// A record together with its deviation statistics relative to one enclosing
/// [`DeviationModel`].
pub struct DeviationRecord<T> {
    record: Rc<Record<T>>,
    deviation: f64,
    standard_score: f64,
}

impl<T> DeviationRecord<T> {
    pub fn record(&self) -> &Rc<Record<T>> {
        &self.record
    }

    pub fn element(&self) -> &T {
        self.record.element()
    }

    pub fn features(&self) -> &Vector {
        self.record.features()
    }

    /// Euclidean distance from the enclosing model's mean.
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// Deviation divided by the enclosing model's standard deviation, or zero
    /// when the deviation itself is zero.
    pub fn standard_score(&self) -> f64 {
        self.standard_score
    }
}

impl<T> fmt::Debug for DeviationRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviationRecord")
            .field("features", self.features())
            .field("deviation", &self.deviation)
            .field("standard_score", &self.standard_score)
            .finish()
    }
}

impl<T> Clone for DeviationRecord<T> {
    fn clone(&self) -> Self {
        Self {
            record: Rc::clone(&self.record),
            deviation: self.deviation,
            standard_score: self.standard_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_over(points: Vec<Vec<f64>>) -> DeviationModel<Vec<f64>> {
        DeviationModel::from_elements(points, |p| Vector::new(p.clone())).unwrap()
    }

    #[test]
    fn empty_model_is_valid() {
        let model = model_over(vec![]);
        assert!(!model.has_records());
        assert!(model.mean().is_none());
        assert!(model.standard_deviation().is_nan());
    }

    #[test]
    fn single_record_has_zero_scores() {
        let model = model_over(vec![vec![2.0, 3.0]]);
        assert_eq!(model.mean(), Some(&Vector::new(vec![2.0, 3.0])));
        assert_eq!(model.standard_deviation(), 0.0);
        assert_eq!(model.records()[0].deviation(), 0.0);
        assert_eq!(model.records()[0].standard_score(), 0.0);
    }

    #[test]
    fn two_point_case_is_symmetric() {
        let model = model_over(vec![vec![2.0, 3.0], vec![4.0, 5.0]]);

        let mean = model.mean().unwrap().clone();
        assert_eq!(mean, Vector::new(vec![3.0, 4.0]));

        let d0 = mean.distance(model.records()[0].features()).unwrap();
        let d1 = mean.distance(model.records()[1].features()).unwrap();
        assert_eq!(model.standard_deviation(), d0);
        assert_eq!(model.standard_deviation(), d1);

        assert_eq!(model.records()[0].standard_score(), 1.0);
        assert_eq!(model.records()[1].standard_score(), 1.0);
    }

    #[test]
    fn known_two_point_statistics() {
        let model = model_over(vec![vec![2.0, 3.0], vec![8.0, 11.0]]);

        assert_eq!(model.mean(), Some(&Vector::new(vec![5.0, 7.0])));
        assert_eq!(model.standard_deviation(), 5.0);
        assert_eq!(model.records()[0].standard_score(), 1.0);
        assert_eq!(model.records()[1].standard_score(), 1.0);
    }

    #[test]
    fn coincident_records_all_score_zero() {
        let model = model_over(vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(model.standard_deviation(), 0.0);
        for record in model.records() {
            assert_eq!(record.standard_score(), 0.0);
        }
    }

    #[test]
    fn scores_are_relative_to_the_enclosing_model() {
        let model = model_over(vec![vec![0.0], vec![0.0], vec![0.0], vec![4.0]]);

        // mean = 1, deviations = 1, 1, 1, 3, rms = sqrt(12 / 4)
        let std = model.standard_deviation();
        assert!((std - 3.0_f64.sqrt()).abs() < 1e-12);
        assert!((model.records()[3].standard_score() - 3.0 / std).abs() < 1e-12);
        assert!(model.records()[3].standard_score() > model.records()[0].standard_score());
    }
}
