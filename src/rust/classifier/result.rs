use ndarray::Array1;
use serde::Serialize;

use super::error::ClassifierError;
use super::utils::{argmax, softmax};
use crate::labels::{Label, NUM_LABELS};

/// Outcome of classifying one text.
///
/// Probabilities are stored in label index order, lie in `[0, 1]` and sum
/// to 1 within floating point tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    probabilities: [f32; NUM_LABELS],
    predicted_index: usize,
}

impl ClassificationResult {
    /// Turns raw model scores into a distribution and picks the winner.
    pub fn from_logits(logits: &[f32]) -> Result<Self, ClassifierError> {
        if logits.len() != NUM_LABELS {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} logits, got {}",
                NUM_LABELS,
                logits.len()
            )));
        }
        if let Some(pos) = logits.iter().position(|x| !x.is_finite()) {
            return Err(ClassifierError::PredictionError(format!(
                "Logit {} is not a finite number",
                pos
            )));
        }

        let distribution = softmax(&Array1::from_vec(logits.to_vec()));
        let predicted_index = argmax(&distribution)
            .ok_or_else(|| ClassifierError::PredictionError("Empty probability vector".into()))?;

        let mut probabilities = [0.0; NUM_LABELS];
        for (slot, &p) in probabilities.iter_mut().zip(distribution.iter()) {
            *slot = p;
        }

        Ok(Self {
            probabilities,
            predicted_index,
        })
    }

    pub fn probabilities(&self) -> &[f32; NUM_LABELS] {
        &self.probabilities
    }

    pub fn predicted_index(&self) -> usize {
        self.predicted_index
    }

    pub fn label(&self) -> Label {
        Label::ALL[self.predicted_index]
    }

    /// Probability of the predicted label as a percentage.
    pub fn confidence(&self) -> f32 {
        self.probabilities[self.predicted_index] * 100.0
    }

    /// Confidence with one decimal, e.g. `87.3%`.
    pub fn confidence_string(&self) -> String {
        format!("{:.1}%", self.confidence())
    }

    pub fn probability_of(&self, label: Label) -> f32 {
        self.probabilities[label.index()]
    }

    /// All labels with their probability, most likely first. Equal
    /// probabilities keep label order.
    pub fn ranked(&self) -> Vec<(Label, f32)> {
        let mut ranked: Vec<(Label, f32)> = Label::ALL
            .iter()
            .map(|&label| (label, self.probability_of(label)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_logits_picks_largest() {
        let result = ClassificationResult::from_logits(&[0.1, 0.2, 3.0, 0.0, -1.0, 0.5, 1.0]).unwrap();
        assert_eq!(result.label(), Label::Depression);
        assert_eq!(result.predicted_index(), 2);

        let sum: f32 = result.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(result.probabilities().iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let result = ClassificationResult::from_logits(&[0.0, 2.0, 2.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(result.label(), Label::Bipolar);

        let uniform = ClassificationResult::from_logits(&[1.0; NUM_LABELS]).unwrap();
        assert_eq!(uniform.label(), Label::Anxiety);
        assert_eq!(uniform.confidence_string(), "14.3%");
    }

    #[test]
    fn test_confidence_matches_probability() {
        let result = ClassificationResult::from_logits(&[0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0]).unwrap();
        let expected = result.probability_of(Label::Normal) * 100.0;
        assert!((result.confidence() - expected).abs() < 1e-6);
        assert!(result.confidence() > 90.0);
    }

    #[test]
    fn test_large_logits_stay_finite() {
        let result = ClassificationResult::from_logits(&[1000.0, 999.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert!(result.probabilities().iter().all(|p| p.is_finite()));
        assert_eq!(result.label(), Label::Anxiety);
    }

    #[test]
    fn test_ranked_is_sorted_and_complete() {
        let result = ClassificationResult::from_logits(&[0.5, 0.1, 0.1, 2.0, 0.0, 1.0, 0.1]).unwrap();
        let ranked = result.ranked();
        assert_eq!(ranked.len(), NUM_LABELS);
        assert_eq!(ranked[0].0, Label::Normal);
        assert_eq!(ranked[1].0, Label::Stress);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        // equal scores keep label order
        let tied: Vec<Label> = ranked.iter().filter(|(_, p)| (*p - ranked[3].1).abs() < 1e-9).map(|(l, _)| *l).collect();
        assert_eq!(tied, vec![Label::Bipolar, Label::Depression, Label::Suicidal]);
    }

    #[test]
    fn test_rejects_wrong_length_and_nan() {
        assert!(matches!(
            ClassificationResult::from_logits(&[0.0; 3]),
            Err(ClassifierError::PredictionError(_))
        ));
        assert!(matches!(
            ClassificationResult::from_logits(&[0.0, f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Err(ClassifierError::PredictionError(_))
        ));
    }
}
