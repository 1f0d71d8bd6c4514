//! Log-likelihood scoring of feature tokens against a fitted [`NaiveBayes`].
//!
//! Every class starts at `1 / num_classes`. Each feature token adds the
//! natural log of its class probability, or of the class fallback
//! `smoothing / samples` when the class never saw the token. The highest
//! score wins and ties go to the lowest class index.

use crate::label::ClassLabel;
use crate::model::NaiveBayes;
use ndarray::Array1;

/// Outcome of scoring one feature sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: ClassLabel,
    /// Final log-space score per class, indexed by class.
    pub scores: Array1<f64>,
}

impl Classification {
    /// Scores normalized into a probability distribution (softmax).
    ///
    /// Classes scoring `-inf` get 0. When every class does, the distribution is uniform.
    pub fn probabilities(&self) -> Array1<f64> {
        let max = self.scores.fold(f64::NEG_INFINITY, |acc, &s| acc.max(s));
        if max == f64::NEG_INFINITY {
            return Array1::from_elem(self.scores.len(), 1.0 / self.scores.len() as f64);
        }
        let weights = self.scores.mapv(|s| (s - max).exp());
        let total = weights.sum();
        weights / total
    }
}

/// Index of the first maximum.
pub fn argmax(scores: &Array1<f64>) -> ClassLabel {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    ClassLabel(best)
}

impl NaiveBayes {
    /// Scores a feature sequence. An empty sequence leaves every class at the
    /// baseline and predicts the first class.
    pub fn classify<S: AsRef<str>>(&self, features: &[S]) -> Classification {
        let num_classes = self.labels().len();
        let mut scores = Array1::from_elem(num_classes, 1.0 / num_classes as f64);

        for token in features {
            let token = token.as_ref();
            for class in self.labels().classes() {
                scores[class.index()] += match self.probability(class, token) {
                    Some(p) => p.ln(),
                    None => self.fallback(class).map_or(f64::NEG_INFINITY, f64::ln),
                };
            }
        }

        Classification {
            label: argmax(&scores),
            scores,
        }
    }

    /// Extracts features from a raw name and classifies them.
    pub fn predict(&self, name: &str) -> &str {
        let features = self.extractor().features(name);
        self.labels().name(self.classify(&features).label)
    }

    /// Predicted label plus the per-class probability distribution.
    pub fn predict_with_proba(&self, name: &str) -> (&str, Array1<f64>) {
        let features = self.extractor().features(name);
        let classification = self.classify(&features);
        (
            self.labels().name(classification.label),
            classification.probabilities(),
        )
    }
}
