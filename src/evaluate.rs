use crate::dataset::Record;
use crate::error::Result;
use crate::label::{ClassLabel, LabelSet};
use crate::model::NaiveBayes;
use ndarray::{Array1, Array2, Axis};
use tracing::{info, warn};

/// Correct and incorrect prediction counts for one class or a whole split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub incorrect: usize,
}

impl Accuracy {
    /// Number of predictions counted.
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// `correct / total`, or `None` when there was nothing to predict.
    pub fn value(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.correct as f64 / total as f64),
        }
    }
}

/// Prediction for a single record.
#[derive(Debug, Clone)]
pub struct Prediction<'a> {
    pub record: &'a Record,
    pub truth: ClassLabel,
    pub predicted: ClassLabel,
    pub scores: Array1<f64>,
}

impl Prediction<'_> {
    /// True when the predicted class is the record's own.
    pub fn is_correct(&self) -> bool {
        self.truth == self.predicted
    }
}

/// Results of running the classifier over a set of records.
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    labels: LabelSet,
    confusion: Array2<usize>,
    predictions: Vec<Prediction<'a>>,
}

impl<'a> Evaluation<'a> {
    /// Label set the classes refer to.
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Counts indexed by `[true class, predicted class]`.
    pub fn confusion(&self) -> &Array2<usize> {
        &self.confusion
    }

    /// One prediction per record, in input order.
    pub fn predictions(&self) -> &[Prediction<'a>] {
        &self.predictions
    }

    /// Predictions that missed the true class.
    pub fn misclassified(&self) -> impl Iterator<Item = &Prediction<'a>> {
        self.predictions.iter().filter(|p| !p.is_correct())
    }

    /// Accuracy over the records whose true class is `class`.
    pub fn class_accuracy(&self, class: ClassLabel) -> Accuracy {
        let row = self.confusion.row(class.index());
        let correct = row[class.index()];
        Accuracy {
            correct,
            incorrect: row.sum() - correct,
        }
    }

    /// Accuracy bucketed by true class, in class order.
    pub fn per_class(&self) -> Vec<(ClassLabel, Accuracy)> {
        self.labels
            .classes()
            .map(|class| (class, self.class_accuracy(class)))
            .collect()
    }

    /// Summed correct over summed totals across all classes.
    pub fn overall(&self) -> Accuracy {
        let correct = self.confusion.diag().sum();
        Accuracy {
            correct,
            incorrect: self.confusion.sum() - correct,
        }
    }
}

impl NaiveBayes {
    /// Classifies every record and tallies the outcome by true class.
    ///
    /// Fails on a record whose label is outside the label set. A class without
    /// records is not an error; its accuracy is simply undefined.
    pub fn evaluate<'a>(&self, records: &'a [Record]) -> Result<Evaluation<'a>> {
        let labels = self.labels().clone();
        let mut confusion = Array2::<usize>::zeros((labels.len(), labels.len()));
        let mut predictions = Vec::with_capacity(records.len());

        for record in records {
            let truth = labels.resolve(&record.gender)?;
            let classification = self.classify(&record.features);
            confusion[[truth.index(), classification.label.index()]] += 1;
            predictions.push(Prediction {
                record,
                truth,
                predicted: classification.label,
                scores: classification.scores,
            });
        }

        let totals = confusion.sum_axis(Axis(1));
        for (class, name) in labels.iter() {
            if totals[class.index()] == 0 {
                warn!(class = name, "no records for class, accuracy is undefined");
            }
        }

        let evaluation = Evaluation {
            labels,
            confusion,
            predictions,
        };
        let overall = evaluation.overall();
        info!(
            records = overall.total(),
            correct = overall.correct,
            accuracy = overall.value().unwrap_or(f64::NAN),
            "evaluation done"
        );
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::Split;
    use crate::error::Error;
    use crate::features::FeatureExtractor;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn record(name: &str, gender: &str, split: Split) -> Record {
        Record::new("0", name, gender, split, &FeatureExtractor::default())
    }

    fn model() -> NaiveBayes {
        let train = [
            record("Anna", "Female", Split::Train),
            record("Maria", "Female", Split::Train),
            record("Marco", "Male", Split::Train),
            record("Luca", "Male", Split::Train),
        ];
        NaiveBayes::fit(&Config::default(), &train).unwrap()
    }

    #[test]
    fn tallies_by_true_class() {
        let model = model();
        let test = [
            record("Ann", "Female", Split::Test),
            record("Marco", "Male", Split::Test),
            record("Marcia", "Male", Split::Test),
        ];
        let evaluation = model.evaluate(&test).unwrap();
        assert_eq!(evaluation.predictions().len(), 3);

        let female = evaluation.class_accuracy(ClassLabel(1));
        assert_eq!(female, Accuracy { correct: 1, incorrect: 0 });

        let male = evaluation.class_accuracy(ClassLabel(0));
        assert_eq!(male.total(), 2);
        assert_eq!(male.correct + evaluation.misclassified().count(), 2);

        let overall = evaluation.overall();
        assert_eq!(overall.total(), 3);
        assert_eq!(evaluation.confusion().sum(), 3);
    }

    #[test]
    fn empty_class_has_undefined_accuracy() {
        let model = model();
        let test = [record("Anna", "Female", Split::Test)];
        let evaluation = model.evaluate(&test).unwrap();

        assert_eq!(evaluation.class_accuracy(ClassLabel(0)).value(), None);
        assert_eq!(evaluation.class_accuracy(ClassLabel(1)).value(), Some(1.0));
        assert_eq!(evaluation.overall().value(), Some(1.0));

        let nothing = model.evaluate(&[]).unwrap();
        assert_eq!(nothing.overall().value(), None);
    }

    #[test]
    fn unknown_label_fails() {
        let model = model();
        let test = [record("Anna", "F", Split::Test)];
        assert!(matches!(model.evaluate(&test), Err(Error::UnknownLabel { .. })));
    }

    #[test]
    fn repeated_runs_agree() {
        let model = model();
        let test = [
            record("Mario", "Male", Split::Test),
            record("Marianna", "Female", Split::Test),
            record("Lucia", "Female", Split::Test),
        ];
        let first = model.evaluate(&test).unwrap();
        let second = model.evaluate(&test).unwrap();
        assert_eq!(first.confusion(), second.confusion());
        assert_eq!(first.per_class(), second.per_class());
        for (a, b) in first.predictions().iter().zip(second.predictions()) {
            assert_eq!(a.predicted, b.predicted);
            assert_eq!(a.scores, b.scores);
        }
    }

    proptest! {
        #[test]
        fn overall_is_sum_of_classes(
            rows in prop::collection::vec(("[A-Za-z]{1,9}", prop::bool::ANY), 0..30),
        ) {
            let model = model();
            let test: Vec<Record> = rows
                .iter()
                .map(|(name, female)| {
                    record(name, if *female { "Female" } else { "Male" }, Split::Test)
                })
                .collect();
            let evaluation = model.evaluate(&test).unwrap();

            let per_class = evaluation.per_class();
            let correct: usize = per_class.iter().map(|(_, a)| a.correct).sum();
            let total: usize = per_class.iter().map(|(_, a)| a.total()).sum();
            let overall = evaluation.overall();
            prop_assert_eq!(overall.correct, correct);
            prop_assert_eq!(overall.total(), total);
            prop_assert_eq!(total, test.len());
            if total > 0 {
                assert_relative_eq!(overall.value().unwrap(), correct as f64 / total as f64);
            }
        }
    }
}
