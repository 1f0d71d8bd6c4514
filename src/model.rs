use crate::config::Config;
use crate::dataset::Record;
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::label::{ClassLabel, LabelSet};
use ndarray::Array1;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Smoothed occurrence count of each feature token within one class.
pub type FrequencyTable = HashMap<String, u32>;

/// `count / class sample count` for each feature token within one class.
pub type ProbabilityTable = HashMap<String, f64>;

/// Trained multinomial Naive Bayes model over name features.
///
/// Built once by [`NaiveBayes::fit`] and read-only afterwards. Scoring lives in
/// [`crate::classifier`], accuracy bookkeeping in [`crate::evaluate`].
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    config: Config,
    labels: LabelSet,
    extractor: FeatureExtractor,
    frequencies: Vec<FrequencyTable>,
    probabilities: Vec<ProbabilityTable>,
    sample_counts: Array1<usize>,
}

/// A feature and how strongly it separates the classes.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeight {
    pub token: String,
    /// Class with the highest probability for this token.
    pub favored: ClassLabel,
    /// Highest over lowest per-class probability.
    pub ratio: f64,
    /// Raw table counts per class, 0 where the token was never seen.
    pub counts: Vec<u32>,
}

/// Adds one row's tokens to a class table. First sightings start at `smoothing + 1`.
///
/// `smoothing` is below `u32::MAX` (see [`Config::validate`]); counts saturate
/// instead of wrapping so no entry ever drops back to zero.
fn count_tokens(table: &mut FrequencyTable, tokens: &[String], smoothing: u32) {
    for token in tokens {
        table
            .entry(token.clone())
            .and_modify(|count| *count = count.saturating_add(1))
            .or_insert(smoothing.saturating_add(1));
    }
}

impl NaiveBayes {
    /// Counts feature tokens per class over `records` and derives probabilities.
    ///
    /// Every label is resolved before anything is counted, so an unknown
    /// label fails the fit without leaving partial tables behind.
    pub fn fit(config: &Config, records: &[Record]) -> Result<Self> {
        config.validate()?;
        let labels = config.label_set()?;
        let classes = records
            .iter()
            .map(|r| labels.resolve(&r.gender))
            .collect::<Result<Vec<_>>>()?;

        let mut frequencies = vec![FrequencyTable::new(); labels.len()];
        let mut sample_counts = Array1::<usize>::zeros(labels.len());

        for (record, class) in records.iter().zip(classes) {
            count_tokens(
                &mut frequencies[class.index()],
                &record.features,
                config.smoothing,
            );
            sample_counts[class.index()] += 1;
        }

        let probabilities = frequencies
            .iter()
            .zip(sample_counts.iter())
            .map(|(table, &samples)| {
                table
                    .iter()
                    .map(|(token, &count)| (token.clone(), count as f64 / samples as f64))
                    .collect::<ProbabilityTable>()
            })
            .collect();

        let model = NaiveBayes {
            config: config.clone(),
            extractor: FeatureExtractor::new(config.ngram.clone()),
            labels,
            frequencies,
            probabilities,
            sample_counts,
        };

        for class in model.untrained_classes() {
            warn!(
                class = model.labels.name(class),
                "no training rows for class, it cannot be predicted"
            );
        }
        for (class, name) in model.labels.iter() {
            debug!(
                class = name,
                samples = model.sample_count(class),
                vocabulary = model.frequencies[class.index()].len(),
                "class table built"
            );
        }
        info!(rows = records.len(), classes = model.labels.len(), "model fitted");
        Ok(model)
    }

    /// Configuration the model was fitted with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Label set fixing the class order.
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Feature extractor used for raw names passed to `predict`.
    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Number of training rows per class, indexed by class.
    pub fn sample_counts(&self) -> &Array1<usize> {
        &self.sample_counts
    }

    /// Number of training rows of one class.
    pub fn sample_count(&self, class: ClassLabel) -> usize {
        self.sample_counts[class.index()]
    }

    /// Smoothed token counts of one class.
    pub fn frequencies(&self, class: ClassLabel) -> &FrequencyTable {
        &self.frequencies[class.index()]
    }

    /// Token probabilities of one class.
    pub fn probabilities(&self, class: ClassLabel) -> &ProbabilityTable {
        &self.probabilities[class.index()]
    }

    /// Smoothed count of `token` in `class`, `None` if the class never saw it.
    pub fn count(&self, class: ClassLabel, token: &str) -> Option<u32> {
        self.frequencies[class.index()].get(token).copied()
    }

    /// Probability of `token` in `class`, `None` if the class never saw it.
    pub fn probability(&self, class: ClassLabel, token: &str) -> Option<f64> {
        self.probabilities[class.index()].get(token).copied()
    }

    /// Probability used for a token the class never saw: `smoothing / samples`.
    ///
    /// `None` when the class has no training rows.
    pub fn fallback(&self, class: ClassLabel) -> Option<f64> {
        match self.sample_count(class) {
            0 => None,
            samples => Some(self.config.smoothing as f64 / samples as f64),
        }
    }

    /// Classes without a single training row.
    pub fn untrained_classes(&self) -> Vec<ClassLabel> {
        self.labels
            .classes()
            .filter(|&class| self.sample_count(class) == 0)
            .collect()
    }

    /// The `n` features whose per-class probabilities differ the most.
    ///
    /// Unseen tokens count with their fallback probability. Untrained classes
    /// are left out; with fewer than two trained classes nothing is returned.
    pub fn top_features(&self, n: usize) -> Vec<FeatureWeight> {
        let trained: Vec<ClassLabel> = self
            .labels
            .classes()
            .filter(|&class| self.sample_count(class) > 0)
            .collect();
        if trained.len() < 2 {
            return Vec::new();
        }

        let vocabulary: BTreeSet<&String> = self.frequencies.iter().flat_map(|t| t.keys()).collect();

        let mut features: Vec<FeatureWeight> = vocabulary
            .into_iter()
            .map(|token| {
                let mut favored = trained[0];
                let mut highest = f64::MIN;
                let mut lowest = f64::MAX;
                for &class in &trained {
                    let p = self
                        .probability(class, token)
                        .or_else(|| self.fallback(class))
                        .unwrap_or(0.0);
                    if p > highest {
                        highest = p;
                        favored = class;
                    }
                    lowest = lowest.min(p);
                }
                let counts = self
                    .labels
                    .classes()
                    .map(|class| self.count(class, token).unwrap_or(0))
                    .collect();
                FeatureWeight {
                    token: token.clone(),
                    favored,
                    ratio: highest / lowest,
                    counts,
                }
            })
            .collect();

        features.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
        features.truncate(n);
        features
    }
}
