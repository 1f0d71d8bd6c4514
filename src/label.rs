use crate::error::{Error, Result};
use std::collections::HashMap;

/// Index of a class inside its [`LabelSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassLabel(pub usize);

impl ClassLabel {
    /// Position of the class in its label set.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Closed set of class labels with a two-way mapping between display string and index.
///
/// The order given at construction is the class order: ties in scoring go to
/// the label listed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    names: Vec<String>,
    index: HashMap<String, ClassLabel>,
}

impl LabelSet {
    /// Builds the set in the given order, rejecting empty, blank or duplicate labels.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();

        for label in labels {
            let label = label.into();
            if label.is_empty() {
                return Err(Error::InvalidConfig("empty class label".into()));
            }
            if index.contains_key(&label) {
                return Err(Error::InvalidConfig(format!(
                    "class label {label:?} listed twice"
                )));
            }
            index.insert(label.clone(), ClassLabel(names.len()));
            names.push(label);
        }

        if names.is_empty() {
            return Err(Error::InvalidConfig("label set is empty".into()));
        }

        Ok(LabelSet { names, index })
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves a display string, failing on anything outside the set.
    pub fn resolve(&self, label: &str) -> Result<ClassLabel> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Display string of a class. Panics if `class` came from another set.
    pub fn name(&self, class: ClassLabel) -> &str {
        &self.names[class.0]
    }

    /// All classes in index order.
    pub fn classes(&self) -> impl Iterator<Item = ClassLabel> + '_ {
        (0..self.names.len()).map(ClassLabel)
    }

    /// Classes with their display strings, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassLabel, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ClassLabel(i), name.as_str()))
    }
}
