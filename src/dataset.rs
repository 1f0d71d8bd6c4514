use crate::config::Config;
use crate::error::{Error, Result};
use crate::features::FeatureExtractor;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Which partition a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

/// One labeled name together with its feature tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub split: Split,
    pub features: Vec<String>,
}

impl Record {
    /// Builds a record and extracts its features from `name`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        gender: impl Into<String>,
        split: Split,
        extractor: &FeatureExtractor,
    ) -> Self {
        let name = name.into();
        let features = extractor.features(&name);
        Record {
            id: id.into(),
            name,
            gender: gender.into(),
            split,
            features,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    id: String,
    name: String,
    gender: String,
    split: String,
}

/// Records of a tab-separated file, partitioned into train and test.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    train: Vec<Record>,
    test: Vec<Record>,
}

impl Dataset {
    /// Wraps already partitioned records.
    pub fn new(train: Vec<Record>, test: Vec<Record>) -> Self {
        Dataset { train, test }
    }

    /// Loads a header-prefixed TSV of `id, name, gender, split` rows.
    pub fn from_tsv(path: &Path, config: &Config) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), "reading dataset");
        Self::from_reader(BufReader::new(file), config)
    }

    /// Parses every row after the header until the input is exhausted.
    ///
    /// The header must have four fields like every row. Rows end with `\r`,
    /// `\n` or `\r\n`; a trailing terminator does not produce an extra
    /// record. Quotes are taken literally.
    pub fn from_reader<R: Read>(reader: R, config: &Config) -> Result<Self> {
        let extractor = FeatureExtractor::new(config.ngram.clone());
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let header = rdr.headers()?;
        if header.len() != 4 {
            return Err(Error::MalformedRow {
                line: 1,
                fields: header.len(),
            });
        }

        let mut dataset = Dataset::default();

        for result in rdr.records() {
            let row = result?;
            if row.len() != 4 {
                return Err(Error::MalformedRow {
                    line: row.position().map_or(0, |p| p.line()),
                    fields: row.len(),
                });
            }
            let raw: RawRow = row.deserialize(None)?;
            let split = if raw.split == config.train_split {
                Split::Train
            } else {
                Split::Test
            };

            let record = Record::new(raw.id, raw.name, raw.gender, split, &extractor);
            match split {
                Split::Train => dataset.train.push(record),
                Split::Test => dataset.test.push(record),
            }
        }

        info!(
            train = dataset.train.len(),
            test = dataset.test.len(),
            "dataset loaded"
        );
        debug!(
            features = dataset.all().map(|r| r.features.len()).sum::<usize>(),
            "feature tokens extracted"
        );
        Ok(dataset)
    }

    /// Records tagged with the training split.
    pub fn train(&self) -> &[Record] {
        &self.train
    }

    /// Every other record.
    pub fn test(&self) -> &[Record] {
        &self.test
    }

    /// Number of records across both splits.
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// True when the file had no data rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Training records followed by test records.
    pub fn all(&self) -> impl Iterator<Item = &Record> {
        self.train.iter().chain(self.test.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "person_id\tperson_name\tgender\ttrain_test";

    fn load(text: &str) -> Result<Dataset> {
        Dataset::from_reader(text.as_bytes(), &Config::default())
    }

    #[test]
    fn partitions_by_split_tag() {
        let text = format!(
            "{HEADER}\r\n1\tAnna\tFemale\tTrain\r\n2\tMarco\tMale\tTrain\r\n3\tAnn\tFemale\tTest\r\n"
        );
        let data = load(&text).unwrap();
        assert_eq!(data.train().len(), 2);
        assert_eq!(data.test().len(), 1);

        let ann = &data.test()[0];
        assert_eq!(ann.id, "3");
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.gender, "Female");
        assert_eq!(ann.split, Split::Test);
        assert_eq!(ann.features, ["#an", "nn#", "ann"]);
    }

    #[test]
    fn any_other_tag_is_test() {
        let text = format!("{HEADER}\n1\tAnna\tFemale\tValidation\n2\tBo\tMale\ttrain\n");
        let data = load(&text).unwrap();
        assert!(data.train().is_empty());
        assert_eq!(data.test().len(), 2);
    }

    #[test]
    fn row_count_matches_lines_with_or_without_trailing_terminator() {
        let body = "1\tAnna\tFemale\tTrain\r\n2\tMarco\tMale\tTest\r\n3\tLuca\tMale\tTrain";
        let without = load(&format!("{HEADER}\r\n{body}")).unwrap();
        let with = load(&format!("{HEADER}\r\n{body}\r\n")).unwrap();
        let bare_cr = load(&format!("{HEADER}\r{}\r", body.replace("\r\n", "\r"))).unwrap();

        for data in [without, with, bare_cr] {
            assert_eq!(data.len(), 3);
            assert_eq!(data.train().len(), 2);
            assert_eq!(data.train()[1].name, "Luca");
            assert_eq!(data.train()[1].gender, "Male");
        }
    }

    #[test]
    fn header_only_is_empty() {
        assert!(load(HEADER).unwrap().is_empty());
    }

    #[test]
    fn wrong_field_count_is_an_input_error() {
        let text = format!("{HEADER}\n1\tAnna\tFemale\tTrain\n2\tMarco\tMale\n");
        let err = load(&text).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 3, fields: 3 }));
        assert!(err.is_input());
    }

    #[test]
    fn header_must_have_four_fields() {
        let err = load("id\tname\tgender\n1\tAnna\tFemale\tTrain\n").unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 1, fields: 3 }));
        assert!(err.is_input());
    }

    #[test]
    fn quotes_and_empty_names_are_kept_verbatim() {
        let text = format!("{HEADER}\n1\t\"Bo\" Lee\tMale\tTrain\n2\t\tFemale\tTest\n");
        let data = load(&text).unwrap();
        assert_eq!(data.train()[0].name, "\"Bo\" Lee");
        assert_eq!(data.train()[0].features, ["bo", "lee"]);
        assert!(data.test()[0].features.is_empty());
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = Dataset::from_tsv(Path::new("/nonexistent/names.tsv"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
