//! Prediction files and console summaries.

use crate::error::{Error, Result};
use crate::evaluate::{Accuracy, Evaluation};
use crate::model::NaiveBayes;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct PredictionRow<'a> {
    name: &'a str,
    gender: &'a str,
    prediction: &'a str,
}

/// Writes `name<TAB>gender<TAB>prediction` rows, header first, `\r\n` terminated.
///
/// Returns the number of data rows written.
pub fn write_predictions<W: Write>(
    writer: W,
    evaluation: &Evaluation<'_>,
    misclassified_only: bool,
) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(["name", "gender", "prediction"])?;

    let labels = evaluation.labels();
    let mut written = 0;
    for prediction in evaluation.predictions() {
        if misclassified_only && prediction.is_correct() {
            continue;
        }
        wtr.serialize(PredictionRow {
            name: &prediction.record.name,
            gender: &prediction.record.gender,
            prediction: labels.name(prediction.predicted),
        })?;
        written += 1;
    }

    wtr.flush().map_err(|e| Error::Csv(e.into()))?;
    Ok(written)
}

/// Creates (or truncates) `path` and writes the predictions into it.
pub fn write_predictions_file(
    path: &Path,
    evaluation: &Evaluation<'_>,
    misclassified_only: bool,
) -> Result<usize> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let written = write_predictions(BufWriter::new(file), evaluation, misclassified_only)?;
    info!(
        path = %path.display(),
        rows = written,
        misclassified_only,
        "predictions written"
    );
    Ok(written)
}

/// One accuracy block: header, correct, incorrect, total and accuracy lines.
pub fn accuracy_block(header: &str, accuracy: &Accuracy) -> String {
    let value = match accuracy.value() {
        Some(value) => format!("{value:.4}"),
        None => "undefined".to_string(),
    };
    format!(
        "## {header}\ncorrect: {}\nincorrect: {}\ntotal: {}\naccuracy: {value}\n",
        accuracy.correct,
        accuracy.incorrect,
        accuracy.total()
    )
}

/// Accuracy blocks for every class followed by the overall block.
pub fn split_summary(evaluation: &Evaluation<'_>) -> String {
    let mut out = String::new();
    for (class, accuracy) in evaluation.per_class() {
        out.push_str(&accuracy_block(evaluation.labels().name(class), &accuracy));
    }
    out.push_str(&accuracy_block("OVERALL", &evaluation.overall()));
    out
}

/// Confusion matrix with true classes as rows and predictions as columns.
pub fn confusion_table(evaluation: &Evaluation<'_>) -> String {
    let labels = evaluation.labels();
    let width = labels
        .iter()
        .map(|(_, name)| name.len())
        .max()
        .unwrap_or(0)
        .max(10);

    let mut out = format!("{:>width$}", "true \\ pred");
    for (_, name) in labels.iter() {
        out.push_str(&format!(" {name:>width$}"));
    }
    out.push('\n');

    for (class, name) in labels.iter() {
        out.push_str(&format!("{name:>width$}"));
        for count in evaluation.confusion().row(class.index()) {
            out.push_str(&format!(" {count:>width$}"));
        }
        out.push('\n');
    }
    out
}

/// The most informative features, one per line.
pub fn top_features_table(model: &NaiveBayes, n: usize) -> String {
    let labels = model.labels();
    let mut out = String::from("Most Informative Features (probability ratio):\n");
    for feature in model.top_features(n) {
        let counts = labels
            .iter()
            .map(|(class, name)| format!("{name}: {:>4}", feature.counts[class.index()]))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{:>25} | {counts} | favors {} ({:.2}x)\n",
            feature.token,
            labels.name(feature.favored),
            feature.ratio
        ));
    }
    out
}
