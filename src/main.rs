use anyhow::Context;
use clap::Parser;
use ngram_gender::report::{
    confusion_table, split_summary, top_features_table, write_predictions_file,
};
use ngram_gender::{Config, Dataset, NaiveBayes};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Train a character n-gram Naive Bayes gender classifier on a pre-split TSV and score it.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// YAML configuration file; flags below override its values
    #[arg(short, long, env = "NGRAM_GENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Tab-separated input with id, name, gender and split columns
    #[arg(short, long, default_value = "data/allnames.tsv")]
    input: PathBuf,

    #[arg(long, default_value = "data/train_predict.tsv")]
    train_output: PathBuf,

    #[arg(long, default_value = "data/test_predict.tsv")]
    test_output: PathBuf,

    /// Only write misclassified rows to the prediction files
    #[arg(long)]
    misclassified_only: bool,

    #[arg(long)]
    smoothing: Option<u32>,

    #[arg(long)]
    min_n: Option<usize>,

    #[arg(long)]
    max_n: Option<usize>,

    /// Number of leading tokens expanded into n-grams
    #[arg(long)]
    lead_count: Option<usize>,

    /// Number of informative features to show
    #[arg(long, default_value_t = 10)]
    top_features: usize,

    #[arg(short, long)]
    verbose: bool,

    /// Names to classify once the model is trained
    names: Vec<String>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_yaml_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(smoothing) = self.smoothing {
            config.smoothing = smoothing;
        }
        if let Some(min_n) = self.min_n {
            config.ngram.min_n = min_n;
        }
        if let Some(max_n) = self.max_n {
            config.ngram.max_n = max_n;
        }
        if let Some(lead_count) = self.lead_count {
            config.ngram.lead_count = lead_count;
        }
        config.misclassified_only |= self.misclassified_only;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = cli.load_config()?;

    let data = Dataset::from_tsv(&cli.input, &config)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    println!("Num Training Rows: {}", data.train().len());
    println!("Num Test Rows: {}", data.test().len());

    println!("🧠 Training Naive-Bayes model...");
    let model = NaiveBayes::fit(&config, data.train()).context("training failed")?;

    for (title, records, output) in [
        ("TRAIN", data.train(), &cli.train_output),
        ("TEST", data.test(), &cli.test_output),
    ] {
        let evaluation = model
            .evaluate(records)
            .with_context(|| format!("evaluating {title} split"))?;
        write_predictions_file(output, &evaluation, config.misclassified_only)
            .with_context(|| format!("writing {}", output.display()))?;

        println!("\n# {title} DATA SET");
        print!("{}", split_summary(&evaluation));
        print!("{}", confusion_table(&evaluation));
    }

    println!();
    print!("{}", top_features_table(&model, cli.top_features));

    for name in &cli.names {
        let (label, proba) = model.predict_with_proba(name);
        let detail = model
            .labels()
            .iter()
            .map(|(class, class_name)| format!("P_{class_name} = {:.2}%", proba[class.index()] * 100.0))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{name} is classified as {label} ({detail})");
    }

    Ok(())
}
