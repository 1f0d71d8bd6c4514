//! Name normalization and character n-gram features.
//!
//! A name becomes a sequence of feature tokens in two steps: [`tokenize`]
//! strips punctuation, lowercases and splits on whitespace, then [`expand`]
//! adds boundary-marked prefix and suffix n-grams for the leading tokens.
//!
//! ```
//! use ngram_gender::{NgramConfig, features::{expand, tokenize}};
//! let tokens = tokenize("Anna");
//! let features = expand(tokens, &NgramConfig::default());
//! assert_eq!(features, ["#an", "na#", "#ann", "nna#", "anna"]);
//! ```

use crate::config::NgramConfig;

/// Removes ASCII punctuation, lowercases and splits on whitespace.
///
/// Punctuation is deleted rather than replaced, so `"O'Brien-Smith"` is a
/// single token `"obriensmith"`. Returns an empty list for names made only of
/// punctuation or whitespace.
pub fn tokenize(raw_name: &str) -> Vec<String> {
    let cleaned: String = raw_name
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    cleaned
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Prepends prefix/suffix n-grams of the first `lead_count` tokens to the token list.
///
/// For every eligible token and every length `n` in
/// `min_n..=min(max_n, len - 1)` two features are emitted: `marker + prefix`
/// then `suffix + marker`. A token never yields an n-gram as long as itself.
/// Lengths are counted in characters.
pub fn expand(tokens: Vec<String>, config: &NgramConfig) -> Vec<String> {
    let marker = config.boundary_marker.as_str();
    let mut features = Vec::new();

    for token in tokens.iter().take(config.lead_count) {
        let chars: Vec<char> = token.chars().collect();
        let len = chars.len();
        let longest = config.max_n.min(len.saturating_sub(1));

        for n in config.min_n..=longest {
            let prefix: String = chars[..n].iter().collect();
            let suffix: String = chars[len - n..].iter().collect();
            features.push(format!("{marker}{prefix}"));
            features.push(format!("{suffix}{marker}"));
        }
    }

    if config.include_tokens {
        features.extend(tokens);
    }
    features
}

/// Tokenizer and n-gram expander bundled with their configuration.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: NgramConfig,
}

impl FeatureExtractor {
    /// Extractor using the given n-gram settings.
    pub fn new(config: NgramConfig) -> Self {
        Self { config }
    }

    /// N-gram settings in use.
    pub fn config(&self) -> &NgramConfig {
        &self.config
    }

    /// Tokenizes and expands a raw name.
    pub fn features(&self, raw_name: &str) -> Vec<String> {
        expand(tokenize(raw_name), &self.config)
    }
}
