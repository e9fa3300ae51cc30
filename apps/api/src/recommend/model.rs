//! Pre-trained text model adapters.
//!
//! The recommender only depends on two capabilities: `Vectorizer::transform` and
//! `Classifier::predict`. Production adapters are loaded once from JSON artifacts exported
//! by the offline training job; tests substitute canned implementations.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;

/// Dense bag-of-words counts, one slot per vocabulary term.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }
}

pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> FeatureVector;

    /// Width of every vector this vectorizer produces.
    fn dimension(&self) -> usize;
}

pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<String, AppError>;

    /// Highest feature index the classifier reads, if it reads any.
    fn max_feature_index(&self) -> Option<usize>;
}

fn read_artifact(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::ModelUnavailable(format!("cannot read {}: {e}", path.display())))
}

// ────────────────────────────────────────────────────────────────────────────
// CountVectorizer
// ────────────────────────────────────────────────────────────────────────────

/// Token pattern used when the artifact does not name one: words of two or more
/// word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Deserialize)]
struct CountVectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    token_pattern: Option<String>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
}

fn default_lowercase() -> bool {
    true
}

/// Counts occurrences of each vocabulary term. Out-of-vocabulary tokens are ignored.
#[derive(Debug)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    token_re: Regex,
    lowercase: bool,
    dimension: usize,
}

impl CountVectorizer {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let vectorizer = Self::from_json(&read_artifact(path)?)?;
        info!(
            "Loaded vectorizer from {} ({} terms)",
            path.display(),
            vectorizer.dimension
        );
        Ok(vectorizer)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let artifact: CountVectorizerArtifact = serde_json::from_str(raw)
            .map_err(|e| AppError::ModelUnavailable(format!("invalid vectorizer artifact: {e}")))?;
        Self::new(
            artifact.vocabulary,
            artifact.token_pattern.as_deref().unwrap_or(DEFAULT_TOKEN_PATTERN),
            artifact.lowercase,
        )
    }

    pub fn new(
        vocabulary: HashMap<String, usize>,
        token_pattern: &str,
        lowercase: bool,
    ) -> Result<Self, AppError> {
        if vocabulary.is_empty() {
            return Err(AppError::ModelUnavailable("vectorizer vocabulary is empty".into()));
        }
        let token_re = Regex::new(token_pattern).map_err(|e| {
            AppError::ModelUnavailable(format!("invalid token pattern '{token_pattern}': {e}"))
        })?;

        // Indices must be a permutation of 0..len.
        let dimension = vocabulary.len();
        let mut seen = vec![false; dimension];
        for (term, &index) in &vocabulary {
            if index >= dimension || seen[index] {
                return Err(AppError::ModelUnavailable(format!(
                    "vocabulary index {index} for '{term}' is out of range or repeated"
                )));
            }
            seen[index] = true;
        }

        Ok(Self {
            vocabulary,
            token_re,
            lowercase,
            dimension,
        })
    }
}

impl Vectorizer for CountVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let mut counts = vec![0.0; self.dimension];
        for token in self.token_re.find_iter(&text) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                counts[index] += 1.0;
            }
        }
        FeatureVector(counts)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ForestClassifier
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (sample counts or fractions) at this leaf.
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
struct ForestArtifact {
    classes: Vec<String>,
    #[serde(default)]
    n_features: Option<usize>,
    trees: Vec<DecisionTree>,
}

/// Random forest: averages each tree's normalised leaf distribution and returns the
/// class with the highest mean. The first class wins a tie.
#[derive(Debug)]
pub struct ForestClassifier {
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
    max_feature: Option<usize>,
}

impl ForestClassifier {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let forest = Self::from_json(&read_artifact(path)?)?;
        info!(
            "Loaded classifier from {} ({} trees, {} classes)",
            path.display(),
            forest.trees.len(),
            forest.classes.len()
        );
        Ok(forest)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let artifact: ForestArtifact = serde_json::from_str(raw)
            .map_err(|e| AppError::ModelUnavailable(format!("invalid classifier artifact: {e}")))?;
        let forest = Self::new(artifact.classes, artifact.trees)?;
        if let (Some(n_features), Some(max)) = (artifact.n_features, forest.max_feature) {
            if max >= n_features {
                return Err(AppError::ModelUnavailable(format!(
                    "tree reads feature {max} but the model declares {n_features} features"
                )));
            }
        }
        Ok(forest)
    }

    pub fn new(classes: Vec<String>, trees: Vec<DecisionTree>) -> Result<Self, AppError> {
        if classes.is_empty() {
            return Err(AppError::ModelUnavailable("classifier has no classes".into()));
        }
        if trees.is_empty() {
            return Err(AppError::ModelUnavailable("classifier has no trees".into()));
        }

        let mut max_feature: Option<usize> = None;
        for (t, tree) in trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(AppError::ModelUnavailable(format!("tree {t} has no nodes")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        // Children must come after their parent, which rules out cycles.
                        let in_range = |child: usize| child > n && child < tree.nodes.len();
                        if !in_range(*left) || !in_range(*right) || !threshold.is_finite() {
                            return Err(AppError::ModelUnavailable(format!(
                                "tree {t} node {n} has an invalid split"
                            )));
                        }
                        max_feature = Some(max_feature.map_or(*feature, |m| m.max(*feature)));
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != classes.len() {
                            return Err(AppError::ModelUnavailable(format!(
                                "tree {t} leaf {n} has {} weights for {} classes",
                                value.len(),
                                classes.len()
                            )));
                        }
                    }
                }
            }
        }

        Ok(Self {
            classes,
            trees,
            max_feature,
        })
    }

    fn leaf<'a>(tree: &'a DecisionTree, features: &FeatureVector) -> &'a [f64] {
        let mut index = 0;
        loop {
            match &tree.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<String, AppError> {
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = Self::leaf(tree, features);
            let sum: f64 = leaf.iter().sum();
            if sum > 0.0 {
                for (total, weight) in totals.iter_mut().zip(leaf) {
                    *total += weight / sum;
                }
            }
        }

        let mut best = 0;
        for (i, total) in totals.iter().enumerate() {
            if *total > totals[best] {
                best = i;
            }
        }
        Ok(self.classes[best].clone())
    }

    fn max_feature_index(&self) -> Option<usize> {
        self.max_feature
    }
}
