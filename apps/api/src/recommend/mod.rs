//! Category recommendation for a new posting: normalize title + description, vectorize,
//! classify, then map the raw class label to the label shown to users.

pub mod handlers;
pub mod model;

use std::sync::Arc;

use tracing::debug;

use crate::errors::AppError;
use crate::text::{normalize, Stopwords};
use model::{Classifier, Vectorizer};

/// Raw training labels whose display form differs from the label itself.
const DISPLAY_LABELS: &[(&str, &str)] = &[
    ("Accounting_Finance", "Accounting & Finance"),
    ("Healthcare_Nursing", "Healthcare & Nursing"),
    ("Sales", "Sales"),
    ("Engineering", "Engineering"),
];

/// Maps a raw classifier label to its display form. Unknown labels pass through.
pub fn display_label(raw: &str) -> String {
    DISPLAY_LABELS
        .iter()
        .find(|(label, _)| *label == raw)
        .map_or(raw, |&(_, display)| display)
        .to_string()
}

#[derive(Clone)]
pub struct CategoryRecommender {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn Classifier>,
    stopwords: Arc<Stopwords>,
}

impl CategoryRecommender {
    /// Fails with `ModelUnavailable` when the classifier reads features the vectorizer
    /// never produces.
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        classifier: Arc<dyn Classifier>,
        stopwords: Arc<Stopwords>,
    ) -> Result<Self, AppError> {
        if let Some(max) = classifier.max_feature_index() {
            if max >= vectorizer.dimension() {
                return Err(AppError::ModelUnavailable(format!(
                    "classifier reads feature {max} but the vectorizer produces {}",
                    vectorizer.dimension()
                )));
            }
        }
        Ok(Self {
            vectorizer,
            classifier,
            stopwords,
        })
    }

    /// Predicts one display category for a posting.
    pub fn recommend(&self, title: &str, description: &str) -> Result<String, AppError> {
        let combined = format!("{title} {description}");
        let normalized = normalize(&combined, &self.stopwords);
        let features = self.vectorizer.transform(&normalized);
        let raw = self.classifier.predict(&features)?;
        let label = display_label(&raw);
        debug!("Recommended '{label}' (raw '{raw}') for '{title}'");
        Ok(label)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::model::FeatureVector;
    use super::*;

    /// Records the text it is given and emits a fixed-width zero vector.
    #[derive(Default)]
    pub struct RecordingVectorizer {
        pub seen: Mutex<Vec<String>>,
    }

    impl Vectorizer for RecordingVectorizer {
        fn transform(&self, text: &str) -> FeatureVector {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(text.to_string());
            }
            FeatureVector(vec![0.0; 4])
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    /// Always predicts the same raw label.
    pub struct FixedClassifier(pub &'static str);

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<String, AppError> {
            Ok(self.0.to_string())
        }

        fn max_feature_index(&self) -> Option<usize> {
            None
        }
    }

    pub fn recommender(raw_label: &'static str) -> CategoryRecommender {
        CategoryRecommender {
            vectorizer: Arc::new(RecordingVectorizer::default()),
            classifier: Arc::new(FixedClassifier(raw_label)),
            stopwords: Arc::new(Stopwords::from_words(["the", "and", "a"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_known_labels_are_remapped() {
        assert_eq!(display_label("Accounting_Finance"), "Accounting & Finance");
        assert_eq!(display_label("Healthcare_Nursing"), "Healthcare & Nursing");
        assert_eq!(display_label("Sales"), "Sales");
        assert_eq!(display_label("Engineering"), "Engineering");
    }

    #[test]
    fn test_unknown_label_passes_through() {
        assert_eq!(display_label("IT_Jobs"), "IT_Jobs");
    }

    #[test]
    fn test_recommend_normalizes_before_vectorizing() {
        let vectorizer = Arc::new(RecordingVectorizer::default());
        let recommender = CategoryRecommender::new(
            vectorizer.clone(),
            Arc::new(FixedClassifier("Healthcare_Nursing")),
            Arc::new(Stopwords::from_words(["the", "on"])),
        )
        .unwrap();

        let label = recommender
            .recommend("Staff Nurse", "Nights on the ICU, 3 shifts!")
            .unwrap();
        assert_eq!(label, "Healthcare & Nursing");

        let seen = vectorizer.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["staff nurse nights icu shifts"]);
    }

    #[test]
    fn test_rejects_classifier_wider_than_vectorizer() {
        struct Wide;
        impl Classifier for Wide {
            fn predict(&self, _: &model::FeatureVector) -> Result<String, AppError> {
                Ok("Sales".into())
            }
            fn max_feature_index(&self) -> Option<usize> {
                Some(10)
            }
        }

        let result = CategoryRecommender::new(
            Arc::new(RecordingVectorizer::default()),
            Arc::new(Wide),
            Arc::new(Stopwords::default()),
        );
        assert!(matches!(result, Err(AppError::ModelUnavailable(_))));
    }

    #[test]
    fn test_fixed_recommender() {
        assert_eq!(
            recommender("Sales").recommend("Rep", "Sell").unwrap(),
            "Sales"
        );
    }
}
