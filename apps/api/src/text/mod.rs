// Text preprocessing shared by search and category recommendation.

pub mod normalize;
pub mod stemmer;

pub use normalize::{normalize, Stopwords};
pub use stemmer::stem;
