pub mod markup;
pub mod matching;
pub mod normalize;
pub mod pipeline;
pub mod poster;
pub mod review_text;
pub mod search;
pub mod strategy;

pub use matching::{select_best_match, title_similarity, ScoredCandidate, ACCEPTANCE_THRESHOLD};
pub use normalize::{normalize_item, SkipReason, UNKNOWN_DATE};
pub use pipeline::{PipelineConfig, PipelineReport, PipelineRun, ProgressEvent, ReviewPipeline};
pub use poster::{select_poster, ScoredImage, MIN_ASPECT_RATIO};
pub use review_text::{normalize_review_text, NO_REVIEW_TEXT, REVIEW_PARSE_ERROR};
pub use search::{MetadataSearch, MovieMatch};
pub use strategy::{AlternateTitles, SearchQuery, SearchStrategy};
