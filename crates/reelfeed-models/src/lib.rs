pub mod feed_item;
pub mod image;
pub mod rating;
pub mod review;
pub mod search;

pub use feed_item::RawFeedItem;
pub use image::{ImageCandidate, ImageKind, MovieImages};
pub use rating::StarRating;
pub use review::ReviewRecord;
pub use search::SearchCandidate;
