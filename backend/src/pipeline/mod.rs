//! Comment aggregation pipeline: paginate, filter, classify in batches, rank.

pub mod aggregate;
pub mod classify;
pub mod fetcher;
pub mod video_id;

pub use aggregate::aggregate;
pub use classify::classify_comments;
pub use fetcher::fetch_comments;
pub use video_id::{InvalidUrl, VideoId};
