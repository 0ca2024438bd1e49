pub mod lyrics;
pub mod play_event;
pub mod sentiment;

pub use lyrics::LyricsResult;
pub use play_event::{PlayEvent, StreamingRecord, END_TIME_FORMAT};
pub use sentiment::{EnrichedEvent, SentimentScore};
