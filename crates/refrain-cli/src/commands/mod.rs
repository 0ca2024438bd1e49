pub mod config;
pub mod enrich;
pub mod report;
pub mod score;

pub use enrich::run_enrich;
pub use report::show_report;
pub use score::run_score;
