pub mod classifier;
pub mod scoring;
pub mod triggers;
pub mod types;

pub use classifier::{ClassificationOracle, LlmClassificationOracle, SmartLogProcessor};
pub use scoring::ProgressScorer;
pub use triggers::{TriggerEvaluator, WORKOUT_HISTORY};
pub use types::{Classification, ClassificationInput, OracleOutput, RawEvent};
