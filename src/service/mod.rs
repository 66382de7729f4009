pub mod adjuster;
pub mod classifier;
pub mod enricher;
pub mod intent;
pub mod llm;
pub mod pipeline;
pub mod ranker;

pub use adjuster::IntentAdjuster;
pub use classifier::KeywordIntentClassifier;
pub use intent::IntentParser;
pub use llm::{LlmClient, OpenAiCompletion};
pub use pipeline::RankingPipeline;
pub use ranker::RankerModel;
