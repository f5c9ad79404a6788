use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::intelligence::{ClassificationOracle, LlmClassificationOracle, SmartLogProcessor};
use crate::llm::LlmProvider;
use crate::services::{EngagementService, EventService, ProgressService, SmartLogService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub llm: LlmProvider,
    pub events: EventService,
    pub smart_logs: SmartLogService,
    pub progress: ProgressService,
    pub engagement: EngagementService,
}

impl AppState {
    /// Wire services with the LLM-backed classification oracle.
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, llm: LlmProvider) -> Self {
        let oracle: Arc<dyn ClassificationOracle> =
            Arc::new(LlmClassificationOracle::new(llm.clone()));
        Self::with_oracle(config, db, llm, oracle)
    }

    pub fn with_oracle(
        config: Config,
        db: Arc<dyn DatabaseBackend>,
        llm: LlmProvider,
        oracle: Arc<dyn ClassificationOracle>,
    ) -> Self {
        let config = Arc::new(config);
        let progress = ProgressService::new(db.clone(), config.scoring.clone());
        let events = EventService::new(db.clone(), progress.clone());
        let processor = SmartLogProcessor::new(oracle, &config.smart_log);
        let smart_logs = SmartLogService::new(db.clone(), processor, progress.clone());
        let engagement = EngagementService::new(db.clone(), &config.engagement);

        Self {
            config,
            db,
            llm,
            events,
            smart_logs,
            progress,
            engagement,
        }
    }
}
