use std::sync::Arc;

use crate::config::{AppConfig, RecommenderConfig};
use crate::external::history_source::HistorySource;
use crate::services::sequence_model::SequenceModel;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub history_source: Arc<dyn HistorySource>,
    pub recommender: Arc<RecommenderConfig>,
    /// Pre-trained forecast model, if the artifact was loadable at startup.
    pub forecast_model: Option<Arc<SequenceModel>>,
}
