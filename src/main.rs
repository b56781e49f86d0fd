use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use equity_insight_backend::app;
use equity_insight_backend::config::{AppConfig, RecommenderConfig};
use equity_insight_backend::external::history_source::HistorySource;
use equity_insight_backend::external::mock::MockHistorySource;
use equity_insight_backend::external::yahoo::YahooSource;
use equity_insight_backend::logging::{init_logging, LoggingConfig};
use equity_insight_backend::services::sequence_model::SequenceModel;
use equity_insight_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env();

    // Data source selection via HISTORY_SOURCE (defaults to yahoo); the mock
    // source exists for local development without network access.
    let history_source: Arc<dyn HistorySource> = match config.history_source.as_str() {
        "mock" => {
            tracing::info!("📊 Using mock history source");
            Arc::new(MockHistorySource::generating())
        }
        _ => {
            tracing::info!("📊 Using Yahoo Finance history source");
            Arc::new(YahooSource::new())
        }
    };

    let forecast_model = SequenceModel::try_load(&config.model_path).map(Arc::new);

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        history_source,
        recommender: Arc::new(RecommenderConfig::default_nse()),
        forecast_model,
    };

    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Equity insight backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
