pub mod forecast_service;
pub mod history_service;
pub mod metrics_service;
pub mod recommendation_service;
pub mod risk_profile_service;
pub mod sequence_model;
