pub mod analysis_service;
pub mod backup_service;
pub mod chart_service;
pub mod collector_service;
pub mod dashboard_service;
pub mod price_service;
pub mod rate_limiter;
pub mod sampling;
pub mod stats;
