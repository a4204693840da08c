mod analysis;
mod candle;
pub mod price_observation;
pub mod responses;

pub use analysis::{MonthlyAggregate, OverallStatistic, WeeklyChange};
pub use candle::Candle;
pub use price_observation::PriceObservation;
pub use responses::*;
