pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod params;
pub mod prices;
