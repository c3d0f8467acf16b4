pub mod config;
pub mod fees;
pub mod opportunity;
pub mod spot_prices;
pub mod state;
pub mod strategy;

pub use strategy::{
    Engine, ScanReport, find_cross_exchange_opportunities, find_triangular_opportunities,
};
