pub mod chart;
pub mod dashboard;
pub mod grid;
pub mod grid_state;

pub use dashboard::{LakehouseDashboard, SalesClient, StatsClient};
