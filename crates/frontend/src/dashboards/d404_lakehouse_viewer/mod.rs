pub mod api;
pub mod keys;
pub mod state;
pub mod ui;
