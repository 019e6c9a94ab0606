pub mod d404_lakehouse_viewer;

pub use d404_lakehouse_viewer::ui::LakehouseDashboard;
