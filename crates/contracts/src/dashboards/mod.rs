pub mod d404_lakehouse_viewer;
