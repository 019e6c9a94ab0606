pub mod pagination_controls;
pub mod skeleton;
pub mod table;

pub use pagination_controls::PaginationControls;
pub use skeleton::{Skeleton, SkeletonRows};
