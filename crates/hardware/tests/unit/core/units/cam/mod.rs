/// Fully associative CAM array.
pub mod array;


/// Single CAM entry command semantics.
pub mod entry;
