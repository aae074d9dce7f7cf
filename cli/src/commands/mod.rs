pub mod breaks;
pub mod join;
pub mod render;
