pub mod recommendation;
pub mod tool;
