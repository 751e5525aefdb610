pub mod catalog;
pub mod sprites;
