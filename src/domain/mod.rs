pub mod direction;
pub mod generator;
pub mod grid;
pub mod matcher;
pub mod path;
