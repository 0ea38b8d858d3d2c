pub mod filesystem;
pub mod resolver;
