pub mod catalog;
pub mod scanner;
