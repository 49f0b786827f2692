// Command-line runners behind `main`.
pub mod audit;
pub mod labels;
pub mod plan;
