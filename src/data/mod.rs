pub mod engine;
pub mod reference;
pub mod types;
