pub mod reader;
pub mod recorder;
pub mod store;
