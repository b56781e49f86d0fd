pub mod history_source;
pub mod mock;
pub mod yahoo;
