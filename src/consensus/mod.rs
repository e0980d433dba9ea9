pub mod config;
pub mod message;
pub mod peers;
pub mod processor;
pub mod scenarios;
pub mod store;
pub mod tally;

pub use config::*;
pub use message::*;
pub use peers::*;
pub use processor::*;
pub use store::*;
pub use tally::*;
