pub mod client;
pub mod tx;
