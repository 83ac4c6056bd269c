pub mod fixtures;
mod harness;

pub use harness::TestDb;
