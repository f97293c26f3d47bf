pub mod harness;
pub mod reports;
pub mod tester;

pub use harness::{Harness, HarnessAuth};
pub use tester::*;
