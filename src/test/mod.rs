//! Shared test support.


pub use context::TestContext;
