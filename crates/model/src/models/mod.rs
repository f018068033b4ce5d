//! Concrete models
//!
//! Each model is a function returning its `ModelConfig`, paired with a typed
//! record where callers want one.

pub mod student;

pub use student::*;
