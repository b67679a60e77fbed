//! Task records owned by the surrounding tracker.
//!
//! The analytics engine only reads tasks, through [`crate::core::TaskSource`].

pub mod storage;
pub mod types;

pub use storage::TaskStorage;
pub use types::{NewTask, Task, TaskFilter};

#[cfg(test)]
pub(crate) use types::fixtures;
