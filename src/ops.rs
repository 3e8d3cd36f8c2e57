//! Operators composing publishers, and the collectors consuming them.

pub mod buffer_transform;
pub mod collect;
pub mod into_future;
pub mod merge;
