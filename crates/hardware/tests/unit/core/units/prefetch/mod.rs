//! Prefetch policy tests.

pub mod common_stride;
pub mod next_line;
