//! Cache model and prefetch unit tests.
