// tests/common/mod.rs

#![allow(dead_code)]

pub use drenv_test_utils::{builders, fakes, init_tracing};
