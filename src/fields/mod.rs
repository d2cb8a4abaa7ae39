//! Concrete fields for tests, benches and the demo binary.

pub mod csidh;
pub mod smooth;
