#![allow(non_snake_case)]

pub mod elliptic;
pub mod error;
pub mod fields;
pub mod polynomial_ring;
pub mod utilities;

pub use error::IsogenyError;
