pub mod curve;
pub mod isogeny_chain;
pub mod point;
pub mod velu;
pub mod x_only_arithmetic;
