pub mod bn;
pub mod factor;
pub mod test_utils;
