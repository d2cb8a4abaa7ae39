pub mod fast_division;
pub mod poly;
pub mod product_tree;
