pub mod filter;
pub mod sizing;
pub mod traversal;
