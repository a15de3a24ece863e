pub mod canonical;
pub mod cleanup;
pub mod grouping;
pub mod resolution;
