//! Client families

pub mod geth;
