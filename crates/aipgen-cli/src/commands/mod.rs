pub mod footprint;
pub mod types;
