pub mod bias;
pub mod config;
pub mod exclusion;
pub mod generator;
pub mod random;
pub mod sampler;
