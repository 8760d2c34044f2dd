pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod hunter;
pub mod maze;
pub mod pathing;
pub mod rng;
pub mod types;
