pub mod constants;
pub mod engine;
pub mod maze;
pub mod pathfind;
pub mod rng;
pub mod types;
