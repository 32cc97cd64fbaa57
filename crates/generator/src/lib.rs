//! # workgen-generator
//!
//! A stateful engine tying the Markov chain and file formats together: it
//! holds the active chain snapshot, the most recent batch of trajectories
//! and an injected random number generator.

mod error;
mod generator;

pub use error::GeneratorError;
pub use generator::{ChainOrigin, DEFAULT_CHAIN_PATH, WorkloadGenerator, train_chain};
