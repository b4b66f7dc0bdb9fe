//! Louvain-style modularity optimisation over a modularity matrix.
//!
//! The core is a [`Partition`] of nodes into groups, a [`DeltaEngine`] that
//! scores moving one node into each neighbouring group, a [`Mover`] with three
//! selection strategies, and a [`Coarsener`] that sums node-indexed columns
//! into group-indexed ones for the next level. [`Session`] ties them together
//! for call-by-call use and [`louvain::run`] drives the full multilevel loop.

pub mod candidates;
pub mod coarsen;
pub mod column;
pub mod command;
pub mod config;
pub mod delta;
pub mod error;
pub mod louvain;
pub mod matrix;
pub mod mover;
pub mod output;
pub mod parser;
pub mod partition;
pub mod rng;
pub mod session;

pub use candidates::CandidateSet;
pub use coarsen::{reduce, Coarsener};
pub use column::{Column, ColumnAccess, CscMatrix, DenseColumn, OwnedColumn, SparseColumn};
pub use command::{Command, Reply, Value};
pub use config::LouvainConfig;
pub use delta::{DeltaEngine, MoveDeltas, IMPROVEMENT_TOLERANCE};
pub use error::{Error, Result};
pub use louvain::LouvainResult;
pub use matrix::ModularityMatrix;
pub use mover::{MoveStrategy, Mover};
pub use partition::Partition;
pub use rng::SessionRng;
pub use session::Session;
