//! Blogstack core
//!
//! Declares the infrastructure of a two-tier blog application (PostgreSQL
//! plus a stateless web tier) as a dependency graph of provider resources,
//! and hands that graph to either a Docker engine or a Kubernetes cluster.
//!
//! - [`config`]: stack configuration files and the blog settings read from them
//! - [`graph`]: resource dependency graph and apply/destroy ordering
//! - [`stack`]: the two programs mapping settings to resource graphs
//! - [`docker`] / [`kubernetes`]: provider bindings that apply a graph

pub mod config;
pub mod docker;
pub mod error;
pub mod graph;
pub mod kubernetes;
pub mod logging;
pub mod outcome;
pub mod stack;

pub use error::{StackError, StackResult};
pub use outcome::{Action, ResourceOutcome};
