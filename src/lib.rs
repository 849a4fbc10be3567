//! # Protosema - Semantic model for protobuf-style schemas
//!
//! An in-memory AST for `.proto`-like schema files plus the scope-resolution
//! engine that answers "what does this reference bind to?" for every
//! cross-reference kind in the language.
//!
//! Protosema provides:
//! - An arena-backed AST with closed sum types per node category
//! - A primary descriptor modeling the built-in option schema
//! - A generic AST walker with pluggable scope-finder strategies
//! - A scope provider resolving type, literal, option-field and
//!   custom-option-path references to candidate sets
//!
//! Parsing, editor integration and presentation are external collaborators:
//! a front end builds the tree through [`ast::AstBuilder`], and consumers
//! receive `(qualified name, node identity)` candidate pairs back.

pub mod ast;
pub mod description;
pub mod descriptor;
pub mod finder;
pub mod name;
pub mod options;
pub mod scope;
pub mod walker;

// Re-exports for convenient access
pub use ast::{Ast, AstBuilder, NodeId};
pub use description::{Description, Origin};
pub use descriptor::{OptionType, ProtoDescriptor};
pub use name::QualifiedName;
pub use scope::provider::ScopeProvider;

/// Result type alias for Protosema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Protosema operations.
///
/// Resolution itself never fails - an unresolvable reference is an empty
/// candidate set. Errors only arise from construction-time misuse: attaching
/// a node to an incompatible parent, malformed names, bad descriptor config.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid descriptor config: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
