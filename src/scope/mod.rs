//! Scope resolution
//!
//! Strategies plugged into the [`AstWalker`](crate::walker::AstWalker) plus
//! the [`ScopeProvider`](provider::ScopeProvider) orchestrating them per
//! reference kind.

pub mod custom_option_field_finder;
pub mod custom_option_finder;
pub mod provider;
pub mod type_finder;

pub use custom_option_field_finder::{CustomOptionFieldScopeFinder, SegmentKind};
pub use custom_option_finder::CustomOptionScopeFinder;
pub use provider::ScopeProvider;
pub use type_finder::TypeScopeFinder;
