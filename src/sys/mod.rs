//! Environment internals: the handle manager plus the [`Stat`] and [`Info`]
//! snapshot types.

mod environment;
pub use environment::{Environment, Info, Stat};
