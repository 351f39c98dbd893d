//! Typed-key declarations.
//!
//! Keys are declared explicitly, either in code through [`KeyDefinition`]
//! or as `[[keys]]` tables in the settings file, and collected in a
//! [`KeyRegistry`] handed to the engine at startup.

pub mod definition;
pub mod registry;

pub use definition::KeyDefinition;
pub use registry::KeyRegistry;
