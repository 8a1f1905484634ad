//! UI components.

/// Canvas particle field component.
pub mod particle_field;
