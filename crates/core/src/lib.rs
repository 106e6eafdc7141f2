//! Foundation crate for the Iconforge workspace.
//!
//! Zero internal dependencies so every other crate (graph controller,
//! engine adapter, studio binary) can share the same identifiers, errors,
//! layout constants, and brand configuration.

pub mod canvas;
pub mod constraints;
pub mod error;
pub mod hashing;
pub mod types;
