//! Image comparison pipeline components.
//!
//! This module contains all the stages a selected file moves through:
//! - **discovery**: Build an input set from a file or directory argument
//! - **validate**: Pre-decode validation against the accepted media types
//! - **decode**: Decode images to RGBA8 off the async runtime
//! - **channel**: Bounded decode-completion channel
//! - **staging**: Slot table, pairing, and comparison dispatch

pub mod channel;
pub mod decode;
pub mod discovery;
pub mod staging;
pub mod validate;

// Re-exports for convenient access
pub use decode::ImageDecoder;
pub use discovery::FileDiscovery;
pub use staging::StagingEngine;
pub use validate::Validator;
