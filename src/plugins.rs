//! Bundled implementations of the adapter traits.

#[cfg(feature = "image")]
pub mod image;
#[cfg(feature = "syntect")]
pub mod syntect;
