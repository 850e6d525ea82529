//! A small native package used to exercise generated boundary code.
//!
//! `build.rs` generates the boundary unit for `fixture.toml` into `OUT_DIR`;
//! it is compiled here as the [`shim`] module.

pub mod geometry;
pub mod stats;

#[allow(clippy::all)]
pub mod shim {
    include!(concat!(env!("OUT_DIR"), "/shim.rs"));
}

/// Export table written next to the generated unit.
pub const EXPORTS: &str = include_str!(concat!(env!("OUT_DIR"), "/exports.toml"));
