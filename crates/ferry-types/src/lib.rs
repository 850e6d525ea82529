//! Type descriptors and package inventories for the ferry boundary generator.
//!
//! Everything the generator knows about a native package lives here as plain
//! data: the closed [`TypeDescriptor`] classification, the [`ExportedFunction`]
//! signatures built from it, and the [`Inventory`] that loads a package's
//! exported surface from a TOML manifest.

mod descriptor;
mod function;
mod inventory;
mod parse;

pub use descriptor::{NamedType, PrimitiveKind, TypeDescriptor, Walk};
pub use function::{ExportedFunction, Param};
pub use inventory::{CodegenSettings, Inventory, InventoryError};
pub use parse::{is_identifier, parse_type, TypeParseError};
