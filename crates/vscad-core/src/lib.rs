//! Core types for the vscad assembly bridge.
//!
//! This crate provides the foundational types used across all other vscad crates:
//! - The name codec used to build storage-safe unique names
//! - Part and product node models parsed from Virtual Satellite JSON
//! - Placement math for composing relative transforms
//! - Key-indexed attribute tables that carry metadata through documents
//! - Error types

pub mod attributes;
pub mod codec;
pub mod errors;
pub mod json;
pub mod part;
pub mod placement;
pub mod product;
pub mod units;

pub use attributes::{Attribute, AttributeTable, AttributeValue, Attributed};
pub use codec::{decode_name, encode_name, split_unique_name, unique_name};
pub use errors::*;
pub use part::{Part, Shape, PART_PREFIX};
pub use placement::Placement;
pub use product::{NodeRole, PartRef, ProductNode, ASSEMBLY_PREFIX, PRODUCT_PREFIX};
