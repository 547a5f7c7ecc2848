// Licensed under the Apache-2.0 license

//! Elaborated register-space model for the regspace generator.
//!
//! This crate holds the read-only tree the generator walks: address maps,
//! register files, registers, bit fields and memories, each carrying offsets,
//! sizes, array geometry and arbitrary named properties. The tree arrives
//! already elaborated (array instances unrolled, absolute addresses
//! computed); producing it from a hardware-description source is the job of
//! an upstream compiler, which serializes it to the JSON form read by
//! [`from_json_file`].
//!
//! ## Usage
//!
//! ```
//! use regspace_model::{build, NodeKind, NodeSpec};
//!
//! let space = build(vec![NodeSpec::addrmap("dev")
//!     .offset(0x4000_0000)
//!     .prop("access_channel", 0i64)
//!     .child(NodeSpec::reg("irq", 0x0, 32).child(NodeSpec::field("pending", 0, 1)))])
//! .unwrap();
//!
//! let dev = space.roots().next().unwrap();
//! assert_eq!(dev.kind(), NodeKind::AddrMap);
//! let irq = dev.children().next().unwrap();
//! assert_eq!(irq.absolute_address(), 0x4000_0000);
//! ```
//!
//! ## Module Organization
//!
//! - [`node`]: arena-held tree and the [`Node`] view type
//! - [`property`]: typed property values and the ordered property map
//! - [`builder`]: hierarchical specs and elaboration (array unrolling)
//! - [`load`]: the serialized JSON model format

pub mod builder;
pub mod error;
pub mod load;
pub mod node;
pub mod property;

// Re-export main public API
pub use builder::{build, NodeSpec};
pub use error::ModelError;
pub use load::{from_json_file, from_json_str};
pub use node::{AddressSpace, Node, NodeId, NodeKind};
pub use property::{names as property_names, Properties, PropertyValue};
