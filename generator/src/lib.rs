// Licensed under the Apache-2.0 license

//! Address-space context compilation and template-driven generation.
//!
//! This crate walks an elaborated register space (see `regspace-model`),
//! compiles one renderable context per address map, and feeds those
//! contexts through a small recursive template language to produce HDL,
//! map files, documentation, or anything else a text template can express.
//!
//! ```text
//!   AddressSpace ----------> Vec<BuiltContext> ----------> output files
//!    (elaborated    context::      |             Template
//!     model tree)   build_contexts | record      + Emitter
//!                                  |
//!                     regtypes / memtypes (deduplicated per map)
//!                     regitems / memitems / extitems (flattened)
//! ```
//!
//! Address maps are processed bottom-up and independently: one map failing
//! (unresolvable access channel, a property colliding with a derived key)
//! does not stop its siblings from generating.
//!
//! ## Usage
//!
//! ```rust
//! use regspace_generator::{build_contexts, GeneratorConfig, Template};
//! use regspace_model::{build, NodeSpec};
//!
//! let space = build(vec![NodeSpec::addrmap("dev")
//!     .prop("access_channel", 0i64)
//!     .child(NodeSpec::reg("ctrl", 0x0, 32))])?;
//!
//! let contexts = build_contexts(&space, &GeneratorConfig::with_defaults());
//! let ctx = contexts.into_iter().next().unwrap()?;
//!
//! let template = Template::parse("{regitems:repeat:{name}@{absaddr} }");
//! assert_eq!(template.render(&ctx.record)?, "ctrl@0 ");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`context`]: the per-address-map context compiler
//! - [`registry`]: first-writer-wins type deduplication
//! - [`resolve`]: channel and BAR resolution along the ancestor chain
//! - [`field`]: field masks, reset normalization, data-type descriptors
//! - [`template`]: the `{key:directive}` substitution engine
//! - [`emit`]: output files, write modes, template discovery
//! - [`value`]: the context value tree templates render against
//! - [`config`]: flattening policies and generation knobs

pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod field;
pub mod registry;
pub mod resolve;
pub mod template;
pub mod util;
pub mod value;

pub use config::{FlattenPolicy, GeneratorConfig};
pub use context::{build_contexts, BuiltContext};
pub use emit::{default_target_name, is_template, Emitter, WriteMode};
pub use error::{Error, Result};
pub use template::Template;
pub use value::{Record, Value};
