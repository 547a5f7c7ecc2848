// Licensed under the Apache-2.0 license

//! Per-scope type deduplication.
//!
//! Registers and memories are declared once per unique type name within an
//! address-map scope; the first instance encountered in traversal order is
//! kept as the representative for field and shape introspection. Later
//! instances of the same type are assumed structurally identical (an
//! invariant the upstream elaborator guarantees and this crate does not
//! re-check).

use log::debug;
use regspace_model::{Node, NodeId};

/// First-seen-ordered map of type name → representative node.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<(String, NodeId)>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` under its type name unless that name is already
    /// present. Returns true when the node became the representative.
    pub fn register(&mut self, node: Node<'_>) -> bool {
        let type_name = node.type_name();
        if self.entries.iter().any(|(name, _)| name == type_name) {
            return false;
        }
        debug!("registering type `{}` from `{}`", type_name, node.path());
        self.entries.push((type_name.to_string(), node.id()));
        true
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == type_name)
    }

    /// Representatives in first-seen order.
    pub fn values(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(_, id)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regspace_model::{build, NodeSpec};

    #[test]
    fn test_first_writer_wins() {
        let space = build(vec![NodeSpec::addrmap("top")
            .child(NodeSpec::reg("a", 0x0, 32).type_name("ctrl_t"))
            .child(NodeSpec::reg("b", 0x4, 32).type_name("status_t"))
            .child(NodeSpec::reg("c", 0x8, 32).type_name("ctrl_t"))])
        .unwrap();
        let top = space.roots().next().unwrap();
        let children: Vec<_> = top.children().collect();

        let mut registry = TypeRegistry::new();
        assert!(registry.register(children[0]));
        assert!(registry.register(children[1]));
        assert!(!registry.register(children[2]));

        let reps: Vec<NodeId> = registry.values().collect();
        assert_eq!(reps, vec![children[0].id(), children[1].id()]);
        assert!(registry.contains("ctrl_t"));
        assert!(!registry.contains("other_t"));
    }
}
