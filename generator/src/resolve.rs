// Licensed under the Apache-2.0 license

//! Address, channel and path resolution.
//!
//! Addresses are read straight off the elaborated nodes; the work here is
//! resolving the bus anchors that are declared once high up the tree and
//! inherited below: the access channel (nearest ancestor wins) and the bar
//! (carried by the top-level address map).

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use log::debug;
use regspace_model::{property_names, Node, NodeKind};

/// The address map a node belongs to: the node itself for address maps,
/// otherwise the nearest AddrMap ancestor.
pub fn owning_addrmap<'a>(node: Node<'a>) -> Option<Node<'a>> {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if current.kind() == NodeKind::AddrMap {
            return Some(current);
        }
        cursor = current.parent();
    }
    None
}

/// Resolve the access channel for a node.
///
/// Walks the ancestor chain starting at the owning address map; the first
/// ancestor with an `access_channel` property wins. Exhausting the chain is
/// an error unless the configuration carries an explicit default.
pub fn channel(node: Node<'_>, config: &GeneratorConfig) -> Result<i64> {
    let mut cursor = owning_addrmap(node);
    while let Some(current) = cursor {
        if let Some(ch) = current
            .properties()
            .get_int(property_names::ACCESS_CHANNEL)
        {
            debug!(
                "channel {} for `{}` via `{}`",
                ch,
                node.path(),
                current.path()
            );
            return Ok(ch);
        }
        cursor = current.parent();
    }
    match config.configured_default_channel() {
        Some(ch) => {
            debug!("channel {} for `{}` via configured default", ch, node.path());
            Ok(ch)
        }
        None => Err(Error::MissingChannel { path: node.path() }),
    }
}

/// Bar id and bar base address, both taken from the top-level ancestor
/// (the root address map of the tree the node lives in). A root without a
/// `bar` property is bar 0.
pub fn bar(node: Node<'_>) -> (i64, u64) {
    let mut top = node;
    while let Some(parent) = top.parent() {
        top = parent;
    }
    let bar = top.properties().get_int(property_names::BAR).unwrap_or(0);
    (bar, top.absolute_address())
}

/// Owning-address-map path segment with a uniform index suffix: array
/// elements carry their current index (`ports.2`), non-arrays encode `.0`
/// so generated identifiers line up.
pub fn map_segment(map: Node<'_>) -> String {
    let mut segment = map.inst_name().to_string();
    if map.current_index().is_empty() {
        segment.push_str(".0");
    } else {
        for idx in map.current_index() {
            segment.push('.');
            segment.push_str(&idx.to_string());
        }
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;
    use regspace_model::{build, NodeSpec};

    fn config() -> GeneratorConfig {
        GeneratorConfig::with_defaults()
    }

    #[test]
    fn test_channel_nearest_ancestor() {
        let space = build(vec![NodeSpec::addrmap("top")
            .prop("access_channel", 1i64)
            .child(
                NodeSpec::addrmap("sub")
                    .prop("access_channel", 5i64)
                    .child(NodeSpec::reg("r", 0, 32)),
            )
            .child(NodeSpec::reg("q", 0x10, 32))])
        .unwrap();
        let top = space.roots().next().unwrap();
        let children: Vec<_> = top.children().collect();
        let sub = children[0];
        let q = children[1];
        let r = sub.children().next().unwrap();
        assert_eq!(channel(r, &config()).unwrap(), 5);
        assert_eq!(channel(q, &config()).unwrap(), 1);
        assert_eq!(channel(sub, &config()).unwrap(), 5);
    }

    #[test]
    fn test_channel_missing_is_fatal() {
        let space = build(vec![
            NodeSpec::addrmap("top").child(NodeSpec::reg("r", 0, 32))
        ])
        .unwrap();
        let r = space.roots().next().unwrap().children().next().unwrap();
        let err = channel(r, &config()).unwrap_err();
        assert!(matches!(err, Error::MissingChannel { ref path } if path == "top.r"));
    }

    #[test]
    fn test_channel_configured_default() {
        let space = build(vec![
            NodeSpec::addrmap("top").child(NodeSpec::reg("r", 0, 32))
        ])
        .unwrap();
        let r = space.roots().next().unwrap().children().next().unwrap();
        let config = GeneratorConfig::with_defaults().default_channel(0);
        assert_eq!(channel(r, &config).unwrap(), 0);
    }

    #[test]
    fn test_bar() {
        let space = build(vec![NodeSpec::addrmap("top")
            .offset(0x8000)
            .prop("bar", 2i64)
            .child(NodeSpec::reg("r", 0x10, 32))])
        .unwrap();
        let r = space.roots().next().unwrap().children().next().unwrap();
        let (bar_id, base) = bar(r);
        assert_eq!(bar_id, 2);
        assert_eq!(base, 0x8000);
        assert_eq!(r.absolute_address() - base, 0x10);
    }

    #[test]
    fn test_map_segment() {
        let space = build(vec![NodeSpec::addrmap("top").child(
            NodeSpec::addrmap("sub").array(&[3]).size(0x100).child(
                NodeSpec::reg("r", 0, 32),
            ),
        )])
        .unwrap();
        let top = space.roots().next().unwrap();
        assert_eq!(map_segment(top), "top.0");
        let subs: Vec<_> = top.children().collect();
        assert_eq!(map_segment(subs[2]), "sub.2");
        let r = subs[2].children().next().unwrap();
        assert_eq!(map_segment(owning_addrmap(r).unwrap()), "sub.2");
    }
}
