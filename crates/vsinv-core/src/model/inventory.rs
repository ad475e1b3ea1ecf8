// ── Ansible inventory document ──
//
// Serialized shape:
//
//   { "_meta": { "hostvars": { <hostname>: <VmRecord>, ... } },
//     "all":   [ <hostname>, ... ],
//     <tag>:   [ <hostname>, ... ], ... }
//
// Keys keep insertion order: `_meta`, `all`, then tag groups in first-use
// order.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::vm::VmRecord;

/// Top-level keys a tag group may never replace.
pub const RESERVED_GROUPS: &[&str] = &["_meta", "all"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryDocument {
    pub hostvars: IndexMap<String, VmRecord>,
    pub all: Vec<String>,
    pub groups: IndexMap<String, Vec<String>>,
}

impl InventoryDocument {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

struct Meta<'a> {
    hostvars: &'a IndexMap<String, VmRecord>,
}

impl Serialize for Meta<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("hostvars", self.hostvars)?;
        map.end()
    }
}

impl Serialize for InventoryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.groups.len()))?;
        map.serialize_entry(
            "_meta",
            &Meta {
                hostvars: &self.hostvars,
            },
        )?;
        map.serialize_entry("all", &self.all)?;
        for (tag, hosts) in &self.groups {
            map.serialize_entry(tag, hosts)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::PowerState;

    #[test]
    fn empty_document_has_reserved_keys_only() {
        let json = serde_json::to_string(&InventoryDocument::default()).unwrap();
        assert_eq!(json, r#"{"_meta":{"hostvars":{}},"all":[]}"#);
    }

    #[test]
    fn key_order_is_meta_all_then_groups() {
        let vm = VmRecord {
            name: "db-1".into(),
            unique_id: "u1".into(),
            power_state: PowerState::PoweredOff,
            hostname: "db-1".into(),
            ip_addresses: Vec::new(),
            primary_ipv4: None,
            tags: vec!["zeta".into(), "alpha".into()],
        };
        let mut doc = InventoryDocument::default();
        doc.hostvars.insert("db-1".into(), vm);
        doc.all.push("db-1".into());
        doc.groups.insert("zeta".into(), vec!["db-1".into()]);
        doc.groups.insert("alpha".into(), vec!["db-1".into()]);

        let json = serde_json::to_string(&doc).unwrap();
        let meta = json.find("\"_meta\"").unwrap();
        let all = json.find("\"all\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(meta < all && all < zeta && zeta < alpha);
    }
}
