// ── Vendor record → domain type conversion ──
//
// The proxy relays `show-gateways-and-servers` bodies untouched, so the
// console sees vendor records: kebab-case keys, `domain` and `tags` as
// objects, interface fields under their own names. These helpers read
// either that shape or the console's own camelCase, and park every key
// they do not model in `properties`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::model::{Gateway, NetworkInterface};

/// Top-level keys mapped onto typed `Gateway` fields.
const MODELED_KEYS: &[&str] = &[
    "uid",
    "name",
    "type",
    "domain",
    "comments",
    "ipv4-address",
    "ipv4Address",
    "ipv6-address",
    "ipv6Address",
    "sic-name",
    "sicName",
    "version",
    "interfaces",
    "tags",
    "properties",
];

/// Convert a listing body (`{ "objects": [...] , ... }`) into gateways.
///
/// Records without a uid or name are skipped.
pub fn gateways_from_listing(body: &Value) -> Vec<Gateway> {
    let Some(objects) = body.get("objects").and_then(Value::as_array) else {
        warn!("gateway listing has no `objects` array");
        return Vec::new();
    };

    objects
        .iter()
        .filter_map(|record| {
            let gateway = gateway_from_record(record);
            if gateway.is_none() {
                warn!("skipping gateway record without uid or name");
            }
            gateway
        })
        .collect()
}

/// Convert one vendor (or camelCase) record.
pub fn gateway_from_record(record: &Value) -> Option<Gateway> {
    let obj = record.as_object()?;
    let uid = text(obj, &["uid"]).filter(|s| !s.is_empty())?;
    let name = text(obj, &["name"]).filter(|s| !s.is_empty())?;

    let mut properties: BTreeMap<String, Value> = obj
        .iter()
        .filter(|(k, _)| !MODELED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if let Some(Value::Object(extra)) = obj.get("properties") {
        for (k, v) in extra {
            properties.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    Some(Gateway {
        uid,
        name,
        gateway_type: text(obj, &["type"]),
        domain: obj.get("domain").and_then(named),
        comments: text(obj, &["comments"]),
        ipv4_address: text(obj, &["ipv4-address", "ipv4Address"]),
        ipv6_address: text(obj, &["ipv6-address", "ipv6Address"]),
        sic_name: text(obj, &["sic-name", "sicName"]),
        version: text(obj, &["version"]),
        interfaces: obj
            .get("interfaces")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(interface_from_record).collect()),
        tags: obj
            .get("tags")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(named).collect()),
        properties: (!properties.is_empty()).then_some(properties),
    })
}

fn interface_from_record(record: &Value) -> Option<NetworkInterface> {
    let obj = record.as_object()?;
    Some(NetworkInterface {
        name: text(obj, &["name", "interface-name"])?,
        ipv4_address: text(obj, &["ipv4-address", "ipv4Address"]),
        ipv6_address: text(obj, &["ipv6-address", "ipv6Address"]),
        mask: text(obj, &["ipv4-mask-length", "ipv4-network-mask", "mask"]),
        interface_type: text(obj, &["type", "topology"]),
    })
}

/// First present key, as a string. Numbers are rendered (mask lengths).
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A plain string, or an object's `name`.
fn named(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => text(obj, &["name"]),
        _ => None,
    }
}
