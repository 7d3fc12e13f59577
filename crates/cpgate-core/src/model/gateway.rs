// ── Gateway domain type ──
//
// camelCase on the wire: this is the shape exchanged between the console
// and the local proxy, not the vendor's kebab-case record (see `convert`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Appended to the name of a gateway copy.
pub const CLONE_SUFFIX: &str = "_copy";

/// A network interface of a gateway. Display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
}

/// A gateway object.
///
/// `uid` is assigned by the management server and is empty for an unsaved
/// copy. `properties` carries vendor fields this crate does not model; it is
/// shown but never interpreted or changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub gateway_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<NetworkInterface>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Value>>,
}

/// Fields a user may change on a gateway copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum EditableField {
    Name,
    Comments,
    Ipv4Address,
    Ipv6Address,
    SicName,
}

impl Gateway {
    /// Derive an unsaved copy: every field copied, name suffixed, uid cleared.
    pub fn to_copy(&self) -> Gateway {
        Gateway {
            uid: String::new(),
            name: format!("{}{CLONE_SUFFIX}", self.name),
            ..self.clone()
        }
    }

    /// Set one editable field. An empty value clears optional fields.
    pub fn set_field(&mut self, field: EditableField, value: impl Into<String>) {
        let value = value.into();
        let optional = (!value.is_empty()).then(|| value.clone());
        match field {
            EditableField::Name => self.name = value,
            EditableField::Comments => self.comments = optional,
            EditableField::Ipv4Address => self.ipv4_address = optional,
            EditableField::Ipv6Address => self.ipv6_address = optional,
            EditableField::SicName => self.sic_name = optional,
        }
    }

    /// Current value of an editable field (empty when unset).
    pub fn field(&self, field: EditableField) -> &str {
        match field {
            EditableField::Name => &self.name,
            EditableField::Comments => self.comments.as_deref().unwrap_or_default(),
            EditableField::Ipv4Address => self.ipv4_address.as_deref().unwrap_or_default(),
            EditableField::Ipv6Address => self.ipv6_address.as_deref().unwrap_or_default(),
            EditableField::SicName => self.sic_name.as_deref().unwrap_or_default(),
        }
    }
}
