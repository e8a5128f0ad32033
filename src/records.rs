//! Record types served by the mock API.
//!
//! Serialization follows the platform API wire format: camelCase keys,
//! the `pluginID` spelling, PascalCase capability keys, and timestamps as
//! integer nanoseconds since the epoch.

use serde::{Deserialize, Serialize};

/// How many clients may attach to a volume, and in what role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    SingleNodeWriter,
    SingleNodeReaderOnly,
}

/// Whether a volume is exposed as a mounted file system or a raw device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentMode {
    FileSystem,
    BlockDevice,
}

/// One requested capability pair on a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "AccessMode")]
    pub access_mode: AccessMode,
    #[serde(rename = "AttachmentMode")]
    pub attachment_mode: AttachmentMode,
}

/// The capability set a volume requests when the caller supplies none.
pub fn default_requested_capabilities() -> Vec<Capability> {
    vec![
        Capability {
            access_mode: AccessMode::SingleNodeWriter,
            attachment_mode: AttachmentMode::FileSystem,
        },
        Capability {
            access_mode: AccessMode::SingleNodeReaderOnly,
            attachment_mode: AttachmentMode::BlockDevice,
        },
    ]
}

/// A dynamic host volume as the mock API serves it.
///
/// `namespace`, `namespace_id` and `node_id` are resolved against the
/// fixture store after generation; `None` is the wire-level null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "pluginID")]
    pub plugin_id: String,
    /// Nanoseconds since the epoch.
    pub modify_time: i64,
    /// Nanoseconds since the epoch, never later than `modify_time`.
    pub create_time: i64,
    pub state: String,
    pub capacity_bytes: i64,
    pub requested_capabilities: Vec<Capability>,
    pub path: String,
    pub namespace_id: Option<String>,
    pub namespace: Option<String>,
    pub node_id: Option<String>,
}

/// A namespace fixture volumes can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceRecord {
    pub id: String,
    pub description: String,
}

/// A client node fixture volumes can be placed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub datacenter: String,
}
