//! Factory system for fixture record generation
//!
//! Each factory evaluates a set of per-field generators in dependency
//! order, skipping any field the caller supplied through the override
//! map. Volume records additionally go through a second phase,
//! [`adjust_relationships`], that resolves their namespace and node
//! references against the fixture store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;

use crate::records::{
    default_requested_capabilities, NamespaceRecord, NodeRecord, VolumeRecord,
};
use crate::store::FixtureStore;
use crate::{utils, TestError, TestResult};

/// Upper bound for timestamp sampling, captured once per process so all
/// records share the same window unless a factory pins its own instant.
static REF_INSTANT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Width of the sampling window for generated timestamps.
const TIME_WINDOW_MILLIS: i64 = 2 * utils::MILLIS_PER_DAY;

const NANOS_PER_MILLI: i64 = 1_000_000;

const DATACENTERS: &[&str] = &["dc1", "dc2", "dc3"];

/// Factory trait for building fixture records
pub trait Factory<T> {
    /// Build a single record without touching the store
    fn build(&self) -> TestResult<T>;

    /// Build multiple records
    fn build_many(&self, count: usize) -> TestResult<Vec<T>> {
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(self.build()?);
        }
        Ok(results)
    }
}

/// Attribute-override map shared by all factories
///
/// Keys are the record's wire field names (`"pluginID"`, `"modifyTime"`,
/// ...); a present key suppresses that field's generator.
#[derive(Clone)]
pub struct FactoryBuilder<T> {
    attributes: HashMap<String, JsonValue>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> FactoryBuilder<T> {
    /// Create a new factory builder
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Set an attribute value
    pub fn with<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.attributes.insert(key.to_string(), json_value);
        }
        self
    }

    /// Set multiple attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, JsonValue>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Get the current attributes
    pub fn attributes(&self) -> &HashMap<String, JsonValue> {
        &self.attributes
    }
}

impl<T> Default for FactoryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn string_attr(attrs: &HashMap<String, JsonValue>, key: &str) -> Option<String> {
    attrs.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Dynamic host volume factory
#[derive(Clone)]
pub struct VolumeFactory {
    builder: FactoryBuilder<VolumeRecord>,
    reference: Option<DateTime<Utc>>,
}

impl VolumeFactory {
    pub fn new() -> Self {
        Self {
            builder: FactoryBuilder::new(),
            reference: None,
        }
    }

    /// Set an arbitrary override by wire field name
    pub fn with<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.builder = self.builder.with(key, value);
        self
    }

    /// Set multiple overrides at once
    pub fn with_attributes(mut self, attributes: HashMap<String, JsonValue>) -> Self {
        self.builder = self.builder.with_attributes(attributes);
        self
    }

    /// Set custom name
    pub fn named(self, name: &str) -> Self {
        self.with("name", name)
    }

    /// Set the backing plugin
    pub fn with_plugin(self, plugin_id: &str) -> Self {
        self.with("pluginID", plugin_id)
    }

    /// Set custom capacity in bytes
    pub fn with_capacity(self, bytes: i64) -> Self {
        self.with("capacityBytes", bytes)
    }

    /// Set custom state
    pub fn with_state(self, state: &str) -> Self {
        self.with("state", state)
    }

    /// File the volume under an explicit namespace
    pub fn in_namespace(self, namespace_id: &str) -> Self {
        self.with("namespaceId", namespace_id)
    }

    /// Place the volume on an explicit node
    pub fn on_node(self, node_id: &str) -> Self {
        self.with("nodeId", node_id)
    }

    /// Pin the upper bound of the timestamp sampling window, instead of
    /// the shared per-process instant
    pub fn reference_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.reference = Some(instant);
        self
    }
}

impl Factory<VolumeRecord> for VolumeFactory {
    fn build(&self) -> TestResult<VolumeRecord> {
        let attrs = self.builder.attributes();

        let id = string_attr(attrs, "id").unwrap_or_else(utils::random_uuid);
        let name = string_attr(attrs, "name").unwrap_or_else(utils::random_word);
        let plugin_id = string_attr(attrs, "pluginID").unwrap_or_else(utils::random_word);

        // modifyTime resolves first; createTime samples relative to it.
        let reference_millis = self.reference.unwrap_or(*REF_INSTANT).timestamp_millis();
        let modify_time = attrs
            .get("modifyTime")
            .and_then(JsonValue::as_i64)
            .unwrap_or_else(|| {
                utils::past_millis(TIME_WINDOW_MILLIS, reference_millis) * NANOS_PER_MILLI
            });
        let create_time = attrs
            .get("createTime")
            .and_then(JsonValue::as_i64)
            .unwrap_or_else(|| {
                utils::past_millis(TIME_WINDOW_MILLIS, modify_time / NANOS_PER_MILLI)
                    * NANOS_PER_MILLI
            });

        let requested_capabilities = match attrs.get("requestedCapabilities") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => default_requested_capabilities(),
        };

        Ok(VolumeRecord {
            id,
            name,
            plugin_id,
            modify_time,
            create_time,
            state: string_attr(attrs, "state").unwrap_or_else(|| "ready".to_string()),
            capacity_bytes: attrs
                .get("capacityBytes")
                .and_then(JsonValue::as_i64)
                .unwrap_or(10_000_000),
            requested_capabilities,
            path: string_attr(attrs, "path").unwrap_or_else(utils::random_file_path),
            namespace_id: string_attr(attrs, "namespaceId"),
            namespace: string_attr(attrs, "namespace"),
            node_id: string_attr(attrs, "nodeId"),
        })
    }
}

impl Default for VolumeFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a freshly built volume's namespace and node references against
/// the store's fixture pools.
///
/// The namespace pair is normalized so `namespace == namespace_id` holds
/// afterwards; an already-set `node_id` is left untouched. Fails when the
/// node pool is empty and no `node_id` was supplied, so test setups that
/// forget to seed a node fail immediately.
pub fn adjust_relationships(record: &mut VolumeRecord, store: &FixtureStore) -> TestResult<()> {
    if is_unset(&record.namespace_id) {
        let picked = utils::pick_one(store.namespaces()).map(|ns| ns.id.clone());
        record.namespace = picked.clone();
        record.namespace_id = picked;
    } else {
        record.namespace = record.namespace_id.clone();
    }

    if is_unset(&record.node_id) {
        let node = utils::pick_one(store.nodes()).ok_or_else(|| TestError::Factory {
            message: format!("cannot place volume {}: no node fixtures seeded", record.id),
        })?;
        record.node_id = Some(node.id.clone());
    }

    Ok(())
}

// Empty strings count as unset, matching the original mock's falsy check
// on JSON-sourced overrides.
fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Namespace fixture factory
#[derive(Clone)]
pub struct NamespaceFactory {
    builder: FactoryBuilder<NamespaceRecord>,
}

impl NamespaceFactory {
    pub fn new() -> Self {
        Self {
            builder: FactoryBuilder::new(),
        }
    }

    /// Set an explicit namespace id
    pub fn with_id(mut self, id: &str) -> Self {
        self.builder = self.builder.with("id", id);
        self
    }
}

impl Factory<NamespaceRecord> for NamespaceFactory {
    fn build(&self) -> TestResult<NamespaceRecord> {
        let attrs = self.builder.attributes();

        let id = string_attr(attrs, "id")
            .unwrap_or_else(|| format!("{}-{}", utils::random_word(), utils::random_word()));
        let description =
            string_attr(attrs, "description").unwrap_or_else(|| format!("Mock namespace {}", id));

        Ok(NamespaceRecord { id, description })
    }
}

impl Default for NamespaceFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Client node fixture factory
#[derive(Clone)]
pub struct NodeFactory {
    builder: FactoryBuilder<NodeRecord>,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self {
            builder: FactoryBuilder::new(),
        }
    }

    /// Set an explicit node id
    pub fn with_id(mut self, id: &str) -> Self {
        self.builder = self.builder.with("id", id);
        self
    }

    /// Set the datacenter the node reports
    pub fn in_datacenter(mut self, datacenter: &str) -> Self {
        self.builder = self.builder.with("datacenter", datacenter);
        self
    }
}

impl Factory<NodeRecord> for NodeFactory {
    fn build(&self) -> TestResult<NodeRecord> {
        let attrs = self.builder.attributes();

        Ok(NodeRecord {
            id: string_attr(attrs, "id").unwrap_or_else(utils::random_uuid),
            name: string_attr(attrs, "name")
                .unwrap_or_else(|| format!("node-{}", utils::random_word())),
            datacenter: string_attr(attrs, "datacenter").unwrap_or_else(|| {
                utils::pick_one(DATACENTERS)
                    .copied()
                    .unwrap_or("dc1")
                    .to_string()
            }),
        })
    }
}

impl Default for NodeFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AccessMode, AttachmentMode};
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_volume_defaults() -> TestResult<()> {
        let volume = VolumeFactory::new().build()?;

        assert!(!volume.id.is_empty());
        assert!(!volume.name.is_empty());
        assert!(!volume.plugin_id.is_empty());
        assert_eq!(volume.state, "ready");
        assert_eq!(volume.capacity_bytes, 10_000_000);
        assert!(volume.path.starts_with('/'));
        assert!(volume.namespace_id.is_none());
        assert!(volume.node_id.is_none());

        Ok(())
    }

    #[test]
    fn test_create_time_never_after_modify_time() -> TestResult<()> {
        let factory = VolumeFactory::new();
        for volume in factory.build_many(50)? {
            assert!(volume.create_time <= volume.modify_time);
        }
        Ok(())
    }

    #[test]
    fn test_timestamps_fall_in_sampling_window() -> TestResult<()> {
        let reference = fixed_reference();
        let reference_ns = reference.timestamp_millis() * NANOS_PER_MILLI;
        let window_ns = TIME_WINDOW_MILLIS * NANOS_PER_MILLI;

        let factory = VolumeFactory::new().reference_instant(reference);
        for volume in factory.build_many(50)? {
            assert!(volume.modify_time <= reference_ns);
            assert!(volume.modify_time >= reference_ns - window_ns);
            assert!(volume.create_time >= volume.modify_time - window_ns);
        }

        Ok(())
    }

    #[test]
    fn test_modify_time_override_bounds_create_time() -> TestResult<()> {
        let modify_ns = 1_700_000_000_000i64 * NANOS_PER_MILLI;
        let factory = VolumeFactory::new().with("modifyTime", modify_ns);

        for volume in factory.build_many(20)? {
            assert_eq!(volume.modify_time, modify_ns);
            assert!(volume.create_time <= modify_ns);
            assert!(volume.create_time >= modify_ns - TIME_WINDOW_MILLIS * NANOS_PER_MILLI);
        }

        Ok(())
    }

    #[test]
    fn test_default_capability_pairs() -> TestResult<()> {
        let volume = VolumeFactory::new().build()?;

        assert_eq!(volume.requested_capabilities.len(), 2);
        assert_eq!(
            volume.requested_capabilities[0].access_mode,
            AccessMode::SingleNodeWriter
        );
        assert_eq!(
            volume.requested_capabilities[0].attachment_mode,
            AttachmentMode::FileSystem
        );
        assert_eq!(
            volume.requested_capabilities[1].access_mode,
            AccessMode::SingleNodeReaderOnly
        );
        assert_eq!(
            volume.requested_capabilities[1].attachment_mode,
            AttachmentMode::BlockDevice
        );

        Ok(())
    }

    #[test]
    fn test_capability_override_from_json() -> TestResult<()> {
        let volume = VolumeFactory::new()
            .with(
                "requestedCapabilities",
                json!([{ "AccessMode": "single-node-reader-only",
                         "AttachmentMode": "block-device" }]),
            )
            .build()?;

        assert_eq!(volume.requested_capabilities.len(), 1);
        assert_eq!(
            volume.requested_capabilities[0].access_mode,
            AccessMode::SingleNodeReaderOnly
        );

        Ok(())
    }

    #[test]
    fn test_field_overrides() -> TestResult<()> {
        let volume = VolumeFactory::new()
            .named("vol-1")
            .with_plugin("mkdir")
            .with_capacity(5000)
            .with_state("pending")
            .build()?;

        assert_eq!(volume.name, "vol-1");
        assert_eq!(volume.plugin_id, "mkdir");
        assert_eq!(volume.capacity_bytes, 5000);
        assert_eq!(volume.state, "pending");

        Ok(())
    }

    #[test]
    fn test_adjust_picks_namespace_from_store() -> TestResult<()> {
        let mut store = FixtureStore::new();
        store.seed_namespaces(&NamespaceFactory::new(), 3)?;
        store.seed_nodes(&NodeFactory::new(), 1)?;

        let mut volume = VolumeFactory::new().build()?;
        adjust_relationships(&mut volume, &store)?;

        assert_eq!(volume.namespace, volume.namespace_id);
        let picked = volume.namespace_id.as_deref().unwrap();
        assert!(store.namespaces().iter().any(|ns| ns.id == picked));

        Ok(())
    }

    #[test]
    fn test_adjust_without_namespaces_leaves_pair_unset() -> TestResult<()> {
        let mut store = FixtureStore::new();
        store.seed_nodes(&NodeFactory::new(), 1)?;

        let mut volume = VolumeFactory::new().build()?;
        adjust_relationships(&mut volume, &store)?;

        assert!(volume.namespace.is_none());
        assert!(volume.namespace_id.is_none());

        Ok(())
    }

    #[test]
    fn test_adjust_normalizes_explicit_namespace_id() -> TestResult<()> {
        let mut store = FixtureStore::new();
        store.seed_namespaces(&NamespaceFactory::new(), 2)?;
        store.seed_nodes(&NodeFactory::new(), 1)?;

        let mut volume = VolumeFactory::new().in_namespace("ns-1").build()?;
        adjust_relationships(&mut volume, &store)?;

        assert_eq!(volume.namespace_id.as_deref(), Some("ns-1"));
        assert_eq!(volume.namespace.as_deref(), Some("ns-1"));

        Ok(())
    }

    #[test]
    fn test_adjust_treats_empty_namespace_id_as_unset() -> TestResult<()> {
        let mut store = FixtureStore::new();
        store.seed_namespaces(&NamespaceFactory::new().with_id("default"), 1)?;
        store.seed_nodes(&NodeFactory::new(), 1)?;

        let mut volume = VolumeFactory::new().in_namespace("").build()?;
        adjust_relationships(&mut volume, &store)?;

        assert_eq!(volume.namespace_id.as_deref(), Some("default"));
        assert_eq!(volume.namespace.as_deref(), Some("default"));

        Ok(())
    }

    #[test]
    fn test_adjust_fails_without_nodes() -> TestResult<()> {
        let store = FixtureStore::new();
        let mut volume = VolumeFactory::new().build()?;

        let result = adjust_relationships(&mut volume, &store);
        assert!(matches!(result, Err(TestError::Factory { .. })));

        Ok(())
    }

    #[test]
    fn test_adjust_keeps_explicit_node_id() -> TestResult<()> {
        let mut store = FixtureStore::new();
        store.seed_nodes(&NodeFactory::new(), 3)?;

        let mut volume = VolumeFactory::new().on_node("node-9").build()?;
        adjust_relationships(&mut volume, &store)?;

        assert_eq!(volume.node_id.as_deref(), Some("node-9"));

        Ok(())
    }

    #[test]
    fn test_node_factory_defaults() -> TestResult<()> {
        let node = NodeFactory::new().build()?;

        assert!(!node.id.is_empty());
        assert!(node.name.starts_with("node-"));
        assert!(DATACENTERS.contains(&node.datacenter.as_str()));

        Ok(())
    }

    #[test]
    fn test_build_many_generates_unique_ids() -> TestResult<()> {
        let volumes = VolumeFactory::new().build_many(5)?;

        for i in 0..volumes.len() {
            for j in (i + 1)..volumes.len() {
                assert_ne!(volumes[i].id, volumes[j].id);
            }
        }

        Ok(())
    }
}
