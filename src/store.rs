//! In-memory fixture store backing the mock API.
//!
//! The store owns the ordered record collections the factories sample
//! from. It is accessed by a single logical actor at a time (the mock
//! server's request-handling context), so there is no locking here.

use tracing::debug;

use crate::factories::{
    adjust_relationships, Factory, NamespaceFactory, NodeFactory, VolumeFactory,
};
use crate::records::{NamespaceRecord, NodeRecord, VolumeRecord};
use crate::TestResult;

#[derive(Debug, Default)]
pub struct FixtureStore {
    namespaces: Vec<NamespaceRecord>,
    nodes: Vec<NodeRecord>,
    volumes: Vec<VolumeRecord>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_namespace(&mut self, namespace: NamespaceRecord) {
        debug!(id = %namespace.id, "seeded namespace fixture");
        self.namespaces.push(namespace);
    }

    pub fn insert_node(&mut self, node: NodeRecord) {
        debug!(id = %node.id, datacenter = %node.datacenter, "seeded node fixture");
        self.nodes.push(node);
    }

    /// Seed `count` namespaces from the factory
    pub fn seed_namespaces(&mut self, factory: &NamespaceFactory, count: usize) -> TestResult<()> {
        for namespace in factory.build_many(count)? {
            self.insert_namespace(namespace);
        }
        Ok(())
    }

    /// Seed `count` nodes from the factory
    pub fn seed_nodes(&mut self, factory: &NodeFactory, count: usize) -> TestResult<()> {
        for node in factory.build_many(count)? {
            self.insert_node(node);
        }
        Ok(())
    }

    /// Build a volume from the factory, resolve its namespace and node
    /// references against this store, and index it.
    pub fn create_volume(&mut self, factory: &VolumeFactory) -> TestResult<VolumeRecord> {
        let mut volume = factory.build()?;
        adjust_relationships(&mut volume, self)?;
        debug!(id = %volume.id, name = %volume.name, "created volume fixture");
        self.volumes.push(volume.clone());
        Ok(volume)
    }

    pub fn namespaces(&self) -> &[NamespaceRecord] {
        &self.namespaces
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn volumes(&self) -> &[VolumeRecord] {
        &self.volumes
    }
}
