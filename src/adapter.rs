//! Adapter between the Matter client and the host entity platform.
//!
//! Keeps the cached node snapshots and the entities discovered on them.
//! Node events from the client (added, attribute updated, availability,
//! removed) flow in; entity announcements and state updates flow out through
//! the registered platform handlers and state listeners.
//!
//! Locks are always taken nodes first, then entities, and are released
//! before any callback runs.

use crate::config::Config;
use crate::discovery::{DeviceClass, DiscoveryMode, Platform, SchemaRegistry};
use crate::entity::{EntityInfo, EntityState, MatterEntity};
use crate::error::{Error, Result};
use crate::matter::{AttributePath, AttributeValue, MatterNode};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::{RwLock, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receives newly discovered entities of one platform.
pub type AddEntitiesCallback = Arc<dyn Fn(Vec<EntitySnapshot>) + Send + Sync>;

/// Receives every entity state change.
pub type StateListener = Arc<dyn Fn(&StateUpdate) + Send + Sync>;

/// Entity as announced to the host platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub unique_id: String,
    pub platform: Platform,
    pub key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    pub node_id: u64,
    pub endpoint_id: u16,
    pub state: EntityState,
}

impl EntitySnapshot {
    fn of(entity: &dyn MatterEntity) -> Self {
        let info = entity.info();
        Self {
            unique_id: info.unique_id(),
            platform: info.platform,
            key: info.description.key,
            translation_key: info.description.translation_key,
            device_class: info.description.device_class,
            node_id: info.node_id,
            endpoint_id: info.endpoint_id,
            state: entity.state(),
        }
    }
}

/// A changed entity state, ready for the host framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateUpdate {
    pub unique_id: String,
    pub platform: Platform,
    pub state: EntityState,
    pub timestamp: DateTime<Utc>,
}

/// Node events delivered by the Matter client's subscription transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatterEvent {
    NodeAdded {
        node: MatterNode,
    },
    AttributeUpdated {
        node_id: u64,
        path: AttributePath,
        value: AttributeValue,
    },
    NodeAvailability {
        node_id: u64,
        available: bool,
    },
    NodeRemoved {
        node_id: u64,
    },
}

pub struct MatterAdapter {
    registry: SchemaRegistry,
    mode: DiscoveryMode,
    platform_handlers: RwLock<HashMap<Platform, AddEntitiesCallback>>,
    state_listeners: RwLock<Vec<StateListener>>,
    nodes: RwLock<HashMap<u64, MatterNode>>,
    entities: RwLock<HashMap<u64, Vec<Box<dyn MatterEntity>>>>,
}

impl MatterAdapter {
    pub fn new(registry: SchemaRegistry, mode: DiscoveryMode) -> Self {
        Self {
            registry,
            mode,
            platform_handlers: RwLock::new(HashMap::new()),
            state_listeners: RwLock::new(Vec::new()),
            nodes: RwLock::new(HashMap::new()),
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Built-in schemas, filtered and configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let registry = SchemaRegistry::builtin()
            .with_disabled_platforms(config.discovery.disabled_platforms.iter().copied());
        Self::new(registry, config.discovery.mode)
    }

    /// Register the sink that receives entities discovered for `platform`.
    /// Replaces any earlier handler for the same platform.
    pub fn register_platform_handler(
        &self,
        platform: Platform,
        handler: impl Fn(Vec<EntitySnapshot>) + Send + Sync + 'static,
    ) {
        debug!("Registered handler for platform {}", platform);
        self.platform_handlers
            .write()
            .insert(platform, Arc::new(handler));
    }

    pub fn subscribe_state(&self, listener: impl Fn(&StateUpdate) + Send + Sync + 'static) {
        self.state_listeners.write().push(Arc::new(listener));
    }

    /// Cache a node, discover entities on each of its endpoints and announce
    /// them. A node that is already known has its entities replaced.
    pub fn add_node(&self, node: MatterNode) -> Vec<EntitySnapshot> {
        let node_id = node.node_id;
        let mut created: Vec<Box<dyn MatterEntity>> = Vec::new();

        for endpoint in node.endpoints() {
            for schema in self.registry.discover(&endpoint, self.mode) {
                let Some(info) = EntityInfo::new(schema, &endpoint) else {
                    continue;
                };
                let mut entity = schema.entity_class.instantiate(info);
                entity.update_from_device(&endpoint);
                debug!(
                    "Node {} endpoint {}: created {} entity {}",
                    node_id,
                    endpoint.endpoint_id(),
                    schema.platform,
                    entity.unique_id()
                );
                created.push(entity);
            }
        }

        let snapshots: Vec<EntitySnapshot> = created
            .iter()
            .map(|e| EntitySnapshot::of(&**e))
            .collect();

        {
            let mut nodes = self.nodes.write();
            let mut entities = self.entities.write();
            nodes.insert(node_id, node);
            if entities.insert(node_id, created).is_some() {
                info!("Node {} re-added, replacing its entities", node_id);
            }
        }

        info!(
            "Node {} added with {} entities",
            node_id,
            snapshots.len()
        );
        self.announce(&snapshots);
        snapshots
    }

    /// Store a reported attribute value and re-project every entity on that
    /// endpoint watching the attribute. Returns the state changes emitted.
    pub fn update_attribute(
        &self,
        node_id: u64,
        path: AttributePath,
        value: AttributeValue,
    ) -> Result<Vec<StateUpdate>> {
        let updates = {
            let mut nodes = self.nodes.write();
            let node = nodes.get_mut(&node_id).ok_or(Error::NodeNotFound(node_id))?;
            debug!("Node {} attribute {} = {}", node_id, path, value);
            node.set_attribute_value(path, value);

            let nodes = RwLockWriteGuard::downgrade(nodes);
            let node = nodes.get(&node_id).ok_or(Error::NodeNotFound(node_id))?;
            let mut entities = self.entities.write();
            match entities.get_mut(&node_id) {
                Some(node_entities) => refresh(node, node_entities, |info| {
                    info.endpoint_id == path.endpoint_id && info.is_watching(path.attribute())
                }),
                None => Vec::new(),
            }
        };

        self.emit(&updates);
        Ok(updates)
    }

    /// Propagate node availability to all of its entities.
    pub fn set_node_available(&self, node_id: u64, available: bool) -> Result<Vec<StateUpdate>> {
        let updates = {
            let mut nodes = self.nodes.write();
            let node = nodes.get_mut(&node_id).ok_or(Error::NodeNotFound(node_id))?;
            if node.available != available {
                info!(
                    "Node {} is now {}",
                    node_id,
                    if available { "available" } else { "unavailable" }
                );
            }
            node.available = available;

            let nodes = RwLockWriteGuard::downgrade(nodes);
            let node = nodes.get(&node_id).ok_or(Error::NodeNotFound(node_id))?;
            let mut entities = self.entities.write();
            match entities.get_mut(&node_id) {
                Some(node_entities) => refresh(node, node_entities, |_| true),
                None => Vec::new(),
            }
        };

        self.emit(&updates);
        Ok(updates)
    }

    /// Drop a node and its entities. Returns the unique ids removed.
    pub fn remove_node(&self, node_id: u64) -> Result<Vec<String>> {
        let mut nodes = self.nodes.write();
        let mut entities = self.entities.write();
        nodes.remove(&node_id).ok_or(Error::NodeNotFound(node_id))?;
        let removed: Vec<String> = entities
            .remove(&node_id)
            .unwrap_or_default()
            .iter()
            .map(|e| e.unique_id())
            .collect();
        info!("Node {} removed along with {} entities", node_id, removed.len());
        Ok(removed)
    }

    /// Cached read of an attribute value.
    pub fn get_matter_attribute_value(&self, node_id: u64, path: &AttributePath) -> Option<AttributeValue> {
        self.nodes
            .read()
            .get(&node_id)?
            .get_attribute_value(path)
            .cloned()
    }

    /// Every tracked entity, ordered by unique id.
    pub fn entities(&self) -> Vec<EntitySnapshot> {
        let entities = self.entities.read();
        let mut snapshots: Vec<EntitySnapshot> = entities
            .values()
            .flatten()
            .map(|e| EntitySnapshot::of(&**e))
            .collect();
        snapshots.sort_by(|a, b| a.unique_id.cmp(&b.unique_id));
        snapshots
    }

    pub fn entity_state(&self, unique_id: &str) -> Option<EntityState> {
        self.entities
            .read()
            .values()
            .flatten()
            .find(|e| e.unique_id() == unique_id)
            .map(|e| e.state())
    }

    pub fn handle_event(&self, event: MatterEvent) -> Result<()> {
        match event {
            MatterEvent::NodeAdded { node } => {
                self.add_node(node);
            }
            MatterEvent::AttributeUpdated {
                node_id,
                path,
                value,
            } => {
                self.update_attribute(node_id, path, value)?;
            }
            MatterEvent::NodeAvailability { node_id, available } => {
                self.set_node_available(node_id, available)?;
            }
            MatterEvent::NodeRemoved { node_id } => {
                self.remove_node(node_id)?;
            }
        }
        Ok(())
    }

    /// Process events until the channel closes. A failing event is logged
    /// and skipped.
    pub async fn run(&self, mut events: mpsc::Receiver<MatterEvent>) {
        info!("Matter adapter listening for node events");
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_event(event) {
                warn!("Failed to handle Matter event: {}", e);
            }
        }
        info!("Matter event channel closed");
    }

    fn announce(&self, snapshots: &[EntitySnapshot]) {
        let mut by_platform: HashMap<Platform, Vec<EntitySnapshot>> = HashMap::new();
        for snapshot in snapshots {
            by_platform
                .entry(snapshot.platform)
                .or_default()
                .push(snapshot.clone());
        }

        for (platform, batch) in by_platform {
            let handler = self.platform_handlers.read().get(&platform).cloned();
            match handler {
                Some(handler) => handler(batch),
                None => warn!(
                    "No handler registered for platform {}, {} entities not announced",
                    platform,
                    batch.len()
                ),
            }
        }
    }

    fn emit(&self, updates: &[StateUpdate]) {
        if updates.is_empty() {
            return;
        }
        let listeners = self.state_listeners.read().clone();
        for update in updates {
            for listener in &listeners {
                listener(update);
            }
        }
    }
}

/// Re-read the selected entities of a node and collect the states that
/// changed.
fn refresh(
    node: &MatterNode,
    entities: &mut [Box<dyn MatterEntity>],
    selected: impl Fn(&EntityInfo) -> bool,
) -> Vec<StateUpdate> {
    let timestamp = Utc::now();
    let mut updates = Vec::new();

    for entity in entities.iter_mut().filter(|e| selected(e.info())) {
        let Some(endpoint) = node.endpoint(entity.info().endpoint_id) else {
            continue;
        };
        let before = entity.state();
        entity.update_from_device(&endpoint);
        let after = entity.state();
        if after != before {
            updates.push(StateUpdate {
                unique_id: entity.unique_id(),
                platform: entity.info().platform,
                state: after,
                timestamp,
            });
        }
    }

    updates
}
