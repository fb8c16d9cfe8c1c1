//! Front-panel port: scalar port settings plus its queues as child nodes.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::{AnyNode, NodeFields};
use crate::domain::node::Node;
use crate::domain::queue::PortQueue;
use crate::domain::value::{FieldReader, StructuredValue};

const ID: &str = "id";
const NAME: &str = "name";
const ADMIN_STATE: &str = "adminState";
const SPEED_MBPS: &str = "speedMbps";
const QUEUES: &str = "queues";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdminState {
    #[default]
    Disabled,
    Enabled,
}

impl AdminState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "DISABLED",
            Self::Enabled => "ENABLED",
        }
    }
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DISABLED" => Ok(Self::Disabled),
            "ENABLED" => Ok(Self::Enabled),
            _ => Err(DomainError::invalid_field(
                ADMIN_STATE,
                s,
                "expected ENABLED or DISABLED",
            )),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct PortFields {
    id: u16,
    name: String,
    admin_state: AdminState,
    speed_mbps: Option<u32>,
    queues: Vec<Arc<PortQueue>>,
}

// Manual impl so `clone_from` reuses the name and queue vector storage.
impl Clone for PortFields {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            admin_state: self.admin_state,
            speed_mbps: self.speed_mbps,
            queues: self.queues.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.id = source.id;
        self.name.clone_from(&source.name);
        self.admin_state = source.admin_state;
        self.speed_mbps = source.speed_mbps;
        self.queues.clone_from(&source.queues);
    }
}

impl PortFields {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            admin_state: AdminState::default(),
            speed_mbps: None,
            queues: Vec::new(),
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_state(&self) -> AdminState {
        self.admin_state
    }

    pub fn speed_mbps(&self) -> Option<u32> {
        self.speed_mbps
    }

    pub fn queues(&self) -> &[Arc<PortQueue>] {
        &self.queues
    }

    pub fn queue(&self, id: u8) -> Option<&Arc<PortQueue>> {
        self.queues.iter().find(|q| q.id() == id)
    }

    /// Slot holding queue `id`, for copy-on-write edits via [`Node::modify`].
    pub fn queue_slot_mut(&mut self, id: u8) -> Option<&mut Arc<PortQueue>> {
        self.queues.iter_mut().find(|q| q.id() == id)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_field(NAME, name, "must not be empty"));
        }
        self.name = name;
        Ok(())
    }

    pub fn set_admin_state(&mut self, admin_state: AdminState) {
        self.admin_state = admin_state;
    }

    pub fn set_speed_mbps(&mut self, speed: u32) -> DomainResult<()> {
        if speed == 0 {
            return Err(DomainError::invalid_field(SPEED_MBPS, speed, "must be positive"));
        }
        self.speed_mbps = Some(speed);
        Ok(())
    }

    pub fn clear_speed_mbps(&mut self) {
        self.speed_mbps = None;
    }

    /// Append a queue; queue ids are unique within a port.
    pub fn add_queue(&mut self, queue: Arc<PortQueue>) -> DomainResult<()> {
        if self.queue(queue.id()).is_some() {
            return Err(DomainError::invalid_field(QUEUES, queue.id(), "duplicate queue id"));
        }
        self.queues.push(queue);
        Ok(())
    }

    /// Swap in a new version of an existing queue, keeping its position.
    pub fn replace_queue(&mut self, queue: Arc<PortQueue>) -> DomainResult<Arc<PortQueue>> {
        let id = queue.id();
        let slot = self
            .queue_slot_mut(id)
            .ok_or_else(|| DomainError::invalid_field(QUEUES, id, "no such queue"))?;
        Ok(std::mem::replace(slot, queue))
    }

    pub fn remove_queue(&mut self, id: u8) -> Option<Arc<PortQueue>> {
        let pos = self.queues.iter().position(|q| q.id() == id)?;
        Some(self.queues.remove(pos))
    }
}

impl NodeFields for PortFields {
    const NAME: &'static str = "Port";

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AnyNode)) {
        for queue in &self.queues {
            visit(queue.as_ref());
        }
    }

    fn publish_children(&mut self) {
        for queue in &mut self.queues {
            Node::publish_shared(queue);
        }
    }

    fn to_structured(&self) -> StructuredValue {
        let mut map = BTreeMap::new();
        map.insert(ID.to_string(), self.id.into());
        map.insert(NAME.to_string(), self.name.as_str().into());
        map.insert(ADMIN_STATE.to_string(), self.admin_state.as_str().into());
        if let Some(speed) = self.speed_mbps {
            map.insert(SPEED_MBPS.to_string(), speed.into());
        }
        let queues = self.queues.iter().map(|q| q.to_structured()).collect::<Vec<_>>();
        map.insert(QUEUES.to_string(), queues.into());
        StructuredValue::Map(map)
    }

    fn from_structured(value: &StructuredValue) -> DomainResult<Self> {
        let reader = FieldReader::new(Self::NAME, value)?;
        let mut fields = Self::new(reader.required_int(ID)?, "");
        fields
            .set_name(reader.required_str(NAME)?)
            .map_err(|e| e.into_malformed(Self::NAME))?;
        if let Some(state) = reader.optional_str(ADMIN_STATE)? {
            fields.admin_state = state
                .parse()
                .map_err(|e: DomainError| DomainError::malformed(Self::NAME, e.to_string()))?;
        }
        if let Some(speed) = reader.optional_int(SPEED_MBPS)? {
            fields
                .set_speed_mbps(speed)
                .map_err(|e| e.into_malformed(Self::NAME))?;
        }

        let mut seen = HashSet::new();
        for item in reader.seq(QUEUES)? {
            let queue = PortQueue::from_structured(item)?;
            if !seen.insert(queue.id()) {
                return Err(DomainError::malformed(
                    Self::NAME,
                    format!("duplicate queue id {} on port {}", queue.id(), fields.id),
                ));
            }
            fields.queues.push(Arc::new(queue));
        }
        Ok(fields)
    }

    fn label(&self) -> String {
        format!("port {} ({}) {}", self.id, self.name, self.admin_state)
    }
}

pub type Port = Node<PortFields>;

impl Node<PortFields> {
    pub fn id(&self) -> u16 {
        self.fields().id()
    }

    pub fn name(&self) -> &str {
        self.fields().name()
    }

    pub fn admin_state(&self) -> AdminState {
        self.fields().admin_state()
    }

    pub fn queues(&self) -> &[Arc<PortQueue>] {
        self.fields().queues()
    }

    pub fn queue(&self, id: u8) -> Option<&Arc<PortQueue>> {
        self.fields().queue(id)
    }
}
