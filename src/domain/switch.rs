//! Root of one switch's state tree.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::{AnyNode, NodeFields};
use crate::domain::node::Node;
use crate::domain::port::Port;
use crate::domain::value::{FieldReader, StructuredValue};

const PORTS: &str = "ports";

#[derive(Debug, Default, PartialEq)]
pub struct SwitchStateFields {
    ports: Vec<Arc<Port>>,
}

impl Clone for SwitchStateFields {
    fn clone(&self) -> Self {
        Self {
            ports: self.ports.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.ports.clone_from(&source.ports);
    }
}

impl SwitchStateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ports(&self) -> &[Arc<Port>] {
        &self.ports
    }

    pub fn port(&self, id: u16) -> Option<&Arc<Port>> {
        self.ports.iter().find(|p| p.id() == id)
    }

    pub fn port_slot_mut(&mut self, id: u16) -> Option<&mut Arc<Port>> {
        self.ports.iter_mut().find(|p| p.id() == id)
    }

    pub fn add_port(&mut self, port: Arc<Port>) -> DomainResult<()> {
        if self.port(port.id()).is_some() {
            return Err(DomainError::invalid_field(PORTS, port.id(), "duplicate port id"));
        }
        self.ports.push(port);
        Ok(())
    }

    pub fn remove_port(&mut self, id: u16) -> Option<Arc<Port>> {
        let pos = self.ports.iter().position(|p| p.id() == id)?;
        Some(self.ports.remove(pos))
    }
}

impl NodeFields for SwitchStateFields {
    const NAME: &'static str = "SwitchState";

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AnyNode)) {
        for port in &self.ports {
            visit(port.as_ref());
        }
    }

    fn publish_children(&mut self) {
        for port in &mut self.ports {
            Node::publish_shared(port);
        }
    }

    fn to_structured(&self) -> StructuredValue {
        let ports = self.ports.iter().map(|p| p.to_structured()).collect::<Vec<_>>();
        let mut map = BTreeMap::new();
        map.insert(PORTS.to_string(), ports.into());
        StructuredValue::Map(map)
    }

    fn from_structured(value: &StructuredValue) -> DomainResult<Self> {
        let reader = FieldReader::new(Self::NAME, value)?;
        let mut fields = Self::new();
        let mut seen = HashSet::new();
        for item in reader.seq(PORTS)? {
            let port = Port::from_structured(item)?;
            if !seen.insert(port.id()) {
                return Err(DomainError::malformed(
                    Self::NAME,
                    format!("duplicate port id {}", port.id()),
                ));
            }
            fields.ports.push(Arc::new(port));
        }
        Ok(fields)
    }

    fn label(&self) -> String {
        format!("switch ({} ports)", self.ports.len())
    }
}

pub type SwitchState = Node<SwitchStateFields>;

impl Node<SwitchStateFields> {
    pub fn ports(&self) -> &[Arc<Port>] {
        self.fields().ports()
    }

    pub fn port(&self, id: u16) -> Option<&Arc<Port>> {
        self.fields().port(id)
    }
}
