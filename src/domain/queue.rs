//! Per-port traffic queue descriptor.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::fields::NodeFields;
use crate::domain::node::Node;
use crate::domain::value::{FieldReader, StructuredValue};

const ID: &str = "id";
const STREAM_TYPE: &str = "streamType";
const PRIORITY: &str = "priority";
const WEIGHT: &str = "weight";

/// Traffic class a queue carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamType {
    #[default]
    Unicast,
    Multicast,
    All,
}

impl StreamType {
    pub const ALL_VARIANTS: [StreamType; 3] = [Self::Unicast, Self::Multicast, Self::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unicast => "UNICAST",
            Self::Multicast => "MULTICAST",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_VARIANTS
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DomainError::invalid_field(STREAM_TYPE, s, "expected UNICAST, MULTICAST or ALL")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortQueueFields {
    id: u8,
    stream_type: StreamType,
    priority: Option<i32>,
    weight: Option<i32>,
}

impl PortQueueFields {
    pub fn new(id: u8, stream_type: StreamType) -> Self {
        Self {
            id,
            stream_type,
            priority: None,
            weight: None,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn weight(&self) -> Option<i32> {
        self.weight
    }

    pub fn set_stream_type(&mut self, stream_type: StreamType) {
        self.stream_type = stream_type;
    }

    pub fn set_stream_type_name(&mut self, name: &str) -> DomainResult<()> {
        self.stream_type = name.parse()?;
        Ok(())
    }

    pub fn set_priority(&mut self, priority: i32) -> DomainResult<()> {
        self.priority = Some(non_negative(PRIORITY, priority)?);
        Ok(())
    }

    pub fn set_weight(&mut self, weight: i32) -> DomainResult<()> {
        self.weight = Some(non_negative(WEIGHT, weight)?);
        Ok(())
    }

    pub fn clear_priority(&mut self) {
        self.priority = None;
    }

    pub fn clear_weight(&mut self) {
        self.weight = None;
    }
}

fn non_negative(field: &'static str, value: i32) -> DomainResult<i32> {
    if value < 0 {
        return Err(DomainError::invalid_field(field, value, "must not be negative"));
    }
    Ok(value)
}

impl NodeFields for PortQueueFields {
    const NAME: &'static str = "PortQueue";

    fn to_structured(&self) -> StructuredValue {
        let mut map = BTreeMap::new();
        map.insert(ID.to_string(), self.id.into());
        map.insert(STREAM_TYPE.to_string(), self.stream_type.as_str().into());
        if let Some(priority) = self.priority {
            map.insert(PRIORITY.to_string(), priority.into());
        }
        if let Some(weight) = self.weight {
            map.insert(WEIGHT.to_string(), weight.into());
        }
        StructuredValue::Map(map)
    }

    fn from_structured(value: &StructuredValue) -> DomainResult<Self> {
        let reader = FieldReader::new(Self::NAME, value)?;
        let id = reader.required_int::<u8>(ID)?;
        let stream_type = reader
            .required_str(STREAM_TYPE)?
            .parse::<StreamType>()
            .map_err(|e| DomainError::malformed(Self::NAME, e.to_string()))?;

        let mut fields = Self::new(id, stream_type);
        if let Some(priority) = reader.optional_int(PRIORITY)? {
            fields
                .set_priority(priority)
                .map_err(|e| e.into_malformed(Self::NAME))?;
        }
        if let Some(weight) = reader.optional_int(WEIGHT)? {
            fields
                .set_weight(weight)
                .map_err(|e| e.into_malformed(Self::NAME))?;
        }
        Ok(fields)
    }

    fn label(&self) -> String {
        let opt = |v: Option<i32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        format!(
            "queue {} {} weight={} priority={}",
            self.id,
            self.stream_type,
            opt(self.weight),
            opt(self.priority)
        )
    }
}

pub type PortQueue = Node<PortQueueFields>;

impl Node<PortQueueFields> {
    pub fn id(&self) -> u8 {
        self.fields().id()
    }

    pub fn stream_type(&self) -> StreamType {
        self.fields().stream_type()
    }

    pub fn priority(&self) -> Option<i32> {
        self.fields().priority()
    }

    pub fn weight(&self) -> Option<i32> {
        self.fields().weight()
    }
}
