//! Plug-in load/unload hooks and the node type registry they talk to.

use log::{error, info};

use crate::datablock::DataBlock;
use crate::error::{Result, StretchError};
use crate::node::{DependencyNode, StretchNode};
use crate::schema::{AttrValue, NodeSchema, STRETCH_SCHEMA};
use crate::types::{AttributeId, NodeHandle, NodeTypeId, Plug};

pub const PLUGIN_VERSION: &str = "1.0";

pub type NodeCreator = fn() -> Box<dyn DependencyNode>;

#[derive(Debug)]
struct Registration {
    name: String,
    id: NodeTypeId,
    creator: NodeCreator,
    schema: &'static NodeSchema,
}

/// A live node: its compute implementation plus the host storage for it.
pub struct NodeInstance {
    pub handle: NodeHandle,
    pub node: Box<dyn DependencyNode>,
    pub block: DataBlock,
}

impl NodeInstance {
    /// Sets an input by long or short attribute name.
    pub fn set(&mut self, name: &str, value: AttrValue) -> Result<()> {
        let id = self.block.schema().find(name)?.id;
        self.block.set_input(id, value)
    }

    /// Reads `id`, computing it first if it is a dirty output.
    pub fn get(&mut self, id: AttributeId) -> Result<AttrValue> {
        if self.block.schema().is_output(id) {
            self.block.pull(self.node.as_ref(), Plug::new(self.handle, id))
        } else {
            Ok(self.block.input_value(id))
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Registration>,
    next_handle: NodeHandle,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_node(
        &mut self,
        name: &str,
        id: NodeTypeId,
        creator: NodeCreator,
        schema: &'static NodeSchema,
    ) -> Result<()> {
        if self.nodes.iter().any(|r| r.name == name || r.id == id) {
            return Err(StretchError::AlreadyRegistered {
                name: name.to_string(),
                id,
            });
        }
        self.nodes.push(Registration {
            name: name.to_string(),
            id,
            creator,
            schema,
        });
        Ok(())
    }

    pub fn deregister_node(&mut self, id: NodeTypeId) -> Result<()> {
        let pos = self
            .nodes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StretchError::NotRegistered(format!("{id:?}")))?;
        self.nodes.remove(pos);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Instantiates a registered node type with default attribute values.
    pub fn create(&mut self, name: &str) -> Result<NodeInstance> {
        let reg = self
            .nodes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| StretchError::NotRegistered(name.to_string()))?;

        let handle = self.next_handle;
        self.next_handle += 1;

        Ok(NodeInstance {
            handle,
            node: (reg.creator)(),
            block: DataBlock::new(reg.schema),
        })
    }
}

fn node_creator() -> Box<dyn DependencyNode> {
    Box::new(StretchNode)
}

/// Registers the stretch node type.
pub fn initialize_plugin(registry: &mut NodeRegistry) -> Result<()> {
    registry
        .register_node(
            StretchNode::TYPE_NAME,
            StretchNode::TYPE_ID,
            node_creator,
            &STRETCH_SCHEMA,
        )
        .inspect_err(|e| error!("Failed to register: {}: {e}", StretchNode::TYPE_NAME))?;
    info!(
        "Registered {} {:?} (plug-in {PLUGIN_VERSION})",
        StretchNode::TYPE_NAME,
        StretchNode::TYPE_ID
    );
    Ok(())
}

/// Removes the stretch node type.
pub fn uninitialize_plugin(registry: &mut NodeRegistry) -> Result<()> {
    registry
        .deregister_node(StretchNode::TYPE_ID)
        .inspect_err(|e| error!("Failed to deregister: {}: {e}", StretchNode::TYPE_NAME))?;
    info!("Deregistered {}", StretchNode::TYPE_NAME);
    Ok(())
}
