/// Identifier for a node instance created through a
/// [`crate::plugin::NodeRegistry`].
///
/// This is an index-like handle, and is only meaningful within the
/// lifetime of the registry (or test harness) that handed it out.
pub type NodeHandle = usize;

/// Host-facing type id of a registered node type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeTypeId(pub u32);

/// Attributes exposed by the stretch node.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AttributeId {
    Enable = 0,
    RootPosition = 1,
    EndPosition = 2,
    StretchDistance = 3,
    VolumePreservation = 4,
    Output = 5,
}

impl AttributeId {
    pub const COUNT: usize = 6;

    pub const ALL: [AttributeId; Self::COUNT] = [
        AttributeId::Enable,
        AttributeId::RootPosition,
        AttributeId::EndPosition,
        AttributeId::StretchDistance,
        AttributeId::VolumePreservation,
        AttributeId::Output,
    ];

    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// One attribute on one node instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Plug {
    pub node: NodeHandle,
    pub attribute: AttributeId,
}

impl Plug {
    pub const fn new(node: NodeHandle, attribute: AttributeId) -> Self {
        Self { node, attribute }
    }
}
