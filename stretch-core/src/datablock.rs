//! Host-side storage for one node instance's attribute values.
//!
//! [`DataBlock`] plays the part of the host's dependency graph for a single
//! node: it hands typed input values to `compute`, stores what `compute`
//! writes back, and tracks which outputs are stale.
//!
//! Writing an input marks every output it `affects` dirty; reading an output
//! through [`DataBlock::pull`] recomputes it only while it is dirty.

use log::debug;

use crate::error::{Result, StretchError};
use crate::node::DependencyNode;
use crate::schema::{AttrValue, NodeSchema};
use crate::types::{AttributeId, Plug};

#[derive(Debug, Clone)]
pub struct DataBlock {
    schema: &'static NodeSchema,
    values: [AttrValue; AttributeId::COUNT],
    dirty: [bool; AttributeId::COUNT],
}

impl DataBlock {
    /// Creates a block with every attribute at its schema default.
    ///
    /// Outputs start dirty, since nothing has been computed yet.
    pub fn new(schema: &'static NodeSchema) -> Self {
        let values = AttributeId::ALL.map(|id| schema.attribute(id).default);
        let dirty = AttributeId::ALL.map(|id| schema.is_output(id));
        Self {
            schema,
            values,
            dirty,
        }
    }

    pub fn schema(&self) -> &'static NodeSchema {
        self.schema
    }

    /// Stores a new input value, applying the attribute's range constraint,
    /// and marks every affected output dirty.
    ///
    /// ### Errors
    /// - [`StretchError::ReadOnlyAttribute`] if `id` is an output or not writable.
    /// - [`StretchError::TypeMismatch`] if `value` has the wrong kind.
    pub fn set_input(&mut self, id: AttributeId, value: AttrValue) -> Result<()> {
        let schema = self.schema;
        let spec = schema.attribute(id);

        if schema.is_output(id) || !spec.writable {
            return Err(StretchError::ReadOnlyAttribute(id));
        }
        if value.kind() != spec.kind {
            return Err(StretchError::TypeMismatch {
                attribute: id,
                expected: spec.kind.name(),
            });
        }

        let constrained = spec.constrain(value);
        if constrained != value {
            debug!(
                "{} constrained from {:?} to {:?}",
                spec.long_name, value, constrained
            );
        }
        self.values[id.as_index()] = constrained;

        for dst in schema.affects(id) {
            self.dirty[dst.as_index()] = true;
        }
        Ok(())
    }

    #[inline]
    pub fn input_value(&self, id: AttributeId) -> AttrValue {
        self.values[id.as_index()]
    }

    /// Last value written to `id`, without triggering a compute.
    #[inline]
    pub fn output_value(&self, id: AttributeId) -> AttrValue {
        self.values[id.as_index()]
    }

    pub fn set_output(&mut self, id: AttributeId, value: AttrValue) -> Result<()> {
        let spec = self.schema.attribute(id);
        if value.kind() != spec.kind {
            return Err(StretchError::TypeMismatch {
                attribute: id,
                expected: spec.kind.name(),
            });
        }
        self.values[id.as_index()] = value;
        Ok(())
    }

    /// Marks `plug`'s attribute as up to date.
    pub fn set_clean(&mut self, plug: Plug) {
        self.dirty[plug.attribute.as_index()] = false;
    }

    #[inline]
    pub fn is_dirty(&self, id: AttributeId) -> bool {
        self.dirty[id.as_index()]
    }

    /// Returns the value of `plug`, asking `node` to compute it first when it
    /// is dirty.
    pub fn pull<N>(&mut self, node: &N, plug: Plug) -> Result<AttrValue>
    where
        N: DependencyNode + ?Sized,
    {
        if self.is_dirty(plug.attribute) {
            node.compute(plug, self)?;
        }
        Ok(self.output_value(plug.attribute))
    }
}
