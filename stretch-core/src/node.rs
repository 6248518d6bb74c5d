//! The node-facing side of evaluation.
//!
//! A [`DependencyNode`] exposes a static channel schema and a `compute`
//! callback that the host invokes for a dirty output plug. [`StretchNode`]
//! is the only implementation: it reads its five inputs from the
//! [`DataBlock`], runs [`StretchEvaluator::try_evaluate`] and writes
//! `(stretch, volume, volume)` to `output`.

use log::{debug, warn};

use crate::config::StretchInputs;
use crate::datablock::DataBlock;
use crate::error::{Result, StretchError};
use crate::evaluator::StretchEvaluator;
use crate::schema::{AttrValue, NodeSchema, STRETCH_SCHEMA};
use crate::types::{AttributeId, NodeTypeId, Plug};

pub trait DependencyNode {
    fn type_name(&self) -> &'static str;

    fn node_type_id(&self) -> NodeTypeId;

    fn schema(&self) -> &'static NodeSchema;

    /// Recomputes `plug` from the inputs in `block`, writes the result back
    /// and marks the plug clean. On error the plug stays dirty.
    fn compute(&self, plug: Plug, block: &mut DataBlock) -> Result<()>;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct StretchNode;

impl StretchNode {
    pub const TYPE_NAME: &'static str = "stretchNode";
    pub const TYPE_ID: NodeTypeId = NodeTypeId(0x0000_0846);

    /// Reads the input snapshot the host currently holds for this node.
    pub fn read_inputs(block: &DataBlock) -> Result<StretchInputs> {
        let float = |id: AttributeId| block.input_value(id).as_float(id);
        let vector = |id: AttributeId| block.input_value(id).as_vector(id);

        Ok(StretchInputs {
            enable: float(AttributeId::Enable)?,
            root_position: vector(AttributeId::RootPosition)?,
            end_position: vector(AttributeId::EndPosition)?,
            stretch_distance: float(AttributeId::StretchDistance)?,
            volume_preservation: float(AttributeId::VolumePreservation)?,
        })
    }
}

impl DependencyNode for StretchNode {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn node_type_id(&self) -> NodeTypeId {
        Self::TYPE_ID
    }

    fn schema(&self) -> &'static NodeSchema {
        &STRETCH_SCHEMA
    }

    fn compute(&self, plug: Plug, block: &mut DataBlock) -> Result<()> {
        if plug.attribute != AttributeId::Output {
            return Err(StretchError::UnknownPlug(plug.attribute));
        }

        let inputs = Self::read_inputs(block)?;
        let out = StretchEvaluator::try_evaluate(
            inputs.enable,
            inputs.root_position,
            inputs.end_position,
            inputs.stretch_distance,
            inputs.volume_preservation,
        )
        .inspect_err(|e| warn!("{}[{}]: {e}; output left dirty", Self::TYPE_NAME, plug.node))?;

        debug!(
            "{}[{}]: {:?} -> stretch={} volume={}",
            Self::TYPE_NAME,
            plug.node,
            inputs,
            out.stretch,
            out.volume
        );

        block.set_output(AttributeId::Output, AttrValue::Double3(out.channels()))?;
        block.set_clean(plug);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn block_with(end: DVec3, stretch_distance: f64) -> DataBlock {
        let mut block = DataBlock::new(&STRETCH_SCHEMA);
        block
            .set_input(AttributeId::EndPosition, AttrValue::Double3(end))
            .unwrap();
        block
            .set_input(AttributeId::StretchDistance, AttrValue::Float(stretch_distance))
            .unwrap();
        block
    }

    #[test]
    fn compute_writes_channels_and_cleans_plug() {
        let node = StretchNode;
        let mut block = block_with(DVec3::new(0.0, 10.0, 0.0), 5.0);
        let plug = Plug::new(0, AttributeId::Output);

        node.compute(plug, &mut block).unwrap();

        assert!(!block.is_dirty(AttributeId::Output));
        assert_eq!(
            block.output_value(AttributeId::Output),
            AttrValue::Double3(DVec3::new(2.0, 0.5, 0.5))
        );
    }

    #[test]
    fn pull_recomputes_only_when_dirty() {
        let node = StretchNode;
        let mut block = block_with(DVec3::new(0.0, 10.0, 0.0), 5.0);
        let plug = Plug::new(0, AttributeId::Output);

        let first = block.pull(&node, plug).unwrap();
        assert_eq!(first, AttrValue::Double3(DVec3::new(2.0, 0.5, 0.5)));

        // A clean plug is served from storage.
        block
            .set_output(AttributeId::Output, AttrValue::Double3(DVec3::ZERO))
            .unwrap();
        assert_eq!(
            block.pull(&node, plug).unwrap(),
            AttrValue::Double3(DVec3::ZERO)
        );

        block.set_input(AttributeId::Enable, AttrValue::Float(0.5)).unwrap();
        block
            .set_input(AttributeId::VolumePreservation, AttrValue::Float(2.0))
            .unwrap();
        let v = block.pull(&node, plug).unwrap().as_vector(AttributeId::Output).unwrap();
        assert_eq!(v.x, 1.5);
        assert!((v.y - 1.0 / 2.25).abs() < 1e-12);
        assert_eq!(v.y, v.z);
    }

    #[test]
    fn coincident_joints_leave_output_dirty() {
        let node = StretchNode;
        let mut block = DataBlock::new(&STRETCH_SCHEMA);
        let plug = Plug::new(3, AttributeId::Output);

        let err = node.compute(plug, &mut block).unwrap_err();
        assert!(matches!(err, StretchError::SingularVolume(_)));
        assert!(block.is_dirty(AttributeId::Output));
        assert_eq!(
            block.output_value(AttributeId::Output),
            AttrValue::Double3(DVec3::ZERO)
        );
    }

    #[test]
    fn computing_an_input_plug_is_rejected() {
        let node = StretchNode;
        let mut block = DataBlock::new(&STRETCH_SCHEMA);
        let err = node
            .compute(Plug::new(0, AttributeId::Enable), &mut block)
            .unwrap_err();
        assert!(matches!(err, StretchError::UnknownPlug(AttributeId::Enable)));
    }

    #[test]
    fn disabled_node_reports_rest_through_block() {
        let node = StretchNode;
        let mut block = block_with(DVec3::new(4.0, -7.0, 1.0), 2.0);
        block.set_input(AttributeId::Enable, AttrValue::Float(0.0)).unwrap();
        let v = block
            .pull(&node, Plug::new(0, AttributeId::Output))
            .unwrap()
            .as_vector(AttributeId::Output)
            .unwrap();
        assert_eq!(v, DVec3::ONE);
    }

    #[test]
    fn read_inputs_mirrors_block() {
        let block = block_with(DVec3::new(1.0, 2.0, 3.0), 4.0);
        let inputs = StretchNode::read_inputs(&block).unwrap();
        assert_eq!(inputs.end_position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(inputs.stretch_distance, 4.0);
        assert_eq!(inputs.enable, 1.0);
    }

    #[test]
    fn nan_volume_exponent_leaves_output_dirty() {
        let node = StretchNode;
        let mut block = block_with(DVec3::new(0.0, 2.0, 0.0), 1.0);
        block
            .set_input(AttributeId::VolumePreservation, AttrValue::Float(f64::NAN))
            .unwrap();

        let err = node
            .compute(Plug::new(0, AttributeId::Output), &mut block)
            .unwrap_err();
        assert!(matches!(
            err,
            StretchError::NonFiniteInput(AttributeId::VolumePreservation)
        ));
        assert!(block.is_dirty(AttributeId::Output));
        assert_eq!(
            block.output_value(AttributeId::Output),
            AttrValue::Double3(DVec3::ZERO)
        );
    }

    #[test]
    fn stretch_node_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StretchNode>();
        assert_send_sync::<DataBlock>();
    }
}
