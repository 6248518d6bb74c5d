//! Static channel schema of the stretch node.
//!
//! Every attribute is described once, at compile time, by an
//! [`AttributeSpec`] row in [`STRETCH_SCHEMA`]. The host side
//! ([`crate::datablock::DataBlock`]) reads defaults, range constraints and
//! dependency edges from here; the evaluator never looks at it.

use glam::DVec3;

use crate::error::{Result, StretchError};
use crate::types::AttributeId;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumericKind {
    Float,
    Double3,
}

impl NumericKind {
    pub const fn name(self) -> &'static str {
        match self {
            NumericKind::Float => "float",
            NumericKind::Double3 => "double3",
        }
    }
}

/// A typed attribute value as stored by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AttrValue {
    Float(f64),
    Double3(DVec3),
}

impl AttrValue {
    pub const fn kind(&self) -> NumericKind {
        match self {
            AttrValue::Float(_) => NumericKind::Float,
            AttrValue::Double3(_) => NumericKind::Double3,
        }
    }

    pub fn as_float(&self, attribute: AttributeId) -> Result<f64> {
        match *self {
            AttrValue::Float(v) => Ok(v),
            AttrValue::Double3(_) => Err(StretchError::TypeMismatch {
                attribute,
                expected: NumericKind::Float.name(),
            }),
        }
    }

    pub fn as_vector(&self, attribute: AttributeId) -> Result<DVec3> {
        match *self {
            AttrValue::Double3(v) => Ok(v),
            AttrValue::Float(_) => Err(StretchError::TypeMismatch {
                attribute,
                expected: NumericKind::Double3.name(),
            }),
        }
    }
}

/// Declaration of a single attribute: naming, type, default, range and
/// host-side flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    pub id: AttributeId,
    pub long_name: &'static str,
    pub short_name: &'static str,
    pub kind: NumericKind,
    pub default: AttrValue,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub keyable: bool,
    pub readable: bool,
    pub writable: bool,
    pub storable: bool,
}

impl AttributeSpec {
    const fn input(
        id: AttributeId,
        long_name: &'static str,
        short_name: &'static str,
        default: AttrValue,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self {
            id,
            long_name,
            short_name,
            kind: default.kind(),
            default,
            min,
            max,
            keyable: true,
            readable: true,
            writable: true,
            storable: true,
        }
    }

    /// Applies the attribute's range constraint to `value`.
    ///
    /// Scalars are clamped into `[min, max]` (either bound may be absent);
    /// vectors are returned unchanged.
    pub fn constrain(&self, value: AttrValue) -> AttrValue {
        match value {
            AttrValue::Float(mut v) => {
                if let Some(min) = self.min {
                    v = v.max(min);
                }
                if let Some(max) = self.max {
                    v = v.min(max);
                }
                AttrValue::Float(v)
            }
            other => other,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.long_name == name || self.short_name == name
    }
}

/// Attribute table plus `affects` edges for one node type.
#[derive(Debug)]
pub struct NodeSchema {
    pub attributes: &'static [AttributeSpec],
    pub affects: &'static [(AttributeId, AttributeId)],
}

impl NodeSchema {
    /// Returns the declaration of `id`.
    ///
    /// ### Panics
    /// Panics if the schema does not declare `id`.
    pub fn attribute(&self, id: AttributeId) -> &AttributeSpec {
        self.attributes
            .iter()
            .find(|a| a.id == id)
            .unwrap_or_else(|| panic!("attribute {id:?} is not declared"))
    }

    /// Looks an attribute up by its long or short name.
    pub fn find(&self, name: &str) -> Result<&AttributeSpec> {
        self.attributes
            .iter()
            .find(|a| a.matches_name(name))
            .ok_or_else(|| StretchError::UnknownAttribute(name.to_string()))
    }

    /// Attributes whose value depends on `input`.
    pub fn affects(&self, input: AttributeId) -> impl Iterator<Item = AttributeId> + '_ {
        self.affects
            .iter()
            .filter(move |(src, _)| *src == input)
            .map(|(_, dst)| *dst)
    }

    /// Attributes that are the target of at least one `affects` edge.
    pub fn is_output(&self, id: AttributeId) -> bool {
        self.affects.iter().any(|(_, dst)| *dst == id)
    }

    pub fn is_input(&self, id: AttributeId) -> bool {
        !self.is_output(id)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &AttributeSpec> + '_ {
        self.attributes.iter().filter(|a| self.is_input(a.id))
    }

    pub fn outputs(&self) -> impl Iterator<Item = &AttributeSpec> + '_ {
        self.attributes.iter().filter(|a| self.is_output(a.id))
    }
}

pub const MIN_STRETCH_DISTANCE: f64 = 0.001;

const STRETCH_ATTRIBUTES: [AttributeSpec; AttributeId::COUNT] = [
    AttributeSpec::input(
        AttributeId::Enable,
        "enable",
        "en",
        AttrValue::Float(1.0),
        Some(0.0),
        Some(1.0),
    ),
    AttributeSpec::input(
        AttributeId::RootPosition,
        "rootPosition",
        "rp",
        AttrValue::Double3(DVec3::ZERO),
        None,
        None,
    ),
    AttributeSpec::input(
        AttributeId::EndPosition,
        "endPosition",
        "ep",
        AttrValue::Double3(DVec3::ZERO),
        None,
        None,
    ),
    AttributeSpec::input(
        AttributeId::VolumePreservation,
        "volumePreservation",
        "vol",
        AttrValue::Float(1.0),
        None,
        None,
    ),
    AttributeSpec::input(
        AttributeId::StretchDistance,
        "stretchDistance",
        "strDis",
        AttrValue::Float(1.0),
        Some(MIN_STRETCH_DISTANCE),
        None,
    ),
    AttributeSpec {
        id: AttributeId::Output,
        long_name: "output",
        short_name: "out",
        kind: NumericKind::Double3,
        default: AttrValue::Double3(DVec3::ZERO),
        min: None,
        max: None,
        keyable: false,
        readable: true,
        writable: false,
        storable: false,
    },
];

const STRETCH_AFFECTS: [(AttributeId, AttributeId); 5] = [
    (AttributeId::Enable, AttributeId::Output),
    (AttributeId::RootPosition, AttributeId::Output),
    (AttributeId::EndPosition, AttributeId::Output),
    (AttributeId::VolumePreservation, AttributeId::Output),
    (AttributeId::StretchDistance, AttributeId::Output),
];

pub static STRETCH_SCHEMA: NodeSchema = NodeSchema {
    attributes: &STRETCH_ATTRIBUTES,
    affects: &STRETCH_AFFECTS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_attribute_is_declared_once() {
        for id in AttributeId::ALL {
            let n = STRETCH_SCHEMA.attributes.iter().filter(|a| a.id == id).count();
            assert_eq!(n, 1, "{id:?}");
        }
    }

    #[test]
    fn find_accepts_long_and_short_names() {
        assert_eq!(
            STRETCH_SCHEMA.find("stretchDistance").unwrap().id,
            AttributeId::StretchDistance
        );
        assert_eq!(STRETCH_SCHEMA.find("strDis").unwrap().id, AttributeId::StretchDistance);
        assert_eq!(STRETCH_SCHEMA.find("vol").unwrap().id, AttributeId::VolumePreservation);
        assert!(matches!(
            STRETCH_SCHEMA.find("scaleX"),
            Err(StretchError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn defaults_match_channel_contract() {
        let s = &STRETCH_SCHEMA;
        assert_eq!(s.attribute(AttributeId::Enable).default, AttrValue::Float(1.0));
        assert_eq!(s.attribute(AttributeId::StretchDistance).default, AttrValue::Float(1.0));
        assert_eq!(
            s.attribute(AttributeId::VolumePreservation).default,
            AttrValue::Float(1.0)
        );
        assert_eq!(
            s.attribute(AttributeId::RootPosition).default,
            AttrValue::Double3(DVec3::ZERO)
        );
    }

    #[test]
    fn every_input_affects_output() {
        for spec in STRETCH_SCHEMA.inputs() {
            let targets: Vec<_> = STRETCH_SCHEMA.affects(spec.id).collect();
            assert_eq!(targets, vec![AttributeId::Output], "{}", spec.long_name);
        }
        assert_eq!(STRETCH_SCHEMA.inputs().count(), 5);
        assert_eq!(STRETCH_SCHEMA.outputs().count(), 1);
    }

    #[test]
    fn output_is_read_only_and_not_persisted() {
        let out = STRETCH_SCHEMA.attribute(AttributeId::Output);
        assert!(!out.writable);
        assert!(!out.storable);
        assert!(!out.keyable);
        assert!(out.readable);
    }

    #[test]
    fn constrain_clamps_enable_and_floors_stretch_distance() {
        let enable = STRETCH_SCHEMA.attribute(AttributeId::Enable);
        assert_eq!(enable.constrain(AttrValue::Float(1.5)), AttrValue::Float(1.0));
        assert_eq!(enable.constrain(AttrValue::Float(-0.2)), AttrValue::Float(0.0));
        assert_eq!(enable.constrain(AttrValue::Float(0.25)), AttrValue::Float(0.25));

        let dist = STRETCH_SCHEMA.attribute(AttributeId::StretchDistance);
        assert_eq!(
            dist.constrain(AttrValue::Float(0.0)),
            AttrValue::Float(MIN_STRETCH_DISTANCE)
        );
        assert_eq!(dist.constrain(AttrValue::Float(250.0)), AttrValue::Float(250.0));

        let vol = STRETCH_SCHEMA.attribute(AttributeId::VolumePreservation);
        assert_eq!(vol.constrain(AttrValue::Float(-3.0)), AttrValue::Float(-3.0));
    }

    #[test]
    fn constrain_leaves_vectors_alone() {
        let root = STRETCH_SCHEMA.attribute(AttributeId::RootPosition);
        let v = AttrValue::Double3(DVec3::new(-1e6, 2.0, 3.0));
        assert_eq!(root.constrain(v), v);
    }

    #[test]
    fn accessors_reject_wrong_kind() {
        let v = AttrValue::Float(2.0);
        assert_eq!(v.as_float(AttributeId::Enable).unwrap(), 2.0);
        assert!(matches!(
            v.as_vector(AttributeId::RootPosition),
            Err(StretchError::TypeMismatch { expected: "double3", .. })
        ));
    }

    static EMPTY_SCHEMA: NodeSchema = NodeSchema {
        attributes: &[],
        affects: &[],
    };

    #[test]
    #[should_panic]
    fn attribute_panics_on_undeclared_id() {
        EMPTY_SCHEMA.attribute(AttributeId::Enable);
    }
}
