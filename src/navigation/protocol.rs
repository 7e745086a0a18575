//! Device protocol vocabulary
//!
//! Property names, value shapes and status codes of the 3D navigation device
//! accessor protocol. The protocol itself belongs to the device SDK; this module
//! only mirrors the part of it the viewer answers.

use glam::{Mat4, Vec3, Vec4};
use std::fmt;
use std::str::FromStr;

use crate::camera::Frustum;
use crate::error::{NavError, NavResult};

/// Accessor status code. Errno-style: 0 is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavStatus(pub i32);

impl NavStatus {
    pub const SUCCESS: NavStatus = NavStatus(0);
    /// operation_not_supported
    pub const INVALID_OPERATION: NavStatus = NavStatus(95);
    /// function_not_supported, for property names the viewer does not know
    pub const INVALID_FUNCTION: NavStatus = NavStatus(38);
    /// invalid_argument, for values of the wrong shape
    pub const INVALID_ARGUMENT: NavStatus = NavStatus(22);
    /// not_connected, for a closed bridge or a missing driver
    pub const NOT_CONNECTED: NavStatus = NavStatus(107);
    /// io_error, for failures that are neither of the above
    pub const INTERNAL: NavStatus = NavStatus(5);

    pub fn is_success(self) -> bool {
        self == NavStatus::SUCCESS
    }
}

/// Properties the device runtime reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    ViewAffine,
    ViewFov,
    ViewFrustum,
    ViewPerspective,
    ViewExtents,
    ModelExtents,
    SelectionExtents,
    SelectionAffine,
    SelectionEmpty,
    PivotPosition,
    PivotUser,
    PivotVisible,
    HitAperture,
    HitDirection,
    HitLookFrom,
    HitSelectionOnly,
    HitLookAt,
    ActiveCommand,
    CommandTree,
    UnitsToMeters,
    FloorPlane,
    FrontView,
    CoordinateSystem,
}

impl Property {
    pub const ALL: [Property; 23] = [
        Property::ViewAffine,
        Property::ViewFov,
        Property::ViewFrustum,
        Property::ViewPerspective,
        Property::ViewExtents,
        Property::ModelExtents,
        Property::SelectionExtents,
        Property::SelectionAffine,
        Property::SelectionEmpty,
        Property::PivotPosition,
        Property::PivotUser,
        Property::PivotVisible,
        Property::HitAperture,
        Property::HitDirection,
        Property::HitLookFrom,
        Property::HitSelectionOnly,
        Property::HitLookAt,
        Property::ActiveCommand,
        Property::CommandTree,
        Property::UnitsToMeters,
        Property::FloorPlane,
        Property::FrontView,
        Property::CoordinateSystem,
    ];

    /// Wire name of the property
    pub fn name(self) -> &'static str {
        match self {
            Property::ViewAffine => "view.affine",
            Property::ViewFov => "view.fov",
            Property::ViewFrustum => "view.frustum",
            Property::ViewPerspective => "view.perspective",
            Property::ViewExtents => "view.extents",
            Property::ModelExtents => "model.extents",
            Property::SelectionExtents => "selection.extents",
            Property::SelectionAffine => "selection.affine",
            Property::SelectionEmpty => "selection.empty",
            Property::PivotPosition => "pivot.position",
            Property::PivotUser => "pivot.user",
            Property::PivotVisible => "pivot.visible",
            Property::HitAperture => "hit.aperture",
            Property::HitDirection => "hit.direction",
            Property::HitLookFrom => "hit.lookfrom",
            Property::HitSelectionOnly => "hit.selectionOnly",
            Property::HitLookAt => "hit.lookat",
            Property::ActiveCommand => "commands.activeCommand",
            Property::CommandTree => "commands.tree",
            Property::UnitsToMeters => "model.unitsToMeters",
            Property::FloorPlane => "model.floorPlane",
            Property::FrontView => "views.front",
            Property::CoordinateSystem => "coordinateSystem",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = NavError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .iter()
            .copied()
            .find(|property| property.name() == name)
            .ok_or_else(|| NavError::UnknownProperty(name.to_string()))
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min: Vec3,
    pub max: Vec3,
}

/// Value carried by a property read or write
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Matrix(Mat4),
    Point(Vec3),
    Vector(Vec3),
    Float(f32),
    Bool(bool),
    Extents(Extents),
    Frustum(Frustum),
    Plane(Vec4),
    Text(String),
    Commands(Vec<String>),
}

impl PropertyValue {
    fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Matrix(_) => "matrix",
            PropertyValue::Point(_) => "point",
            PropertyValue::Vector(_) => "vector",
            PropertyValue::Float(_) => "float",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Extents(_) => "extents",
            PropertyValue::Frustum(_) => "frustum",
            PropertyValue::Plane(_) => "plane",
            PropertyValue::Text(_) => "text",
            PropertyValue::Commands(_) => "commands",
        }
    }

    fn mismatch(&self, property: Property, expected: &str) -> NavError {
        NavError::TypeMismatch {
            property: property.name().to_string(),
            expected: format!("{}, got {}", expected, self.kind()),
        }
    }

    pub fn into_matrix(self, property: Property) -> NavResult<Mat4> {
        match self {
            PropertyValue::Matrix(matrix) => Ok(matrix),
            other => Err(other.mismatch(property, "matrix")),
        }
    }

    /// Points and vectors are interchangeable on the wire
    pub fn into_vec3(self, property: Property) -> NavResult<Vec3> {
        match self {
            PropertyValue::Point(v) | PropertyValue::Vector(v) => Ok(v),
            other => Err(other.mismatch(property, "point or vector")),
        }
    }

    pub fn into_float(self, property: Property) -> NavResult<f32> {
        match self {
            PropertyValue::Float(value) => Ok(value),
            other => Err(other.mismatch(property, "float")),
        }
    }

    pub fn into_bool(self, property: Property) -> NavResult<bool> {
        match self {
            PropertyValue::Bool(value) => Ok(value),
            other => Err(other.mismatch(property, "bool")),
        }
    }

    pub fn into_extents(self, property: Property) -> NavResult<Extents> {
        match self {
            PropertyValue::Extents(extents) => Ok(extents),
            other => Err(other.mismatch(property, "extents")),
        }
    }

    pub fn into_frustum(self, property: Property) -> NavResult<Frustum> {
        match self {
            PropertyValue::Frustum(frustum) => Ok(frustum),
            other => Err(other.mismatch(property, "frustum")),
        }
    }

    pub fn into_text(self, property: Property) -> NavResult<String> {
        match self {
            PropertyValue::Text(text) => Ok(text),
            other => Err(other.mismatch(property, "text")),
        }
    }
}

/// Answer to a single accessor call
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: NavStatus,
    pub value: Option<PropertyValue>,
}

impl Reply {
    pub fn value(value: PropertyValue) -> Self {
        Self {
            status: NavStatus::SUCCESS,
            value: Some(value),
        }
    }

    pub fn done() -> Self {
        Self {
            status: NavStatus::SUCCESS,
            value: None,
        }
    }

    pub fn error(error: &NavError) -> Self {
        Self {
            status: error.status(),
            value: None,
        }
    }

    /// Failure status that still carries a value, e.g. `selection.empty`
    pub fn rejected_with(value: PropertyValue, error: &NavError) -> Self {
        Self {
            status: error.status(),
            value: Some(value),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl From<NavResult<PropertyValue>> for Reply {
    fn from(result: NavResult<PropertyValue>) -> Self {
        match result {
            Ok(value) => Reply::value(value),
            Err(e) => Reply::error(&e),
        }
    }
}

impl From<NavResult<()>> for Reply {
    fn from(result: NavResult<()>) -> Self {
        match result {
            Ok(()) => Reply::done(),
            Err(e) => Reply::error(&e),
        }
    }
}
