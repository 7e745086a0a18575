//! Navigation adapter data
//!
//! State of the bridge between the navigation device protocol and the camera.
//! Behaviour lives in navigation_operations.rs.

use glam::Vec3;
use rustc_hash::FxHashMap;
use std::fmt;

use super::model_params::SharedModelParams;
use super::protocol::{Extents, Property, PropertyValue};
use crate::camera::StereoCamera;
use crate::error::NavResult;

/// Adapter lifecycle. Disabled until the device runtime connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// Device writes are ignored, nothing is pushed
    Disabled,
    /// Device frames are applied to the camera
    Enabled,
}

/// Outgoing side of the device SDK: the adapter pushes state through it
pub trait DeviceRuntime: Send {
    /// Engage the driver for the named application profile
    fn connect(&mut self, profile: &str) -> NavResult<()>;

    /// Push a property value to the device
    fn write(&mut self, property: Property, value: PropertyValue) -> NavResult<()>;

    fn disconnect(&mut self);
}

/// Zero-argument action bound to a command id
pub type CommandHandler = Box<dyn FnMut() + Send>;

/// Hit-test values last sent by the device. Device-side picking is not
/// implemented, so these are recorded but never used.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitPlaceholders {
    pub aperture: Option<f32>,
    pub direction: Option<Vec3>,
    pub look_from: Option<Vec3>,
    pub selection_only: Option<bool>,
}

/// Navigation adapter state. Owns the camera; lives on the GUI thread.
pub struct NavigationAdapter {
    pub(crate) camera: StereoCamera,
    pub(crate) model: SharedModelParams,
    pub(crate) hit: HitPlaceholders,
    pub(crate) commands: FxHashMap<String, CommandHandler>,

    /// Fixed box answered for `view.extents`
    pub(crate) view_extents: Extents,

    /// Application name sent on connect
    pub(crate) profile: String,

    pub(crate) state: AdapterState,
    pub(crate) runtime: Option<Box<dyn DeviceRuntime>>,
}

impl fmt::Debug for NavigationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut command_ids: Vec<&String> = self.commands.keys().collect();
        command_ids.sort();

        f.debug_struct("NavigationAdapter")
            .field("camera", &self.camera)
            .field("model", &*self.model.read())
            .field("hit", &self.hit)
            .field("commands", &command_ids)
            .field("view_extents", &self.view_extents)
            .field("profile", &self.profile)
            .field("state", &self.state)
            .field("runtime", &self.runtime.as_ref().map(|_| "<DeviceRuntime>"))
            .finish()
    }
}
