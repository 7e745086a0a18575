//! Camera data structures
//!
//! Plain data. Every mutation goes through camera_operations.rs or
//! orbit_operations.rs so that derived values and change notifications stay in
//! step with the primary fields; that is why the fields are crate-private.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{camera as defaults, frame, orbit as orbit_defaults};

/// Graphics API convention the projection matrices are built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsApi {
    /// Clip depth -1..1, +Y up in clip space
    #[default]
    OpenGl,
    /// Clip depth 0..1, +Y down in clip space
    Vulkan,
}

/// Which derived matrix a property change invalidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraChange {
    View,
    Projection,
}

/// Stereo eye selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

/// Which representation of the camera pose is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameterization {
    /// Position and forward are derived from `OrbitParams`
    OrbitDriven,
    /// Position/forward/up were written directly; orbit params are stale until
    /// the next orbit operation re-derives them
    Direct,
}

/// Orbit parameterization around a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Point the camera orbits
    pub target: Vec3,

    /// Distance from target, > 0
    pub radius: f32,

    /// Azimuth in radians, measured in the XZ plane from +X towards +Z
    pub phi: f32,

    /// Polar angle in radians from +Y, inside (0, PI)
    pub theta: f32,
}

/// Perspective frustum at the near plane, in view space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Change listener. Receives the change kind and the already-updated camera.
pub type CameraListener = Box<dyn FnMut(CameraChange, &StereoCamera) + Send>;

/// Stereo camera state
pub struct StereoCamera {
    pub(crate) position: Vec3,
    pub(crate) forward_vector: Vec3,
    pub(crate) up_vector: Vec3,

    /// Vertical field of view, degrees
    pub(crate) fov: f32,
    pub(crate) aspect_ratio: f32,

    /// Derived from fov and aspect ratio, degrees
    pub(crate) horizontal_fov: f32,

    pub(crate) interocular_distance: f32,
    pub(crate) convergence_plane_distance: f32,
    pub(crate) near_plane: f32,
    pub(crate) far_plane: f32,

    /// Swap left and right eyes
    pub(crate) flipped: bool,
    pub(crate) mode: GraphicsApi,

    pub(crate) orbit: OrbitParams,
    pub(crate) parameterization: Parameterization,

    pub(crate) listeners: Vec<(ListenerId, CameraListener)>,
    pub(crate) next_listener_id: u64,
}

impl fmt::Debug for StereoCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StereoCamera")
            .field("position", &self.position)
            .field("forward_vector", &self.forward_vector)
            .field("up_vector", &self.up_vector)
            .field("fov", &self.fov)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("horizontal_fov", &self.horizontal_fov)
            .field("interocular_distance", &self.interocular_distance)
            .field("convergence_plane_distance", &self.convergence_plane_distance)
            .field("near_plane", &self.near_plane)
            .field("far_plane", &self.far_plane)
            .field("flipped", &self.flipped)
            .field("mode", &self.mode)
            .field("orbit", &self.orbit)
            .field("parameterization", &self.parameterization)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: orbit_defaults::DEFAULT_RADIUS,
            phi: orbit_defaults::DEFAULT_PHI,
            theta: orbit_defaults::DEFAULT_THETA,
        }
    }
}

impl Default for StereoCamera {
    /// Orbit-driven camera on +Z at the default radius, looking at the origin
    fn default() -> Self {
        let orbit = OrbitParams::default();
        Self {
            position: Vec3::new(0.0, 0.0, orbit.radius),
            forward_vector: frame::CANONICAL_FORWARD,
            up_vector: frame::CANONICAL_UP,
            fov: defaults::DEFAULT_FOV_DEGREES,
            aspect_ratio: defaults::DEFAULT_ASPECT_RATIO,
            horizontal_fov: super::camera_operations::horizontal_fov_degrees(
                defaults::DEFAULT_FOV_DEGREES,
                defaults::DEFAULT_ASPECT_RATIO,
            ),
            interocular_distance: defaults::DEFAULT_INTEROCULAR_DISTANCE,
            convergence_plane_distance: defaults::DEFAULT_CONVERGENCE_PLANE_DISTANCE,
            near_plane: defaults::DEFAULT_NEAR_PLANE,
            far_plane: defaults::DEFAULT_FAR_PLANE,
            flipped: false,
            mode: GraphicsApi::default(),
            orbit,
            parameterization: Parameterization::OrbitDriven,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }
}
