//! Configuration
//!
//! TOML file with `[camera]`, `[orbit]` and `[navigation]` sections. Every field
//! is optional and falls back to the defaults in `constants`.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

use crate::camera::{self, GraphicsApi, StereoCamera};
use crate::constants::{camera as camera_defaults, orbit as orbit_defaults, protocol};
use crate::error::{NavError, NavResult, PathContext};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllegianceConfig {
    pub camera: CameraSettings,
    pub orbit: OrbitSettings,
    pub navigation: NavigationSettings,
}

/// Intrinsic and stereo camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub interocular_distance: f32,
    pub convergence_plane_distance: f32,
    pub flipped: bool,
    pub mode: GraphicsApi,
}

/// Initial orbit around the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub target: Vec3,
    pub radius: f32,
    /// Radians
    pub phi: f32,
    /// Radians from +Y
    pub theta: f32,
}

/// Navigation device settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Application name announced to the device runtime
    pub profile: String,
    pub view_extents_min: Vec3,
    pub view_extents_max: Vec3,
    /// Device requests buffered before the device thread blocks
    pub request_queue_capacity: usize,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: camera_defaults::DEFAULT_FOV_DEGREES,
            aspect_ratio: camera_defaults::DEFAULT_ASPECT_RATIO,
            near_plane: camera_defaults::DEFAULT_NEAR_PLANE,
            far_plane: camera_defaults::DEFAULT_FAR_PLANE,
            interocular_distance: camera_defaults::DEFAULT_INTEROCULAR_DISTANCE,
            convergence_plane_distance: camera_defaults::DEFAULT_CONVERGENCE_PLANE_DISTANCE,
            flipped: false,
            mode: GraphicsApi::OpenGl,
        }
    }
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: orbit_defaults::DEFAULT_RADIUS,
            phi: orbit_defaults::DEFAULT_PHI,
            theta: orbit_defaults::DEFAULT_THETA,
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            profile: protocol::DEFAULT_PROFILE.to_string(),
            view_extents_min: Vec3::splat(-protocol::DEFAULT_VIEW_EXTENT),
            view_extents_max: Vec3::splat(protocol::DEFAULT_VIEW_EXTENT),
            request_queue_capacity: protocol::DEFAULT_REQUEST_QUEUE_CAPACITY,
        }
    }
}

fn invalid(field: &str, reason: String) -> NavError {
    NavError::InvalidConfig {
        field: field.to_string(),
        reason,
    }
}

impl AllegianceConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> NavResult<()> {
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(invalid(
                "camera.fov",
                format!("{} is outside (0, 180) degrees", camera.fov),
            ));
        }
        if !(camera.aspect_ratio > 0.0) {
            return Err(invalid(
                "camera.aspect_ratio",
                format!("{} must be positive", camera.aspect_ratio),
            ));
        }
        if !(camera.near_plane > 0.0) {
            return Err(invalid(
                "camera.near_plane",
                format!("{} must be positive", camera.near_plane),
            ));
        }
        if !(camera.far_plane > camera.near_plane) {
            return Err(invalid(
                "camera.far_plane",
                format!(
                    "{} must exceed near plane {}",
                    camera.far_plane, camera.near_plane
                ),
            ));
        }
        if camera.convergence_plane_distance == 0.0 {
            return Err(invalid(
                "camera.convergence_plane_distance",
                "must be non-zero".to_string(),
            ));
        }

        let orbit = &self.orbit;
        if !(orbit.radius > 0.0) {
            return Err(invalid(
                "orbit.radius",
                format!("{} must be positive", orbit.radius),
            ));
        }
        if !(orbit.theta > 0.0 && orbit.theta < PI) {
            return Err(invalid(
                "orbit.theta",
                format!("{} is outside (0, pi)", orbit.theta),
            ));
        }

        let navigation = &self.navigation;
        if navigation.request_queue_capacity == 0 {
            return Err(invalid(
                "navigation.request_queue_capacity",
                "must be at least 1".to_string(),
            ));
        }
        if navigation.view_extents_min.cmpgt(navigation.view_extents_max).any() {
            return Err(invalid(
                "navigation.view_extents_min",
                "must not exceed view_extents_max".to_string(),
            ));
        }

        log::info!("[Config] Configuration validated successfully");
        Ok(())
    }
}

/// Parse and validate a TOML configuration
pub fn parse_config(text: &str) -> NavResult<AllegianceConfig> {
    let config: AllegianceConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load, parse and validate a TOML configuration file
pub fn load_config(path: &Path) -> NavResult<AllegianceConfig> {
    log::debug!("[Config] Loading {}", path.display());
    let text = std::fs::read_to_string(path).with_path(path)?;
    parse_config(&text)
}

/// Build the initial orbit-driven camera described by the configuration
pub fn build_camera(config: &AllegianceConfig) -> StereoCamera {
    let orbit = &config.orbit;
    let settings = &config.camera;

    let mut stereo = camera::new_orbital_camera(orbit.target, orbit.radius, orbit.phi, orbit.theta);
    camera::set_fov(&mut stereo, settings.fov);
    camera::set_aspect_ratio(&mut stereo, settings.aspect_ratio);
    camera::set_near_plane(&mut stereo, settings.near_plane);
    camera::set_far_plane(&mut stereo, settings.far_plane);
    camera::set_interocular_distance(&mut stereo, settings.interocular_distance);
    camera::set_convergence_plane_distance(&mut stereo, settings.convergence_plane_distance);
    camera::set_flipped(&mut stereo, settings.flipped);
    camera::set_mode(&mut stereo, settings.mode);
    stereo
}
