//! Shared constants for the navigation core
//!
//! Grouped by the subsystem that owns them. Values here are defaults only; the
//! configuration file overrides them at startup.

/// Camera defaults
pub mod camera {
    /// Vertical field of view in degrees
    pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
    pub const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;
    pub const DEFAULT_NEAR_PLANE: f32 = 0.1;
    pub const DEFAULT_FAR_PLANE: f32 = 1000.0;
    /// Eye separation in world units (about 6cm at 1 unit = 1m)
    pub const DEFAULT_INTEROCULAR_DISTANCE: f32 = 0.06;
    pub const DEFAULT_CONVERGENCE_PLANE_DISTANCE: f32 = 5.0;

    /// Squared length under which a direction is treated as the zero vector
    pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

    /// Per-component tolerance under which a written direction counts as unchanged
    pub const DIRECTION_EPSILON: f32 = 1e-5;
}

/// Orbit parameterization defaults
pub mod orbit {
    pub const DEFAULT_RADIUS: f32 = 10.0;
    pub const DEFAULT_PHI: f32 = std::f32::consts::FRAC_PI_2;
    pub const DEFAULT_THETA: f32 = std::f32::consts::FRAC_PI_2;

    /// Distance kept between theta and the poles
    pub const THETA_EPSILON: f32 = 1e-4;

    /// Smallest radius an orbit may collapse to
    pub const MIN_RADIUS: f32 = 1e-4;
}

/// Canonical frame, right-handed with +Y up and the camera looking down -Z
pub mod frame {
    use glam::Vec3;

    pub const WORLD_UP: Vec3 = Vec3::Y;
    pub const CANONICAL_FORWARD: Vec3 = Vec3::NEG_Z;
    pub const CANONICAL_UP: Vec3 = Vec3::Y;
}

/// Device protocol constants
pub mod protocol {
    /// Application name announced to the device runtime
    pub const DEFAULT_PROFILE: &str = "Allegiance";

    /// Half size of the fixed box reported for `view.extents`
    pub const DEFAULT_VIEW_EXTENT: f32 = 1.0;

    /// Pending device requests before the device thread blocks on send
    pub const DEFAULT_REQUEST_QUEUE_CAPACITY: usize = 64;
}
