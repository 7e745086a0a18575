/// Camera Module - Data-Oriented Programming (DOP) style
///
/// - camera_data.rs: camera state, no behaviour
/// - camera_operations.rs: setters, notifications, derived matrices
/// - orbit_operations.rs: orbit parameterization and mouse gestures
///
/// There is one camera type. Orbit behaviour is selected by its
/// `Parameterization` tag rather than by a separate orbital camera type.

pub mod camera_data;
pub mod camera_operations;
pub mod orbit_operations;

// Re-export data structures
pub use camera_data::{
    CameraChange, CameraListener, Eye, Frustum, GraphicsApi, ListenerId, OrbitParams,
    Parameterization, StereoCamera,
};

// Re-export all operations
pub use camera_operations::{
    // Read access
    camera_aspect_ratio,
    camera_convergence_plane_distance,
    camera_far_plane,
    camera_flipped,
    camera_forward_vector,
    camera_fov,
    camera_horizontal_fov,
    camera_interocular_distance,
    camera_mode,
    camera_near_plane,
    camera_orbit,
    camera_parameterization,
    camera_position,
    camera_up_vector,

    // Notifications
    subscribe,
    unsubscribe,

    // Setters
    resize_viewport,
    set_aspect_ratio,
    set_convergence_plane_distance,
    set_far_plane,
    set_flipped,
    set_forward_vector,
    set_fov,
    set_interocular_distance,
    set_mode,
    set_near_plane,
    set_position,
    set_up_vector,

    // View/projection
    eye_offset,
    eye_projection_matrix,
    eye_view_matrix,
    frustum_matrix,
    horizontal_fov_degrees,
    inverse_view_matrix,
    projection_matrix,
    right_vector,
    view_frustum,
    view_matrix,

    // Diagnostics
    log_camera_context,
    validate_camera,
};

pub use orbit_operations::{
    // Initialization
    new_orbital_camera,
    spherical_to_cartesian,

    // Orbit parameters
    reconcile_orbit,
    set_phi,
    set_radius,
    set_target,
    set_theta,
    update,

    // Gestures
    rotate,
    translate,
    zoom,
};
