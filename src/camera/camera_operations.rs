//! Camera operations
//!
//! Functions over `StereoCamera`. Setters recompute derived values and then
//! notify listeners synchronously, once per changed property and signal.
//! Writing a value equal to the current one is a no-op.

use glam::{Mat4, Vec3, Vec4};

use super::camera_data::{
    CameraChange, CameraListener, Eye, Frustum, GraphicsApi, ListenerId, OrbitParams,
    Parameterization, StereoCamera,
};
use crate::constants::camera::DEGENERATE_LENGTH_SQUARED;
use crate::error::{NavError, NavResult};

// ============================================================================
// READ ACCESS
// ============================================================================

pub fn camera_position(camera: &StereoCamera) -> Vec3 {
    camera.position
}

pub fn camera_forward_vector(camera: &StereoCamera) -> Vec3 {
    camera.forward_vector
}

pub fn camera_up_vector(camera: &StereoCamera) -> Vec3 {
    camera.up_vector
}

/// Vertical field of view in degrees
pub fn camera_fov(camera: &StereoCamera) -> f32 {
    camera.fov
}

pub fn camera_aspect_ratio(camera: &StereoCamera) -> f32 {
    camera.aspect_ratio
}

/// Horizontal field of view in degrees, derived from fov and aspect ratio
pub fn camera_horizontal_fov(camera: &StereoCamera) -> f32 {
    camera.horizontal_fov
}

pub fn camera_interocular_distance(camera: &StereoCamera) -> f32 {
    camera.interocular_distance
}

pub fn camera_convergence_plane_distance(camera: &StereoCamera) -> f32 {
    camera.convergence_plane_distance
}

pub fn camera_near_plane(camera: &StereoCamera) -> f32 {
    camera.near_plane
}

pub fn camera_far_plane(camera: &StereoCamera) -> f32 {
    camera.far_plane
}

pub fn camera_flipped(camera: &StereoCamera) -> bool {
    camera.flipped
}

pub fn camera_mode(camera: &StereoCamera) -> GraphicsApi {
    camera.mode
}

/// Orbit parameters. Stale while the camera is `Parameterization::Direct`.
pub fn camera_orbit(camera: &StereoCamera) -> OrbitParams {
    camera.orbit
}

pub fn camera_parameterization(camera: &StereoCamera) -> Parameterization {
    camera.parameterization
}

// ============================================================================
// CHANGE NOTIFICATION
// ============================================================================

/// Register a listener for view/projection changes
pub fn subscribe<F>(camera: &mut StereoCamera, listener: F) -> ListenerId
where
    F: FnMut(CameraChange, &StereoCamera) + Send + 'static,
{
    let id = ListenerId(camera.next_listener_id);
    camera.next_listener_id += 1;
    camera.listeners.push((id, Box::new(listener) as CameraListener));
    id
}

/// Remove a listener. Returns false if the id was not registered.
pub fn unsubscribe(camera: &mut StereoCamera, id: ListenerId) -> bool {
    let before = camera.listeners.len();
    camera.listeners.retain(|(listener_id, _)| *listener_id != id);
    camera.listeners.len() != before
}

pub(crate) fn notify(camera: &mut StereoCamera, change: CameraChange) {
    if camera.listeners.is_empty() {
        return;
    }

    // Listeners are moved out so they can borrow the camera immutably
    let mut listeners = std::mem::take(&mut camera.listeners);
    for (_, listener) in listeners.iter_mut() {
        listener(change, camera);
    }

    // Anything subscribed from inside a callback was pushed onto the empty list
    listeners.append(&mut camera.listeners);
    camera.listeners = listeners;
}

// ============================================================================
// SETTERS
// ============================================================================

/// Move the camera. Breaks the orbit invariant, so the camera becomes `Direct`.
pub fn set_position(camera: &mut StereoCamera, position: Vec3) {
    if write_position(camera, position) {
        camera.parameterization = Parameterization::Direct;
    }
}

/// Point the camera along `direction` (normalized). Zero vectors are ignored.
/// Breaks the orbit invariant, so the camera becomes `Direct`.
pub fn set_forward_vector(camera: &mut StereoCamera, direction: Vec3) {
    if write_forward_vector(camera, direction) {
        camera.parameterization = Parameterization::Direct;
    }
}

/// Set the up vector (normalized). Zero vectors are ignored.
pub fn set_up_vector(camera: &mut StereoCamera, up: Vec3) {
    write_up_vector(camera, up);
}

/// Set the vertical field of view in degrees. Precondition: 0 < fov < 180.
pub fn set_fov(camera: &mut StereoCamera, fov_degrees: f32) {
    if camera.fov == fov_degrees {
        return;
    }
    camera.fov = fov_degrees;
    camera.horizontal_fov = horizontal_fov_degrees(camera.fov, camera.aspect_ratio);
    notify(camera, CameraChange::Projection);
}

pub fn set_aspect_ratio(camera: &mut StereoCamera, aspect_ratio: f32) {
    if camera.aspect_ratio == aspect_ratio {
        return;
    }
    camera.aspect_ratio = aspect_ratio;
    camera.horizontal_fov = horizontal_fov_degrees(camera.fov, camera.aspect_ratio);
    notify(camera, CameraChange::Projection);
}

/// Update the aspect ratio from a viewport size (e.g. on window resize)
pub fn resize_viewport(camera: &mut StereoCamera, width: u32, height: u32) {
    if width == 0 || height == 0 {
        log::trace!("[Camera] Ignoring resize to {}x{}", width, height);
        return;
    }
    set_aspect_ratio(camera, width as f32 / height as f32);
}

/// Zero gives mono rendering; negative values swap the eyes.
pub fn set_interocular_distance(camera: &mut StereoCamera, distance: f32) {
    if camera.interocular_distance == distance {
        return;
    }
    camera.interocular_distance = distance;
    notify(camera, CameraChange::View);
    notify(camera, CameraChange::Projection);
}

pub fn set_convergence_plane_distance(camera: &mut StereoCamera, distance: f32) {
    if camera.convergence_plane_distance == distance {
        return;
    }
    camera.convergence_plane_distance = distance;
    notify(camera, CameraChange::View);
    notify(camera, CameraChange::Projection);
}

pub fn set_near_plane(camera: &mut StereoCamera, near: f32) {
    if camera.near_plane == near {
        return;
    }
    camera.near_plane = near;
    notify(camera, CameraChange::Projection);
}

pub fn set_far_plane(camera: &mut StereoCamera, far: f32) {
    if camera.far_plane == far {
        return;
    }
    camera.far_plane = far;
    notify(camera, CameraChange::Projection);
}

pub fn set_flipped(camera: &mut StereoCamera, flipped: bool) {
    if camera.flipped == flipped {
        return;
    }
    camera.flipped = flipped;
    notify(camera, CameraChange::View);
    notify(camera, CameraChange::Projection);
}

pub fn set_mode(camera: &mut StereoCamera, mode: GraphicsApi) {
    if camera.mode == mode {
        return;
    }
    camera.mode = mode;
    notify(camera, CameraChange::Projection);
}

// Raw writers shared with the orbit operations. They leave the
// parameterization tag alone and report whether anything changed.

pub(crate) fn write_position(camera: &mut StereoCamera, position: Vec3) -> bool {
    if camera.position == position {
        return false;
    }
    camera.position = position;
    notify(camera, CameraChange::View);
    true
}

pub(crate) fn write_forward_vector(camera: &mut StereoCamera, direction: Vec3) -> bool {
    let Some(forward) = normalized(direction) else {
        log::trace!("[Camera] Ignoring zero forward vector");
        return false;
    };
    if camera.forward_vector == forward {
        return false;
    }
    camera.forward_vector = forward;
    notify(camera, CameraChange::View);
    notify(camera, CameraChange::Projection);
    true
}

pub(crate) fn write_up_vector(camera: &mut StereoCamera, up: Vec3) -> bool {
    let Some(up) = normalized(up) else {
        log::trace!("[Camera] Ignoring zero up vector");
        return false;
    };
    if camera.up_vector == up {
        return false;
    }
    camera.up_vector = up;
    notify(camera, CameraChange::View);
    true
}

// ============================================================================
// DERIVED VALUES
// ============================================================================

/// `2 * atan(tan(fov / 2) * aspect)`, all angles in degrees
pub fn horizontal_fov_degrees(fov_degrees: f32, aspect_ratio: f32) -> f32 {
    let half = (fov_degrees.to_radians() * 0.5).tan();
    (2.0 * (half * aspect_ratio).atan()).to_degrees()
}

/// Camera right axis, `forward x up`
pub fn right_vector(camera: &StereoCamera) -> Vec3 {
    camera.forward_vector.cross(camera.up_vector).normalize()
}

/// World-from-camera transform: columns are right, up, -forward and position
pub fn inverse_view_matrix(camera: &StereoCamera) -> Mat4 {
    let forward = camera.forward_vector;
    let right = forward.cross(camera.up_vector).normalize();
    let up = right.cross(forward);

    Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        (-forward).extend(0.0),
        camera.position.extend(1.0),
    )
}

pub fn view_matrix(camera: &StereoCamera) -> Mat4 {
    Mat4::look_at_rh(
        camera.position,
        camera.position + camera.forward_vector,
        camera.up_vector,
    )
}

/// Symmetric frustum at the near plane
pub fn view_frustum(camera: &StereoCamera) -> Frustum {
    let top = camera.near_plane * (camera.fov.to_radians() * 0.5).tan();
    let right = top * camera.aspect_ratio;
    Frustum {
        left: -right,
        right,
        bottom: -top,
        top,
        near: camera.near_plane,
        far: camera.far_plane,
    }
}

/// Mono projection matrix for the camera's graphics API
pub fn projection_matrix(camera: &StereoCamera) -> Mat4 {
    frustum_matrix(&view_frustum(camera), camera.mode)
}

/// Signed offset of an eye along the right axis. `flipped` swaps the eyes.
pub fn eye_offset(camera: &StereoCamera, eye: Eye) -> f32 {
    let half = camera.interocular_distance * 0.5;
    let offset = match eye {
        Eye::Left => -half,
        Eye::Right => half,
    };
    if camera.flipped {
        -offset
    } else {
        offset
    }
}

/// View matrix of one eye. Eye axes stay parallel; convergence comes from
/// the off-axis projection.
pub fn eye_view_matrix(camera: &StereoCamera, eye: Eye) -> Mat4 {
    let eye_position = camera.position + right_vector(camera) * eye_offset(camera, eye);
    Mat4::look_at_rh(
        eye_position,
        eye_position + camera.forward_vector,
        camera.up_vector,
    )
}

/// Off-axis projection of one eye. Both eye frusta coincide at the
/// convergence plane.
pub fn eye_projection_matrix(camera: &StereoCamera, eye: Eye) -> Mat4 {
    let mut frustum = view_frustum(camera);
    let shift =
        -eye_offset(camera, eye) * camera.near_plane / camera.convergence_plane_distance;
    frustum.left += shift;
    frustum.right += shift;
    frustum_matrix(&frustum, camera.mode)
}

/// Perspective matrix for an arbitrary frustum, right-handed view space
pub fn frustum_matrix(frustum: &Frustum, mode: GraphicsApi) -> Mat4 {
    let Frustum {
        left,
        right,
        bottom,
        top,
        near,
        far,
    } = *frustum;

    let x = 2.0 * near / (right - left);
    let y = 2.0 * near / (top - bottom);
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);

    match mode {
        GraphicsApi::OpenGl => Mat4::from_cols(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y, 0.0, 0.0),
            Vec4::new(a, b, -(far + near) / (far - near), -1.0),
            Vec4::new(0.0, 0.0, -2.0 * far * near / (far - near), 0.0),
        ),
        // Depth 0..1 and clip-space Y pointing down
        GraphicsApi::Vulkan => Mat4::from_cols(
            Vec4::new(x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -y, 0.0, 0.0),
            Vec4::new(a, -b, far / (near - far), -1.0),
            Vec4::new(0.0, 0.0, far * near / (near - far), 0.0),
        ),
    }
}

// ============================================================================
// VALIDATION & DIAGNOSTICS
// ============================================================================

/// Check the range invariants the setters do not enforce
pub fn validate_camera(camera: &StereoCamera) -> NavResult<()> {
    if !(camera.near_plane > 0.0) {
        return Err(NavError::InvalidCamera(format!(
            "near plane {} must be positive",
            camera.near_plane
        )));
    }
    if !(camera.far_plane > camera.near_plane) {
        return Err(NavError::InvalidCamera(format!(
            "far plane {} must exceed near plane {}",
            camera.far_plane, camera.near_plane
        )));
    }
    if !(camera.aspect_ratio > 0.0) {
        return Err(NavError::InvalidCamera(format!(
            "aspect ratio {} must be positive",
            camera.aspect_ratio
        )));
    }
    if !(camera.fov > 0.0 && camera.fov < 180.0) {
        return Err(NavError::InvalidCamera(format!(
            "fov {} must be inside (0, 180) degrees",
            camera.fov
        )));
    }
    if camera
        .forward_vector
        .cross(camera.up_vector)
        .length_squared()
        < DEGENERATE_LENGTH_SQUARED
    {
        return Err(NavError::InvalidCamera(
            "forward and up vectors are parallel".to_string(),
        ));
    }
    Ok(())
}

/// Log camera context for debugging
pub fn log_camera_context(camera: &StereoCamera) {
    log::debug!(
        "[Camera] Position: ({:.3}, {:.3}, {:.3}) | Forward: ({:.3}, {:.3}, {:.3}) | Up: ({:.3}, {:.3}, {:.3})",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.forward_vector.x,
        camera.forward_vector.y,
        camera.forward_vector.z,
        camera.up_vector.x,
        camera.up_vector.y,
        camera.up_vector.z
    );

    log::debug!(
        "[Camera] FOV: {:.1}° (h {:.1}°) | IOD: {:.3} | Convergence: {:.2} | {:?} | {:?}",
        camera.fov,
        camera.horizontal_fov,
        camera.interocular_distance,
        camera.convergence_plane_distance,
        camera.mode,
        camera.parameterization
    );
}

pub(crate) fn normalized(v: Vec3) -> Option<Vec3> {
    if v.length_squared() < DEGENERATE_LENGTH_SQUARED {
        None
    } else {
        Some(v.normalize())
    }
}
