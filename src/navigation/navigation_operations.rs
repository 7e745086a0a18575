//! Navigation adapter operations
//!
//! Answers the device runtime's property accessors against the owned camera and
//! the shared model parameters, dispatches active commands and pushes viewer
//! state back to the device. Only the thread that owns the adapter calls these;
//! the device thread goes through `bridge`.

use glam::{Mat4, Vec3, Vec4};

use super::model_params::{self, SharedModelParams};
use super::navigation_data::{AdapterState, DeviceRuntime, HitPlaceholders, NavigationAdapter};
use super::protocol::{Extents, Property, PropertyValue, Reply};
use crate::camera::{self, camera_operations, Frustum, Parameterization, StereoCamera};
use crate::config::NavigationSettings;
use crate::constants::camera::DIRECTION_EPSILON;
use crate::constants::frame;
use crate::error::{NavError, NavResult};

// ============================================================================
// LIFECYCLE
// ============================================================================

pub fn create_navigation_adapter(
    camera: StereoCamera,
    model: SharedModelParams,
    settings: &NavigationSettings,
) -> NavigationAdapter {
    NavigationAdapter {
        camera,
        model,
        hit: HitPlaceholders::default(),
        commands: Default::default(),
        view_extents: Extents {
            min: settings.view_extents_min,
            max: settings.view_extents_max,
        },
        profile: settings.profile.clone(),
        state: AdapterState::Disabled,
        runtime: None,
    }
}

/// Connect the device runtime. A failed connect leaves the adapter disabled
/// and the viewer keeps working without the device.
pub fn enable(
    adapter: &mut NavigationAdapter,
    mut runtime: Box<dyn DeviceRuntime>,
) -> NavResult<()> {
    if adapter.state == AdapterState::Enabled {
        log::warn!("[Navigation] Adapter already enabled, keeping the existing runtime");
        return Ok(());
    }

    if let Err(e) = runtime.connect(&adapter.profile) {
        log::warn!(
            "[Navigation] Device runtime unavailable for profile '{}': {}",
            adapter.profile,
            e
        );
        return Err(e);
    }

    adapter.runtime = Some(runtime);
    adapter.state = AdapterState::Enabled;
    log::info!("[Navigation] Adapter enabled for profile '{}'", adapter.profile);
    Ok(())
}

/// Disconnect and drop the runtime
pub fn disable(adapter: &mut NavigationAdapter) {
    if let Some(mut runtime) = adapter.runtime.take() {
        runtime.disconnect();
        log::info!("[Navigation] Adapter disabled");
    }
    adapter.state = AdapterState::Disabled;
}

pub fn adapter_state(adapter: &NavigationAdapter) -> AdapterState {
    adapter.state
}

pub fn adapter_camera(adapter: &NavigationAdapter) -> &StereoCamera {
    &adapter.camera
}

/// Mutable camera access for GUI input (gestures, resizes)
pub fn adapter_camera_mut(adapter: &mut NavigationAdapter) -> &mut StereoCamera {
    &mut adapter.camera
}

pub fn shared_model_params(adapter: &NavigationAdapter) -> SharedModelParams {
    adapter.model.clone()
}

pub fn hit_placeholders(adapter: &NavigationAdapter) -> HitPlaceholders {
    adapter.hit
}

fn ensure_enabled(adapter: &NavigationAdapter) -> NavResult<()> {
    match adapter.state {
        AdapterState::Enabled => Ok(()),
        AdapterState::Disabled => Err(NavError::NotEnabled),
    }
}

fn reject<T>(property: Property) -> NavResult<T> {
    log::trace!("[Navigation] Rejecting {}", property);
    Err(NavError::unsupported(property.name()))
}

// ============================================================================
// VIEW
// ============================================================================

/// World-from-camera transform of the owned camera
pub fn get_camera_matrix(adapter: &NavigationAdapter) -> Mat4 {
    camera::inverse_view_matrix(&adapter.camera)
}

/// Apply a device-driven pose. The camera leaves its orbit parameterization
/// until the next orbit operation re-derives it.
pub fn set_camera_matrix(adapter: &mut NavigationAdapter, matrix: Mat4) -> NavResult<()> {
    ensure_enabled(adapter)?;

    let position = matrix.transform_point3(Vec3::ZERO);
    let forward = matrix.transform_vector3(frame::CANONICAL_FORWARD);
    let up = matrix.transform_vector3(frame::CANONICAL_UP);

    let camera = &mut adapter.camera;
    let moved = camera_operations::write_position(camera, position);
    let turned = !same_direction(forward, camera.forward_vector)
        && camera_operations::write_forward_vector(camera, forward);

    // The matrix carries an orthogonalized up. A stored up that orthogonalizes
    // to the same axis is kept as is.
    let forward = camera.forward_vector;
    let stored_up = camera.up_vector;
    let current_up = camera_operations::normalized(stored_up - forward * stored_up.dot(forward));
    let rolled = match current_up {
        Some(current) if same_direction(up, current) => false,
        _ => camera_operations::write_up_vector(camera, up),
    };

    if moved || turned || rolled {
        camera.parameterization = Parameterization::Direct;
    }
    Ok(())
}

fn same_direction(candidate: Vec3, unit: Vec3) -> bool {
    camera_operations::normalized(candidate)
        .is_some_and(|candidate| candidate.abs_diff_eq(unit, DIRECTION_EPSILON))
}

/// Vertical field of view in radians
pub fn get_view_fov(adapter: &NavigationAdapter) -> f32 {
    camera::camera_fov(&adapter.camera).to_radians()
}

pub fn set_view_fov(adapter: &mut NavigationAdapter, _fov: f32) -> NavResult<()> {
    ensure_enabled(adapter)?;
    reject(Property::ViewFov)
}

pub fn get_view_frustum(adapter: &NavigationAdapter) -> Frustum {
    camera::view_frustum(&adapter.camera)
}

pub fn set_view_frustum(adapter: &mut NavigationAdapter, _frustum: Frustum) -> NavResult<()> {
    ensure_enabled(adapter)?;
    reject(Property::ViewFrustum)
}

pub fn get_is_view_perspective(_adapter: &NavigationAdapter) -> bool {
    true
}

pub fn get_view_extents(adapter: &NavigationAdapter) -> Extents {
    adapter.view_extents
}

pub fn set_view_extents(adapter: &mut NavigationAdapter, _extents: Extents) -> NavResult<()> {
    ensure_enabled(adapter)?;
    reject(Property::ViewExtents)
}

pub fn get_front_view(_adapter: &NavigationAdapter) -> Mat4 {
    Mat4::from_diagonal(Vec4::new(-1.0, 1.0, -1.0, 1.0))
}

/// Right-handed, Y up
pub fn get_coordinate_system(_adapter: &NavigationAdapter) -> Mat4 {
    Mat4::IDENTITY
}

// ============================================================================
// MODEL AND SELECTION
// ============================================================================

pub fn get_model_extents(adapter: &NavigationAdapter) -> Extents {
    let params = adapter.model.read();
    Extents {
        min: params.min_extent,
        max: params.max_extent,
    }
}

pub fn get_selection_extents(_adapter: &NavigationAdapter) -> NavResult<Extents> {
    reject(Property::SelectionExtents)
}

pub fn get_selection_transform(_adapter: &NavigationAdapter) -> NavResult<Mat4> {
    reject(Property::SelectionAffine)
}

pub fn set_selection_transform(adapter: &mut NavigationAdapter, _matrix: Mat4) -> NavResult<()> {
    ensure_enabled(adapter)?;
    reject(Property::SelectionAffine)
}

/// Selection is not tracked: reports an empty selection together with the
/// rejection the device expects.
pub fn get_is_selection_empty(_adapter: &NavigationAdapter) -> (bool, NavResult<()>) {
    (true, reject(Property::SelectionEmpty))
}

pub fn get_units_to_meters(_adapter: &NavigationAdapter) -> NavResult<f32> {
    reject(Property::UnitsToMeters)
}

pub fn get_floor_plane(_adapter: &NavigationAdapter) -> NavResult<Vec4> {
    reject(Property::FloorPlane)
}

// ============================================================================
// PIVOT AND HIT TESTING
// ============================================================================

pub fn get_pivot_position(adapter: &NavigationAdapter) -> Vec3 {
    adapter.model.read().pivot_point
}

pub fn set_pivot_position(adapter: &mut NavigationAdapter, pivot: Vec3) -> NavResult<()> {
    ensure_enabled(adapter)?;
    model_params::set_pivot_point(&adapter.model, pivot);
    log::debug!(
        "[Navigation] Pivot moved to ({:.3}, {:.3}, {:.3})",
        pivot.x,
        pivot.y,
        pivot.z
    );
    Ok(())
}

pub fn is_user_pivot(_adapter: &NavigationAdapter) -> bool {
    true
}

pub fn get_pivot_visible(_adapter: &NavigationAdapter) -> bool {
    true
}

pub fn set_pivot_visible(adapter: &mut NavigationAdapter, _visible: bool) -> NavResult<()> {
    ensure_enabled(adapter)?;
    reject(Property::PivotVisible)
}

pub fn set_hit_aperture(adapter: &mut NavigationAdapter, aperture: f32) -> NavResult<()> {
    ensure_enabled(adapter)?;
    adapter.hit.aperture = Some(aperture);
    reject(Property::HitAperture)
}

pub fn set_hit_direction(adapter: &mut NavigationAdapter, direction: Vec3) -> NavResult<()> {
    ensure_enabled(adapter)?;
    adapter.hit.direction = Some(direction);
    reject(Property::HitDirection)
}

pub fn set_hit_look_from(adapter: &mut NavigationAdapter, look_from: Vec3) -> NavResult<()> {
    ensure_enabled(adapter)?;
    adapter.hit.look_from = Some(look_from);
    reject(Property::HitLookFrom)
}

pub fn set_hit_selection_only(
    adapter: &mut NavigationAdapter,
    selection_only: bool,
) -> NavResult<()> {
    ensure_enabled(adapter)?;
    adapter.hit.selection_only = Some(selection_only);
    reject(Property::HitSelectionOnly)
}

pub fn get_hit_look_at(_adapter: &NavigationAdapter) -> NavResult<Vec3> {
    reject(Property::HitLookAt)
}

/// Cast a ray through the model's hit-test callback and, on a hit, make the
/// hit point the new pivot and push it to the device.
pub fn select_pivot_at(
    adapter: &mut NavigationAdapter,
    origin: Vec3,
    direction: Vec3,
) -> NavResult<Option<Vec3>> {
    let hit = {
        let params = adapter.model.read();
        model_params::hit_test(&params, origin, direction)
    };

    match hit {
        Some(point) => {
            model_params::set_pivot_point(&adapter.model, point);
            push(adapter, Property::PivotPosition, PropertyValue::Point(point))?;
        }
        None => log::trace!("[Navigation] Pivot pick missed the model"),
    }
    Ok(hit)
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Device-driven command activation. Like every device write it is refused
/// while the adapter is disabled; GUI code calls `run_command` instead.
pub fn set_active_command(adapter: &mut NavigationAdapter, id: &str) -> NavResult<()> {
    ensure_enabled(adapter)?;
    run_command(adapter, id);
    Ok(())
}

/// Run the handler bound to `id` whether or not a device is connected.
/// Empty and unknown ids do nothing. Returns true if a handler ran.
pub fn run_command(adapter: &mut NavigationAdapter, id: &str) -> bool {
    if id.is_empty() {
        return false;
    }

    match adapter.commands.get_mut(id) {
        Some(handler) => {
            log::debug!("[Navigation] Activating command '{}'", id);
            handler();
            true
        }
        None => {
            log::debug!("[Navigation] Ignoring unknown command '{}'", id);
            false
        }
    }
}

/// Register `handler` under `id`, replacing any previous binding
pub fn add_command<F>(
    adapter: &mut NavigationAdapter,
    id: impl Into<String>,
    handler: F,
) -> NavResult<()>
where
    F: FnMut() + Send + 'static,
{
    let id = id.into();
    if adapter.commands.insert(id.clone(), Box::new(handler)).is_some() {
        log::debug!("[Navigation] Replaced command '{}'", id);
    }
    push_command_tree(adapter)
}

/// Returns true if a handler was bound to `id`
pub fn remove_command(adapter: &mut NavigationAdapter, id: &str) -> NavResult<bool> {
    if adapter.commands.remove(id).is_none() {
        return Ok(false);
    }
    push_command_tree(adapter)?;
    Ok(true)
}

/// Registered command ids, sorted
pub fn command_ids(adapter: &NavigationAdapter) -> Vec<String> {
    let mut ids: Vec<String> = adapter.commands.keys().cloned().collect();
    ids.sort();
    ids
}

fn push_command_tree(adapter: &mut NavigationAdapter) -> NavResult<()> {
    let ids = command_ids(adapter);
    push(adapter, Property::CommandTree, PropertyValue::Commands(ids))
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Answer a device read by property
pub fn read_property(adapter: &NavigationAdapter, property: Property) -> Reply {
    match property {
        Property::ViewAffine => Reply::value(PropertyValue::Matrix(get_camera_matrix(adapter))),
        Property::ViewFov => Reply::value(PropertyValue::Float(get_view_fov(adapter))),
        Property::ViewFrustum => Reply::value(PropertyValue::Frustum(get_view_frustum(adapter))),
        Property::ViewPerspective => {
            Reply::value(PropertyValue::Bool(get_is_view_perspective(adapter)))
        }
        Property::ViewExtents => Reply::value(PropertyValue::Extents(get_view_extents(adapter))),
        Property::ModelExtents => Reply::value(PropertyValue::Extents(get_model_extents(adapter))),
        Property::SelectionExtents => get_selection_extents(adapter)
            .map(PropertyValue::Extents)
            .into(),
        Property::SelectionAffine => get_selection_transform(adapter)
            .map(PropertyValue::Matrix)
            .into(),
        Property::SelectionEmpty => {
            let (empty, result) = get_is_selection_empty(adapter);
            match result {
                Ok(()) => Reply::value(PropertyValue::Bool(empty)),
                Err(e) => Reply::rejected_with(PropertyValue::Bool(empty), &e),
            }
        }
        Property::PivotPosition => Reply::value(PropertyValue::Point(get_pivot_position(adapter))),
        Property::PivotUser => Reply::value(PropertyValue::Bool(is_user_pivot(adapter))),
        Property::PivotVisible => Reply::value(PropertyValue::Bool(get_pivot_visible(adapter))),
        Property::HitLookAt => get_hit_look_at(adapter).map(PropertyValue::Point).into(),
        Property::UnitsToMeters => get_units_to_meters(adapter).map(PropertyValue::Float).into(),
        Property::FloorPlane => get_floor_plane(adapter).map(PropertyValue::Plane).into(),
        Property::FrontView => Reply::value(PropertyValue::Matrix(get_front_view(adapter))),
        Property::CoordinateSystem => {
            Reply::value(PropertyValue::Matrix(get_coordinate_system(adapter)))
        }
        Property::CommandTree => Reply::value(PropertyValue::Commands(command_ids(adapter))),
        Property::HitAperture
        | Property::HitDirection
        | Property::HitLookFrom
        | Property::HitSelectionOnly
        | Property::ActiveCommand => Reply::error(&NavError::unsupported(property.name())),
    }
}

/// Apply a device write by property
pub fn write_property(
    adapter: &mut NavigationAdapter,
    property: Property,
    value: PropertyValue,
) -> Reply {
    apply_write(adapter, property, value).into()
}

fn apply_write(
    adapter: &mut NavigationAdapter,
    property: Property,
    value: PropertyValue,
) -> NavResult<()> {
    match property {
        Property::ViewAffine => set_camera_matrix(adapter, value.into_matrix(property)?),
        Property::ViewFov => set_view_fov(adapter, value.into_float(property)?),
        Property::ViewFrustum => set_view_frustum(adapter, value.into_frustum(property)?),
        Property::ViewExtents => set_view_extents(adapter, value.into_extents(property)?),
        Property::SelectionAffine => set_selection_transform(adapter, value.into_matrix(property)?),
        Property::PivotPosition => set_pivot_position(adapter, value.into_vec3(property)?),
        Property::PivotVisible => set_pivot_visible(adapter, value.into_bool(property)?),
        Property::HitAperture => set_hit_aperture(adapter, value.into_float(property)?),
        Property::HitDirection => set_hit_direction(adapter, value.into_vec3(property)?),
        Property::HitLookFrom => set_hit_look_from(adapter, value.into_vec3(property)?),
        Property::HitSelectionOnly => set_hit_selection_only(adapter, value.into_bool(property)?),
        Property::ActiveCommand => {
            let id = value.into_text(property)?;
            set_active_command(adapter, &id)
        }
        Property::ViewPerspective
        | Property::ModelExtents
        | Property::SelectionExtents
        | Property::SelectionEmpty
        | Property::PivotUser
        | Property::HitLookAt
        | Property::CommandTree
        | Property::UnitsToMeters
        | Property::FloorPlane
        | Property::FrontView
        | Property::CoordinateSystem => {
            ensure_enabled(adapter)?;
            reject(property)
        }
    }
}

// ============================================================================
// PUSHES TO THE DEVICE
// ============================================================================

/// Push the loaded model's frame, extents, pivot, front view and commands,
/// followed by the current camera pose
pub fn on_model_loaded(adapter: &mut NavigationAdapter) -> NavResult<()> {
    let coordinate_system = get_coordinate_system(adapter);
    push(adapter, Property::CoordinateSystem, PropertyValue::Matrix(coordinate_system))?;

    let extents = get_model_extents(adapter);
    push(adapter, Property::ModelExtents, PropertyValue::Extents(extents))?;

    let pivot = get_pivot_position(adapter);
    push(adapter, Property::PivotPosition, PropertyValue::Point(pivot))?;

    let front = get_front_view(adapter);
    push(adapter, Property::FrontView, PropertyValue::Matrix(front))?;

    push_command_tree(adapter)?;
    on_view_changed(adapter)
}

/// Push the current camera pose
pub fn on_view_changed(adapter: &mut NavigationAdapter) -> NavResult<()> {
    let matrix = get_camera_matrix(adapter);
    push(adapter, Property::ViewAffine, PropertyValue::Matrix(matrix))
}

fn push(
    adapter: &mut NavigationAdapter,
    property: Property,
    value: PropertyValue,
) -> NavResult<()> {
    let runtime = match (adapter.state, adapter.runtime.as_mut()) {
        (AdapterState::Enabled, Some(runtime)) => runtime,
        _ => {
            log::trace!("[Navigation] Adapter disabled, not pushing {}", property);
            return Ok(());
        }
    };

    runtime.write(property, value).map_err(|e| {
        log::warn!("[Navigation] Failed to push {}: {}", property, e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::protocol::NavStatus;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const EPS: f32 = 1e-5;

    type PushLog = Arc<Mutex<Vec<(Property, PropertyValue)>>>;

    struct RecordingRuntime {
        pushes: PushLog,
        connected: Arc<Mutex<Option<String>>>,
    }

    impl DeviceRuntime for RecordingRuntime {
        fn connect(&mut self, profile: &str) -> NavResult<()> {
            *self.connected.lock() = Some(profile.to_string());
            Ok(())
        }

        fn write(&mut self, property: Property, value: PropertyValue) -> NavResult<()> {
            self.pushes.lock().push((property, value));
            Ok(())
        }

        fn disconnect(&mut self) {
            *self.connected.lock() = None;
        }
    }

    struct MissingDriver;

    impl DeviceRuntime for MissingDriver {
        fn connect(&mut self, _profile: &str) -> NavResult<()> {
            Err(NavError::DriverUnavailable("no driver installed".to_string()))
        }

        fn write(&mut self, property: Property, _value: PropertyValue) -> NavResult<()> {
            panic!("write of {} on a runtime that never connected", property);
        }

        fn disconnect(&mut self) {}
    }

    fn create_test_adapter() -> NavigationAdapter {
        create_navigation_adapter(
            camera::new_orbital_camera(Vec3::ZERO, 10.0, 0.0, std::f32::consts::FRAC_PI_2),
            model_params::create_shared_model_params(),
            &NavigationSettings::default(),
        )
    }

    fn create_enabled_adapter() -> (NavigationAdapter, PushLog) {
        let mut adapter = create_test_adapter();
        let pushes = PushLog::default();
        let runtime = RecordingRuntime {
            pushes: pushes.clone(),
            connected: Arc::default(),
        };
        enable(&mut adapter, Box::new(runtime)).expect("recording runtime connects");
        (adapter, pushes)
    }

    #[test]
    fn test_enable_connects_with_profile() {
        let mut adapter = create_test_adapter();
        let connected = Arc::new(Mutex::new(None));
        let runtime = RecordingRuntime {
            pushes: PushLog::default(),
            connected: connected.clone(),
        };

        enable(&mut adapter, Box::new(runtime)).expect("connect succeeds");
        assert_eq!(adapter_state(&adapter), AdapterState::Enabled);
        assert_eq!(connected.lock().as_deref(), Some("Allegiance"));

        disable(&mut adapter);
        assert_eq!(adapter_state(&adapter), AdapterState::Disabled);
        assert_eq!(*connected.lock(), None);
    }

    #[test]
    fn test_failed_connect_stays_disabled() {
        let mut adapter = create_test_adapter();
        let err = enable(&mut adapter, Box::new(MissingDriver)).expect_err("driver missing");

        assert!(matches!(err, NavError::DriverUnavailable(_)));
        assert_eq!(adapter_state(&adapter), AdapterState::Disabled);
        // Pushes are skipped, so MissingDriver::write never runs
        assert!(on_model_loaded(&mut adapter).is_ok());
    }

    #[test]
    fn test_disabled_adapter_ignores_writes() {
        let mut adapter = create_test_adapter();
        let before = camera::camera_position(adapter_camera(&adapter));

        let reply = write_property(
            &mut adapter,
            Property::ViewAffine,
            PropertyValue::Matrix(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))),
        );
        assert_eq!(reply.status, NavStatus::INVALID_OPERATION);
        assert_eq!(camera::camera_position(adapter_camera(&adapter)), before);

        // Reads are still answered
        let reply = read_property(&adapter, Property::ViewAffine);
        assert!(reply.is_success());
    }

    #[test]
    fn test_view_frustum() {
        let mut adapter = create_test_adapter();
        let stereo = adapter_camera_mut(&mut adapter);
        camera::set_fov(stereo, 60.0);
        camera::set_aspect_ratio(stereo, 16.0 / 9.0);
        camera::set_near_plane(stereo, 0.1);
        camera::set_far_plane(stereo, 100.0);

        let frustum = get_view_frustum(&adapter);
        let top = 30f32.to_radians().tan() * 0.1;
        assert!((frustum.top - top).abs() < EPS);
        assert!((frustum.bottom + top).abs() < EPS);
        assert!((frustum.right - top * 16.0 / 9.0).abs() < EPS);
        assert!((frustum.left + top * 16.0 / 9.0).abs() < EPS);
        assert_eq!(frustum.near, 0.1);
        assert_eq!(frustum.far, 100.0);

        assert!((get_view_fov(&adapter) - 60f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_camera_matrix_round_trip() {
        let (mut adapter, _) = create_enabled_adapter();
        let pose = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_y(0.7)
            * Mat4::from_rotation_x(-0.3);

        set_camera_matrix(&mut adapter, pose).expect("enabled adapter accepts poses");

        assert!(get_camera_matrix(&adapter).abs_diff_eq(pose, 1e-4));
        assert_eq!(
            camera::camera_parameterization(adapter_camera(&adapter)),
            Parameterization::Direct
        );
    }

    #[test]
    fn test_reading_then_writing_pose_is_idempotent() {
        let (mut adapter, _) = create_enabled_adapter();
        // Up stays +Y, so it is no longer orthogonal to forward
        camera::set_forward_vector(adapter_camera_mut(&mut adapter), Vec3::new(0.0, -1.0, -1.0));

        let stereo = adapter_camera(&adapter);
        let position = camera::camera_position(stereo);
        let forward = camera::camera_forward_vector(stereo);
        let up = camera::camera_up_vector(stereo);

        let views = Arc::new(AtomicUsize::new(0));
        let counter = views.clone();
        camera::subscribe(adapter_camera_mut(&mut adapter), move |change, _| {
            if change == camera::CameraChange::View {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let matrix = get_camera_matrix(&adapter);
        set_camera_matrix(&mut adapter, matrix).expect("enabled adapter accepts poses");

        let stereo = adapter_camera(&adapter);
        assert_eq!(camera::camera_position(stereo), position);
        assert_eq!(camera::camera_forward_vector(stereo), forward);
        assert_eq!(camera::camera_up_vector(stereo), up);
        assert_eq!(views.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rotate_after_pose_write_orbits_rederived_target() {
        let (mut adapter, _) = create_enabled_adapter();
        // Looking down -Z from (3, 0, 5): the old target (origin) projects onto (3, 0, 0)
        let pose = Mat4::from_translation(Vec3::new(3.0, 0.0, 5.0));
        set_camera_matrix(&mut adapter, pose).expect("enabled adapter accepts poses");
        assert_eq!(
            camera::camera_parameterization(adapter_camera(&adapter)),
            Parameterization::Direct
        );

        let stereo = adapter_camera_mut(&mut adapter);
        camera::rotate(stereo, 0.3, 0.0);

        let orbit = camera::camera_orbit(stereo);
        let position = camera::camera_position(stereo);
        assert!(orbit.target.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-4));
        assert!((orbit.radius - 5.0).abs() < 1e-4);
        assert!(((position - orbit.target).length() - orbit.radius).abs() < 1e-4);
        assert!(camera::camera_forward_vector(stereo)
            .abs_diff_eq((orbit.target - position).normalize(), 1e-4));
        assert!(!position.abs_diff_eq(Vec3::new(3.0, 0.0, 5.0), 1e-3));
        assert_eq!(
            camera::camera_parameterization(stereo),
            Parameterization::OrbitDriven
        );
    }

    #[test]
    fn test_camera_matrix_write_notifies_view() {
        let (mut adapter, _) = create_enabled_adapter();
        let views = Arc::new(AtomicUsize::new(0));
        let counter = views.clone();
        camera::subscribe(adapter_camera_mut(&mut adapter), move |change, _| {
            if change == camera::CameraChange::View {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        let reply = write_property(
            &mut adapter,
            Property::ViewAffine,
            PropertyValue::Matrix(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0))),
        );
        assert!(reply.is_success());
        assert!(views.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_unsupported_accessors_rejected() {
        let (mut adapter, _) = create_enabled_adapter();

        assert!(set_view_fov(&mut adapter, 1.0).is_err());
        assert!(get_units_to_meters(&adapter).is_err());
        assert!(get_floor_plane(&adapter).is_err());
        assert!(get_hit_look_at(&adapter).is_err());

        for property in [
            Property::SelectionExtents,
            Property::SelectionAffine,
            Property::UnitsToMeters,
            Property::FloorPlane,
            Property::HitLookAt,
        ] {
            let reply = read_property(&adapter, property);
            assert_eq!(reply.status, NavStatus::INVALID_OPERATION, "{}", property);
            assert_eq!(reply.value, None);
        }
    }

    #[test]
    fn test_selection_empty_reports_true_with_rejection() {
        let adapter = create_test_adapter();

        let (empty, result) = get_is_selection_empty(&adapter);
        assert!(empty);
        assert!(result.is_err());

        let reply = read_property(&adapter, Property::SelectionEmpty);
        assert_eq!(reply.status, NavStatus::INVALID_OPERATION);
        assert_eq!(reply.value, Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn test_hit_values_recorded_but_rejected() {
        let (mut adapter, _) = create_enabled_adapter();

        let reply = write_property(&mut adapter, Property::HitAperture, PropertyValue::Float(0.25));
        assert_eq!(reply.status, NavStatus::INVALID_OPERATION);
        let reply = write_property(
            &mut adapter,
            Property::HitDirection,
            PropertyValue::Vector(Vec3::NEG_Z),
        );
        assert_eq!(reply.status, NavStatus::INVALID_OPERATION);

        let hit = hit_placeholders(&adapter);
        assert_eq!(hit.aperture, Some(0.25));
        assert_eq!(hit.direction, Some(Vec3::NEG_Z));
        assert_eq!(hit.look_from, None);
    }

    #[test]
    fn test_fixed_answers() {
        let adapter = create_test_adapter();

        assert!(get_is_view_perspective(&adapter));
        assert!(is_user_pivot(&adapter));
        assert!(get_pivot_visible(&adapter));
        assert_eq!(
            get_front_view(&adapter),
            Mat4::from_diagonal(Vec4::new(-1.0, 1.0, -1.0, 1.0))
        );
        assert_eq!(
            get_view_extents(&adapter),
            Extents {
                min: Vec3::splat(-1.0),
                max: Vec3::splat(1.0),
            }
        );
    }

    #[test]
    fn test_pivot_shared_with_model_params() {
        let (mut adapter, _) = create_enabled_adapter();
        let params = shared_model_params(&adapter);

        model_params::set_pivot_point(&params, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(get_pivot_position(&adapter), Vec3::new(1.0, 0.0, 0.0));

        set_pivot_position(&mut adapter, Vec3::new(0.0, 2.0, 0.0)).expect("pivot write accepted");
        assert_eq!(params.read().pivot_point, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_active_command_empty_is_noop() {
        let (mut adapter, _) = create_enabled_adapter();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        add_command(&mut adapter, "", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration succeeds");

        assert!(set_active_command(&mut adapter, "").is_ok());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_gui_command_runs_without_device() {
        let mut adapter = create_test_adapter();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        add_command(&mut adapter, "view.fit", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration succeeds while disabled");

        let err = set_active_command(&mut adapter, "view.fit")
            .expect_err("device activation is refused while disabled");
        assert!(matches!(err, NavError::NotEnabled));
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        assert!(run_command(&mut adapter, "view.fit"));
        assert!(!run_command(&mut adapter, "view.missing"));
        assert!(!run_command(&mut adapter, ""));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_active_command_unknown_is_ignored() {
        let (mut adapter, _) = create_enabled_adapter();
        assert!(set_active_command(&mut adapter, "does.not.exist").is_ok());
    }

    #[test]
    fn test_active_command_invoked_once() {
        let (mut adapter, _) = create_enabled_adapter();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        add_command(&mut adapter, "view.reset", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration succeeds");

        let reply = write_property(
            &mut adapter,
            Property::ActiveCommand,
            PropertyValue::Text("view.reset".to_string()),
        );
        assert!(reply.is_success());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reregistering_command_replaces_handler() {
        let (mut adapter, _) = create_enabled_adapter();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = first.clone();
        add_command(&mut adapter, "fit", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration succeeds");
        let counter = second.clone();
        add_command(&mut adapter, "fit", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration succeeds");

        set_active_command(&mut adapter, "fit").expect("command runs");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(command_ids(&adapter), vec!["fit".to_string()]);
    }

    #[test]
    fn test_command_tree_pushed_when_enabled() {
        let (mut adapter, pushes) = create_enabled_adapter();
        add_command(&mut adapter, "zoom.fit", || {}).expect("registration succeeds");
        add_command(&mut adapter, "view.front", || {}).expect("registration succeeds");
        assert_eq!(remove_command(&mut adapter, "zoom.fit").ok(), Some(true));
        assert_eq!(remove_command(&mut adapter, "zoom.fit").ok(), Some(false));

        let pushes = pushes.lock();
        let trees: Vec<&PropertyValue> = pushes
            .iter()
            .filter(|(property, _)| *property == Property::CommandTree)
            .map(|(_, value)| value)
            .collect();
        assert_eq!(trees.len(), 3);
        assert_eq!(
            trees[1],
            &PropertyValue::Commands(vec!["view.front".to_string(), "zoom.fit".to_string()])
        );
        assert_eq!(trees[2], &PropertyValue::Commands(vec!["view.front".to_string()]));
    }

    #[test]
    fn test_on_model_loaded_push_order() {
        let (mut adapter, pushes) = create_enabled_adapter();
        on_model_loaded(&mut adapter).expect("pushes succeed");

        let order: Vec<Property> = pushes.lock().iter().map(|(property, _)| *property).collect();
        assert_eq!(
            order,
            vec![
                Property::CoordinateSystem,
                Property::ModelExtents,
                Property::PivotPosition,
                Property::FrontView,
                Property::CommandTree,
                Property::ViewAffine,
            ]
        );
    }

    #[test]
    fn test_select_pivot_at_hit() {
        let (mut adapter, pushes) = create_enabled_adapter();
        model_params::install_hit_test(
            &shared_model_params(&adapter),
            Box::new(|origin, _direction| Some(Vec3::new(origin.x, origin.y, 0.0))),
        );

        let hit = select_pivot_at(&mut adapter, Vec3::new(1.0, 1.0, 5.0), Vec3::NEG_Z)
            .expect("push succeeds");
        assert_eq!(hit, Some(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(get_pivot_position(&adapter), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(
            pushes.lock().last(),
            Some(&(Property::PivotPosition, PropertyValue::Point(Vec3::new(1.0, 1.0, 0.0))))
        );
    }

    #[test]
    fn test_select_pivot_at_miss_keeps_pivot() {
        let (mut adapter, pushes) = create_enabled_adapter();
        let hit = select_pivot_at(&mut adapter, Vec3::ZERO, Vec3::NEG_Z).expect("no push needed");
        assert_eq!(hit, None);
        assert_eq!(get_pivot_position(&adapter), Vec3::ZERO);
        assert!(pushes.lock().is_empty());
    }

    #[test]
    fn test_write_type_mismatch() {
        let (mut adapter, _) = create_enabled_adapter();
        let reply =
            write_property(&mut adapter, Property::PivotPosition, PropertyValue::Bool(true));
        assert_eq!(reply.status, NavStatus::INVALID_ARGUMENT);
    }
}
