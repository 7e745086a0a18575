/// Navigation Module - Data-Oriented Programming (DOP) style
///
/// - protocol.rs: property names, values, status codes
/// - model_params.rs: extents, pivot and hit-test shared with the scene
/// - navigation_data.rs: adapter state and the device runtime seam
/// - navigation_operations.rs: property accessors, commands, pushes
/// - bridge.rs: device thread to GUI thread request queue

pub mod bridge;
pub mod model_params;
pub mod navigation_data;
pub mod navigation_operations;
pub mod protocol;

pub use bridge::{device_channel, DeviceEndpoint, DeviceRequest, RequestQueue};

pub use model_params::{
    create_shared_model_params, extents_center, hit_test, install_hit_test,
    reset_pivot_to_center, set_model_extents, set_pivot_point, HitTestFn, ModelNavParameters,
    SharedModelParams,
};

pub use navigation_data::{
    AdapterState, CommandHandler, DeviceRuntime, HitPlaceholders, NavigationAdapter,
};

pub use navigation_operations::{
    // Lifecycle
    adapter_camera,
    adapter_camera_mut,
    adapter_state,
    create_navigation_adapter,
    disable,
    enable,
    hit_placeholders,
    shared_model_params,

    // View
    get_camera_matrix,
    get_coordinate_system,
    get_front_view,
    get_is_view_perspective,
    get_view_extents,
    get_view_fov,
    get_view_frustum,
    set_camera_matrix,
    set_view_extents,
    set_view_fov,
    set_view_frustum,

    // Model and selection
    get_floor_plane,
    get_is_selection_empty,
    get_model_extents,
    get_selection_extents,
    get_selection_transform,
    get_units_to_meters,
    set_selection_transform,

    // Pivot and hit testing
    get_hit_look_at,
    get_pivot_position,
    get_pivot_visible,
    is_user_pivot,
    select_pivot_at,
    set_hit_aperture,
    set_hit_direction,
    set_hit_look_from,
    set_hit_selection_only,
    set_pivot_position,
    set_pivot_visible,

    // Commands
    add_command,
    command_ids,
    remove_command,
    run_command,
    set_active_command,

    // Dispatch and pushes
    on_model_loaded,
    on_view_changed,
    read_property,
    write_property,
};

pub use protocol::{Extents, NavStatus, Property, PropertyValue, Reply};
