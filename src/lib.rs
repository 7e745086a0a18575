// Allegiance navigation core - Data-Oriented Programming (DOP) Architecture
//
// Stereo camera model and 3D navigation device integration for the Allegiance
// stereo viewer.
// - camera: stereo camera data, setters, derived matrices, orbit gestures
// - navigation: device property protocol, adapter, device bridge
//
// State lives in *_data modules; behaviour is free functions in *_operations
// modules.

// Constants module
pub mod constants;

// Core modules
pub mod config;
pub mod error;

// Essential systems
pub mod camera;
pub mod navigation;

pub use camera::{
    CameraChange, Eye, Frustum, GraphicsApi, ListenerId, OrbitParams, Parameterization,
    StereoCamera,
};
pub use config::{
    build_camera, load_config, parse_config, AllegianceConfig, CameraSettings,
    NavigationSettings, OrbitSettings,
};
pub use error::{NavError, NavResult};
pub use navigation::{
    device_channel, AdapterState, DeviceEndpoint, DeviceRuntime, ModelNavParameters,
    NavigationAdapter, Property, PropertyValue, Reply, RequestQueue, SharedModelParams,
};
