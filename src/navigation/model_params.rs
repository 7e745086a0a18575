//! Model navigation parameters
//!
//! Small value object shared between the application, the scene and the
//! navigation adapter. Lifetime is that of the longest holder.

use glam::Vec3;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Ray cast against the loaded model: (origin, direction) -> nearest hit
pub type HitTestFn = Box<dyn Fn(Vec3, Vec3) -> Option<Vec3> + Send + Sync>;

/// Model extents, pivot and hit-test callback
pub struct ModelNavParameters {
    pub min_extent: Vec3,
    pub max_extent: Vec3,

    /// Rotation center used by the navigation device
    pub pivot_point: Vec3,

    /// None until the scene installs a picker
    pub hit_test: Option<HitTestFn>,
}

/// Shared handle, cloned into every holder
pub type SharedModelParams = Arc<RwLock<ModelNavParameters>>;

impl Default for ModelNavParameters {
    fn default() -> Self {
        Self {
            min_extent: Vec3::ZERO,
            max_extent: Vec3::ZERO,
            pivot_point: Vec3::ZERO,
            hit_test: None,
        }
    }
}

impl fmt::Debug for ModelNavParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelNavParameters")
            .field("min_extent", &self.min_extent)
            .field("max_extent", &self.max_extent)
            .field("pivot_point", &self.pivot_point)
            .field("hit_test", &self.hit_test.as_ref().map(|_| "<HitTestFn>"))
            .finish()
    }
}

pub fn create_shared_model_params() -> SharedModelParams {
    Arc::new(RwLock::new(ModelNavParameters::default()))
}

/// Store the model bounding box. Corners are reordered per axis.
pub fn set_model_extents(params: &SharedModelParams, a: Vec3, b: Vec3) {
    let mut params = params.write();
    params.min_extent = a.min(b);
    params.max_extent = a.max(b);
}

pub fn set_pivot_point(params: &SharedModelParams, pivot: Vec3) {
    params.write().pivot_point = pivot;
}

pub fn install_hit_test(params: &SharedModelParams, hit_test: HitTestFn) {
    params.write().hit_test = Some(hit_test);
}

pub fn extents_center(params: &ModelNavParameters) -> Vec3 {
    (params.min_extent + params.max_extent) * 0.5
}

/// Move the pivot to the center of the model extents
pub fn reset_pivot_to_center(params: &SharedModelParams) {
    let mut params = params.write();
    params.pivot_point = extents_center(&params);
}

/// Cast a ray through the installed callback. No callback means no hit.
pub fn hit_test(params: &ModelNavParameters, origin: Vec3, direction: Vec3) -> Option<Vec3> {
    params
        .hit_test
        .as_ref()
        .and_then(|cast| cast(origin, direction))
}
