//! Orbit operations
//!
//! The orbit parameterization (target, radius, phi, theta) drives position and
//! forward while the camera is `OrbitDriven`. Direct writes (device matrix,
//! translate, zoom, plain setters) switch the camera to `Direct`; the next orbit
//! operation re-derives the parameters from the current pose first instead of
//! orbiting around a stale target.

use glam::{Quat, Vec3};
use std::f32::consts::PI;

use super::camera_data::{OrbitParams, Parameterization, StereoCamera};
use super::camera_operations::{
    normalized, right_vector, write_forward_vector, write_position, write_up_vector,
};
use crate::constants::frame::WORLD_UP;
use crate::constants::orbit::{MIN_RADIUS, THETA_EPSILON};

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Create an orbit-driven camera around `target`
pub fn new_orbital_camera(target: Vec3, radius: f32, phi: f32, theta: f32) -> StereoCamera {
    let mut camera = StereoCamera::default();
    camera.orbit = OrbitParams {
        target,
        radius,
        phi,
        theta,
    };
    camera.parameterization = Parameterization::OrbitDriven;
    apply_orbit(&mut camera);
    camera
}

/// Unit vector for azimuth `phi` and polar angle `theta` measured from +Y
pub fn spherical_to_cartesian(phi: f32, theta: f32) -> Vec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi)
}

// ============================================================================
// ORBIT PARAMETERS
// ============================================================================

/// Recompute position and forward from the orbit parameters
pub fn update(camera: &mut StereoCamera) {
    reconcile_orbit(camera);
    apply_orbit(camera);
}

pub fn set_target(camera: &mut StereoCamera, target: Vec3) {
    reconcile_orbit(camera);
    camera.orbit.target = target;
    apply_orbit(camera);
}

/// Set the orbit radius. Values below the minimum radius are raised to it.
pub fn set_radius(camera: &mut StereoCamera, radius: f32) {
    reconcile_orbit(camera);
    camera.orbit.radius = radius.max(MIN_RADIUS);
    apply_orbit(camera);
}

pub fn set_phi(camera: &mut StereoCamera, phi: f32) {
    reconcile_orbit(camera);
    camera.orbit.phi = phi;
    apply_orbit(camera);
}

/// Set the polar angle. Clamped away from the poles.
pub fn set_theta(camera: &mut StereoCamera, theta: f32) {
    reconcile_orbit(camera);
    camera.orbit.theta = theta.clamp(THETA_EPSILON, PI - THETA_EPSILON);
    apply_orbit(camera);
}

/// Re-derive the orbit parameters from the current pose when the camera is
/// `Direct`. The old target is projected onto the view ray when it lies in
/// front of the camera; otherwise the target is placed `radius` ahead.
/// Returns true if the parameters were re-derived.
pub fn reconcile_orbit(camera: &mut StereoCamera) -> bool {
    if camera.parameterization == Parameterization::OrbitDriven {
        return false;
    }

    let position = camera.position;
    let forward = camera.forward_vector;
    let stale = camera.orbit;

    let along = (stale.target - position).dot(forward);
    let radius = if along > MIN_RADIUS {
        along
    } else {
        stale.radius.max(MIN_RADIUS)
    };
    let target = position + forward * radius;

    camera.orbit = orbit_from_offset(target, position - target);
    camera.parameterization = Parameterization::OrbitDriven;

    log::debug!(
        "[Orbit] Re-derived orbit: target ({:.3}, {:.3}, {:.3}) | radius {:.3} | phi {:.3} | theta {:.3}",
        camera.orbit.target.x,
        camera.orbit.target.y,
        camera.orbit.target.z,
        camera.orbit.radius,
        camera.orbit.phi,
        camera.orbit.theta
    );
    true
}

// ============================================================================
// GESTURES
// ============================================================================

/// Orbit around the target: yaw `-dx` about world up, then pitch `dy` about
/// `up x forward`. Returns true if the up vector reversed (the camera went over
/// a pole), in which case the caller should invert its drag direction.
pub fn rotate(camera: &mut StereoCamera, dx: f32, dy: f32) -> bool {
    reconcile_orbit(camera);

    let target = camera.orbit.target;
    let old_up = camera.up_vector;

    let pitch = normalized(old_up.cross(camera.forward_vector))
        .map(|axis| Quat::from_axis_angle(axis, dy))
        .unwrap_or(Quat::IDENTITY);
    let rotation = Quat::from_axis_angle(WORLD_UP, -dx) * pitch;

    let offset = rotation * (camera.position - target);
    let Some(forward) = normalized(-offset) else {
        log::trace!("[Orbit] Camera sits on its target, rotation ignored");
        return false;
    };

    // Keep the horizon level; fall back to the rotated up vector straight
    // above or below the target.
    let new_up = normalized(WORLD_UP - forward * WORLD_UP.dot(forward))
        .unwrap_or_else(|| rotation * old_up);

    camera.orbit = orbit_from_offset(target, offset);
    write_position(camera, target + offset);
    write_forward_vector(camera, forward);
    write_up_vector(camera, new_up);

    old_up.dot(new_up) < 0.0
}

/// Pan sideways (`dx`) and vertically (`-dy`) without moving the target
pub fn translate(camera: &mut StereoCamera, dx: f32, dy: f32) {
    let right = right_vector(camera);
    let up = right.cross(camera.forward_vector);
    let position = camera.position + right * dx - up * dy;
    if write_position(camera, position) {
        camera.parameterization = Parameterization::Direct;
    }
}

/// Move along the forward vector by `distance`; the radius is not touched
pub fn zoom(camera: &mut StereoCamera, distance: f32) {
    let position = camera.position + camera.forward_vector * distance;
    if write_position(camera, position) {
        camera.parameterization = Parameterization::Direct;
    }
}

// ============================================================================
// INTERNALS
// ============================================================================

fn apply_orbit(camera: &mut StereoCamera) {
    let orbit = camera.orbit;
    let position = orbit.target + spherical_to_cartesian(orbit.phi, orbit.theta) * orbit.radius;

    write_position(camera, position);
    write_forward_vector(camera, orbit.target - position);

    let forward = camera.forward_vector;
    let up = camera.up_vector;
    if let Some(up) = normalized(up - forward * up.dot(forward)) {
        write_up_vector(camera, up);
    }

    camera.parameterization = Parameterization::OrbitDriven;
}

fn orbit_from_offset(target: Vec3, offset: Vec3) -> OrbitParams {
    let radius = offset.length().max(MIN_RADIUS);
    OrbitParams {
        target,
        radius,
        phi: offset.z.atan2(offset.x),
        theta: (offset.y / radius).clamp(-1.0, 1.0).acos(),
    }
}
