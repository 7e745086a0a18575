//! Headless navigation demo
//!
//! Wires configuration, the stereo camera, the navigation adapter and the
//! device bridge together. A scripted device thread plays the part of the
//! navigation driver. Run with `RUST_LOG=debug` to watch the protocol traffic.
//!
//! Usage: navigation_demo [config.toml]

use allegiance::{
    camera,
    config::{self, AllegianceConfig},
    navigation::{self, DeviceRuntime, Property, PropertyValue},
    NavResult,
};
use anyhow::Context;
use glam::{Mat4, Vec3};
use std::path::PathBuf;
use std::thread;

/// Stand-in for the driver's outgoing side: logs every push
struct LoggingRuntime;

impl DeviceRuntime for LoggingRuntime {
    fn connect(&mut self, profile: &str) -> NavResult<()> {
        log::info!("[Demo] Device connected for profile '{}'", profile);
        Ok(())
    }

    fn write(&mut self, property: Property, value: PropertyValue) -> NavResult<()> {
        log::info!("[Demo] Device <- {} = {:?}", property, value);
        Ok(())
    }

    fn disconnect(&mut self) {
        log::info!("[Demo] Device disconnected");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => config::load_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AllegianceConfig::default(),
    };

    println!("Allegiance navigation demo (profile '{}')", config.navigation.profile);

    // Scene: a unit cube centered on the orbit target, picked against its front face
    let model = navigation::create_shared_model_params();
    let center = config.orbit.target;
    navigation::set_model_extents(&model, center - Vec3::splat(0.5), center + Vec3::splat(0.5));
    navigation::reset_pivot_to_center(&model);
    navigation::install_hit_test(
        &model,
        Box::new(move |origin, direction| {
            let face_z = center.z + 0.5;
            if direction.z.abs() < f32::EPSILON {
                return None;
            }
            let t = (face_z - origin.z) / direction.z;
            (t >= 0.0).then(|| origin + direction * t)
        }),
    );

    let stereo = config::build_camera(&config);
    let mut adapter = navigation::create_navigation_adapter(stereo, model, &config.navigation);

    if navigation::enable(&mut adapter, Box::new(LoggingRuntime)).is_err() {
        println!("[WARN] Navigation device unavailable, continuing without it");
    }

    navigation::add_command(&mut adapter, "view.front", || {
        log::info!("[Demo] Command 'view.front' executed");
    })?;
    navigation::add_command(&mut adapter, "view.fit", || {
        log::info!("[Demo] Command 'view.fit' executed");
    })?;
    navigation::on_model_loaded(&mut adapter)?;

    // Device thread: read the pose, nudge it and trigger a command
    let (endpoint, queue) = navigation::device_channel(config.navigation.request_queue_capacity);
    let device = thread::spawn(move || {
        let reply = endpoint.read(Property::ViewAffine);
        let pose = match reply.value {
            Some(PropertyValue::Matrix(pose)) => pose,
            _ => Mat4::IDENTITY,
        };

        let nudged = pose * Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0));
        let write = endpoint.write(Property::ViewAffine, PropertyValue::Matrix(nudged));
        let command = endpoint.activate_command("view.fit");
        let selection = endpoint.read(Property::SelectionEmpty);

        vec![
            ("view.affine write", write.status),
            ("commands.activeCommand", command.status),
            ("selection.empty", selection.status),
        ]
    });

    // GUI thread: answer the device between frames
    let mut answered = 0;
    while !device.is_finished() {
        answered += queue.drain(&mut adapter);
        thread::yield_now();
    }
    answered += queue.drain(&mut adapter);

    let statuses = device
        .join()
        .map_err(|_| anyhow::anyhow!("Device thread panicked"))?;
    println!("[OK] Answered {} device requests", answered);
    for (call, status) in statuses {
        println!("     {} -> status {}", call, status.0);
    }

    // Mouse drag: orbit, then push the new pose
    let over_pole = camera::rotate(navigation::adapter_camera_mut(&mut adapter), 0.1, 0.05);
    if over_pole {
        println!("[OK] Rotation crossed a pole, drag direction inverted");
    }
    navigation::on_view_changed(&mut adapter)?;
    camera::log_camera_context(navigation::adapter_camera(&adapter));

    // Click through the screen center to pick a new pivot
    let stereo = navigation::adapter_camera(&adapter);
    let origin = camera::camera_position(stereo);
    let direction = camera::camera_forward_vector(stereo);
    match navigation::select_pivot_at(&mut adapter, origin, direction)? {
        Some(pivot) => println!("[OK] Pivot moved to {:?}", pivot),
        None => println!("[OK] Pick missed the model, pivot unchanged"),
    }

    camera::validate_camera(navigation::adapter_camera(&adapter))
        .context("Camera left a valid state")?;

    navigation::disable(&mut adapter);
    println!("[OK] Demo complete");
    Ok(())
}
