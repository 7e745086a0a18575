//! Device bridge
//!
//! The device runtime calls back on its own thread, but the adapter and the
//! camera it owns belong to the GUI thread. Device calls are queued as requests
//! and answered when the GUI thread drains the queue between frames.

use crossbeam_channel::{Receiver, Sender};

use super::navigation_data::NavigationAdapter;
use super::navigation_operations::{read_property, write_property};
use super::protocol::{Property, PropertyValue, Reply};
use crate::error::NavResult;

/// A device call waiting for the GUI thread
#[derive(Debug)]
pub enum DeviceRequest {
    Read {
        property: Property,
        reply: Sender<Reply>,
    },
    Write {
        property: Property,
        value: PropertyValue,
        reply: Sender<Reply>,
    },
    ActivateCommand {
        id: String,
        reply: Sender<Reply>,
    },
}

/// Device-thread side of the bridge
#[derive(Debug, Clone)]
pub struct DeviceEndpoint {
    requests: Sender<DeviceRequest>,
}

/// GUI-thread side of the bridge
#[derive(Debug)]
pub struct RequestQueue {
    requests: Receiver<DeviceRequest>,
}

/// Create a bridge holding at most `capacity` pending requests
pub fn device_channel(capacity: usize) -> (DeviceEndpoint, RequestQueue) {
    let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
    (
        DeviceEndpoint { requests: sender },
        RequestQueue {
            requests: receiver,
        },
    )
}

impl DeviceEndpoint {
    /// Blocks until the GUI thread answers
    pub fn read(&self, property: Property) -> Reply {
        self.call(|reply| DeviceRequest::Read { property, reply })
    }

    /// Blocks until the GUI thread answers
    pub fn write(&self, property: Property, value: PropertyValue) -> Reply {
        self.call(|reply| DeviceRequest::Write {
            property,
            value,
            reply,
        })
    }

    pub fn activate_command(&self, id: impl Into<String>) -> Reply {
        let id = id.into();
        self.call(|reply| DeviceRequest::ActivateCommand { id, reply })
    }

    fn call(&self, request: impl FnOnce(Sender<Reply>) -> DeviceRequest) -> Reply {
        match self.round_trip(request) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("[Bridge] Device call failed: {}", e);
                Reply::error(&e)
            }
        }
    }

    fn round_trip(&self, request: impl FnOnce(Sender<Reply>) -> DeviceRequest) -> NavResult<Reply> {
        let (reply_sender, reply_receiver) = crossbeam_channel::bounded(1);
        self.requests.send(request(reply_sender))?;
        Ok(reply_receiver.recv()?)
    }
}

impl RequestQueue {
    /// Answer the requests pending at the time of the call, in order.
    /// Returns how many were answered.
    pub fn drain(&self, adapter: &mut NavigationAdapter) -> usize {
        let pending = self.requests.len();
        let mut answered = 0;

        for _ in 0..pending {
            let Ok(request) = self.requests.try_recv() else {
                break;
            };
            answer(adapter, request);
            answered += 1;
        }

        if answered > 0 {
            log::trace!("[Bridge] Answered {} device requests", answered);
        }
        answered
    }

    pub fn pending(&self) -> usize {
        self.requests.len()
    }
}

fn answer(adapter: &mut NavigationAdapter, request: DeviceRequest) {
    let (reply, sender) = match request {
        DeviceRequest::Read { property, reply } => (read_property(adapter, property), reply),
        DeviceRequest::Write {
            property,
            value,
            reply,
        } => (write_property(adapter, property, value), reply),
        DeviceRequest::ActivateCommand { id, reply } => (
            write_property(adapter, Property::ActiveCommand, PropertyValue::Text(id)),
            reply,
        ),
    };

    if sender.send(reply).is_err() {
        log::trace!("[Bridge] Device stopped waiting, dropping reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera;
    use crate::config::NavigationSettings;
    use crate::navigation::model_params;
    use crate::navigation::navigation_data::DeviceRuntime;
    use crate::navigation::navigation_operations::{
        adapter_camera, add_command, create_navigation_adapter, enable,
    };
    use crate::navigation::protocol::NavStatus;
    use glam::{Mat4, Vec3};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    struct SilentRuntime;

    impl DeviceRuntime for SilentRuntime {
        fn connect(&mut self, _profile: &str) -> NavResult<()> {
            Ok(())
        }

        fn write(&mut self, _property: Property, _value: PropertyValue) -> NavResult<()> {
            Ok(())
        }

        fn disconnect(&mut self) {}
    }

    fn create_enabled_adapter() -> NavigationAdapter {
        let mut adapter = create_navigation_adapter(
            camera::new_orbital_camera(Vec3::ZERO, 10.0, 0.0, std::f32::consts::FRAC_PI_2),
            model_params::create_shared_model_params(),
            &NavigationSettings::default(),
        );
        enable(&mut adapter, Box::new(SilentRuntime)).expect("silent runtime connects");
        adapter
    }

    #[test]
    fn test_round_trip_across_threads() {
        let mut adapter = create_enabled_adapter();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        add_command(&mut adapter, "view.fit", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .expect("registration succeeds");

        let (endpoint, queue) = device_channel(4);
        let pose = Mat4::from_translation(Vec3::new(0.0, 1.0, 8.0));

        let device = thread::spawn(move || {
            let before = endpoint.read(Property::ViewAffine);
            let written = endpoint.write(Property::ViewAffine, PropertyValue::Matrix(pose));
            let after = endpoint.read(Property::ViewAffine);
            let command = endpoint.activate_command("view.fit");
            (before, written, after, command)
        });

        let mut answered = 0;
        while !device.is_finished() {
            answered += queue.drain(&mut adapter);
            thread::yield_now();
        }
        answered += queue.drain(&mut adapter);

        let (before, written, after, command) = device.join().expect("device thread panicked");
        assert_eq!(answered, 4);
        assert!(before.is_success());
        assert!(written.is_success());
        match after.value {
            Some(PropertyValue::Matrix(read_back)) => assert!(read_back.abs_diff_eq(pose, 1e-5)),
            other => panic!("expected a matrix, got {:?}", other),
        }
        assert!(command.is_success());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(
            camera::camera_position(adapter_camera(&adapter)),
            Vec3::new(0.0, 1.0, 8.0)
        );
    }

    #[test]
    fn test_pending_counts_queued_requests() {
        let mut adapter = create_enabled_adapter();
        let (endpoint, queue) = device_channel(4);
        assert_eq!(queue.pending(), 0);

        let device = thread::spawn(move || endpoint.read(Property::ViewFov));
        while queue.pending() == 0 {
            thread::yield_now();
        }
        assert_eq!(queue.pending(), 1);

        assert_eq!(queue.drain(&mut adapter), 1);
        let reply = device.join().expect("device thread panicked");
        assert!(reply.is_success());
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_closed_queue_reports_not_connected() {
        let (endpoint, queue) = device_channel(1);
        drop(queue);

        let reply = endpoint.read(Property::ViewAffine);
        assert_eq!(reply.status, NavStatus::NOT_CONNECTED);
        assert_eq!(reply.value, None);
    }
}
