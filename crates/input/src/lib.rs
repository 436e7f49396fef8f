//! Input and camera control: pointer lock, movement keys, first-person camera.
//!
//! # Invariants
//! - `pointer_locked` is the only mutable control state and changes only on
//!   host lock notifications, never on the request itself.
//! - Movement keys reach the camera every frame whether or not the pointer is
//!   locked; mouse look is applied only while locked.
//! - Pointer-lock support is probed once; afterwards it is a plain flag.

pub mod bindings;
pub mod camera;
pub mod capability;
pub mod control;
pub mod movement;

pub use bindings::KeyBindings;
pub use camera::{CameraConfig, CameraRig, FirstPersonCamera, MovementIntegrator};
pub use capability::LockCapability;
pub use control::{
    ControlError, ControlState, ControlStateMachine, LockState, PointerLockHost, PressOutcome,
};
pub use movement::{MoveDirection, MoveIntent, MovementController};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
