use crate::bindings::KeyBindings;
use crate::camera::MovementIntegrator;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

/// Per-frame movement request. Each axis is in `[-1, 1]`; opposite keys
/// cancel out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveIntent {
    pub forward: f32,
    pub strafe: f32,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0
    }
}

/// Tracks held movement keys and forwards them to the integrator.
///
/// Independent of pointer lock: keys move the camera whether or not mouse
/// look is active.
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    bindings: KeyBindings,
    held: BTreeSet<MoveDirection>,
}

impl MovementController {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Key press or release. Returns whether `key` is a movement key.
    pub fn on_key(&mut self, key: &str, pressed: bool) -> bool {
        let Some(dir) = self.bindings.direction_for(key) else {
            return false;
        };
        if pressed {
            self.held.insert(dir);
        } else {
            self.held.remove(&dir);
        }
        true
    }

    pub fn is_held(&self, dir: MoveDirection) -> bool {
        self.held.contains(&dir)
    }

    /// Drop every held key. Hosts call this on focus loss, since the
    /// matching releases are never delivered.
    pub fn clear(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!(held = self.held.len(), "clearing held movement keys");
        }
        self.held.clear();
    }

    pub fn intent(&self) -> MoveIntent {
        let axis = |pos: MoveDirection, neg: MoveDirection| {
            (self.is_held(pos) as i8 - self.is_held(neg) as i8) as f32
        };
        MoveIntent {
            forward: axis(MoveDirection::Forward, MoveDirection::Backward),
            strafe: axis(MoveDirection::StrafeRight, MoveDirection::StrafeLeft),
        }
    }

    /// Hand this frame's intent to `integrator`.
    pub fn forward_to<I: MovementIntegrator + ?Sized>(&self, integrator: &mut I, dt: f32) {
        integrator.integrate(self.intent(), dt);
    }
}
