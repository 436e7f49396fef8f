use crate::camera::MovementIntegrator;
use crate::capability::LockCapability;
use serde::Serialize;
use std::fmt;

/// Errors surfaced by pointer-lock handling. Neither is fatal: the machine
/// stays `Unlocked` and movement keeps working.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("pointer lock is not supported by the host")]
    HostCapabilityUnavailable,
    #[error("pointer lock request denied: {0}")]
    TransientHostDenial(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

/// Observable control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ControlState {
    pub pointer_locked: bool,
}

impl ControlState {
    pub fn lock_state(self) -> LockState {
        if self.pointer_locked {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }
}

/// Host side of pointer lock. A successful request only means the host
/// accepted it; the grant arrives later as a lock notification.
pub trait PointerLockHost {
    fn request_pointer_lock(&mut self) -> Result<(), ControlError>;

    fn release_pointer_lock(&mut self);
}

/// What a primary press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// A lock request went to the host.
    Requested,
    /// Already locked; nothing was requested.
    AlreadyLocked,
}

type Listener = Box<dyn FnMut(ControlState)>;

/// Two-state pointer-lock machine: `Unlocked` (initial) and `Locked`.
///
/// Transitions are driven only by [`on_lock_acquired`](Self::on_lock_acquired)
/// and [`on_lock_released`](Self::on_lock_released). Handlers re-read the
/// state on every call, so a release delivered between a press and its grant
/// is applied in arrival order.
pub struct ControlStateMachine {
    state: ControlState,
    lock_supported: bool,
    unavailable_reported: bool,
    listeners: Vec<Listener>,
}

impl fmt::Debug for ControlStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlStateMachine")
            .field("state", &self.state)
            .field("lock_supported", &self.lock_supported)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ControlStateMachine {
    pub fn new(lock_supported: bool) -> Self {
        Self {
            state: ControlState::default(),
            lock_supported,
            unavailable_reported: false,
            listeners: Vec::new(),
        }
    }

    pub fn from_capability<M>(capability: &LockCapability<M>) -> Self {
        Self::new(matches!(capability, LockCapability::Available(_)))
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn lock_state(&self) -> LockState {
        self.state.lock_state()
    }

    pub fn is_locked(&self) -> bool {
        self.state.pointer_locked
    }

    pub fn lock_supported(&self) -> bool {
        self.lock_supported
    }

    /// Call `listener` on every state change.
    pub fn observe(&mut self, listener: impl FnMut(ControlState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Primary pointer press. While `Unlocked`, asks the host for a lock.
    ///
    /// The state does not change here; a denied request leaves the machine
    /// `Unlocked` and is not retried until the next press.
    pub fn on_primary_press<H: PointerLockHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<PressOutcome, ControlError> {
        if self.state.pointer_locked {
            return Ok(PressOutcome::AlreadyLocked);
        }
        if !self.lock_supported {
            if !self.unavailable_reported {
                self.unavailable_reported = true;
                tracing::warn!("pointer lock requested but the host cannot provide it");
            }
            return Err(ControlError::HostCapabilityUnavailable);
        }
        match host.request_pointer_lock() {
            Ok(()) => {
                tracing::debug!("pointer lock requested");
                Ok(PressOutcome::Requested)
            }
            Err(e) => {
                tracing::info!("pointer lock request not granted: {e}");
                Err(e)
            }
        }
    }

    /// Ask the host to give the pointer back. The machine stays `Locked`
    /// until the host confirms with a release notification.
    pub fn request_release<H: PointerLockHost + ?Sized>(&mut self, host: &mut H) {
        if self.state.pointer_locked {
            host.release_pointer_lock();
        }
    }

    /// Host reports the lock was granted. Returns whether the state changed.
    pub fn on_lock_acquired(&mut self) -> bool {
        if !self.lock_supported {
            tracing::debug!("ignoring lock grant from a host without pointer lock");
            return false;
        }
        self.set_locked(true)
    }

    /// Host reports the lock was lost (Escape, focus loss, explicit release).
    /// Returns whether the state changed.
    pub fn on_lock_released(&mut self) -> bool {
        self.set_locked(false)
    }

    /// Generic lock-change notification carrying the host's current view.
    pub fn on_lock_change(&mut self, locked: bool) -> bool {
        if locked {
            self.on_lock_acquired()
        } else {
            self.on_lock_released()
        }
    }

    /// Forward a mouse delta to `integrator` if, and only if, the pointer is
    /// locked. Returns whether the delta was applied.
    pub fn forward_look<I: MovementIntegrator + ?Sized>(
        &self,
        integrator: &mut I,
        dx: f32,
        dy: f32,
    ) -> bool {
        if !self.state.pointer_locked {
            return false;
        }
        integrator.look(dx, dy);
        true
    }

    fn set_locked(&mut self, locked: bool) -> bool {
        if self.state.pointer_locked == locked {
            return false;
        }
        self.state.pointer_locked = locked;
        tracing::info!(locked, "pointer lock state changed");
        let state = self.state;
        for listener in &mut self.listeners {
            listener(state);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MoveIntent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeHost {
        requests: usize,
        releases: usize,
        deny: bool,
    }

    impl PointerLockHost for FakeHost {
        fn request_pointer_lock(&mut self) -> Result<(), ControlError> {
            self.requests += 1;
            if self.deny {
                Err(ControlError::TransientHostDenial("user gesture required".into()))
            } else {
                Ok(())
            }
        }

        fn release_pointer_lock(&mut self) {
            self.releases += 1;
        }
    }

    #[derive(Default)]
    struct LookRecorder {
        looks: Vec<(f32, f32)>,
    }

    impl MovementIntegrator for LookRecorder {
        fn integrate(&mut self, _intent: MoveIntent, _dt: f32) {}

        fn look(&mut self, dx: f32, dy: f32) {
            self.looks.push((dx, dy));
        }
    }

    #[test]
    fn starts_unlocked() {
        let m = ControlStateMachine::new(true);
        assert_eq!(m.lock_state(), LockState::Unlocked);
        assert!(!m.state().pointer_locked);
    }

    #[test]
    fn press_then_grant_locks_and_release_unlocks() {
        let mut m = ControlStateMachine::new(true);
        let mut host = FakeHost::default();

        assert_eq!(m.on_primary_press(&mut host), Ok(PressOutcome::Requested));
        // The request alone does not lock.
        assert_eq!(m.lock_state(), LockState::Unlocked);

        assert!(m.on_lock_acquired());
        assert_eq!(m.lock_state(), LockState::Locked);

        assert!(m.on_lock_released());
        assert_eq!(m.lock_state(), LockState::Unlocked);
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn press_while_locked_is_a_no_op() {
        let mut m = ControlStateMachine::new(true);
        let mut host = FakeHost::default();
        m.on_primary_press(&mut host).unwrap();
        m.on_lock_acquired();

        assert_eq!(m.on_primary_press(&mut host), Ok(PressOutcome::AlreadyLocked));
        assert_eq!(m.lock_state(), LockState::Locked);
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn duplicate_notifications_are_no_ops() {
        let mut m = ControlStateMachine::new(true);
        assert!(!m.on_lock_released());
        assert!(m.on_lock_acquired());
        assert!(!m.on_lock_acquired());
        assert_eq!(m.lock_state(), LockState::Locked);
    }

    #[test]
    fn denial_leaves_unlocked_and_next_press_retries() {
        let mut m = ControlStateMachine::new(true);
        let mut host = FakeHost {
            deny: true,
            ..FakeHost::default()
        };
        assert!(matches!(
            m.on_primary_press(&mut host),
            Err(ControlError::TransientHostDenial(_))
        ));
        assert_eq!(m.lock_state(), LockState::Unlocked);

        host.deny = false;
        assert_eq!(m.on_primary_press(&mut host), Ok(PressOutcome::Requested));
        assert_eq!(host.requests, 2);
    }

    #[test]
    fn unsupported_host_stays_unlocked() {
        let cap: LockCapability<()> = LockCapability::Unavailable;
        let mut m = ControlStateMachine::from_capability(&cap);
        let mut host = FakeHost::default();

        for _ in 0..3 {
            assert_eq!(
                m.on_primary_press(&mut host),
                Err(ControlError::HostCapabilityUnavailable)
            );
        }
        assert!(!m.on_lock_acquired());
        assert_eq!(m.lock_state(), LockState::Unlocked);
        assert_eq!(host.requests, 0);
    }

    #[test]
    fn release_between_press_and_grant() {
        let mut m = ControlStateMachine::new(true);
        let mut host = FakeHost::default();
        m.on_primary_press(&mut host).unwrap();
        // A stale release arrives before the grant.
        assert!(!m.on_lock_released());
        assert!(m.on_lock_acquired());
        assert!(m.is_locked());
    }

    #[test]
    fn lock_change_maps_to_notifications() {
        let mut m = ControlStateMachine::new(true);
        assert!(m.on_lock_change(true));
        assert!(m.is_locked());
        assert!(m.on_lock_change(false));
        assert!(!m.is_locked());
    }

    #[test]
    fn request_release_only_when_locked() {
        let mut m = ControlStateMachine::new(true);
        let mut host = FakeHost::default();
        m.request_release(&mut host);
        assert_eq!(host.releases, 0);

        m.on_lock_acquired();
        m.request_release(&mut host);
        assert_eq!(host.releases, 1);
        // Still locked until the host confirms.
        assert!(m.is_locked());
    }

    #[test]
    fn observers_see_each_change_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut m = ControlStateMachine::new(true);
        let sink = seen.clone();
        m.observe(move |s| sink.borrow_mut().push(s.pointer_locked));

        m.on_lock_acquired();
        m.on_lock_acquired();
        m.on_lock_released();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn mouse_look_gated_by_lock() {
        let mut m = ControlStateMachine::new(true);
        let mut cam = LookRecorder::default();
        assert!(!m.forward_look(&mut cam, 3.0, 1.0));
        m.on_lock_acquired();
        assert!(m.forward_look(&mut cam, 3.0, 1.0));
        assert_eq!(cam.looks, vec![(3.0, 1.0)]);
    }
}
