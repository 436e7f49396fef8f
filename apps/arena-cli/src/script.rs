use anyhow::{Context, bail};
use arena_input::{
    CameraConfig, ControlError, ControlStateMachine, FirstPersonCamera, KeyBindings,
    MovementController, PointerLockHost,
};
use std::str::FromStr;

/// One step of a scripted control session.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    /// Primary pointer press.
    Press,
    /// Host grants the pending lock.
    Grant,
    /// Host reports the lock lost.
    Release,
    /// Host denies the next lock request.
    Deny,
    KeyDown(String),
    KeyUp(String),
    Look(f32, f32),
    Tick(f32),
}

impl FromStr for ScriptEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut parts = s.trim().split(':');
        let head = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let number = |i: usize| -> anyhow::Result<f32> {
            args.get(i)
                .with_context(|| format!("`{s}`: missing argument {}", i + 1))?
                .parse::<f32>()
                .with_context(|| format!("`{s}`: argument {} is not a number", i + 1))
        };
        let key = || -> anyhow::Result<String> {
            args.first()
                .filter(|k| !k.is_empty())
                .map(|k| k.to_string())
                .with_context(|| format!("`{s}`: missing key name"))
        };
        Ok(match head {
            "press" => Self::Press,
            "grant" => Self::Grant,
            "release" => Self::Release,
            "deny" => Self::Deny,
            "down" => Self::KeyDown(key()?),
            "up" => Self::KeyUp(key()?),
            "look" => Self::Look(number(0)?, number(1)?),
            "tick" if args.is_empty() => Self::Tick(1.0 / 60.0),
            "tick" => Self::Tick(number(0)?),
            other => bail!("unknown event `{other}`"),
        })
    }
}

/// Lock host that answers from a flag instead of a window.
#[derive(Debug, Default)]
struct ScriptedHost {
    deny_next: bool,
}

impl PointerLockHost for ScriptedHost {
    fn request_pointer_lock(&mut self) -> Result<(), ControlError> {
        if std::mem::take(&mut self.deny_next) {
            return Err(ControlError::TransientHostDenial("scripted denial".into()));
        }
        Ok(())
    }

    fn release_pointer_lock(&mut self) {}
}

/// Controls wired the way a host wires them.
pub struct ScriptRunner {
    pub control: ControlStateMachine,
    pub movement: MovementController,
    pub camera: FirstPersonCamera,
    host: ScriptedHost,
}

impl ScriptRunner {
    pub fn new(lock_supported: bool, camera: &CameraConfig) -> Self {
        Self {
            control: ControlStateMachine::new(lock_supported),
            movement: MovementController::new(KeyBindings::default()),
            camera: FirstPersonCamera::from_config(camera),
            host: ScriptedHost::default(),
        }
    }

    /// Apply one event and describe what happened.
    pub fn apply(&mut self, event: &ScriptEvent) -> String {
        match event {
            ScriptEvent::Press => match self.control.on_primary_press(&mut self.host) {
                Ok(outcome) => format!("press -> {outcome:?}"),
                Err(e) => format!("press -> {e}"),
            },
            ScriptEvent::Grant => format!("grant -> changed={}", self.control.on_lock_acquired()),
            ScriptEvent::Release => {
                format!("release -> changed={}", self.control.on_lock_released())
            }
            ScriptEvent::Deny => {
                self.host.deny_next = true;
                "deny next request".to_string()
            }
            ScriptEvent::KeyDown(key) => {
                format!("down {key} -> bound={}", self.movement.on_key(key, true))
            }
            ScriptEvent::KeyUp(key) => {
                format!("up {key} -> bound={}", self.movement.on_key(key, false))
            }
            ScriptEvent::Look(dx, dy) => format!(
                "look ({dx}, {dy}) -> applied={}",
                self.control.forward_look(&mut self.camera, *dx, *dy)
            ),
            ScriptEvent::Tick(dt) => {
                self.movement.forward_to(&mut self.camera, *dt);
                let p = self.camera.position;
                format!("tick {dt:.3}s -> pos=({:.2}, {:.2}, {:.2})", p.x, p.y, p.z)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_input::LockState;

    fn run(events: &[&str], lock_supported: bool) -> ScriptRunner {
        let mut runner = ScriptRunner::new(lock_supported, &CameraConfig::default());
        for e in events {
            runner.apply(&e.parse().unwrap());
        }
        runner
    }

    #[test]
    fn parses_events() {
        assert_eq!("press".parse::<ScriptEvent>().unwrap(), ScriptEvent::Press);
        assert_eq!(
            "down:KeyW".parse::<ScriptEvent>().unwrap(),
            ScriptEvent::KeyDown("KeyW".into())
        );
        assert_eq!(
            "look:3:-2.5".parse::<ScriptEvent>().unwrap(),
            ScriptEvent::Look(3.0, -2.5)
        );
        assert_eq!("tick:0.5".parse::<ScriptEvent>().unwrap(), ScriptEvent::Tick(0.5));
        assert!("jump".parse::<ScriptEvent>().is_err());
        assert!("look:1".parse::<ScriptEvent>().is_err());
        assert!("down".parse::<ScriptEvent>().is_err());
    }

    #[test]
    fn press_grant_locks() {
        let runner = run(&["press", "grant"], true);
        assert_eq!(runner.control.lock_state(), LockState::Locked);
    }

    #[test]
    fn denied_press_stays_unlocked() {
        let mut runner = run(&["deny", "press"], true);
        assert_eq!(runner.control.lock_state(), LockState::Unlocked);
        assert!(runner.apply(&ScriptEvent::Press).contains("Requested"));
    }

    #[test]
    fn look_ignored_until_locked() {
        let mut runner = run(&[], true);
        let yaw = runner.camera.yaw;
        runner.apply(&ScriptEvent::Look(100.0, 0.0));
        assert_eq!(runner.camera.yaw, yaw);
        runner.apply(&ScriptEvent::Grant);
        runner.apply(&ScriptEvent::Look(100.0, 0.0));
        assert_ne!(runner.camera.yaw, yaw);
    }

    #[test]
    fn movement_works_without_lock() {
        let runner = run(&["down:KeyW", "tick:0.5"], false);
        assert!(runner.camera.position.z > -20.0);
        assert_eq!(runner.control.lock_state(), LockState::Unlocked);
    }
}
