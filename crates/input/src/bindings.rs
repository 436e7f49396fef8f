use crate::movement::MoveDirection;
use serde::{Deserialize, Serialize};

/// Key names per movement direction. Names follow the physical key codes
/// hosts report (`KeyW`, `ArrowUp`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        fn keys(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }
        Self {
            forward: keys(&["KeyW", "ArrowUp"]),
            backward: keys(&["KeyS", "ArrowDown"]),
            left: keys(&["KeyA", "ArrowLeft"]),
            right: keys(&["KeyD", "ArrowRight"]),
        }
    }
}

impl KeyBindings {
    /// The direction bound to `key`, if any. First matching list wins.
    pub fn direction_for(&self, key: &str) -> Option<MoveDirection> {
        let table = [
            (&self.forward, MoveDirection::Forward),
            (&self.backward, MoveDirection::Backward),
            (&self.left, MoveDirection::StrafeLeft),
            (&self.right, MoveDirection::StrafeRight),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.iter().any(|k| k == key))
            .map(|(_, dir)| dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_by_default() {
        let b = KeyBindings::default();
        assert_eq!(b.direction_for("KeyW"), Some(MoveDirection::Forward));
        assert_eq!(b.direction_for("ArrowDown"), Some(MoveDirection::Backward));
        assert_eq!(b.direction_for("KeyA"), Some(MoveDirection::StrafeLeft));
        assert_eq!(b.direction_for("ArrowRight"), Some(MoveDirection::StrafeRight));
        assert_eq!(b.direction_for("Space"), None);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let b: KeyBindings = serde_yaml::from_str("forward: [KeyZ]\nleft: [KeyQ]\n").unwrap();
        assert_eq!(b.direction_for("KeyZ"), Some(MoveDirection::Forward));
        assert_eq!(b.direction_for("KeyW"), None);
        assert_eq!(b.direction_for("KeyQ"), Some(MoveDirection::StrafeLeft));
        assert_eq!(b.direction_for("KeyD"), Some(MoveDirection::StrafeRight));
    }
}
