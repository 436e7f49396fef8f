use crate::backend::SceneBackend;
use crate::context::PlacedScene;
use arena_common::{LightId, MeshHandle};
use std::collections::BTreeSet;

/// Tracks which meshes have been registered as shadow casters per light.
///
/// Casters come straight from the structures' shadow roles; the only state
/// kept is the set of registrations already forwarded to the backend.
#[derive(Debug, Default)]
pub struct ShadowRegistry {
    registered: BTreeSet<(LightId, MeshHandle)>,
}

impl ShadowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every caster in `scene` with `light`. Pairs already
    /// registered are skipped. Returns the number of new registrations.
    pub fn register_casters<B: SceneBackend>(
        &mut self,
        backend: &mut B,
        scene: &PlacedScene,
        light: LightId,
    ) -> usize {
        let mut added = 0;
        for placed in scene.casters() {
            if self.registered.insert((light, placed.handle)) {
                backend.register_shadow_caster(light, placed.handle);
                added += 1;
            }
        }
        tracing::debug!(light = light.0, added, "shadow casters registered");
        added
    }

    pub fn is_registered(&self, light: LightId, mesh: MeshHandle) -> bool {
        self.registered.contains(&(light, mesh))
    }

    pub fn caster_count(&self, light: LightId) -> usize {
        self.registered.iter().filter(|(l, _)| *l == light).count()
    }
}
