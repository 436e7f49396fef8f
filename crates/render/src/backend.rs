use arena_common::{Extents, LightId, MeshHandle};
use arena_world::MaterialVariant;
use glam::{Quat, Vec3};

/// Texture repeat factors along a surface's U and V axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiling {
    pub u_scale: f32,
    pub v_scale: f32,
}

impl Tiling {
    /// Repeat a square texture so it keeps its aspect across `length` x `height`.
    pub fn for_span(length: f32, height: f32) -> Self {
        Self {
            u_scale: (length / height).max(1.0),
            v_scale: 1.0,
        }
    }
}

/// Material resolved for the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialBinding<'a> {
    Ground,
    Wall,
    Textured(&'a MaterialVariant),
}

/// The rendering/physics collaborator.
///
/// Implementations create and own meshes; callers only hold handles.
pub trait SceneBackend {
    fn create_ground_plane(&mut self, extents: Extents) -> MeshHandle;

    fn create_box(&mut self, extents: Extents, tiling: Option<Tiling>) -> MeshHandle;

    fn set_position(&mut self, mesh: MeshHandle, position: Vec3);

    fn set_rotation(&mut self, mesh: MeshHandle, rotation: Quat);

    fn set_material(&mut self, mesh: MeshHandle, material: MaterialBinding<'_>);

    fn enable_collision(&mut self, mesh: MeshHandle);

    fn set_receive_shadows(&mut self, mesh: MeshHandle);

    fn register_shadow_caster(&mut self, light: LightId, mesh: MeshHandle);
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateGroundPlane(MeshHandle, Extents),
    CreateBox(MeshHandle, Extents, Option<Tiling>),
    SetPosition(MeshHandle, Vec3),
    SetRotation(MeshHandle, Quat),
    SetMaterial(MeshHandle, String),
    EnableCollision(MeshHandle),
    ReceiveShadows(MeshHandle),
    RegisterShadowCaster(LightId, MeshHandle),
}

/// Headless backend that records every call.
///
/// Used by the CLI for text output and by tests to observe the hand-off.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn mesh_count(&self) -> usize {
        self.next_handle as usize
    }

    /// Caster registrations recorded for `light`, duplicates included.
    pub fn casters_for(&self, light: LightId) -> Vec<MeshHandle> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::RegisterShadowCaster(l, m) if *l == light => Some(*m),
                _ => None,
            })
            .collect()
    }

    /// Human-readable summary of the recorded scene.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Scene ({} meshes) ===\n", self.mesh_count()));
        for call in &self.calls {
            let line = match call {
                BackendCall::CreateGroundPlane(m, e) => {
                    format!("  [{:>3}] ground {:.1} x {:.1}\n", m.0, e.width, e.depth)
                }
                BackendCall::CreateBox(m, e, _) => format!(
                    "  [{:>3}] box {:.2} x {:.2} x {:.2}\n",
                    m.0, e.width, e.height, e.depth
                ),
                BackendCall::SetPosition(m, p) => format!(
                    "  [{:>3}] pos=({:.2}, {:.2}, {:.2})\n",
                    m.0, p.x, p.y, p.z
                ),
                BackendCall::SetMaterial(m, name) => {
                    format!("  [{:>3}] material={name}\n", m.0)
                }
                BackendCall::RegisterShadowCaster(l, m) => {
                    format!("  [{:>3}] casts for light {}\n", m.0, l.0)
                }
                BackendCall::SetRotation(..)
                | BackendCall::EnableCollision(_)
                | BackendCall::ReceiveShadows(_) => continue,
            };
            out.push_str(&line);
        }
        out
    }

    fn record(&mut self, call: BackendCall) {
        tracing::trace!(?call, "backend call");
        self.calls.push(call);
    }

    fn allocate(&mut self) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl SceneBackend for RecordingBackend {
    fn create_ground_plane(&mut self, extents: Extents) -> MeshHandle {
        let m = self.allocate();
        self.record(BackendCall::CreateGroundPlane(m, extents));
        m
    }

    fn create_box(&mut self, extents: Extents, tiling: Option<Tiling>) -> MeshHandle {
        let m = self.allocate();
        self.record(BackendCall::CreateBox(m, extents, tiling));
        m
    }

    fn set_position(&mut self, mesh: MeshHandle, position: Vec3) {
        self.record(BackendCall::SetPosition(mesh, position));
    }

    fn set_rotation(&mut self, mesh: MeshHandle, rotation: Quat) {
        self.record(BackendCall::SetRotation(mesh, rotation));
    }

    fn set_material(&mut self, mesh: MeshHandle, material: MaterialBinding<'_>) {
        let name = match material {
            MaterialBinding::Ground => "ground".to_string(),
            MaterialBinding::Wall => "wall".to_string(),
            MaterialBinding::Textured(v) => v.diffuse_texture.clone(),
        };
        self.record(BackendCall::SetMaterial(mesh, name));
    }

    fn enable_collision(&mut self, mesh: MeshHandle) {
        self.record(BackendCall::EnableCollision(mesh));
    }

    fn set_receive_shadows(&mut self, mesh: MeshHandle) {
        self.record(BackendCall::ReceiveShadows(mesh));
    }

    fn register_shadow_caster(&mut self, light: LightId, mesh: MeshHandle) {
        self.record(BackendCall::RegisterShadowCaster(light, mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_sequential() {
        let mut backend = RecordingBackend::new();
        let a = backend.create_ground_plane(Extents::new(10.0, 0.0, 10.0));
        let b = backend.create_box(Extents::new(1.0, 1.0, 1.0), None);
        assert_eq!(a, MeshHandle(0));
        assert_eq!(b, MeshHandle(1));
        assert_eq!(backend.mesh_count(), 2);
    }

    #[test]
    fn describe_lists_meshes() {
        let mut backend = RecordingBackend::new();
        let m = backend.create_box(Extents::new(2.0, 3.0, 4.0), None);
        backend.set_position(m, Vec3::new(1.0, 1.5, -2.0));
        let variant = MaterialVariant::new("brick.png", "brick_bump.png");
        backend.set_material(m, MaterialBinding::Textured(&variant));
        backend.set_rotation(m, Quat::IDENTITY);
        backend.enable_collision(m);
        let text = backend.describe();
        // Rotation and collision calls are not listed.
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with('\n'));
        assert!(text.contains("1 meshes"));
        assert!(text.contains("box 2.00 x 3.00 x 4.00"));
        assert!(text.contains("pos=(1.00, 1.50, -2.00)"));
        assert!(text.contains("material=brick.png"));
    }

    #[test]
    fn tiling_never_shrinks_below_one() {
        assert_eq!(Tiling::for_span(50.0, 10.0).u_scale, 5.0);
        assert_eq!(Tiling::for_span(2.0, 10.0).u_scale, 1.0);
    }
}
