use crate::backend::{MaterialBinding, SceneBackend, Tiling};
use arena_common::MeshHandle;
use arena_world::{
    ConfigError, GeometryConfig, Layout, MaterialRef, ShadowRole, Structure, StructureKind,
    UnitSource, generate,
};

/// A structure after hand-off: only its handle and tags remain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedStructure {
    pub handle: MeshHandle,
    pub kind: StructureKind,
    pub shadow_role: ShadowRole,
}

/// Handles of an instantiated layout, in layout order.
#[derive(Debug, Clone, Default)]
pub struct PlacedScene {
    placed: Vec<PlacedStructure>,
}

impl PlacedScene {
    pub fn structures(&self) -> &[PlacedStructure] {
        &self.placed
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn casters(&self) -> impl Iterator<Item = &PlacedStructure> {
        self.placed.iter().filter(|p| p.shadow_role.casts())
    }
}

/// Explicitly threaded scene context: the backend plus the config the layout
/// was generated from.
pub struct EnvironmentContext<'a, B: SceneBackend> {
    backend: &'a mut B,
    config: &'a GeometryConfig,
}

impl<'a, B: SceneBackend> EnvironmentContext<'a, B> {
    pub fn new(backend: &'a mut B, config: &'a GeometryConfig) -> Self {
        Self { backend, config }
    }

    /// Generate a layout and instantiate it. A config error is returned
    /// before the backend sees a single call.
    pub fn build<S: UnitSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<PlacedScene, ConfigError> {
        let layout = generate(self.config, source)?;
        Ok(self.instantiate(layout))
    }

    /// Hand every structure to the backend. The layout is consumed.
    pub fn instantiate(&mut self, layout: Layout) -> PlacedScene {
        let _span = tracing::info_span!("instantiate", structures = layout.len()).entered();
        let placed: Vec<PlacedStructure> = layout
            .into_iter()
            .map(|s| self.place(s))
            .collect();
        tracing::info!(meshes = placed.len(), "layout handed to backend");
        PlacedScene { placed }
    }

    fn place(&mut self, s: Structure) -> PlacedStructure {
        let handle = match s.kind {
            StructureKind::Ground => self.backend.create_ground_plane(s.extents),
            StructureKind::Wall(side) => {
                let length = if side.is_x_side() {
                    s.extents.depth
                } else {
                    s.extents.width
                };
                let tiling = Tiling::for_span(length, s.extents.height);
                self.backend.create_box(s.extents, Some(tiling))
            }
            StructureKind::Building => self.backend.create_box(s.extents, None),
        };
        self.backend.set_position(handle, s.transform.position);
        self.backend.set_rotation(handle, s.transform.rotation);

        let binding = match s.material {
            MaterialRef::Ground => MaterialBinding::Ground,
            MaterialRef::Wall => MaterialBinding::Wall,
            // Validation guarantees the index is in range; fall back to the
            // first variant rather than panicking on a hand-built layout.
            MaterialRef::Variant(i) => match self
                .config
                .material_variants
                .get(i)
                .or_else(|| self.config.material_variants.first())
            {
                Some(v) => MaterialBinding::Textured(v),
                None => MaterialBinding::Wall,
            },
        };
        self.backend.set_material(handle, binding);

        if s.collidable {
            self.backend.enable_collision(handle);
        }
        if s.shadow_role.receives() {
            self.backend.set_receive_shadows(handle);
        }
        tracing::debug!(kind = %s.kind, handle = handle.0, "structure instantiated");

        PlacedStructure {
            handle,
            kind: s.kind,
            shadow_role: s.shadow_role,
        }
    }
}
