use crate::config::{ConfigError, GeometryConfig, MaterialMode};
use crate::layout::Layout;
use crate::sampler::{LayoutSampler, UnitSource};
use crate::structure::{MaterialRef, ShadowRole, Structure, StructureKind, WallSide};
use arena_common::{Extents, Transform};
use glam::Vec3;

/// Generate the full environment: ground, four walls, then buildings.
///
/// The configuration is validated first; on error nothing is produced. Units
/// are consumed in a fixed order (building count, then per building: width,
/// depth, height, x, z and, in random material mode, the variant), so a given
/// source always yields the same layout.
pub fn generate<S: UnitSource + ?Sized>(
    config: &GeometryConfig,
    source: &mut S,
) -> Result<Layout, ConfigError> {
    let _span = tracing::info_span!("generate").entered();
    config.validate()?;

    let mut sampler = LayoutSampler::new(source);
    let count = sampler.count(config.building_count);

    let mut structures = Vec::with_capacity(5 + count as usize);
    structures.push(ground(config));
    structures.extend(walls(config));
    for i in 0..count {
        let b = building(config, &mut sampler);
        tracing::debug!(
            index = i,
            x = b.transform.position.x,
            z = b.transform.position.z,
            height = b.extents.height,
            material = ?b.material,
            "building placed"
        );
        structures.push(b);
    }

    tracing::info!(
        buildings = count,
        ground_width = config.ground_width,
        ground_depth = config.ground_depth,
        "environment generated"
    );
    Ok(Layout::new(structures))
}

/// The ground plane: centered on the origin with zero thickness.
pub fn ground(config: &GeometryConfig) -> Structure {
    Structure {
        kind: StructureKind::Ground,
        transform: Transform::default(),
        extents: Extents::new(config.ground_width, 0.0, config.ground_depth),
        material: MaterialRef::Ground,
        collidable: true,
        shadow_role: ShadowRole::Receiver,
    }
}

/// The four perimeter walls in `+X, -X, +Z, -Z` order.
///
/// Each wall sits just outside the ground edge and its span is padded by one
/// wall thickness at both ends, so neighbouring walls overlap at the corners
/// and the ground is fully enclosed.
pub fn walls(config: &GeometryConfig) -> [Structure; 4] {
    WallSide::ALL.map(|side| wall(config, side))
}

fn wall(config: &GeometryConfig, side: WallSide) -> Structure {
    let t = config.wall_thickness;
    let h = config.wall_height;
    let (position, extents) = if side.is_x_side() {
        (
            Vec3::new(side.sign() * (config.ground_width / 2.0 + t / 2.0), h / 2.0, 0.0),
            Extents::new(t, h, config.ground_depth + 2.0 * t),
        )
    } else {
        (
            Vec3::new(0.0, h / 2.0, side.sign() * (config.ground_depth / 2.0 + t / 2.0)),
            Extents::new(config.ground_width + 2.0 * t, h, t),
        )
    };
    Structure {
        kind: StructureKind::Wall(side),
        transform: Transform::from_position(position),
        extents,
        material: MaterialRef::Wall,
        collidable: true,
        shadow_role: ShadowRole::from_flags(config.shadows.walls_cast, true),
    }
}

/// One building resting on the ground plane (`y = height / 2`).
///
/// Placement is drawn inside the ground bounds without regard for the walls
/// or other buildings.
pub fn building<S: UnitSource + ?Sized>(
    config: &GeometryConfig,
    sampler: &mut LayoutSampler<'_, S>,
) -> Structure {
    let p = sampler.placement(config);
    let variant = match config.material_mode {
        MaterialMode::Fixed { index } => index,
        MaterialMode::Random => sampler.index(config.material_variants.len()),
    };
    Structure {
        kind: StructureKind::Building,
        transform: Transform::from_position(Vec3::new(p.x, p.height / 2.0, p.z)),
        extents: Extents::new(p.width, p.height, p.depth),
        material: MaterialRef::Variant(variant),
        collidable: true,
        shadow_role: ShadowRole::from_flags(true, config.shadows.buildings_receive),
    }
}
