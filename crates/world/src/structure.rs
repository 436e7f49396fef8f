use arena_common::{Aabb, Extents, Transform};
use serde::Serialize;
use std::fmt;

/// Side of the ground a perimeter wall closes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSide {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl WallSide {
    /// Canonical emission order.
    pub const ALL: [WallSide; 4] = [Self::PosX, Self::NegX, Self::PosZ, Self::NegZ];

    /// Walls at `x = ±…` run along the Z axis.
    pub fn is_x_side(self) -> bool {
        matches!(self, Self::PosX | Self::NegX)
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::PosX | Self::PosZ => 1.0,
            Self::NegX | Self::NegZ => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Ground,
    Wall(WallSide),
    Building,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => f.write_str("ground"),
            Self::Wall(WallSide::PosX) => f.write_str("wall+x"),
            Self::Wall(WallSide::NegX) => f.write_str("wall-x"),
            Self::Wall(WallSide::PosZ) => f.write_str("wall+z"),
            Self::Wall(WallSide::NegZ) => f.write_str("wall-z"),
            Self::Building => f.write_str("building"),
        }
    }
}

/// Which material a structure is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRef {
    /// Dedicated ground material.
    Ground,
    /// Dedicated wall material.
    Wall,
    /// Index into `GeometryConfig::material_variants`.
    Variant(usize),
}

/// Shadow participation of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowRole {
    #[default]
    None,
    Caster,
    Receiver,
    Both,
}

impl ShadowRole {
    pub fn from_flags(casts: bool, receives: bool) -> Self {
        match (casts, receives) {
            (false, false) => Self::None,
            (true, false) => Self::Caster,
            (false, true) => Self::Receiver,
            (true, true) => Self::Both,
        }
    }

    pub fn casts(self) -> bool {
        matches!(self, Self::Caster | Self::Both)
    }

    pub fn receives(self) -> bool {
        matches!(self, Self::Receiver | Self::Both)
    }
}

/// A single collidable, renderable unit of the environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    pub kind: StructureKind,
    pub transform: Transform,
    pub extents: Extents,
    pub material: MaterialRef,
    pub collidable: bool,
    pub shadow_role: ShadowRole,
}

impl Structure {
    /// World-space bounds, ignoring rotation (every generated structure is
    /// axis aligned).
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.transform.position, self.extents)
    }
}
