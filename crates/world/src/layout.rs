use crate::structure::{MaterialRef, Structure, StructureKind};
use arena_common::Aabb;
use serde::Serialize;

/// The ordered output of one generation run.
///
/// Handed to the rendering collaborator for instantiation; the generator
/// keeps no reference to it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    structures: Vec<Structure>,
}

impl Layout {
    pub(crate) fn new(structures: Vec<Structure>) -> Self {
        Self { structures }
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn ground(&self) -> Option<&Structure> {
        self.structures
            .iter()
            .find(|s| s.kind == StructureKind::Ground)
    }

    pub fn walls(&self) -> impl Iterator<Item = &Structure> {
        self.structures
            .iter()
            .filter(|s| matches!(s.kind, StructureKind::Wall(_)))
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Structure> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::Building)
    }

    /// Bounds of every collidable structure that has volume.
    pub fn colliders(&self) -> Vec<Aabb> {
        self.structures
            .iter()
            .filter(|s| s.collidable && s.kind != StructureKind::Ground)
            .map(Structure::bounds)
            .collect()
    }

    /// Deterministic FNV-1a hash over every structure, in order.
    /// Two layouts with equal fingerprints were generated identically.
    pub fn fingerprint(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for s in &self.structures {
            let (kind, variant) = match (s.kind, s.material) {
                (StructureKind::Ground, _) => (0u8, 0u64),
                (StructureKind::Wall(side), _) => (1 + side as u8, 0),
                (StructureKind::Building, MaterialRef::Variant(i)) => (5, i as u64),
                (StructureKind::Building, _) => (5, u64::MAX),
            };
            mix(&mut h, &[kind, s.shadow_role as u8, s.collidable as u8]);
            mix(&mut h, &variant.to_le_bytes());
            let p = s.transform.position;
            let e = s.extents;
            for v in [p.x, p.y, p.z, e.width, e.height, e.depth] {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }
}

impl IntoIterator for Layout {
    type Item = Structure;
    type IntoIter = std::vec::IntoIter<Structure>;

    fn into_iter(self) -> Self::IntoIter {
        self.structures.into_iter()
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a Structure;
    type IntoIter = std::slice::Iter<'a, Structure>;

    fn into_iter(self) -> Self::IntoIter {
        self.structures.iter()
    }
}
