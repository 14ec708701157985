//! MLOD P3D document structures
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use super::resolution::{LodKind, LodResolution};
use super::tagg::{Proxy, Tagg, TaggData};
use glam::Vec3;

/// Container version written and accepted by this library.
pub const MLOD_VERSION: u32 = 257;
/// `P3DM` major/minor version pair.
pub const LOD_VERSION: (u32, u32) = (0x1C, 0x100);

/// An editable (MLOD) P3D model.
#[derive(Debug, Clone, PartialEq)]
pub struct MloDFile {
    pub version: u32,
    pub lods: Vec<Lod>,
}

/// A single LOD mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Lod {
    pub version: (u32, u32),
    pub flags: u32,
    pub vertices: Vec<Vertex>,
    /// Normals as stored. They are not guaranteed to be unit length, see
    /// [`Lod::renormalize_normals`].
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub taggs: Vec<Tagg>,
    pub resolution: LodResolution,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub flags: u32,
}

/// One corner of a face.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceSide {
    pub vertex: u32,
    pub normal: u32,
    pub uv: [f32; 2],
}

/// A triangle or quad.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    pub sides: Vec<FaceSide>,
    pub flags: u32,
    pub texture: String,
    pub material: String,
}

impl Default for MloDFile {
    fn default() -> Self {
        Self {
            version: MLOD_VERSION,
            lods: Vec::new(),
        }
    }
}

impl MloDFile {
    /// First LOD of the given kind.
    pub fn find_lod(&self, kind: LodKind) -> Option<&Lod> {
        self.lods.iter().find(|lod| lod.resolution.kind == kind)
    }

    pub fn find_lod_mut(&mut self, kind: LodKind) -> Option<&mut Lod> {
        self.lods.iter_mut().find(|lod| lod.resolution.kind == kind)
    }
}

impl Default for Lod {
    fn default() -> Self {
        Self {
            version: LOD_VERSION,
            flags: 0,
            vertices: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            taggs: Vec::new(),
            resolution: LodResolution::default(),
        }
    }
}

impl Lod {
    pub fn new(resolution: LodResolution) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Total number of face sides, which is the UV count of a UV set.
    pub fn side_count(&self) -> usize {
        self.faces.iter().map(|f| f.sides.len()).sum()
    }

    /// Scale every normal to unit length. Zero normals stay zero.
    pub fn renormalize_normals(&mut self) {
        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    pub fn tagg(&self, name: &str) -> Option<&Tagg> {
        self.taggs.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Named selections as `(name, vertex weights, face weights)`.
    pub fn selections(&self) -> impl Iterator<Item = (&str, &[f32], &[f32])> {
        self.taggs.iter().filter_map(|tagg| match &tagg.data {
            TaggData::Selection { vertices, faces } if !tagg.is_system() => {
                Some((tagg.name.as_str(), vertices.as_slice(), faces.as_slice()))
            }
            _ => None,
        })
    }

    /// A selection by case-insensitive name.
    pub fn selection(&self, name: &str) -> Option<(&[f32], &[f32])> {
        self.selections()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v, f)| (v, f))
    }

    /// Indices of the vertices a selection contains. Weights above 1.0 are
    /// the unassigned sentinel and do not count.
    pub fn selected_vertices(&self, name: &str) -> Vec<usize> {
        self.selection(name).map_or_else(Vec::new, |(weights, _)| {
            weights
                .iter()
                .enumerate()
                .filter(|(_, w)| **w > 0.0 && **w <= 1.0)
                .map(|(i, _)| i)
                .collect()
        })
    }

    pub fn proxies(&self) -> Vec<Proxy> {
        self.taggs.iter().filter_map(Tagg::proxy).collect()
    }

    /// Named properties as `(key, value)`.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.taggs.iter().filter_map(|tagg| match &tagg.data {
            TaggData::Property { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Per-vertex masses.
    pub fn mass(&self) -> Option<&[f32]> {
        self.taggs.iter().find_map(|tagg| match &tagg.data {
            TaggData::Mass(values) => Some(values.as_slice()),
            _ => None,
        })
    }

    pub fn total_mass(&self) -> f32 {
        self.mass().map_or(0.0, |m| m.iter().sum())
    }

    /// UV sets as `(id, uvs)`.
    pub fn uv_sets(&self) -> impl Iterator<Item = (u32, &[[f32; 2]])> {
        self.taggs.iter().filter_map(|tagg| match &tagg.data {
            TaggData::UvSet { id, uvs } => Some((*id, uvs.as_slice())),
            _ => None,
        })
    }

    pub fn sharp_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.taggs
            .iter()
            .filter_map(|tagg| match &tagg.data {
                TaggData::SharpEdges(edges) => Some(edges.iter().copied()),
                _ => None,
            })
            .flatten()
    }
}

impl Face {
    pub fn vertex_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.sides.iter().map(|s| s.vertex)
    }

    pub fn normal_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.sides.iter().map(|s| s.normal)
    }

    pub fn uvs(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.sides.iter().map(|s| s.uv)
    }
}
