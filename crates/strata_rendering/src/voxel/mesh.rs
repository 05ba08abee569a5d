//! Mesh output of one chunk.
//!
//! Four parallel per-vertex arrays plus one triangle list per material
//! bucket. Vertices are allocated four per face counter step, so
//! `vertex_count() == face_count() * 4` always holds.

// =============================================================================
// BUCKETS
// =============================================================================

/// Material class of an index list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshBucket {
    /// Opaque cube faces. The only bucket with collision geometry.
    Block,
    /// Alpha-tested cube faces (leaves).
    Transparent,
    /// Cross-shaped decorations.
    Foliage,
    /// Liquid surfaces.
    Liquid,
}

impl MeshBucket {
    /// Every bucket in storage order.
    pub const ALL: [Self; 4] = [Self::Block, Self::Transparent, Self::Foliage, Self::Liquid];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Self::Block => 0,
            Self::Transparent => 1,
            Self::Foliage => 2,
            Self::Liquid => 3,
        }
    }
}

// =============================================================================
// CHUNK MESH
// =============================================================================

/// Complete mesh data for a chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Chunk-local vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// `xy` tiling UV scaled by quad size, `zw` atlas cell.
    pub uvs: Vec<[f32; 4]>,
    /// `rgb` biome tint, `a` ambient occlusion (1 = fully lit).
    pub colors: Vec<[f32; 4]>,
    buckets: [Vec<u32>; 4],
    face_count: u32,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing was emitted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.face_count == 0
    }

    /// Running face counter (a cross shape counts twice).
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    /// Number of valid vertices, `face_count * 4`.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.face_count as usize * 4
    }

    /// Triangle list of one bucket.
    #[inline]
    #[must_use]
    pub fn indices(&self, bucket: MeshBucket) -> &[u32] {
        &self.buckets[bucket.slot()]
    }

    /// Total triangle count across buckets.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum::<usize>() / 3
    }

    /// Vertex positions as bytes, for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Normals as bytes.
    #[must_use]
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// UVs as bytes.
    #[must_use]
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Colours as bytes.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Index list of one bucket as bytes.
    #[must_use]
    pub fn index_bytes(&self, bucket: MeshBucket) -> &[u8] {
        bytemuck::cast_slice(self.indices(bucket))
    }

    /// Reserves `faces` counter steps and returns the first vertex index.
    pub(crate) fn allocate(&mut self, faces: u32) -> u32 {
        let base = self.face_count * 4;
        self.face_count += faces;
        base
    }

    /// Appends one vertex.
    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 4], color: [f32; 4]) {
        self.vertices.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        self.colors.push(color);
    }

    /// Appends indices relative to `base`.
    pub(crate) fn push_indices(&mut self, bucket: MeshBucket, base: u32, local: &[u32]) {
        self.buckets[bucket.slot()].extend(local.iter().map(|&i| base + i));
    }

    /// Appends another mesh, rebasing its indices after this one's vertices.
    pub fn append(&mut self, mut other: Self) {
        let base = self.face_count * 4;
        self.vertices.append(&mut other.vertices);
        self.normals.append(&mut other.normals);
        self.uvs.append(&mut other.uvs);
        self.colors.append(&mut other.colors);
        for bucket in MeshBucket::ALL {
            let slot = bucket.slot();
            self.buckets[slot].extend(other.buckets[slot].iter().map(|&i| base + i));
        }
        self.face_count += other.face_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(mesh: &mut ChunkMesh, bucket: MeshBucket) {
        let base = mesh.allocate(1);
        for _ in 0..4 {
            mesh.push_vertex([0.0; 3], [0.0, 1.0, 0.0], [0.0; 4], [1.0; 4]);
        }
        mesh.push_indices(bucket, base, &[0, 3, 1, 0, 2, 3]);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = ChunkMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = ChunkMesh::new();
        quad(&mut a, MeshBucket::Block);
        let mut b = ChunkMesh::new();
        quad(&mut b, MeshBucket::Block);
        quad(&mut b, MeshBucket::Liquid);

        a.append(b);

        assert_eq!(a.face_count(), 3);
        assert_eq!(a.vertex_count(), 12);
        assert_eq!(a.vertices.len(), 12);
        assert_eq!(a.indices(MeshBucket::Block), &[0, 3, 1, 0, 2, 3, 4, 7, 5, 4, 6, 7]);
        assert_eq!(a.indices(MeshBucket::Liquid), &[8, 11, 9, 8, 10, 11]);
        assert_eq!(a.triangle_count(), 6);
    }

    #[test]
    fn test_byte_views() {
        let mut mesh = ChunkMesh::new();
        quad(&mut mesh, MeshBucket::Transparent);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(mesh.uv_bytes().len(), 4 * 16);
        assert_eq!(mesh.color_bytes().len(), 4 * 16);
        assert_eq!(mesh.normal_bytes().len(), 4 * 12);
        assert_eq!(mesh.index_bytes(MeshBucket::Transparent).len(), 6 * 4);
    }
}
