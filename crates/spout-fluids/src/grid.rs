use std::collections::HashMap;

use glam::{UVec3, Vec3};
use smallvec::SmallVec;

use crate::particle::Particle;

type Bucket = SmallVec<[usize; 8]>;

/// Uniform grid bucketing particle indices by cell, used to restrict kernel evaluation to the
/// 3x3x3 block of cells around a particle.
///
/// Particles whose cell falls outside `[0, size)` on any axis are not stored at all.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Number of cells along each axis.
    size: u32,
    cell_size: f32,
    /// World position of the minimum corner of cell `(0, 0, 0)`.
    origin: Vec3,

    /// Index into `buckets` for every occupied cell.
    lookup: HashMap<UVec3, usize>,
    /// Occupied cells, in the order they were first filled. `cells[i]` owns `buckets[i]`.
    cells: Vec<UVec3>,
    /// Bucket pool. Buckets past `cells.len()` are empty and kept for reuse.
    buckets: Vec<Bucket>,
    n_particles: usize,
}

impl SpatialGrid {
    pub fn new(size: u32, cell_size: f32, origin: Vec3) -> Self {
        Self {
            size,
            cell_size,
            origin,
            lookup: HashMap::new(),
            cells: Vec::new(),
            buckets: Vec::new(),
            n_particles: 0,
        }
    }

    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline(always)]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline(always)]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Number of particles currently stored in the grid.
    pub fn len(&self) -> usize {
        self.n_particles
    }

    pub fn is_empty(&self) -> bool {
        self.n_particles == 0
    }

    /// Number of non-empty cells.
    pub fn occupied_len(&self) -> usize {
        self.cells.len()
    }

    /// The cell containing `position`, or `None` if it lies outside the grid.
    pub fn cell_of(&self, position: Vec3) -> Option<UVec3> {
        let p = (position - self.origin) / self.cell_size;

        let inside = p.is_finite()
            && p.cmpge(Vec3::ZERO).all()
            && p.cmplt(Vec3::splat(self.size as f32)).all();

        if !inside {
            return None;
        }

        Some(p.floor().as_uvec3().min(UVec3::splat(self.size - 1)))
    }

    /// Empties every cell and reinserts all in-bounds particles, indexed by their position in
    /// `particles`.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();

        for (i, particle) in particles.iter().enumerate() {
            self.insert(i, particle.position);
        }
    }

    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }

        self.lookup.clear();
        self.cells.clear();
        self.n_particles = 0;
    }

    /// Inserts a single particle, returning the cell it landed in.
    pub fn insert(&mut self, index: usize, position: Vec3) -> Option<UVec3> {
        let cell = self.cell_of(position)?;

        let next = self.cells.len();
        let bucket = *self.lookup.entry(cell).or_insert(next);

        if bucket == next {
            self.cells.push(cell);
            if self.buckets.len() == next {
                self.buckets.push(Bucket::new());
            }
        }

        self.buckets[bucket].push(index);
        self.n_particles += 1;

        Some(cell)
    }

    /// Non-empty cells, in the order they were first filled.
    pub fn occupied_cells(&self) -> &[UVec3] {
        &self.cells
    }

    /// Particle indices stored in `cell`.
    pub fn cell(&self, cell: UVec3) -> &[usize] {
        match self.lookup.get(&cell) {
            Some(&bucket) => &self.buckets[bucket],
            None => &[],
        }
    }

    /// Particle indices in the 3x3x3 block of cells centered on `cell`, clipped to the grid.
    pub fn neighbors(&self, cell: UVec3) -> impl Iterator<Item = usize> + '_ {
        let p0 = cell.max(UVec3::ONE) - 1;
        let p1 = (cell + 1).min(UVec3::splat(self.size - 1));

        (p0.x..=p1.x)
            .flat_map(move |x| (p0.y..=p1.y).flat_map(move |y| (p0.z..=p1.z).map(move |z| UVec3::new(x, y, z))))
            .flat_map(move |c| self.cell(c).iter().copied())
    }
}
