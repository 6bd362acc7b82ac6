use glam::Vec2;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::api::Poolable;
use crate::error::{CoreError, CoreResult};
use crate::pool::{ObjectPool, PoolHandle};
use crate::types::{CollisionKind, Overlap, Rect};

/// Per-frame broad-phase grid. Rebuilt from scratch every frame.
///
/// Queries return every handle bucketed in any touched cell, so an entity
/// spanning several cells can appear more than once. Callers that need
/// single-counted results dedupe themselves or stop at the first hit.
pub struct SpatialGrid<H> {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<(H, Rect)>>,
    all: Vec<(H, Rect)>,
}

/// Debug/perf statistics for the current frame's grid.
#[derive(Copy, Clone, Debug, Default)]
pub struct GridStats {
    pub entries: usize,
    pub cells: usize,
    /// Sum of per-cell pair counts (n*(n-1)/2), counts duplicates across cells.
    pub candidate_pairs: usize,
}

impl<H: Copy> SpatialGrid<H> {
    pub fn new(cell_size: f32) -> CoreResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CoreError::InvalidConfig {
                field: "grid_cell_size",
                reason: format!("must be finite and > 0, got {cell_size}"),
            });
        }
        Ok(Self { cell_size, cells: HashMap::new(), all: Vec::new() })
    }

    pub fn cell_size(&self) -> f32 { self.cell_size }

    /// Drop everything from the previous frame.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.all.clear();
    }

    /// Bucket `handle` into every cell its box touches, min corner to max corner inclusive.
    pub fn add(&mut self, handle: H, bounds: Rect) {
        let (ix0, iy0) = self.world_to_cell(bounds.min);
        let (ix1, iy1) = self.world_to_cell(bounds.max());
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                self.cells.entry((ix, iy)).or_default().push((handle, bounds));
            }
        }
        self.all.push((handle, bounds));
    }

    pub fn query(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<H> {
        self.query_rect(&Rect::new(x, y, w, h))
    }

    pub fn query_rect(&self, r: &Rect) -> Vec<H> {
        let mut out = Vec::new();
        self.query_into(r, &mut out);
        out
    }

    /// Append the union of all buckets the rectangle touches to `out`.
    pub fn query_into(&self, r: &Rect, out: &mut Vec<H>) {
        let (ix0, iy0) = self.world_to_cell(r.min);
        let (ix1, iy1) = self.world_to_cell(r.max());
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                if let Some(bucket) = self.cells.get(&(ix, iy)) {
                    out.extend(bucket.iter().map(|(h, _)| *h));
                }
            }
        }
    }

    /// Every entity added this frame, regardless of locality.
    pub fn all_entities(&self) -> impl ExactSizeIterator<Item = H> + '_ {
        self.all.iter().map(|(h, _)| *h)
    }

    pub fn len(&self) -> usize { self.all.len() }
    pub fn is_empty(&self) -> bool { self.all.is_empty() }

    /// Clear, then add every live entry of `pool` with the box `bounds` reports.
    pub fn rebuild_from_pool<T, F, B>(&mut self, pool: &ObjectPool<T>, mut wrap: F, mut bounds: B)
    where
        T: Poolable,
        F: FnMut(PoolHandle) -> H,
        B: FnMut(&T) -> Rect,
    {
        self.clear();
        self.extend_from_pool(pool, &mut wrap, &mut bounds);
    }

    /// Add every live entry of another pool without clearing (multi-pool frames).
    pub fn extend_from_pool<T, F, B>(&mut self, pool: &ObjectPool<T>, mut wrap: F, mut bounds: B)
    where
        T: Poolable,
        F: FnMut(PoolHandle) -> H,
        B: FnMut(&T) -> Rect,
    {
        for (h, t) in pool.iter() {
            self.add(wrap(h), bounds(t));
        }
    }

    pub fn stats(&self) -> GridStats {
        let mut cells = 0;
        let mut candidate_pairs = 0;
        for bucket in self.cells.values() {
            let n = bucket.len();
            if n > 0 {
                cells += 1;
            }
            if n >= 2 {
                candidate_pairs += n * (n - 1) / 2;
            }
        }
        let stats = GridStats { entries: self.all.len(), cells, candidate_pairs };
        log::trace!("grid rebuilt: {stats:?}");
        stats
    }

    fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        ((p.x / self.cell_size).floor() as i32, (p.y / self.cell_size).floor() as i32)
    }
}

/// One confirmed entity-vs-entity overlap, `a < b`.
#[derive(Copy, Clone, Debug)]
pub struct PairHit<H> {
    pub a: H,
    pub b: H,
    /// Overlap of `a` against `b`; the normal points from `b` into `a`.
    pub overlap: Overlap,
}

impl<H> PairHit<H> {
    /// `Squish` when `a` sits on top of `b` (least penetration is vertical
    /// and `a` is above), otherwise `Normal`.
    pub fn kind(&self) -> CollisionKind {
        if self.overlap.normal.y < 0.0 { CollisionKind::Squish } else { CollisionKind::Normal }
    }
}

/// Unordered pairs of entities whose boxes strictly overlap, each reported
/// once, in row-major cell order. Feed the result into the behavior layer's
/// [`Collide`](crate::api::Collide) callbacks.
pub fn overlapping_pairs<H: Copy + Eq + Hash + Ord>(grid: &SpatialGrid<H>) -> Vec<PairHit<H>> {
    let mut seen: HashSet<(H, H)> = HashSet::new();
    let mut out = Vec::new();
    let mut keys: Vec<_> = grid.cells.keys().copied().collect();
    keys.sort_unstable_by_key(|&(x, y)| (y, x));
    for key in keys {
        let bucket = &grid.cells[&key];
        for i0 in 0..bucket.len() {
            for i1 in (i0 + 1)..bucket.len() {
                let (a, ra) = bucket[i0];
                let (b, rb) = bucket[i1];
                if a == b {
                    continue;
                }
                let ((a, ra), (b, rb)) = if a < b { ((a, ra), (b, rb)) } else { ((b, rb), (a, ra)) };
                if !seen.insert((a, b)) {
                    continue;
                }
                if let Some(overlap) = ra.overlap(&rb) {
                    out.push(PairHit { a, b, overlap });
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Ent {
        Bullet(u32),
        BadGuy(u32),
    }

    fn grid() -> SpatialGrid<Ent> {
        SpatialGrid::new(128.0).unwrap()
    }

    #[test]
    fn test_entity_spanning_four_cells() {
        let mut g = grid();
        // Straddles the corner shared by cells (0,0), (1,0), (0,1), (1,1)
        g.add(Ent::BadGuy(1), Rect::new(112.0, 112.0, 32.0, 32.0));
        for (x, y) in [(0.0, 0.0), (130.0, 0.0), (0.0, 130.0), (130.0, 130.0)] {
            let hits = g.query(x, y, 4.0, 4.0);
            assert_eq!(hits, vec![Ent::BadGuy(1)]);
        }
        // A query over all four cells sees it once per cell
        assert_eq!(g.query(0.0, 0.0, 200.0, 200.0).len(), 4);
        assert_eq!(g.stats().cells, 4);
    }

    #[test]
    fn test_empty_region_and_clear() {
        let mut g = grid();
        g.add(Ent::Bullet(0), Rect::new(10.0, 10.0, 8.0, 8.0));
        assert!(g.query(1000.0, 1000.0, 32.0, 32.0).is_empty());
        assert!(g.query(-300.0, -300.0, 32.0, 32.0).is_empty());
        g.clear();
        assert!(g.query(0.0, 0.0, 64.0, 64.0).is_empty());
        assert!(g.is_empty());
        assert_eq!(g.stats().entries, 0);
    }

    #[test]
    fn test_all_entities_ignores_locality() {
        let mut g = grid();
        g.add(Ent::BadGuy(0), Rect::new(0.0, 0.0, 32.0, 32.0));
        g.add(Ent::BadGuy(1), Rect::new(5000.0, 0.0, 32.0, 32.0));
        assert!(!g.query(0.0, 0.0, 32.0, 32.0).contains(&Ent::BadGuy(1)));
        let all: Vec<_> = g.all_entities().collect();
        assert_eq!(all, vec![Ent::BadGuy(0), Ent::BadGuy(1)]);
    }

    #[test]
    fn test_negative_coordinates_floor() {
        let mut g = grid();
        g.add(Ent::Bullet(3), Rect::new(-10.0, -10.0, 4.0, 4.0));
        assert_eq!(g.query(-20.0, -20.0, 2.0, 2.0), vec![Ent::Bullet(3)]);
        assert!(g.query(1.0, 1.0, 2.0, 2.0).is_empty());
    }

    #[test]
    fn test_overlapping_pairs_deduped() {
        let mut g = grid();
        g.add(Ent::Bullet(0), Rect::new(120.0, 120.0, 16.0, 16.0));
        g.add(Ent::BadGuy(0), Rect::new(125.0, 125.0, 32.0, 32.0));
        g.add(Ent::BadGuy(1), Rect::new(136.0, 120.0, 32.0, 32.0)); // touches bullet edge only
        let pairs: Vec<_> = overlapping_pairs(&g).iter().map(|p| (p.a, p.b)).collect();
        assert!(pairs.contains(&(Ent::Bullet(0), Ent::BadGuy(0))));
        assert!(pairs.contains(&(Ent::BadGuy(0), Ent::BadGuy(1))));
        assert!(!pairs.contains(&(Ent::Bullet(0), Ent::BadGuy(1))));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_pairs_dispatch_into_collide() {
        use crate::api::Collide;

        struct Walker {
            dir: f32,
            bumps: u32,
        }

        impl Collide<Walker> for Walker {
            fn collision(&mut self, other: &mut Walker, kind: CollisionKind) {
                assert_eq!(kind, CollisionKind::Normal);
                self.dir = -self.dir;
                other.dir = -other.dir;
                self.bumps += 1;
            }
        }

        let mut walkers = [
            Walker { dir: 1.0, bumps: 0 },
            Walker { dir: -1.0, bumps: 0 },
            Walker { dir: 1.0, bumps: 0 },
        ];
        let boxes = [
            Rect::new(0.0, 0.0, 32.0, 32.0),
            Rect::new(20.0, 0.0, 32.0, 32.0),
            Rect::new(900.0, 0.0, 32.0, 32.0),
        ];
        let mut g = grid();
        for (i, r) in boxes.iter().enumerate() {
            g.add(Ent::BadGuy(i as u32), *r);
        }
        for hit in overlapping_pairs(&g) {
            let (Ent::BadGuy(a), Ent::BadGuy(b)) = (hit.a, hit.b) else { continue };
            let (lo, hi) = walkers.split_at_mut(b as usize);
            lo[a as usize].collision(&mut hi[0], hit.kind());
        }
        assert_eq!(walkers[0].dir, -1.0);
        assert_eq!(walkers[1].dir, 1.0);
        assert_eq!(walkers[0].bumps, 1);
        assert_eq!(walkers[2].dir, 1.0);
    }

    #[test]
    fn test_stomp_classified_as_squish() {
        let mut g = grid();
        // Player drops onto a badguy, overlapping mostly from above
        g.add(Ent::BadGuy(0), Rect::new(100.0, 64.0, 32.0, 32.0));
        g.add(Ent::Bullet(0), Rect::new(104.0, 36.0, 32.0, 32.0));
        // Side-on contact
        g.add(Ent::BadGuy(1), Rect::new(300.0, 64.0, 32.0, 32.0));
        g.add(Ent::Bullet(1), Rect::new(270.0, 66.0, 32.0, 32.0));
        let hits = overlapping_pairs(&g);
        assert_eq!(hits.len(), 2);
        let stomp = hits.iter().find(|h| h.a == Ent::Bullet(0)).unwrap();
        assert_eq!(stomp.b, Ent::BadGuy(0));
        assert_eq!(stomp.kind(), CollisionKind::Squish);
        assert!((stomp.overlap.depth - 4.0).abs() < 1e-5);
        let side = hits.iter().find(|h| h.a == Ent::Bullet(1)).unwrap();
        assert_eq!(side.kind(), CollisionKind::Normal);
    }

    #[test]
    fn test_clear_drops_stale_cells() {
        let mut g = grid();
        for frame in 0..500 {
            g.clear();
            g.add(Ent::Bullet(0), Rect::new(frame as f32 * 40.0, 0.0, 8.0, 8.0));
        }
        assert_eq!(g.len(), 1);
        assert_eq!(g.cells.len(), 1);
        assert_eq!(g.stats().cells, 1);
    }

    #[test]
    fn test_rejects_bad_cell_size() {
        assert!(SpatialGrid::<Ent>::new(0.0).is_err());
        assert!(SpatialGrid::<Ent>::new(f32::NAN).is_err());
    }
}
