//! Box-level tile probes built on [`TileQuery`] point queries, plus an owned
//! tile map for fixtures and small levels.

use glam::Vec2;

use crate::api::TileQuery;
use crate::types::Rect;

/// How far past an edge the ground/ceiling probes reach.
const PROBE_REACH: f32 = 1.0;

/// Inclusive cell range covered by the half-open span `[lo, hi)`.
fn cell_span(lo: f32, hi: f32, ts: f32) -> (i32, i32) {
    let first = (lo / ts).floor() as i32;
    let last = (hi / ts).ceil() as i32 - 1;
    (first, last.max(first))
}

/// True if any tile cell the half-open box covers is solid.
///
/// Samples one point per covered cell, so a box larger than a tile cannot
/// skip an interior tile, and a box whose edge lies exactly on a tile edge
/// does not collide with that tile.
pub fn box_collides<T: TileQuery + ?Sized>(tiles: &T, r: &Rect) -> bool {
    any_cell(tiles, r, |x, y| tiles.solid_at(x, y))
}

pub fn on_ice<T: TileQuery + ?Sized>(tiles: &T, r: &Rect) -> bool {
    feet_probes(r).into_iter().any(|p| tiles.icy_at(p.x, p.y))
}

pub fn touches_hazard<T: TileQuery + ?Sized>(tiles: &T, r: &Rect) -> bool {
    any_cell(tiles, r, |x, y| tiles.hazard_at(x, y))
}

/// Solid tile directly below the feet (left, center or right).
pub fn on_ground<T: TileQuery + ?Sized>(tiles: &T, r: &Rect) -> bool {
    feet_probes(r).into_iter().any(|p| tiles.solid_at(p.x, p.y))
}

/// Solid tile directly above the head.
pub fn under_solid<T: TileQuery + ?Sized>(tiles: &T, r: &Rect) -> bool {
    let y = r.min.y - PROBE_REACH;
    edge_xs(r).into_iter().any(|x| tiles.solid_at(x, y))
}

fn any_cell<T, F>(tiles: &T, r: &Rect, mut probe: F) -> bool
where
    T: TileQuery + ?Sized,
    F: FnMut(f32, f32) -> bool,
{
    let ts = tiles.tile_size();
    let (cx0, cx1) = cell_span(r.min.x, r.right(), ts);
    let (cy0, cy1) = cell_span(r.min.y, r.bottom(), ts);
    for cy in cy0..=cy1 {
        for cx in cx0..=cx1 {
            // A point inside both the cell and the box
            let x = (cx as f32 * ts).max(r.min.x);
            let y = (cy as f32 * ts).max(r.min.y);
            if probe(x, y) {
                return true;
            }
        }
    }
    false
}

fn edge_xs(r: &Rect) -> [f32; 3] {
    let right = (r.right() - PROBE_REACH).max(r.min.x);
    [r.min.x, r.center().x, right]
}

fn feet_probes(r: &Rect) -> [Vec2; 3] {
    let y = r.bottom() + PROBE_REACH;
    edge_xs(r).map(|x| Vec2::new(x, y))
}

const SOLID: u8 = 1;
const ICY: u8 = 1 << 1;
const BRICK: u8 = 1 << 2;
const HAZARD: u8 = 1 << 3;

/// Owned row-major tile map. Cells outside the map are empty.
#[derive(Clone, Debug)]
pub struct TileGrid {
    pub tile_size: f32,
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self { tile_size, width, height, cells: vec![0; width as usize * height as usize] }
    }

    /// Build from text rows: `#` solid, `=` ice, `B` brick, `^` hazard,
    /// anything else empty. Short rows are padded with empty cells.
    pub fn from_ascii(rows: &[&str], tile_size: f32) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(width, rows.len() as u32, tile_size);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let bits = match ch {
                    '#' => SOLID,
                    '=' => SOLID | ICY,
                    'B' => SOLID | BRICK,
                    '^' => HAZARD,
                    _ => 0,
                };
                grid.cells[y * width as usize + x] = bits;
            }
        }
        grid
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    pub fn set_solid(&mut self, cx: i32, cy: i32, solid: bool) {
        if let Some(i) = self.index(cx, cy) {
            if solid { self.cells[i] |= SOLID } else { self.cells[i] &= !(SOLID | BRICK | ICY) }
        }
    }

    fn index(&self, cx: i32, cy: i32) -> Option<usize> {
        if cx < 0 || cy < 0 || cx as u32 >= self.width || cy as u32 >= self.height {
            return None;
        }
        Some(cy as usize * self.width as usize + cx as usize)
    }

    fn bits_at(&self, x: f32, y: f32) -> u8 {
        let cx = (x / self.tile_size).floor() as i32;
        let cy = (y / self.tile_size).floor() as i32;
        self.index(cx, cy).map(|i| self.cells[i]).unwrap_or(0)
    }
}

impl TileQuery for TileGrid {
    fn tile_size(&self) -> f32 { self.tile_size }
    fn solid_at(&self, x: f32, y: f32) -> bool { self.bits_at(x, y) & SOLID != 0 }
    fn icy_at(&self, x: f32, y: f32) -> bool { self.bits_at(x, y) & ICY != 0 }
    fn brick_at(&self, x: f32, y: f32) -> bool { self.bits_at(x, y) & BRICK != 0 }
    fn hazard_at(&self, x: f32, y: f32) -> bool { self.bits_at(x, y) & HAZARD != 0 }
}
