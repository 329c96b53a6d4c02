//! Static level geometry as seen by the simulation
//!
//! The tile map itself is built elsewhere; the core only needs the blocking
//! rectangles, the grid size and the list of walkable floor tiles.

use std::collections::HashSet;

use glam::{IVec2, Vec2};

use super::geom::Rect;
use crate::consts::TILE;

/// Static geometry for one level
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Grid size in tiles
    pub width: i32,
    pub height: i32,
    pub walls: Vec<Rect>,
    pub doors: Vec<Rect>,
    /// Doors that only block while an arena encounter is active
    pub arena_doors: Vec<Rect>,
    /// Open floor tiles (spawn candidates)
    pub floor: Vec<IVec2>,
}

impl Geometry {
    /// Build geometry from rows of tile glyphs.
    ///
    /// `#` wall, `D` door, `A` arena door, `.` open floor. Any other glyph is
    /// treated as non-spawnable but walkable ground.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut geometry = Geometry {
            width: rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32,
            height: rows.len() as i32,
            ..Default::default()
        };

        for (ty, row) in rows.iter().enumerate() {
            for (tx, glyph) in row.chars().enumerate() {
                let tile = IVec2::new(tx as i32, ty as i32);
                match glyph {
                    '#' => geometry.walls.push(tile_rect(tile)),
                    'D' => geometry.doors.push(tile_rect(tile)),
                    'A' => geometry.arena_doors.push(tile_rect(tile)),
                    '.' => geometry.floor.push(tile),
                    _ => {}
                }
            }
        }
        geometry
    }

    pub fn dims(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Everything that blocks ground movement right now
    pub fn solids(&self, arena_active: bool) -> impl Iterator<Item = &Rect> + Clone {
        let arena: &[Rect] = if arena_active { &self.arena_doors } else { &[] };
        self.walls.iter().chain(self.doors.iter()).chain(arena.iter())
    }

    /// Tiles blocked for pathfinding; depends on the arena flag so it is
    /// rebuilt per query rather than cached
    pub fn blocked_tiles(&self, arena_active: bool) -> HashSet<IVec2> {
        self.solids(arena_active)
            .map(|r| IVec2::new((r.x / TILE).floor() as i32, (r.y / TILE).floor() as i32))
            .collect()
    }
}

/// World-space rectangle covering one tile
pub fn tile_rect(tile: IVec2) -> Rect {
    Rect::new(tile.x as f32 * TILE, tile.y as f32 * TILE, TILE, TILE)
}

/// Tile containing a world point
pub fn tile_of(p: Vec2) -> IVec2 {
    IVec2::new((p.x / TILE).floor() as i32, (p.y / TILE).floor() as i32)
}

/// World-space center of a tile
pub fn tile_center(tile: IVec2) -> Vec2 {
    Vec2::new(
        tile.x as f32 * TILE + TILE / 2.0,
        tile.y as f32 * TILE + TILE / 2.0,
    )
}
