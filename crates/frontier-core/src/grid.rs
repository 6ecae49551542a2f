//! Coordinate system for the Frontier board.
//!
//! Everything lives on two small rectangular grids:
//! - Tiles sit on a 5x5 grid indexed `[x][y]`. A cell holds a tile only
//!   when `2 <= x + y <= 6`, which carves the hexagonal play area (19 tiles)
//!   out of the square.
//! - Vertices (house corners) sit on an 11x6 grid. Row `y` spans
//!   `x in [left(y), 10 - left(y)]` with `left = [2, 1, 0, 0, 1, 2]`,
//!   giving row widths 7, 9, 11, 11, 9, 7 (54 vertices).
//!
//! Edges (road positions) are implicit in the vertex grid: two valid
//! vertices in the same row are joined when their `x` differ by one, and
//! `(x, y)` is joined to `(x, y + 1)` exactly when `x` and `y` share
//! parity. That yields 72 edges.

use serde::{Deserialize, Serialize};

/// Width and height of the tile grid.
pub const TILE_GRID_SIZE: i32 = 5;

/// Width of the vertex grid.
pub const VERTEX_GRID_WIDTH: i32 = 11;

/// Height of the vertex grid.
pub const VERTEX_GRID_HEIGHT: i32 = 6;

/// Leftmost valid vertex `x` for each vertex row.
const ROW_LEFT: [i32; 6] = [2, 1, 0, 0, 1, 2];

/// Position of a tile on the 5x5 tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoords {
    pub x: i32,
    pub y: i32,
}

impl TileCoords {
    pub fn new(x: i32, y: i32) -> Self {
        TileCoords { x, y }
    }

    /// Whether this cell actually holds a tile.
    pub fn is_valid(&self) -> bool {
        self.x >= 0
            && self.x < TILE_GRID_SIZE
            && self.y >= 0
            && self.y < TILE_GRID_SIZE
            && (2..=6).contains(&(self.x + self.y))
    }

    /// The up-to-six tiles sharing an edge with this one.
    pub fn neighbours(&self) -> Vec<TileCoords> {
        let candidates = [
            TileCoords::new(self.x + 1, self.y),
            TileCoords::new(self.x - 1, self.y),
            TileCoords::new(self.x, self.y + 1),
            TileCoords::new(self.x, self.y - 1),
            TileCoords::new(self.x + 1, self.y - 1),
            TileCoords::new(self.x - 1, self.y + 1),
        ];
        candidates.into_iter().filter(|c| c.is_valid()).collect()
    }

    /// The six vertices at this tile's corners.
    ///
    /// Tile `(x, y)` touches vertex columns `f..=f + 2` on vertex rows `y`
    /// and `y + 1`, where `f = 2x + y - 2`.
    pub fn vertices(&self) -> [VertexCoords; 6] {
        let f = 2 * self.x + self.y - 2;
        [
            VertexCoords::new(f, self.y),
            VertexCoords::new(f + 1, self.y),
            VertexCoords::new(f + 2, self.y),
            VertexCoords::new(f, self.y + 1),
            VertexCoords::new(f + 1, self.y + 1),
            VertexCoords::new(f + 2, self.y + 1),
        ]
    }
}

/// Position of a vertex on the 11x6 vertex grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexCoords {
    pub x: i32,
    pub y: i32,
}

impl VertexCoords {
    pub fn new(x: i32, y: i32) -> Self {
        VertexCoords { x, y }
    }

    /// Whether this cell is part of the board outline.
    pub fn is_valid(&self) -> bool {
        if self.y < 0 || self.y >= VERTEX_GRID_HEIGHT {
            return false;
        }
        let left = ROW_LEFT[self.y as usize];
        self.x >= left && self.x <= VERTEX_GRID_WIDTH - 1 - left
    }

    /// Valid vertices connected to this one by an edge.
    pub fn neighbours(&self) -> Vec<VertexCoords> {
        let mut candidates = vec![
            VertexCoords::new(self.x - 1, self.y),
            VertexCoords::new(self.x + 1, self.y),
        ];
        // Vertical edges only exist where x and y share parity; the edge
        // above this vertex belongs to row y - 1, hence the flipped check.
        if (self.x - self.y) % 2 == 0 {
            candidates.push(VertexCoords::new(self.x, self.y + 1));
        } else {
            candidates.push(VertexCoords::new(self.x, self.y - 1));
        }
        candidates.into_iter().filter(|c| c.is_valid()).collect()
    }

    /// The up-to-three tiles that have this vertex as a corner.
    pub fn touching_tiles(&self) -> Vec<TileCoords> {
        let mut tiles = Vec::with_capacity(3);
        for ty in [self.y - 1, self.y] {
            for tx in 0..TILE_GRID_SIZE {
                let tile = TileCoords::new(tx, ty);
                if !tile.is_valid() {
                    continue;
                }
                let f = 2 * tx + ty - 2;
                if self.x >= f && self.x <= f + 2 {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }
}

/// Whether two vertices are joined by an edge of the board.
pub fn is_edge(a: VertexCoords, b: VertexCoords) -> bool {
    if !a.is_valid() || !b.is_valid() {
        return false;
    }
    if a.y == b.y {
        (a.x - b.x).abs() == 1
    } else if a.x == b.x {
        let upper = if a.y < b.y { a } else { b };
        (b.y - a.y).abs() == 1 && (upper.x - upper.y) % 2 == 0
    } else {
        false
    }
}

/// All valid tile positions in fixed grid order (x outer, y inner).
///
/// Board generation and resource distribution iterate in this order, so it
/// is part of the deterministic behaviour of a seeded game.
pub fn all_tiles() -> Vec<TileCoords> {
    let mut tiles = Vec::with_capacity(19);
    for x in 0..TILE_GRID_SIZE {
        for y in 0..TILE_GRID_SIZE {
            let coords = TileCoords::new(x, y);
            if coords.is_valid() {
                tiles.push(coords);
            }
        }
    }
    tiles
}

/// All valid vertex positions in row order (y outer, x inner).
pub fn all_vertices() -> Vec<VertexCoords> {
    let mut vertices = Vec::with_capacity(54);
    for y in 0..VERTEX_GRID_HEIGHT {
        for x in 0..VERTEX_GRID_WIDTH {
            let coords = VertexCoords::new(x, y);
            if coords.is_valid() {
                vertices.push(coords);
            }
        }
    }
    vertices
}

/// All edges as vertex pairs, in row order. Each edge appears once, with
/// the lexicographically smaller endpoint (by `(y, x)`) first.
pub fn all_edges() -> Vec<(VertexCoords, VertexCoords)> {
    let mut edges = Vec::with_capacity(72);
    for vertex in all_vertices() {
        let right = VertexCoords::new(vertex.x + 1, vertex.y);
        if right.is_valid() {
            edges.push((vertex, right));
        }
        let below = VertexCoords::new(vertex.x, vertex.y + 1);
        if (vertex.x - vertex.y) % 2 == 0 && below.is_valid() {
            edges.push((vertex, below));
        }
    }
    edges
}
