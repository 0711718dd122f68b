//! Static walkability grid and tile-map collision queries

use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::game::geometry::Point;

/// World-space size of one grid cell
pub const CELL_SIZE: f32 = 64.0;

/// Tile ids above this mark a cell as blocked
const BLOCKED_TILE_THRESHOLD: u32 = 100;

/// Attempts before the walkable-cell sampler falls back to a scan
const SAMPLE_ATTEMPT_CAP: u32 = 10_000;

/// Map loading / validation errors
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("map file has no tile layers")]
    NoLayers,

    #[error("tile layer has {actual} cells, expected {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("map has no walkable cells")]
    NoWalkableCells,
}

#[derive(Debug, Clone, Copy)]
pub struct MapCell {
    pub walkable: bool,
    pub tile: u32,
}

/// Immutable walkability grid, built once at startup
pub struct TileMap {
    height: usize,
    width: usize,
    cells: Vec<Vec<MapCell>>,
}

/// Tiled-style map file: we only consume the first layer's tile data
#[derive(Debug, Deserialize)]
struct MapFile {
    layers: Vec<MapLayer>,
}

#[derive(Debug, Deserialize)]
struct MapLayer {
    data: Vec<u32>,
}

impl TileMap {
    /// Build a map from a row-major tile-id grid
    pub fn from_tiles(tiles: Vec<Vec<u32>>) -> Result<Self, MapError> {
        let height = tiles.len();
        let width = tiles.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Err(MapError::NoWalkableCells);
        }

        let mut cells = Vec::with_capacity(height);
        for row in &tiles {
            if row.len() != width {
                return Err(MapError::WrongSize {
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.push(
                row.iter()
                    .map(|&tile| MapCell {
                        walkable: tile <= BLOCKED_TILE_THRESHOLD,
                        tile,
                    })
                    .collect(),
            );
        }

        let map = Self {
            height,
            width,
            cells,
        };
        if !map.cells.iter().flatten().any(|c| c.walkable) {
            return Err(MapError::NoWalkableCells);
        }
        Ok(map)
    }

    /// Load a Tiled-style JSON map and validate its dimensions
    pub fn load_json(path: &Path, height: usize, width: usize) -> Result<Self, MapError> {
        let raw = std::fs::read_to_string(path)?;
        let file: MapFile = serde_json::from_str(&raw)?;
        let layer = file.layers.first().ok_or(MapError::NoLayers)?;

        if layer.data.len() != height * width {
            return Err(MapError::WrongSize {
                expected: height * width,
                actual: layer.data.len(),
            });
        }

        let tiles = (0..height)
            .map(|row| layer.data[row * width..(row + 1) * width].to_vec())
            .collect();
        Self::from_tiles(tiles)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells outside the grid are implicitly non-walkable
    pub fn is_walkable(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return false;
        }
        self.cells[row as usize][col as usize].walkable
    }

    /// Bounding-box collision of an entity footprint against the grid.
    /// True if any part of the box leaves the world extent or overlaps
    /// a blocked cell.
    pub fn collides(&self, center: Point, footprint_w: f32, footprint_h: f32) -> bool {
        let min_x = center.x - footprint_w / 2.0;
        let max_x = center.x + footprint_w / 2.0;
        let min_y = center.y - footprint_h / 2.0;
        let max_y = center.y + footprint_h / 2.0;

        if min_x < 0.0
            || max_x > CELL_SIZE * self.width as f32
            || min_y < 0.0
            || max_y > CELL_SIZE * self.height as f32
        {
            return true;
        }

        let col_lo = (min_x / CELL_SIZE) as isize;
        let col_hi = (max_x / CELL_SIZE) as isize;
        let row_lo = (min_y / CELL_SIZE) as isize;
        let row_hi = (max_y / CELL_SIZE) as isize;

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                if !self.is_walkable(row, col) {
                    return true;
                }
            }
        }
        false
    }

    /// Rejection-sample a walkable cell and return its world-space center.
    /// Load validation guarantees one exists; the attempt cap only guards
    /// against pathological sampling runs before falling back to a scan.
    pub fn random_walkable_coord<R: Rng>(&self, rng: &mut R) -> Point {
        for _ in 0..SAMPLE_ATTEMPT_CAP {
            let row = rng.gen_range(0..self.height);
            let col = rng.gen_range(0..self.width);
            if self.cells[row][col].walkable {
                return Self::cell_center(row, col);
            }
        }
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.walkable {
                    return Self::cell_center(row, col);
                }
            }
        }
        unreachable!("map validated to contain a walkable cell");
    }

    fn cell_center(row: usize, col: usize) -> Point {
        Point::new(
            col as f32 * CELL_SIZE + CELL_SIZE / 2.0,
            row as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        )
    }

    /// Full tile-id grid for the static snapshot
    pub fn tile_grid(&self) -> Vec<Vec<u32>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.tile).collect())
            .collect()
    }
}
