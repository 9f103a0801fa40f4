//! Tile world: a fixed grid of tile codes plus the palette describing them
//!
//! Map files are plain text, one line per row, whitespace-separated tile
//! codes. Any malformed map is a fatal load error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index into the tile palette
pub type TileCode = u8;

/// Largest palette a [`TileCode`] can index
pub const MAX_PALETTE_LEN: usize = TileCode::MAX as usize + 1;

/// One palette entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileKind {
    pub name: String,
    /// Image reference handed to the renderer
    pub image: String,
    /// Solid tiles block movement
    pub solid: bool,
}

impl TileKind {
    pub fn new(name: &str, solid: bool) -> Self {
        Self {
            name: name.to_string(),
            image: format!("tiles/{name}.png"),
            solid,
        }
    }
}

/// Reference palette: codes 0..=5
pub fn default_palette() -> Vec<TileKind> {
    vec![
        TileKind::new("water", true),
        TileKind::new("tree", true),
        TileKind::new("sand", false),
        TileKind::new("wall", true),
        TileKind::new("grass", false),
        TileKind::new("floor", false),
    ]
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tile palette is empty")]
    EmptyPalette,
    #[error("tile palette has {len} entries, at most {max} are addressable")]
    PaletteTooLarge { len: usize, max: usize },
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(i32),
    #[error("map has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} tiles, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, col {col}: '{token}' is not a tile code")]
    InvalidToken {
        row: usize,
        col: usize,
        token: String,
    },
    #[error("row {row}, col {col}: tile code {code} is outside the palette (size {palette_len})")]
    UnknownCode {
        row: usize,
        col: usize,
        code: usize,
        palette_len: usize,
    },
    #[error("map has no walkable tile")]
    NoOpenTile,
}

/// Immutable tile grid shared by collision and rendering
#[derive(Debug, Clone)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tile_size: i32,
    codes: Vec<TileCode>,
    palette: Vec<TileKind>,
}

impl TileGrid {
    /// Build a grid from row-major codes, validating every code against the palette
    pub fn from_codes(
        rows: usize,
        cols: usize,
        tile_size: i32,
        codes: Vec<TileCode>,
        palette: Vec<TileKind>,
    ) -> Result<Self, MapError> {
        check_layout(tile_size, &palette)?;
        if codes.len() != rows * cols {
            return Err(MapError::RowCount {
                expected: rows,
                found: codes.len() / cols.max(1),
            });
        }
        if let Some(index) = codes.iter().position(|&c| c as usize >= palette.len()) {
            return Err(MapError::UnknownCode {
                row: index / cols,
                col: index % cols,
                code: codes[index] as usize,
                palette_len: palette.len(),
            });
        }
        if !codes.iter().any(|&c| !palette[c as usize].solid) {
            return Err(MapError::NoOpenTile);
        }
        Ok(Self {
            rows,
            cols,
            tile_size,
            codes,
            palette,
        })
    }

    /// Parse the plain-text map format
    pub fn parse(
        text: &str,
        rows: usize,
        cols: usize,
        tile_size: i32,
        palette: Vec<TileKind>,
    ) -> Result<Self, MapError> {
        check_layout(tile_size, &palette)?;

        // Trailing blank lines are tolerated; blank lines inside the map are rows
        let lines: Vec<&str> = text.trim_end().lines().collect();
        if lines.len() != rows {
            return Err(MapError::RowCount {
                expected: rows,
                found: lines.len(),
            });
        }

        let mut codes = Vec::with_capacity(rows * cols);
        for (row, line) in lines.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != cols {
                return Err(MapError::ColumnCount {
                    row,
                    expected: cols,
                    found: tokens.len(),
                });
            }
            for (col, token) in tokens.into_iter().enumerate() {
                let code: usize = token.parse().map_err(|_| MapError::InvalidToken {
                    row,
                    col,
                    token: token.to_string(),
                })?;
                let unknown = MapError::UnknownCode {
                    row,
                    col,
                    code,
                    palette_len: palette.len(),
                };
                match TileCode::try_from(code) {
                    Ok(code) if (code as usize) < palette.len() => codes.push(code),
                    _ => return Err(unknown),
                }
            }
        }

        Self::from_codes(rows, cols, tile_size, codes, palette)
    }

    /// Read and parse a map file
    pub fn load(
        path: impl AsRef<Path>,
        rows: usize,
        cols: usize,
        tile_size: i32,
        palette: Vec<TileKind>,
    ) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&text, rows, cols, tile_size, palette)?;
        log::info!("Loaded {}x{} map from {}", rows, cols, path.display());
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn palette(&self) -> &[TileKind] {
        &self.palette
    }

    /// Tile code at (row, col). Panics when out of range.
    pub fn code_at(&self, row: usize, col: usize) -> TileCode {
        assert!(
            row < self.rows && col < self.cols,
            "tile ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        self.codes[row * self.cols + col]
    }

    /// Tile code at signed coordinates, `None` outside the grid
    pub fn checked_code_at(&self, row: i32, col: i32) -> Option<TileCode> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(self.codes[row as usize * self.cols + col as usize])
    }

    /// Whether a palette code is solid
    pub fn is_solid(&self, code: TileCode) -> bool {
        self.palette[code as usize].solid
    }

    /// Solidity at signed coordinates; anything outside the grid is solid
    pub fn solid_at(&self, row: i32, col: i32) -> bool {
        self.checked_code_at(row, col).is_none_or(|code| self.is_solid(code))
    }

    /// Tile containing a world-pixel coordinate, as (row, col)
    pub fn tile_of(&self, x: i32, y: i32) -> (i32, i32) {
        (y.div_euclid(self.tile_size), x.div_euclid(self.tile_size))
    }

    /// Iterate (row, col) of every non-solid tile in row-major order
    pub fn open_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|&(_, &code)| !self.is_solid(code))
            .map(|(i, _)| (i / self.cols, i % self.cols))
    }
}

/// Grid-wide preconditions shared by both constructors
fn check_layout(tile_size: i32, palette: &[TileKind]) -> Result<(), MapError> {
    if tile_size <= 0 {
        return Err(MapError::InvalidTileSize(tile_size));
    }
    if palette.is_empty() {
        return Err(MapError::EmptyPalette);
    }
    if palette.len() > MAX_PALETTE_LEN {
        return Err(MapError::PaletteTooLarge {
            len: palette.len(),
            max: MAX_PALETTE_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_map() -> &'static str {
        "3 3 3 3\n3 4 5 3\n3 0 2 3\n3 3 3 3\n"
    }

    #[test]
    fn test_parse_valid_map() {
        let grid = TileGrid::parse(small_map(), 4, 4, 48, default_palette()).unwrap();
        assert_eq!(grid.code_at(1, 1), 4);
        assert_eq!(grid.code_at(2, 1), 0);
        assert!(grid.is_solid(grid.code_at(0, 0)));
        assert!(!grid.is_solid(grid.code_at(1, 2)));
        assert_eq!(grid.open_tiles().count(), 3);
    }

    #[test]
    fn test_wrong_row_count() {
        let err = TileGrid::parse("4 4\n4 4\n", 3, 2, 48, default_palette()).unwrap_err();
        assert!(matches!(err, MapError::RowCount { expected: 3, found: 2 }));
    }

    #[test]
    fn test_wrong_column_count() {
        let err = TileGrid::parse("4 4\n4 4 4\n", 2, 2, 48, default_palette()).unwrap_err();
        assert!(matches!(
            err,
            MapError::ColumnCount {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_non_integer_token() {
        let err = TileGrid::parse("4 x\n4 4\n", 2, 2, 48, default_palette()).unwrap_err();
        assert!(matches!(err, MapError::InvalidToken { row: 0, col: 1, .. }));
    }

    #[test]
    fn test_negative_token_rejected() {
        let err = TileGrid::parse("4 -1\n4 4\n", 2, 2, 48, default_palette()).unwrap_err();
        assert!(matches!(err, MapError::InvalidToken { .. }));
    }

    #[test]
    fn test_code_outside_palette() {
        let err = TileGrid::parse("4 9\n4 4\n", 2, 2, 48, default_palette()).unwrap_err();
        assert!(matches!(err, MapError::UnknownCode { code: 9, .. }));
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let err = TileGrid::from_codes(2, 2, 0, vec![4; 4], default_palette()).unwrap_err();
        assert!(matches!(err, MapError::InvalidTileSize(0)));
        let err = TileGrid::parse("4 4\n4 4\n", 2, 2, -48, default_palette()).unwrap_err();
        assert!(matches!(err, MapError::InvalidTileSize(-48)));
    }

    #[test]
    fn test_oversized_palette_rejected() {
        let palette: Vec<TileKind> = (0..300)
            .map(|i| TileKind::new(&format!("t{i}"), false))
            .collect();
        let err = TileGrid::parse("256 4\n4 4\n", 2, 2, 48, palette).unwrap_err();
        assert!(matches!(err, MapError::PaletteTooLarge { len: 300, max: 256 }));
    }

    #[test]
    fn test_full_palette_keeps_high_codes() {
        let palette: Vec<TileKind> = (0..256)
            .map(|i| TileKind::new(&format!("t{i}"), false))
            .collect();
        let grid = TileGrid::parse("255 4\n4 4\n", 2, 2, 48, palette.clone()).unwrap();
        assert_eq!(grid.code_at(0, 0), 255);
        let err = TileGrid::parse("256 4\n4 4\n", 2, 2, 48, palette).unwrap_err();
        assert!(matches!(err, MapError::UnknownCode { code: 256, .. }));
    }

    #[test]
    fn test_all_solid_map_rejected() {
        let err = TileGrid::parse("3 3\n0 1\n", 2, 2, 48, default_palette()).unwrap_err();
        assert!(matches!(err, MapError::NoOpenTile));
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let grid = TileGrid::parse("4 4\n4 4\n", 2, 2, 48, default_palette()).unwrap();
        assert!(!grid.solid_at(0, 0));
        assert!(grid.solid_at(-1, 0));
        assert!(grid.solid_at(0, 2));
        assert!(grid.solid_at(2, 1));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_code_at_out_of_range_panics() {
        let grid = TileGrid::parse("4 4\n4 4\n", 2, 2, 48, default_palette()).unwrap();
        grid.code_at(2, 0);
    }

    #[test]
    fn test_tile_of_negative_coordinates() {
        let grid = TileGrid::parse("4 4\n4 4\n", 2, 2, 48, default_palette()).unwrap();
        assert_eq!(grid.tile_of(47, 48), (1, 0));
        assert_eq!(grid.tile_of(-1, 0), (0, -1));
    }
}
