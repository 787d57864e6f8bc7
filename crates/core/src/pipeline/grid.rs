use ndarray::s;
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    #[error("grid needs at least one tile")]
    Empty,
    #[error("grid needs at least one column")]
    NoColumns,
    #[error("tile {index} is {actual:?} but the first tile is {expected:?} (width, height, channels)")]
    ShapeMismatch {
        index: usize,
        expected: (u32, u32, u8),
        actual: (u32, u32, u8),
    },
}

/// Pixel rectangle `[row_start, row_end) x [col_start, col_end)` covered by
/// tile `index` in a grid of `columns` tiles of `tile_width` x `tile_height`.
pub fn tile_bounds(
    index: usize,
    columns: usize,
    tile_width: u32,
    tile_height: u32,
) -> ((usize, usize), (usize, usize)) {
    let (h, w) = (tile_height as usize, tile_width as usize);
    let row = index / columns;
    let col = index % columns;
    ((h * row, h * (row + 1)), (w * col, w * (col + 1)))
}

/// Lays tiles out row by row, `columns` per row, on a black canvas.
///
/// All tiles must share the first tile's shape. A partially filled last
/// row stays black.
pub fn compose_grid(tiles: &[Frame], columns: usize) -> Result<Frame, GridError> {
    let first = tiles.first().ok_or(GridError::Empty)?;
    if columns == 0 {
        return Err(GridError::NoColumns);
    }

    let expected = (first.width(), first.height(), first.channels());
    for (index, tile) in tiles.iter().enumerate() {
        let actual = (tile.width(), tile.height(), tile.channels());
        if actual != expected {
            return Err(GridError::ShapeMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    let rows = tiles.len().div_ceil(columns);
    let mut canvas = Frame::blank(
        first.width() * columns as u32,
        first.height() * rows as u32,
        first.channels(),
    );

    {
        let mut view = canvas.as_ndarray_mut();
        for (index, tile) in tiles.iter().enumerate() {
            let ((r0, r1), (c0, c1)) = tile_bounds(index, columns, first.width(), first.height());
            view.slice_mut(s![r0..r1, c0..c1, ..])
                .assign(&tile.as_ndarray());
        }
    }

    Ok(canvas)
}
