//! Grayscale frame buffers and neighborhood extraction.

use crate::error::DenoiseError;

/// A single grayscale frame: a row-major grid of 8-bit intensities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

/// An ordered list of frames, index 0..N-1 representing time.
pub type Sequence = Vec<Frame>;

/// A single computed pixel value destined for a frame position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPatch {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

impl Frame {
    /// Create a frame filled with a single value.
    pub fn filled(rows: usize, cols: usize, value: u8) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Build a frame from raw row-major bytes.
    pub fn from_raw(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, DenoiseError> {
        if data.len() != rows * cols {
            return Err(DenoiseError::DimensionMismatch {
                expected_rows: rows,
                expected_cols: cols,
                rows: if cols == 0 { 0 } else { data.len() / cols },
                cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a frame from a list of equal-length rows.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, DenoiseError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(height * width);
        for row in &rows {
            if row.len() != width {
                return Err(DenoiseError::DimensionMismatch {
                    expected_rows: height,
                    expected_cols: width,
                    rows: height,
                    cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: height,
            cols: width,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.cols + col] = value;
    }

    /// One full row of pixels.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Extract the clipped square neighborhood of `radius` around a center.
    ///
    /// The bounding box `[row-r, row+r] x [col-r, col+r]` is clamped to the
    /// frame, so blocks shrink near borders and corners instead of failing.
    /// The source frame is never mutated; the block is a copy.
    pub fn neighborhood(
        &self,
        row: usize,
        col: usize,
        radius: usize,
    ) -> Result<Neighborhood, DenoiseError> {
        if self.is_empty() {
            return Err(DenoiseError::EmptyFrame);
        }
        if row >= self.rows || col >= self.cols {
            return Err(DenoiseError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let row_min = row.saturating_sub(radius);
        let row_max = row.saturating_add(radius).min(self.rows - 1);
        let col_min = col.saturating_sub(radius);
        let col_max = col.saturating_add(radius).min(self.cols - 1);

        let block_rows = row_max - row_min + 1;
        let block_cols = col_max - col_min + 1;
        let mut data = Vec::with_capacity(block_rows * block_cols);
        for r in row_min..=row_max {
            data.extend_from_slice(&self.data[r * self.cols + col_min..r * self.cols + col_max + 1]);
        }

        Ok(Neighborhood {
            rows: block_rows,
            cols: block_cols,
            data,
            center_row: row - row_min,
            center_col: col - col_min,
            origin_row: row,
            origin_col: col,
            row_min,
            row_max,
            col_min,
            col_max,
        })
    }

    /// Apply a batch of computed pixel values in place.
    ///
    /// Entries are applied in order with no deduplication, so when two
    /// patches target the same position the last one wins.
    pub fn apply_patches(&mut self, patches: &[PixelPatch]) {
        for patch in patches {
            self.set(patch.row, patch.col, patch.value);
        }
    }
}

/// A clipped rectangular block copied out of a frame, together with the
/// center's offset inside the block and its original coordinate.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
    center_row: usize,
    center_col: usize,
    origin_row: usize,
    origin_col: usize,
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl Neighborhood {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Center offset inside the block, (row, col).
    pub fn center(&self) -> (usize, usize) {
        (self.center_row, self.center_col)
    }

    /// Original center coordinate in the source frame, (row, col).
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_row, self.origin_col)
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    /// Value of the center pixel.
    pub fn center_value(&self) -> u8 {
        self.get(self.center_row, self.center_col)
    }

    /// All block values except the center. Empty for a 1x1 block.
    pub fn neighbors(&self) -> Vec<u8> {
        let center = self.center_row * self.cols + self.center_col;
        self.data
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != center)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Edge classification from local gradient magnitude.
    ///
    /// A block smaller than 3x3, or a center sitting on the block boundary,
    /// has no full 4-neighborhood and is unconditionally treated as an edge.
    /// Otherwise central differences over the four direct neighbors give
    /// `sqrt(gx^2 + gy^2)`, and the pixel is an edge iff that exceeds the
    /// threshold.
    pub fn is_edge(&self, threshold: f64) -> bool {
        if self.rows < 3 || self.cols < 3 {
            return true;
        }
        if self.center_row == 0
            || self.center_row >= self.rows - 1
            || self.center_col == 0
            || self.center_col >= self.cols - 1
        {
            return true;
        }

        let top = self.get(self.center_row - 1, self.center_col) as f64;
        let bottom = self.get(self.center_row + 1, self.center_col) as f64;
        let left = self.get(self.center_row, self.center_col - 1) as f64;
        let right = self.get(self.center_row, self.center_col + 1) as f64;

        let gx = (right - left).abs() / 2.0;
        let gy = (bottom - top).abs() / 2.0;
        let gradient = (gx * gx + gy * gy).sqrt();

        gradient > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame() -> Frame {
        let mut frame = Frame::filled(5, 5, 0);
        for row in 0..5 {
            for col in 0..5 {
                frame.set(row, col, (row as u8) * 60);
            }
        }
        frame
    }

    #[test]
    fn test_neighborhood_center_of_frame() {
        let frame = Frame::filled(5, 5, 100);
        let block = frame.neighborhood(2, 2, 1).unwrap();
        assert_eq!(block.rows(), 3);
        assert_eq!(block.cols(), 3);
        assert_eq!(block.center(), (1, 1));
        assert_eq!(block.origin(), (2, 2));
        assert_eq!((block.row_min, block.row_max), (1, 3));
        assert_eq!((block.col_min, block.col_max), (1, 3));
    }

    #[test]
    fn test_neighborhood_clips_at_corners() {
        let frame = Frame::filled(5, 5, 50);

        let top_left = frame.neighborhood(0, 0, 1).unwrap();
        assert_eq!((top_left.rows(), top_left.cols()), (2, 2));
        assert_eq!(top_left.center(), (0, 0));

        let bottom_right = frame.neighborhood(4, 4, 1).unwrap();
        assert_eq!((bottom_right.rows(), bottom_right.cols()), (2, 2));
        assert_eq!(bottom_right.center(), (1, 1));
        assert_eq!((bottom_right.row_min, bottom_right.col_min), (3, 3));
    }

    #[test]
    fn test_neighborhood_large_radius_covers_frame() {
        let frame = Frame::filled(3, 3, 100);
        let block = frame.neighborhood(1, 1, 10).unwrap();
        assert_eq!((block.rows(), block.cols()), (3, 3));
        assert_eq!(block.center(), (1, 1));
    }

    #[test]
    fn test_neighborhood_radius_saturates() {
        let frame = Frame::filled(3, 3, 100);
        let block = frame.neighborhood(2, 2, usize::MAX).unwrap();
        assert_eq!((block.rows(), block.cols()), (3, 3));
        assert_eq!((block.row_max, block.col_max), (2, 2));
    }

    #[test]
    fn test_neighborhood_out_of_range() {
        let frame = Frame::filled(3, 3, 0);
        let err = frame.neighborhood(3, 0, 1).unwrap_err();
        assert!(matches!(err, DenoiseError::OutOfRange { row: 3, .. }));
    }

    #[test]
    fn test_neighborhood_empty_frame() {
        let frame = Frame::filled(0, 0, 0);
        assert!(matches!(
            frame.neighborhood(0, 0, 1),
            Err(DenoiseError::EmptyFrame)
        ));
    }

    #[test]
    fn test_neighbors_excludes_center() {
        let mut frame = Frame::filled(3, 3, 10);
        frame.set(1, 1, 200);
        let block = frame.neighborhood(1, 1, 1).unwrap();
        let neighbors = block.neighbors();
        assert_eq!(neighbors.len(), 8);
        assert!(neighbors.iter().all(|&v| v == 10));
        assert_eq!(block.center_value(), 200);
    }

    #[test]
    fn test_neighbors_empty_for_single_pixel() {
        let frame = Frame::filled(1, 1, 255);
        let block = frame.neighborhood(0, 0, 0).unwrap();
        assert!(block.neighbors().is_empty());
        assert_eq!(block.center_value(), 255);
    }

    #[test]
    fn test_is_edge_small_block() {
        let frame = Frame::filled(2, 2, 100);
        let block = frame.neighborhood(0, 0, 1).unwrap();
        assert!(block.is_edge(25.0));
    }

    #[test]
    fn test_is_edge_center_on_boundary() {
        let frame = Frame::filled(5, 5, 100);
        let block = frame.neighborhood(0, 2, 1).unwrap();
        assert!(block.is_edge(25.0));
    }

    #[test]
    fn test_is_edge_uniform_region() {
        let frame = Frame::filled(5, 5, 100);
        let block = frame.neighborhood(2, 2, 1).unwrap();
        assert!(!block.is_edge(25.0));
    }

    #[test]
    fn test_is_edge_strong_gradient() {
        let frame = gradient_frame();
        let block = frame.neighborhood(2, 2, 1).unwrap();
        // Vertical step of 60 per row gives gy = 60, gradient = 60.
        assert!(block.is_edge(25.0));
        assert!(!block.is_edge(90.0));
    }

    #[test]
    fn test_apply_patches_last_write_wins() {
        let mut frame = Frame::filled(3, 3, 0);
        frame.apply_patches(&[
            PixelPatch { row: 1, col: 1, value: 10 },
            PixelPatch { row: 0, col: 2, value: 42 },
            PixelPatch { row: 1, col: 1, value: 99 },
        ]);
        assert_eq!(frame.get(1, 1), 99);
        assert_eq!(frame.get(0, 2), 42);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = Frame::from_rows(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert!(matches!(err, DenoiseError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_from_rows_round_trip() {
        let frame = Frame::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.cols(), 2);
        assert_eq!(frame.row(1), &[3, 4]);
    }
}
