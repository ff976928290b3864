/// A 2-D grid of intensities, row-major with row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityGrid {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl IntensityGrid {
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Self {
        assert!(width > 0, "Width must be positive");
        assert!(height > 0, "Height must be positive");
        assert_eq!(values.len(), width * height, "Value count mismatch");
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Minimum and maximum over the finite values, `None` if there are none.
    pub fn extrema(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }

    /// Photometric inversion: each value `v` becomes `max - v`.
    ///
    /// The brightest input pixels become 0 and the faintest become
    /// `max - min`. Non-finite inputs stay NaN.
    pub fn inverted(&self) -> Self {
        let values = match self.extrema() {
            Some((_, max)) => self
                .values
                .iter()
                .map(|&v| if v.is_finite() { max - v } else { f64::NAN })
                .collect(),
            None => vec![f64::NAN; self.values.len()],
        };

        Self {
            width: self.width,
            height: self.height,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Deterministic xorshift fill so tests are reproducible without a rand dependency
    fn noisy_grid(width: usize, height: usize, seed: u64) -> IntensityGrid {
        let mut state = seed;
        let values = (0..width * height)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state % 65_536) as f64 - 1_000.0
            })
            .collect();
        IntensityGrid::new(width, height, values)
    }

    #[test]
    fn inversion_is_max_minus_value() {
        let grid = noisy_grid(17, 9, 0x9E37_79B9_7F4A_7C15);
        let (_, max) = grid.extrema().unwrap();
        let inverted = grid.inverted();

        assert_eq!(inverted.width(), grid.width());
        assert_eq!(inverted.height(), grid.height());
        for (out, input) in inverted.values().iter().zip(grid.values()) {
            assert_eq!(*out, max - input);
        }
    }

    #[test]
    fn inverted_range_is_zero_to_span() {
        let grid = noisy_grid(32, 32, 42);
        let (min, max) = grid.extrema().unwrap();
        let (out_min, out_max) = grid.inverted().extrema().unwrap();

        assert_eq!(out_min, 0.0);
        assert_eq!(out_max, max - min);
    }

    #[test]
    fn inversion_is_pure() {
        let grid = noisy_grid(8, 8, 7);
        let snapshot = grid.clone();
        let first = grid.inverted();
        let second = grid.inverted();

        assert_eq!(first, second);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn brightest_becomes_darkest() {
        let grid = IntensityGrid::new(3, 1, vec![10.0, 250.0, 40.0]);
        let inverted = grid.inverted();
        assert_eq!(inverted.values(), &[240.0, 0.0, 210.0]);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let grid = IntensityGrid::new(2, 2, vec![1.0, f64::NAN, 5.0, f64::INFINITY]);
        assert_eq!(grid.extrema(), Some((1.0, 5.0)));

        let inverted = grid.inverted();
        assert_eq!(inverted.get(0, 0), 4.0);
        assert!(inverted.get(1, 0).is_nan());
        assert_eq!(inverted.get(0, 1), 0.0);
        assert!(inverted.get(1, 1).is_nan());
    }

    #[test]
    fn all_nan_grid_has_no_extrema() {
        let grid = IntensityGrid::new(1, 2, vec![f64::NAN, f64::NAN]);
        assert_eq!(grid.extrema(), None);
        assert!(grid.inverted().values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn constant_grid_inverts_to_zero() {
        let grid = IntensityGrid::new(2, 2, vec![7.5; 4]);
        assert!(grid.inverted().values().iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic(expected = "Width must be positive")]
    fn zero_width_is_rejected() {
        IntensityGrid::new(0, 1, vec![]);
    }
}
