//! Character-grid sparkline rendering.
//!
//! Prices are normalized to integer levels in `[0, height-1]`, resampled to
//! the requested width by nearest-preceding-index sampling, and drawn with a
//! direction marker per column. Direction is judged against the preceding
//! sample in the *original* sequence, not the resampled one, so a narrow
//! grid still reflects genuine tick-to-tick movement.

/// Marker for a sample above its predecessor.
const RISE: char = '╱';
/// Marker for a sample below its predecessor.
const FALL: char = '╲';
/// Marker for flat movement, first samples, and constant series.
const LEVEL: char = '─';

/// Rasterize `prices` into `height` newline-joined rows of `width` chars.
///
/// Empty input renders as an empty string, as does a degenerate grid.
pub fn render(prices: &[f64], width: usize, height: usize) -> String {
    if prices.is_empty() || width == 0 || height == 0 {
        return String::new();
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // A constant series carries no direction: one centered bar.
    if max == min {
        let mid = height / 2;
        let rows: Vec<String> = (0..height)
            .map(|row| {
                if row == mid {
                    LEVEL.to_string().repeat(width)
                } else {
                    " ".repeat(width)
                }
            })
            .collect();
        return rows.join("\n");
    }

    let span = max - min;
    let top = (height - 1) as f64;
    let mut grid = vec![vec![' '; width]; height];

    for col in 0..width {
        let idx = col * prices.len() / width;
        let level = ((prices[idx] - min) / span * top).floor() as usize;
        // Larger prices render near the top.
        let row = height - 1 - level;
        let marker = if idx == 0 {
            LEVEL
        } else if prices[idx] > prices[idx - 1] {
            RISE
        } else if prices[idx] < prices[idx - 1] {
            FALL
        } else {
            LEVEL
        };
        grid[row][col] = marker;
    }

    let rows: Vec<String> = grid
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect();
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(grid: &str) -> Vec<&str> {
        grid.split('\n').collect()
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(&[], 40, 8), "");
    }

    #[test]
    fn degenerate_grid_renders_empty() {
        assert_eq!(render(&[1.0, 2.0], 0, 8), "");
        assert_eq!(render(&[1.0, 2.0], 40, 0), "");
    }

    #[test]
    fn constant_series_draws_a_centered_bar() {
        let grid = render(&[42.0, 42.0, 42.0], 5, 4);
        let rows = rows(&grid);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "     ");
        assert_eq!(rows[1], "     ");
        assert_eq!(rows[2], "─────");
        assert_eq!(rows[3], "     ");
    }

    #[test]
    fn single_price_takes_the_constant_branch() {
        let grid = render(&[7.0], 3, 3);
        assert_eq!(rows(&grid), vec!["   ", "───", "   "]);
    }

    #[test]
    fn rising_series_climbs_toward_the_top_right() {
        let grid = render(&[1.0, 2.0, 3.0, 4.0], 4, 4);
        let rows = rows(&grid);
        // First sample: flat marker on the bottom row; then rises.
        assert_eq!(rows[3], "─   ");
        assert_eq!(rows[2], " ╱  ");
        assert_eq!(rows[1], "  ╱ ");
        assert_eq!(rows[0], "   ╱");
    }

    #[test]
    fn falling_series_descends_with_fall_markers() {
        let grid = render(&[4.0, 3.0, 2.0, 1.0], 4, 4);
        let rows = rows(&grid);
        assert_eq!(rows[0], "─   ");
        assert_eq!(rows[1], " ╲  ");
        assert_eq!(rows[2], "  ╲ ");
        assert_eq!(rows[3], "   ╲");
    }

    #[test]
    fn equal_neighbor_gets_a_level_marker() {
        // Second sample equals the first: level marker, not rise or fall.
        let grid = render(&[1.0, 1.0, 3.0], 3, 3);
        let rows = rows(&grid);
        assert_eq!(rows[2], "── ");
        assert_eq!(rows[0], "  ╱");
    }

    #[test]
    fn long_series_resamples_by_nearest_preceding_index() {
        // 8 samples into 4 columns: indices 0, 2, 4, 6.
        let prices = [1.0, 9.0, 2.0, 9.0, 3.0, 9.0, 4.0, 9.0];
        let grid = render(&prices, 4, 2);
        // Sampled values 1, 2, 3, 4 all normalize to the bottom row, and
        // every sampled index > 0 follows a higher original value.
        let rows = rows(&grid);
        assert_eq!(rows[1], "─╲╲╲");
        assert_eq!(rows[0], "    ");
    }

    #[test]
    fn short_series_stretches_across_the_width() {
        // 2 samples into 6 columns: indices 0,0,0,1,1,1.
        let grid = render(&[1.0, 2.0], 6, 2);
        let rows = rows(&grid);
        assert_eq!(rows[1], "───   ");
        assert_eq!(rows[0], "   ╱╱╱");
    }

    #[test]
    fn extremes_map_to_the_outer_rows() {
        let grid = render(&[1.0, 10.0], 2, 5);
        let rows = rows(&grid);
        // min on the bottom row, max on the top row.
        assert_eq!(rows[4].chars().next().unwrap(), '─');
        assert_eq!(rows[0].chars().nth(1).unwrap(), '╱');
    }
}
