//! Running statistics behind the tile-wise comparison pass.

/// Dynamic range of the signal. Channels are compared in unit-interval
/// space, so this is `1.0` rather than `255.0`.
const DYNAMIC_RANGE: f64 = 1.0;

// Stabilizing constants from Wang et al. (2004).
const C1: f64 = (0.01 * DYNAMIC_RANGE) * (0.01 * DYNAMIC_RANGE);
const C2: f64 = (0.03 * DYNAMIC_RANGE) * (0.03 * DYNAMIC_RANGE);

/// Incremental luminance statistics for one tile.
///
/// Means and variances follow Welford's running update, which keeps the
/// accumulation numerically stable without a second pass over the tile.
/// The covariance keeps a raw product sum instead and is corrected by the
/// final means when the tile is folded, so `ssim` consumes the value.
#[derive(Debug, Default)]
pub(crate) struct BlockStats {
    n: u32,
    avg_x: f64,
    avg_y: f64,
    var_x: f64,
    var_y: f64,
    covar: f64,
}

impl BlockStats {
    /// Feed one pixel pair's luminances into the running stats.
    pub(crate) fn push(&mut self, lum_x: f64, lum_y: f64) {
        self.n += 1;
        let n = f64::from(self.n);
        let delta_x = lum_x - self.avg_x;
        let delta_y = lum_y - self.avg_y;
        self.avg_x += delta_x / n;
        self.avg_y += delta_y / n;
        self.var_x += delta_x * (lum_x - self.avg_x);
        self.var_y += delta_y * (lum_y - self.avg_y);
        self.covar += lum_x * lum_y;
    }

    /// Number of pixel pairs pushed so far.
    pub(crate) fn samples(&self) -> u32 {
        self.n
    }

    /// Structural similarity of the tile per Wang-Bovik-Sheikh-Simoncelli.
    ///
    /// Must not be called on an empty tile.
    pub(crate) fn ssim(self) -> f64 {
        let n = f64::from(self.n);
        let var_x = self.var_x / n;
        let var_y = self.var_y / n;
        let covar = self.covar / n - self.avg_x * self.avg_y;

        ((2.0 * self.avg_x * self.avg_y + C1) * (2.0 * covar + C2))
            / ((self.avg_x * self.avg_x + self.avg_y * self.avg_y + C1) * (var_x + var_y + C2))
    }
}

/// Whole-image running totals for one comparison.
#[derive(Debug, Default)]
pub(crate) struct DiffTotals {
    /// Pixels whose full RGBA values differ.
    pub(crate) incorrect_pixels: u64,
    /// Summed squared unit-space error per color channel.
    pub(crate) disparity: [f64; 3],
    /// Sum of per-tile SSIM contributions.
    pub(crate) ssim_sum: f64,
    /// Pixels visited by the tile pass. This, not the full image area,
    /// normalizes the MSE.
    pub(crate) sampled_pixels: u64,
    /// Tiles folded so far. Normalizes the SSIM.
    pub(crate) tiles: u64,
}

impl DiffTotals {
    /// Account one mismatching pixel and its squared channel error.
    pub(crate) fn record_mismatch(&mut self, squared_diff: [f64; 3]) {
        self.incorrect_pixels += 1;
        self.disparity[0] += squared_diff[0];
        self.disparity[1] += squared_diff[1];
        self.disparity[2] += squared_diff[2];
    }

    /// Fold one finished tile into the totals.
    pub(crate) fn fold_tile(&mut self, block: BlockStats) {
        self.sampled_pixels += u64::from(block.samples());
        self.tiles += 1;
        self.ssim_sum += block.ssim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-pass reference implementation the incremental form must agree
    /// with.
    fn naive_ssim(xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len() as f64;
        let avg_x = xs.iter().sum::<f64>() / n;
        let avg_y = ys.iter().sum::<f64>() / n;
        let var_x = xs.iter().map(|x| (x - avg_x) * (x - avg_x)).sum::<f64>() / n;
        let var_y = ys.iter().map(|y| (y - avg_y) * (y - avg_y)).sum::<f64>() / n;
        let covar = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (x - avg_x) * (y - avg_y))
            .sum::<f64>()
            / n;
        ((2.0 * avg_x * avg_y + C1) * (2.0 * covar + C2))
            / ((avg_x * avg_x + avg_y * avg_y + C1) * (var_x + var_y + C2))
    }

    fn pushed(xs: &[f64], ys: &[f64]) -> BlockStats {
        let mut block = BlockStats::default();
        for (&x, &y) in xs.iter().zip(ys) {
            block.push(x, y);
        }
        block
    }

    // -- block statistics --

    #[test]
    fn identical_constant_block_scores_unity() {
        let data = [0.5; 64];
        assert_eq!(pushed(&data, &data).ssim(), 1.0);
    }

    #[test]
    fn identical_varied_block_scores_near_unity() {
        let xs: Vec<f64> = (0..64).map(|i| f64::from((i * 37 + 5) % 256) / 255.0).collect();
        let ssim = pushed(&xs, &xs).ssim();
        assert!((ssim - 1.0).abs() < 1e-9, "ssim = {ssim}");
    }

    #[test]
    fn incremental_matches_two_pass_reference() {
        let xs: Vec<f64> = (0..64).map(|i| f64::from((i * 37 + 5) % 256) / 255.0).collect();
        let ys: Vec<f64> = (0..64).map(|i| f64::from((i * 53 + 11) % 256) / 255.0).collect();
        let incremental = pushed(&xs, &ys).ssim();
        let reference = naive_ssim(&xs, &ys);
        assert!(
            (incremental - reference).abs() < 1e-10,
            "incremental = {incremental}, reference = {reference}"
        );
    }

    #[test]
    fn anticorrelated_block_scores_negative() {
        let xs: Vec<f64> = (0..64).map(|i| f64::from(i % 2)).collect();
        let ys: Vec<f64> = (0..64).map(|i| f64::from((i + 1) % 2)).collect();
        let ssim = pushed(&xs, &ys).ssim();
        assert!(ssim < 0.0, "ssim = {ssim}");
        assert!(ssim >= -1.0, "ssim = {ssim}");
    }

    #[test]
    fn sample_count_tracks_pushes() {
        let mut block = BlockStats::default();
        assert_eq!(block.samples(), 0);
        block.push(0.1, 0.9);
        block.push(0.4, 0.6);
        assert_eq!(block.samples(), 2);
    }

    // -- totals --

    #[test]
    fn mismatches_accumulate_disparity() {
        let mut totals = DiffTotals::default();
        totals.record_mismatch([1.0, 0.0, 0.25]);
        totals.record_mismatch([0.5, 0.0, 0.25]);
        assert_eq!(totals.incorrect_pixels, 2);
        assert_eq!(totals.disparity, [1.5, 0.0, 0.5]);
    }

    #[test]
    fn folding_tiles_counts_samples_and_tiles() {
        let mut totals = DiffTotals::default();
        totals.fold_tile(pushed(&[0.5; 64], &[0.5; 64]));
        totals.fold_tile(pushed(&[0.25; 16], &[0.25; 16]));
        assert_eq!(totals.tiles, 2);
        assert_eq!(totals.sampled_pixels, 80);
        assert_eq!(totals.ssim_sum, 2.0);
    }
}
