//! Closed-form ordinary least squares over window-local indices.

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    /// Change in `y` per index step.
    pub slope: f64,
    /// Value of the line at local index 0.
    pub intercept: f64,
}

impl LineFit {
    /// Fits a least-squares line through `values`, using `0..values.len()` as x.
    ///
    /// Returns `None` when fewer than two points are given or the fit is
    /// degenerate.
    ///
    /// # Examples
    ///
    /// ```
    /// use stock_trend::trend::regression::LineFit;
    ///
    /// let fit = LineFit::fit(&[1.0, 3.0, 5.0]).unwrap();
    /// assert_eq!(fit.slope, 2.0);
    /// assert_eq!(fit.at(1.0), 3.0);
    /// ```
    pub fn fit(values: &[f64]) -> Option<Self> {
        let len = values.len();
        if len < 2 {
            return None;
        }

        let mut sum_x = 0.0_f64;
        let mut sum_y = 0.0_f64;
        let mut sum_xy = 0.0_f64;
        let mut sum_xx = 0.0_f64;
        for (j, &y) in values.iter().enumerate() {
            let x = j as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }

        let n = len as f64;
        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator == 0.0 {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        Some(Self { slope, intercept })
    }

    /// Evaluates the line at local index `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::LineFit;

    #[test]
    fn fit_requires_two_points() {
        assert!(LineFit::fit(&[]).is_none());
        assert!(LineFit::fit(&[4.0]).is_none());
    }

    #[test]
    fn two_points_give_exact_line() {
        let fit = LineFit::fit(&[4.0, 2.0]).expect("two points should fit");
        assert!((fit.slope + 2.0).abs() < 1e-12);
        assert!((fit.intercept - 4.0).abs() < 1e-12);
    }

    #[test]
    fn noisy_window_is_smoothed() {
        // y = [1, 5, 3]: slope 1, intercept 2, so the centre evaluates to 3.
        let fit = LineFit::fit(&[1.0, 5.0, 3.0]).expect("three points should fit");
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!((fit.at(1.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let fit = LineFit::fit(&[7.0, 7.0, 7.0]).expect("flat series should fit");
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.at(2.0), 7.0);
    }
}
