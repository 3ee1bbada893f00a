#[inline]
fn to_f64(value: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        value as f64
    }
}

/// Accumulates sequence lengths and derives summary statistics
#[derive(Debug, Clone, Default)]
pub struct LengthStats {
    lengths: Vec<u64>,
    sum: u64,
    sorted: bool,
}

impl LengthStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, length: u64) {
        self.lengths.push(length);
        self.sum += length;
        self.sorted = false;
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.lengths.len() as u64
    }

    #[must_use]
    pub fn sum(&self) -> u64 {
        self.sum
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        self.lengths.iter().copied().min().unwrap_or(0)
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        to_f64(self.sum) / to_f64(self.count())
    }

    fn sort(&mut self) {
        if !self.sorted {
            self.lengths.sort_unstable();
            self.sorted = true;
        }
    }

    /// Lower, middle and upper quartile of the lengths.
    ///
    /// Q2 is the median; Q1 and Q3 are the medians of the lower and upper
    /// halves, the middle element excluded when the count is odd.
    pub fn quartiles(&mut self) -> (f64, f64, f64) {
        self.sort();
        let n = self.lengths.len();
        match n {
            0 => (0.0, 0.0, 0.0),
            1 => {
                let v = to_f64(self.lengths[0]);
                (v, v, v)
            }
            _ => {
                let half = n / 2;
                let upper_start = if n % 2 == 0 { half } else { half + 1 };
                (
                    median(&self.lengths[..half]),
                    median(&self.lengths),
                    median(&self.lengths[upper_start..]),
                )
            }
        }
    }

    /// Length `L` such that sequences of length `>= L` hold at least half of all bases
    pub fn n50(&mut self) -> u64 {
        self.n50_l50().0
    }

    /// Number of longest sequences needed to reach half of all bases
    pub fn l50(&mut self) -> usize {
        self.n50_l50().1
    }

    fn n50_l50(&mut self) -> (u64, usize) {
        self.sort();
        let mut acc = 0u64;
        for (i, &len) in self.lengths.iter().rev().enumerate() {
            acc += len;
            if acc * 2 >= self.sum {
                return (len, i + 1);
            }
        }
        (0, 0)
    }
}

/// Median of a sorted slice; 0 for an empty slice
fn median(sorted: &[u64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        to_f64(sorted[n / 2])
    } else {
        (to_f64(sorted[n / 2 - 1]) + to_f64(sorted[n / 2])) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(lengths: &[u64]) -> LengthStats {
        let mut stats = LengthStats::new();
        for &len in lengths {
            stats.add(len);
        }
        stats
    }

    #[test]
    fn test_basic_summary() {
        let s = stats(&[5, 1, 10, 4]);
        assert_eq!(s.count(), 4);
        assert_eq!(s.sum(), 20);
        assert_eq!(s.min(), 1);
        assert_eq!(s.max(), 10);
        assert!((s.mean() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty() {
        let mut s = LengthStats::new();
        assert_eq!(s.min(), 0);
        assert_eq!(s.max(), 0);
        assert!(s.mean().abs() < f64::EPSILON);
        assert_eq!(s.quartiles(), (0.0, 0.0, 0.0));
        assert_eq!(s.n50(), 0);
    }

    #[test]
    fn test_quartiles_even() {
        let mut s = stats(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(s.quartiles(), (2.5, 4.5, 6.5));
    }

    #[test]
    fn test_quartiles_odd() {
        let mut s = stats(&[9, 1, 5, 3, 7]);
        assert_eq!(s.quartiles(), (2.0, 5.0, 8.0));
    }

    #[test]
    fn test_single_length() {
        let mut s = stats(&[42]);
        assert_eq!(s.quartiles(), (42.0, 42.0, 42.0));
        assert_eq!(s.n50(), 42);
        assert_eq!(s.l50(), 1);
    }

    #[test]
    fn test_n50() {
        // total 100, longest-first cumulative: 40, 70 -> N50 = 30
        let mut s = stats(&[10, 40, 20, 30]);
        assert_eq!(s.n50(), 30);
        assert_eq!(s.l50(), 2);
    }
}
