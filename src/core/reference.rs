use crate::core::range::Range;

/// A (usually long) sequence to search, together with the ranges to search in
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Name reported in the `Ref` output column
    pub name: String,

    /// Upper-case nucleotide sequence
    pub sequence: Vec<u8>,

    /// Candidate search ranges, possibly unresolved (see [`Range::resolve`])
    pub ranges: Vec<Range>,
}

impl Reference {
    /// Create a reference searched over its whole length
    pub fn new(name: impl Into<String>, sequence: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            sequence,
            ranges: vec![Range::full()],
        }
    }

    #[must_use]
    pub fn with_ranges(mut self, ranges: Vec<Range>) -> Self {
        self.ranges = ranges;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_full() {
        let r = Reference::new("read1", b"ACGTACGT".to_vec());
        assert_eq!(r.ranges, vec![Range::full()]);
        assert_eq!(r.ranges[0].resolve(r.len()), Range::new(0.0, 8.0));
    }

    #[test]
    fn test_with_ranges() {
        let r = Reference::new("read1", b"ACGT".to_vec())
            .with_ranges(vec![Range::new(0.0, 2.0), Range::new(-2.0, f64::NAN)]);
        assert_eq!(r.ranges.len(), 2);
    }
}
