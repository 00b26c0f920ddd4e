use std::collections::VecDeque;

/// Rolling history of readings backing the chart.
///
/// Insertion order is chronological order.  The buffer never holds more than
/// `capacity` samples; appending at capacity evicts the oldest one.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples:  VecDeque<f32>,
    capacity: usize,
    /// Fixed lower y bound; `None` auto-ranges from the contents.
    y_min:    Option<f32>,
    /// Fixed upper y bound; `None` auto-ranges from the contents.
    y_max:    Option<f32>,
}

impl HistoryBuffer {
    /// Fully auto-ranged buffer.
    pub fn new(capacity: usize) -> Self {
        Self::with_bounds(capacity, None, None)
    }

    pub fn with_bounds(capacity: usize, y_min: Option<f32>, y_max: Option<f32>) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
            y_min,
            y_max,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn append(&mut self, value: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Replace the contents with `values`, keeping only the most recent
    /// `capacity` of them.
    pub fn replace_all<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = f32>,
    {
        self.samples.clear();
        for v in values {
            self.append(v);
        }
    }

    /// Vertical range for the chart.
    ///
    /// Fixed edges are returned as configured.  Auto edges follow the data;
    /// on an empty buffer they report `0.0`, so a fully auto-ranged empty
    /// buffer yields `(0.0, 0.0)`.
    #[must_use]
    pub fn y_range(&self) -> (f32, f32) {
        let (lo, hi) = if self.samples.is_empty() {
            (0.0, 0.0)
        } else {
            self.samples
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        (self.y_min.unwrap_or(lo), self.y_max.unwrap_or(hi))
    }

    /// Change the fixed bounds (config reload).  Contents are untouched.
    pub fn set_bounds(&mut self, y_min: Option<f32>, y_max: Option<f32>) {
        self.y_min = y_min;
        self.y_max = y_max;
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn append_evicts_oldest() {
        let mut buf = HistoryBuffer::new(3);
        for v in [5.0, 6.0, 7.0, 8.0] {
            buf.append(v);
        }
        assert_eq!(buf.to_vec(), vec![6.0, 7.0, 8.0]);
        assert_eq!(buf.latest(), Some(8.0));
    }

    #[test]
    fn replace_all_keeps_tail() {
        let mut buf = HistoryBuffer::new(3);
        buf.replace_all([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buf.to_vec(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn replace_all_then_append() {
        let mut buf = HistoryBuffer::new(3);
        buf.replace_all([1.0, 2.0, 3.0, 4.0]);
        buf.append(9.0);
        assert_eq!(buf.to_vec(), vec![3.0, 4.0, 9.0]);
    }

    #[test]
    fn replace_all_empty_clears() {
        let mut buf = HistoryBuffer::new(3);
        buf.append(1.0);
        buf.replace_all(Vec::new());
        assert!(buf.is_empty());
        assert_eq!(buf.y_range(), (0.0, 0.0));
    }

    #[test]
    fn y_range_auto_follows_data() {
        let mut buf = HistoryBuffer::new(10);
        buf.replace_all([21.5, 19.0, 23.25]);
        assert_eq!(buf.y_range(), (19.0, 23.25));
    }

    #[test]
    fn y_range_fixed_ignores_data() {
        let mut buf = HistoryBuffer::with_bounds(10, Some(0.0), Some(40.0));
        buf.append(55.0);
        assert_eq!(buf.y_range(), (0.0, 40.0));
    }

    #[test]
    fn y_range_mixed_edges() {
        let mut buf = HistoryBuffer::with_bounds(10, Some(0.0), None);
        assert_eq!(buf.y_range(), (0.0, 0.0));
        buf.replace_all([12.0, 30.0]);
        assert_eq!(buf.y_range(), (0.0, 30.0));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut buf = HistoryBuffer::new(0);
        buf.append(1.0);
        buf.replace_all([1.0, 2.0]);
        assert!(buf.is_empty());
    }

    proptest! {
        #[test]
        fn holds_last_capacity_values(
            cap in 1usize..20,
            values in proptest::collection::vec(-100.0f32..100.0, 0..100),
        ) {
            let mut buf = HistoryBuffer::new(cap);
            for (i, v) in values.iter().enumerate() {
                buf.append(*v);
                prop_assert!(buf.len() <= cap);
                prop_assert_eq!(buf.len(), (i + 1).min(cap));
            }
            let start = values.len().saturating_sub(cap);
            prop_assert_eq!(buf.to_vec(), values[start..].to_vec());
        }

        #[test]
        fn replace_then_append_is_tail_plus_value(
            cap in 1usize..20,
            values in proptest::collection::vec(-100.0f32..100.0, 0..60),
            v in -100.0f32..100.0,
        ) {
            let mut buf = HistoryBuffer::new(cap);
            buf.replace_all(values.clone());
            buf.append(v);

            let keep = cap - 1;
            let mut expected = values[values.len().saturating_sub(keep)..].to_vec();
            expected.push(v);
            prop_assert_eq!(buf.to_vec(), expected);
        }
    }
}
