//! Index-based range selection over the value sequence.

use core::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::Error;

/// A start/stop/step specification addressing a run of positions.
///
/// Resolution clamps out-of-range bounds. One deliberate quirk is carried
/// from the historical behavior: an open start with a bounded stop `n`
/// selects the single position `n`, not the prefix up to `n`. Spell the
/// prefix as an explicit `0..n` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    start: Option<usize>,
    stop: Option<usize>,
    step: usize,
}

impl Selector {
    pub fn new(start: Option<usize>, stop: Option<usize>) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// Replace the step (default 1). A zero step is rejected at resolution.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Concrete positions selected in a sequence of `len` elements.
    pub fn positions(&self, len: usize) -> Result<Vec<usize>, Error> {
        if self.step == 0 {
            return Err(Error::TypeMismatch("selector step must be non-zero".into()));
        }
        let (start, stop) = match (self.start, self.stop) {
            // Open start with a bounded stop addresses that single position.
            (None, Some(n)) => (n, n.saturating_add(1)),
            (start, stop) => (start.unwrap_or(0), stop.unwrap_or(len)),
        };
        let stop = stop.min(len);
        if start >= stop {
            return Ok(Vec::new());
        }
        Ok((start..stop).step_by(self.step).collect())
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::new(Some(r.start), Some(r.end))
    }
}

impl From<RangeTo<usize>> for Selector {
    fn from(r: RangeTo<usize>) -> Self {
        Selector::new(None, Some(r.end))
    }
}

impl From<RangeFrom<usize>> for Selector {
    fn from(r: RangeFrom<usize>) -> Self {
        Selector::new(Some(r.start), None)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::new(None, None)
    }
}

/// A single position or a span, for key/value swapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    At(usize),
    Span(Selector),
}

impl From<usize> for Place {
    fn from(i: usize) -> Self {
        Place::At(i)
    }
}

impl From<Selector> for Place {
    fn from(selector: Selector) -> Self {
        Place::Span(selector)
    }
}

impl From<Range<usize>> for Place {
    fn from(r: Range<usize>) -> Self {
        Place::Span(r.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a bounded range resolves to its half-open positions.
    #[test]
    fn bounded_range() {
        let sel: Selector = (1..3).into();
        assert_eq!(sel.positions(5).unwrap(), vec![1, 2]);
    }

    /// Invariant: an open start with a bounded stop selects the single
    /// position at the stop.
    #[test]
    fn open_start_selects_single_position() {
        let sel: Selector = (..2).into();
        assert_eq!(sel.positions(4).unwrap(), vec![2]);
    }

    /// Invariant: a fully open selector covers every position; an open
    /// stop runs to the end.
    #[test]
    fn open_selectors() {
        let sel: Selector = (..).into();
        assert_eq!(sel.positions(3).unwrap(), vec![0, 1, 2]);
        let sel: Selector = (1..).into();
        assert_eq!(sel.positions(3).unwrap(), vec![1, 2]);
    }

    /// Invariant: out-of-range bounds clamp instead of failing.
    #[test]
    fn clamping() {
        let sel: Selector = (2..99).into();
        assert_eq!(sel.positions(4).unwrap(), vec![2, 3]);
        let sel: Selector = (7..9).into();
        assert!(sel.positions(4).unwrap().is_empty());
    }

    /// Invariant: a step strides the selection; zero steps are rejected.
    #[test]
    fn stepping() {
        let sel = Selector::from(0..5).with_step(2);
        assert_eq!(sel.positions(5).unwrap(), vec![0, 2, 4]);
        let sel = Selector::from(0..5).with_step(0);
        assert!(matches!(sel.positions(5), Err(Error::TypeMismatch(_))));
    }
}
