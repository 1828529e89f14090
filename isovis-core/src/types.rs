use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 1-based, closed genomic coordinate.
pub type GenomicPos = i64;

/// A pair of genomic coordinates. Serialized as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[GenomicPos; 2]", into = "[GenomicPos; 2]")]
pub struct Interval {
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl Interval {
    pub fn new(start: GenomicPos, end: GenomicPos) -> Self {
        Self { start, end }
    }

    /// Same interval with endpoints in ascending order.
    pub fn normalized(&self) -> Self {
        Self {
            start: self.start.min(self.end),
            end: self.start.max(self.end),
        }
    }

    pub fn length(&self) -> GenomicPos {
        (self.end - self.start).abs()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Strict overlap: intervals that only touch do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Union of two overlapping intervals, `None` if they do not overlap.
    pub fn union(&self, other: &Interval) -> Option<Interval> {
        if self.overlaps(other) {
            Some(Interval {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            })
        } else {
            None
        }
    }

    /// Closed-interval intersection. Single-point intersections count as empty.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if other.end < self.start || other.start > self.end {
            return None;
        }

        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start == end {
            None
        } else {
            Some(Interval { start, end })
        }
    }

    /// `other` lies entirely within `self` (endpoints may coincide).
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// `pos` lies strictly between the endpoints.
    pub fn strictly_contains(&self, pos: GenomicPos) -> bool {
        self.start < pos && pos < self.end
    }

    /// Position lies within the closed interval.
    pub fn covers(&self, pos: GenomicPos) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl From<[GenomicPos; 2]> for Interval {
    fn from(pair: [GenomicPos; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Interval> for [GenomicPos; 2] {
    fn from(interval: Interval) -> Self {
        [interval.start, interval.end]
    }
}

impl From<(GenomicPos, GenomicPos)> for Interval {
    fn from((start, end): (GenomicPos, GenomicPos)) -> Self {
        Self::new(start, end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "+" => Some(Strand::Forward),
            "-" => Some(Strand::Reverse),
            _ => None,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Strand::Forward)
    }

    pub fn flipped(&self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }
}

impl From<bool> for Strand {
    fn from(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// Set of intervals keyed on `(start, end)` that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct IntervalSet {
    members: HashSet<Interval>,
    order: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the interval was not already present.
    pub fn insert(&mut self, interval: Interval) -> bool {
        if self.members.insert(interval) {
            self.order.push(interval);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, interval: &Interval) -> bool {
        self.members.contains(interval)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.order.iter()
    }

    pub fn into_vec(self) -> Vec<Interval> {
        self.order
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for interval in iter {
            set.insert(interval);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
