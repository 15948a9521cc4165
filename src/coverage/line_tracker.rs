//! Per-handle source-line accumulation and coalescing (spec §3 `LineSet`,
//! §4.2).

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// A small integer identifying one scoped block for line tracking (spec's
/// `handle`). Distinct per scope within a module; reused across modules
/// since `HandleCounter` resets at each new top-level module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u32);

/// Hands out strictly increasing handles, reset on every new top-level
/// module (spec §3 `HandleCounter`).
#[derive(Debug, Default)]
pub struct HandleCounter(u32);

impl HandleCounter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn next(&mut self) -> Handle {
        let h = self.0;
        self.0 += 1;
        Handle(h)
    }
}

/// Per-handle accumulated line numbers, plus coalescing into the
/// comma-separated range string the descriptor carries.
#[derive(Debug, Default)]
pub struct LineTracker {
    sets: BTreeMap<Handle, BTreeSet<u32>>,
}

impl LineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every line in `[first, last]` inclusive into `handle`'s set.
    pub fn record(&mut self, handle: Handle, first: u32, last: u32) {
        let set = self.sets.entry(handle).or_default();
        for line in first..=last {
            set.insert(line);
        }
    }

    /// Removes and coalesces `handle`'s line set. The set becomes garbage
    /// after this call, matching the spec's "consumed when the
    /// instrumentation descriptor is emitted" lifecycle.
    pub fn take_coalesced(&mut self, handle: Handle) -> String {
        let set = self.sets.remove(&handle).unwrap_or_default();
        coalesce(&set)
    }
}

/// Walks a sorted line set in ascending order, merging each line equal to
/// `last + 1` into the current run, and renders `"first-last"` (or
/// `"first"` if the run is a single line) joined by `","`. Empty sets yield
/// `""`.
pub fn coalesce(lines: &BTreeSet<u32>) -> String {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for &line in lines {
        match ranges.last_mut() {
            Some((_, last)) if *last + 1 == line => *last = line,
            _ => ranges.push((line, line)),
        }
    }
    ranges
        .into_iter()
        .map(|(first, last)| {
            if first == last {
                first.to_string()
            } else {
                format!("{}-{}", first, last)
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
