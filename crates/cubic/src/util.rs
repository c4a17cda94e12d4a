//! Small helpers shared by the two cache layouts.

/// Index of the first finite minimum.
pub(crate) fn first_min(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Candidate costs with a maintained arg-min.
///
/// Non-finite entries mark invalid candidates and are never the minimum.
/// Ties go to the lowest position.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Candidates {
    values: Vec<f64>,
    best: Option<usize>,
}

impl Candidates {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        let best = first_min(values.iter().copied());
        Self { values, best }
    }

    #[inline]
    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub(crate) fn best(&self) -> Option<usize> {
        self.best
    }

    #[inline]
    pub(crate) fn min(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |b| self.values[b])
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> f64 {
        self.values[pos]
    }

    pub(crate) fn set(&mut self, pos: usize, value: f64) {
        let old = std::mem::replace(&mut self.values[pos], value);
        match self.best {
            None => {
                if value.is_finite() {
                    self.best = Some(pos);
                }
            }
            Some(b) if b == pos => {
                if value > old {
                    self.rescan();
                }
            }
            Some(b) => {
                let current = self.values[b];
                if value < current || (value == current && pos < b) {
                    self.best = Some(pos);
                }
            }
        }
    }

    pub(crate) fn remove(&mut self, pos: usize) {
        self.values.remove(pos);
        match self.best {
            Some(b) if b == pos => self.rescan(),
            Some(b) if b > pos => self.best = Some(b - 1),
            _ => {}
        }
    }

    fn rescan(&mut self) {
        self.best = first_min(self.values.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_tracks_updates() {
        let mut d = Candidates::new(vec![3.0, 1.0, 1.0, 2.0]);
        assert_eq!(d.best(), Some(1));
        // tie with a lower position wins
        d.set(0, 1.0);
        assert_eq!(d.best(), Some(0));
        // raising the best forces a rescan
        d.set(0, 5.0);
        assert_eq!(d.best(), Some(1));
        // removing before the best shifts it
        d.remove(0);
        assert_eq!(d.best(), Some(0));
        assert_eq!(d.values(), &[1.0, 1.0, 2.0]);
        // removing the best rescans
        d.remove(0);
        assert_eq!(d.best(), Some(0));
        assert_eq!(d.min(), 1.0);
        d.remove(0);
        d.remove(0);
        assert_eq!(d.best(), None);
        assert_eq!(d.min(), f64::INFINITY);
    }

    #[test]
    fn invalid_entries_are_never_best() {
        let mut d = Candidates::new(vec![f64::INFINITY, f64::INFINITY]);
        assert_eq!(d.best(), None);
        d.set(1, 4.0);
        assert_eq!(d.best(), Some(1));
        d.set(0, 4.0);
        assert_eq!(d.best(), Some(0));
        d.set(0, f64::INFINITY);
        assert_eq!(d.best(), Some(1));
        d.set(1, f64::INFINITY);
        assert_eq!(d.best(), None);
        assert_eq!(first_min([f64::INFINITY, 2.0, 2.0].into_iter()), Some(1));
    }
}
