//! Implementation of a two-bit saturating counter.

use crate::branch::Outcome;
use crate::predictor::StatefulPredictor;

/// A two-bit saturating counter used to follow the behavior of a branch.
///
/// The four states encode a predicted direction with hysteresis: the two
/// "strong" states must see two contrary outcomes before the predicted
/// direction flips. Tables allocate counters in the weak not-taken state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaturatingCounter {
    StrongNotTaken,
    WeakNotTaken,
    WeakTaken,
    StrongTaken,
}

impl Default for SaturatingCounter {
    fn default() -> Self {
        Self::WeakNotTaken
    }
}

impl StatefulPredictor for SaturatingCounter {
    fn name(&self) -> &'static str { "SaturatingCounter" }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn predict(&self) -> Outcome {
        match self {
            Self::StrongNotTaken | Self::WeakNotTaken => Outcome::N,
            Self::WeakTaken | Self::StrongTaken => Outcome::T,
        }
    }

    /// Move one step toward the observed outcome, saturating at the extremes.
    fn update(&mut self, outcome: Outcome) {
        use SaturatingCounter::*;
        *self = match (*self, outcome) {
            (StrongNotTaken, Outcome::T) => WeakNotTaken,
            (WeakNotTaken, Outcome::T) => WeakTaken,
            (WeakTaken, Outcome::T) => StrongTaken,
            (StrongTaken, Outcome::T) => StrongTaken,

            (StrongTaken, Outcome::N) => WeakTaken,
            (WeakTaken, Outcome::N) => WeakNotTaken,
            (WeakNotTaken, Outcome::N) => StrongNotTaken,
            (StrongNotTaken, Outcome::N) => StrongNotTaken,
        };
    }
}

#[cfg(test)]
mod test {
    use super::SaturatingCounter::*;
    use super::*;

    #[test]
    fn saturates_at_both_extremes() {
        let mut ctr = StrongTaken;
        ctr.update(Outcome::T);
        assert_eq!(ctr, StrongTaken);

        let mut ctr = StrongNotTaken;
        ctr.update(Outcome::N);
        assert_eq!(ctr, StrongNotTaken);
    }

    #[test]
    fn moves_one_step_per_update() {
        let mut ctr = SaturatingCounter::default();
        assert_eq!(ctr, WeakNotTaken);
        ctr.update(Outcome::T);
        assert_eq!(ctr, WeakTaken);
        ctr.update(Outcome::T);
        assert_eq!(ctr, StrongTaken);
        ctr.update(Outcome::N);
        assert_eq!(ctr, WeakTaken);
        ctr.update(Outcome::N);
        assert_eq!(ctr, WeakNotTaken);
        ctr.update(Outcome::N);
        assert_eq!(ctr, StrongNotTaken);
    }

    #[test]
    fn direction_tracks_state() {
        assert_eq!(StrongNotTaken.predict(), Outcome::N);
        assert_eq!(WeakNotTaken.predict(), Outcome::N);
        assert_eq!(WeakTaken.predict(), Outcome::T);
        assert_eq!(StrongTaken.predict(), Outcome::T);
    }
}
