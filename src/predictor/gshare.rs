//! A single-table predictor indexed by PC XOR global history (gshare).

use crate::branch::Outcome;
use crate::history::{HistoryRegister, HISTORY_WIDTH};
use crate::predictor::table::CounterTable;
use crate::predictor::{check_index_bits, DirectionPredictor, PredictorError, StatefulPredictor};

/// Configuration for building a [`GsharePredictor`].
#[derive(Clone, Copy, Debug)]
pub struct GshareConfig {
    /// Number of global history bits; the table index width, by construction.
    pub ghistory_bits: usize,
}

impl Default for GshareConfig {
    fn default() -> Self {
        Self { ghistory_bits: 17 }
    }
}

impl GshareConfig {
    /// Get the number of table storage bits.
    pub fn storage_bits(&self) -> usize {
        2 * (1 << self.ghistory_bits)
    }

    /// Use this configuration to create a new [`GsharePredictor`].
    pub fn build(self) -> Result<GsharePredictor, PredictorError> {
        check_index_bits("ghistory_bits", self.ghistory_bits)?;
        Ok(GsharePredictor {
            bht: CounterTable::new(self.ghistory_bits),
            ghistory: HistoryRegister::new(HISTORY_WIDTH),
            cfg: self,
        })
    }
}

/// A predictor with one table of counters shared by all branches, indexed
/// by the XOR of the branch address and the global outcome history.
pub struct GsharePredictor {
    /// The configuration used to create this object
    pub cfg: GshareConfig,

    /// Branch history table
    pub bht: CounterTable,

    /// Global history register
    pub ghistory: HistoryRegister,
}

impl GsharePredictor {
    /// Index of the counter for a branch: the low history bits XOR'ed into
    /// the low PC bits. Predict and train must agree on this value for the
    /// same (pc, history) pair.
    fn index(&self, pc: u32) -> usize {
        let mask = self.bht.index_mask();
        let pc_lower = pc as usize & mask;
        let ghistory_lower = self.ghistory.raw() as usize & mask;
        pc_lower ^ ghistory_lower
    }
}

impl DirectionPredictor for GsharePredictor {
    fn name(&self) -> &'static str { "Gshare" }

    fn reset(&mut self) {
        self.bht.reset();
        self.ghistory.clear();
    }

    fn predict(&self, pc: u32) -> Outcome {
        self.bht.entry(self.index(pc)).predict()
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let index = self.index(pc);
        self.bht.entry_mut(index).update(outcome);
        self.ghistory.shift_in(outcome);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::predictor::counter::SaturatingCounter;

    fn gshare(bits: usize) -> GsharePredictor {
        GshareConfig { ghistory_bits: bits }.build().unwrap()
    }

    // With two history bits: the first lookup of pc 0b1010 lands on entry 2
    // (history is empty), and after one taken outcome the same pc lands on
    // entry 3. The index tracks the evolving history, not just the PC.
    #[test]
    fn index_follows_the_history() {
        let mut p = gshare(2);
        assert_eq!(p.predict(0b1010), Outcome::N);
        assert_eq!(p.index(0b1010), 2);

        p.train(0b1010, Outcome::T);
        assert_eq!(*p.bht.entry(2), SaturatingCounter::WeakTaken);
        assert_eq!(p.ghistory.raw(), 0b1);

        assert_eq!(p.index(0b1010), 3);
        assert_eq!(p.predict(0b1010), Outcome::N);
        assert_eq!(*p.bht.entry(3), SaturatingCounter::WeakNotTaken);
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let mut a = gshare(6);
        let mut b = gshare(6);
        let mut pc: u32 = 0x40_0000;
        for step in 0..4096u32 {
            pc = pc.wrapping_mul(0x9e37_79b9).wrapping_add(step);
            let outcome = Outcome::from_bool(step % 3 != 0);
            assert_eq!(a.predict(pc), b.predict(pc));
            a.train(pc, outcome);
            b.train(pc, outcome);
        }
        assert_eq!(a.bht.entries(), b.bht.entries());
        assert_eq!(a.ghistory.raw(), b.ghistory.raw());
    }

    // Saturating the history with far more than 2^G outcomes never pushes
    // an index out of the table.
    #[test]
    fn indices_stay_in_range() {
        let mut p = gshare(4);
        for step in 0..1000u32 {
            let pc = step.wrapping_mul(0xdead_beef);
            assert!(p.index(pc) < p.bht.size());
            p.train(pc, Outcome::from_bool(step % 2 == 0));
        }
        assert!(p.index(u32::MAX) < p.bht.size());
    }
}
