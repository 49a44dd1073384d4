//! A tournament-style hybrid whose global and chooser tables are indexed by
//! folded path history.
//!
//! Folding XOR-compresses the whole history register into a table-width
//! signal, so a register wider than the table index still informs the
//! lookup instead of losing its high bits to truncation. The global index
//! additionally mixes in the branch's own PC bits, giving each branch its
//! own view of the path context.

use crate::branch::Outcome;
use crate::history::{HistoryRegister, HISTORY_WIDTH};
use crate::predictor::table::{CounterTable, LocalHistoryTable};
use crate::predictor::{
    check_history_bits, check_index_bits, DirectionPredictor, PredictorError, StatefulPredictor,
};

/// Configuration for building a [`CustomPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct CustomConfig {
    /// Index width of the global counter table and the fold window for the
    /// global/chooser indices.
    pub path_history_bits: usize,

    /// Index width of the chooser table.
    pub chooser_bits: usize,

    /// Index width of the local counter table; also the number of history
    /// bits kept per branch.
    pub lhistory_bits: usize,

    /// Number of PC bits used to index the local history table.
    pub pc_index_bits: usize,

    /// Storage width of the path history register. Folding consumes
    /// `history_bits / n` windows, so widths beyond the table index are
    /// what give this scheme its longer effective history.
    pub history_bits: usize,
}

impl Default for CustomConfig {
    fn default() -> Self {
        Self {
            path_history_bits: 15,
            chooser_bits: 15,
            lhistory_bits: 15,
            pc_index_bits: 12,
            history_bits: HISTORY_WIDTH,
        }
    }
}

impl CustomConfig {
    /// Get the number of table storage bits.
    pub fn storage_bits(&self) -> usize {
        let counters = 2 * ((1 << self.lhistory_bits)
            + (1 << self.path_history_bits)
            + (1 << self.chooser_bits));
        let histories = self.lhistory_bits * (1 << self.pc_index_bits);
        counters + histories + self.history_bits
    }

    /// Use this configuration to create a new [`CustomPredictor`].
    pub fn build(self) -> Result<CustomPredictor, PredictorError> {
        check_index_bits("path_history_bits", self.path_history_bits)?;
        check_index_bits("chooser_bits", self.chooser_bits)?;
        check_index_bits("lhistory_bits", self.lhistory_bits)?;
        check_index_bits("pc_index_bits", self.pc_index_bits)?;
        check_history_bits("history_bits", self.history_bits)?;
        Ok(CustomPredictor {
            local_bht: CounterTable::new(self.lhistory_bits),
            lht: LocalHistoryTable::new(self.pc_index_bits),
            global_bht: CounterTable::new(self.path_history_bits),
            chooser: CounterTable::new(self.chooser_bits),
            path_history: HistoryRegister::new(self.history_bits),
            cfg: self,
        })
    }
}

/// The custom hybrid: tournament table shape, folded-history indexing.
pub struct CustomPredictor {
    /// The configuration used to create this object
    pub cfg: CustomConfig,

    /// Local counter table, indexed by a branch's own history pattern
    pub local_bht: CounterTable,

    /// Per-branch history registers, indexed by truncated PC
    pub lht: LocalHistoryTable,

    /// Global counter table, indexed by PC XOR folded path history
    pub global_bht: CounterTable,

    /// Chooser table: taken means trust the local side
    pub chooser: CounterTable,

    /// Path history register feeding both folds
    pub path_history: HistoryRegister,
}

impl CustomPredictor {
    /// Index of this branch's entry in the local history table.
    fn lht_index(&self, pc: u32) -> usize {
        pc as usize & self.lht.index_mask()
    }

    /// Index into the local counter table: the branch's stored history
    /// pattern, masked to the local table's width.
    fn local_index(&self, pc: u32) -> usize {
        self.lht.entry(self.lht_index(pc)) as usize & self.local_bht.index_mask()
    }

    /// Path history folded down to the global table's width.
    fn path_folded(&self) -> usize {
        self.path_history.fold(self.cfg.path_history_bits) as usize
    }

    /// Chooser fold. The seed is the path history masked by the *global*
    /// table's width, with chooser-width windows XOR'ed in after it (see
    /// DESIGN.md on this preserved quirk).
    fn chooser_folded(&self) -> usize {
        let seed = self.path_history.low_bits(self.cfg.path_history_bits);
        self.path_history.fold_into(seed, self.cfg.chooser_bits) as usize
    }

    /// Index into the chooser table.
    fn chooser_index(&self) -> usize {
        self.chooser_folded() & self.chooser.index_mask()
    }

    /// Index into the global counter table: the branch's own PC bits XOR'ed
    /// with the folded path history.
    fn global_index(&self, pc: u32) -> usize {
        let pc_lower = pc as usize & self.global_bht.index_mask();
        pc_lower ^ self.path_folded()
    }
}

impl DirectionPredictor for CustomPredictor {
    fn name(&self) -> &'static str { "Custom" }

    fn reset(&mut self) {
        self.local_bht.reset();
        self.lht.reset();
        self.global_bht.reset();
        self.chooser.reset();
        self.path_history.clear();
    }

    fn predict(&self, pc: u32) -> Outcome {
        match self.chooser.entry(self.chooser_index()).predict() {
            Outcome::T => self.local_bht.entry(self.local_index(pc)).predict(),
            Outcome::N => self.global_bht.entry(self.global_index(pc)).predict(),
        }
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let lht_index = self.lht_index(pc);
        let local_index = self.local_index(pc);
        let global_index = self.global_index(pc);
        let path_folded = self.path_folded();
        let chooser_index = self.chooser_index();

        let local_dir = self.local_bht.entry(local_index).predict();
        let global_dir = self.global_bht.entry(global_index).predict();

        // Chooser reward as in the tournament scheme. The write index is the
        // folded path history, while the read above used the chooser fold
        // (see DESIGN.md on this preserved asymmetry).
        if local_dir != global_dir {
            let reward = if outcome == local_dir { Outcome::T } else { Outcome::N };
            let mut ctr = *self.chooser.entry(chooser_index);
            ctr.update(reward);
            *self.chooser.entry_mut(path_folded) = ctr;
        }

        self.local_bht.entry_mut(local_index).update(outcome);
        self.global_bht.entry_mut(global_index).update(outcome);

        self.path_history.shift_in(outcome);
        // The stored pattern shifts the already-masked index value, not the
        // raw prior history (see DESIGN.md).
        self.lht
            .set_entry(lht_index, ((local_index as u32) << 1) | outcome as u32);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::predictor::counter::SaturatingCounter;

    fn custom(path: usize, chooser: usize, history: usize) -> CustomPredictor {
        CustomConfig {
            path_history_bits: path,
            chooser_bits: chooser,
            lhistory_bits: 5,
            pc_index_bits: 4,
            history_bits: history,
        }
        .build()
        .unwrap()
    }

    fn shift_bits(p: &mut CustomPredictor, bits: &[u32]) {
        for bit in bits {
            p.path_history.shift_in(Outcome::from_bool(*bit == 1));
        }
    }

    // When the register is exactly one fold window wide, folding is plain
    // masking and the indices collapse to tournament-style masked lookups.
    #[test]
    fn folding_degenerates_at_full_width() {
        let mut p = custom(8, 8, 8);
        shift_bits(&mut p, &[1, 1, 0, 1, 0, 0, 1, 1, 0, 1]);

        let low = p.path_history.low_bits(8) as usize;
        assert_eq!(p.path_folded(), low);
        assert_eq!(p.chooser_index(), low);
        assert_eq!(p.global_index(0b1010_1010), 0b1010_1010 ^ low);
    }

    // A wider register folds its high windows into the index.
    #[test]
    fn folding_mixes_high_windows() {
        let mut p = custom(4, 4, 16);
        shift_bits(&mut p, &[1, 0, 0, 1, 1, 1, 0, 1, 0, 0, 1, 0]);
        // raw = 0b1001_1101_0010: 4-bit windows 0b0010, 0b1101, 0b1001.
        assert_eq!(p.path_history.raw(), 0b1001_1101_0010);
        assert_eq!(p.path_folded(), 0b0010 ^ 0b1101 ^ 0b1001);
    }

    // Predict and train agree on the folded indices for the same history.
    #[test]
    fn train_updates_the_entry_predict_reads() {
        let mut p = custom(6, 6, 64);
        shift_bits(&mut p, &[1, 1, 0, 1, 0, 1, 1, 0]);

        let pc = 0x0000_0fd3;
        let index = p.global_index(pc);
        p.train(pc, Outcome::T);
        assert_eq!(*p.global_bht.entry(index), SaturatingCounter::WeakTaken);
    }

    // With distinct chooser and path widths the chooser's read and write
    // indices diverge; the write lands at the folded path index.
    #[test]
    fn chooser_write_uses_the_path_fold() {
        let mut p = custom(6, 4, 64);
        shift_bits(&mut p, &[1, 1, 0, 0, 1, 0]);
        assert_eq!(p.path_history.raw(), 0b110010);

        let read_index = p.chooser_index();
        let write_index = p.path_folded() & p.chooser.index_mask();
        assert_eq!(read_index, 1);
        assert_eq!(write_index, 2);

        // Make the two sides disagree with the local side correct.
        p.local_bht.entry_mut(0).update(Outcome::T);
        p.train(0, Outcome::T);

        assert_eq!(*p.chooser.entry(write_index), SaturatingCounter::WeakTaken);
        assert_eq!(*p.chooser.entry(read_index), SaturatingCounter::WeakNotTaken);
    }

    #[test]
    fn training_advances_both_histories() {
        let mut p = custom(6, 6, 64);
        p.train(0b0111, Outcome::T);
        assert_eq!(p.path_history.raw(), 0b1);
        assert_eq!(p.lht.entry(0b0111), 0b1);
    }
}
