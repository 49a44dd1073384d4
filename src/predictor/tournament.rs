//! A hybrid local/global predictor arbitrated by a chooser table
//! ("tournament").

use crate::branch::Outcome;
use crate::history::{HistoryRegister, HISTORY_WIDTH};
use crate::predictor::table::{CounterTable, LocalHistoryTable};
use crate::predictor::{check_index_bits, DirectionPredictor, PredictorError, StatefulPredictor};

/// Configuration for building a [`TournamentPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TournamentConfig {
    /// Index width of the global counter table; also the number of path
    /// history bits it consumes.
    pub path_history_bits: usize,

    /// Index width of the chooser table.
    pub chooser_bits: usize,

    /// Index width of the local counter table; also the number of history
    /// bits kept per branch.
    pub lhistory_bits: usize,

    /// Number of PC bits used to index the local history table.
    pub pc_index_bits: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            path_history_bits: 15,
            chooser_bits: 15,
            lhistory_bits: 15,
            pc_index_bits: 12,
        }
    }
}

impl TournamentConfig {
    /// Get the number of table storage bits.
    pub fn storage_bits(&self) -> usize {
        let counters = 2 * ((1 << self.lhistory_bits)
            + (1 << self.path_history_bits)
            + (1 << self.chooser_bits));
        let histories = self.lhistory_bits * (1 << self.pc_index_bits);
        counters + histories
    }

    /// Use this configuration to create a new [`TournamentPredictor`].
    pub fn build(self) -> Result<TournamentPredictor, PredictorError> {
        check_index_bits("path_history_bits", self.path_history_bits)?;
        check_index_bits("chooser_bits", self.chooser_bits)?;
        check_index_bits("lhistory_bits", self.lhistory_bits)?;
        check_index_bits("pc_index_bits", self.pc_index_bits)?;
        Ok(TournamentPredictor {
            local_bht: CounterTable::new(self.lhistory_bits),
            lht: LocalHistoryTable::new(self.pc_index_bits),
            global_bht: CounterTable::new(self.path_history_bits),
            chooser: CounterTable::new(self.chooser_bits),
            path_history: HistoryRegister::new(HISTORY_WIDTH),
            cfg: self,
        })
    }
}

/// A hybrid predictor: a per-branch local side and a path-history global
/// side, with a chooser table tracking which side to trust.
pub struct TournamentPredictor {
    /// The configuration used to create this object
    pub cfg: TournamentConfig,

    /// Local counter table, indexed by a branch's own history pattern
    pub local_bht: CounterTable,

    /// Per-branch history registers, indexed by truncated PC
    pub lht: LocalHistoryTable,

    /// Global counter table, indexed by path history
    pub global_bht: CounterTable,

    /// Chooser table: taken means trust the local side
    pub chooser: CounterTable,

    /// Path history register shared by the global and chooser tables
    pub path_history: HistoryRegister,
}

impl TournamentPredictor {
    /// Index of this branch's entry in the local history table.
    fn lht_index(&self, pc: u32) -> usize {
        pc as usize & self.lht.index_mask()
    }

    /// Index into the local counter table: the branch's stored history
    /// pattern, masked to the local table's width.
    fn local_index(&self, pc: u32) -> usize {
        self.lht.entry(self.lht_index(pc)) as usize & self.local_bht.index_mask()
    }

    /// Path history masked to the global table's width.
    fn path_lower(&self) -> usize {
        self.path_history.low_bits(self.cfg.path_history_bits) as usize
    }

    /// Path history masked to the chooser table's width.
    fn chooser_index(&self) -> usize {
        self.path_history.low_bits(self.cfg.chooser_bits) as usize
    }
}

impl DirectionPredictor for TournamentPredictor {
    fn name(&self) -> &'static str { "Tournament" }

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
            Outcome::N => self.global_bht.entry(self.path_lower()).predict(),
        }
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let lht_index = self.lht_index(pc);
        let local_index = self.local_index(pc);
        let path_lower = self.path_lower();
        let chooser_index = self.chooser_index();

        let local_dir = self.local_bht.entry(local_index).predict();
        let global_dir = self.global_bht.entry(path_lower).predict();

        // The chooser tracks which side is more often right, never the
        // outcome itself: step toward the side whose direction matched the
        // resolved outcome, and only when the two sides disagree. The write
        // index is the path history masked by the *global* table's width,
        // while the read above masked by the chooser's width (see DESIGN.md
        // on this preserved asymmetry).
        if local_dir != global_dir {
            let reward = if outcome == local_dir { Outcome::T } else { Outcome::N };
            let mut ctr = *self.chooser.entry(chooser_index);
            ctr.update(reward);
            *self.chooser.entry_mut(path_lower) = ctr;
        }

        self.local_bht.entry_mut(local_index).update(outcome);
        self.global_bht.entry_mut(path_lower).update(outcome);

        self.path_history.shift_in(outcome);
        // The stored pattern shifts the already-masked index value, not the
        // raw prior history (see DESIGN.md).
        self.lht
            .set_entry(lht_index, ((local_index as u32) << 1) | outcome as u32);
    }
}
