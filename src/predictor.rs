//! Implementations of different branch predictors.

pub mod counter;
pub mod custom;
pub mod gshare;
pub mod simple;
pub mod table;
pub mod tournament;

pub use counter::*;
pub use custom::*;
pub use gshare::*;
pub use simple::*;
pub use table::*;
pub use tournament::*;

use crate::branch::Outcome;
use crate::history::HISTORY_WIDTH;

/// Interface to a "trivial" predictor that guesses an outcome without
/// accepting feedback from the rest of the machine.
pub trait SimplePredictor {
    fn name(&self) -> &'static str;
    fn predict(&self) -> Outcome;
}

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait StatefulPredictor {
    fn name(&self) -> &'static str;

    /// Reset the internal state of the predictor.
    fn reset(&mut self);

    /// Return the current predicted outcome.
    fn predict(&self) -> Outcome;

    /// Update the internal state of the predictor with the correct outcome.
    fn update(&mut self, outcome: Outcome);
}

/// Interface to a full prediction scheme keyed by branch address.
///
/// Callers resolve one branch at a time, in program order: each branch's
/// `predict` is followed by its `train` before the next branch's calls.
pub trait DirectionPredictor {
    fn name(&self) -> &'static str;

    /// Reset all tables and history registers to their initial state.
    fn reset(&mut self);

    /// Return the predicted outcome for the branch at `pc`.
    fn predict(&self, pc: u32) -> Outcome;

    /// Update the internal state with the resolved outcome for the branch
    /// at `pc`.
    fn train(&mut self, pc: u32, outcome: Outcome);
}

/// Widest supported table index. Each index bit doubles a table's
/// allocation, so this bounds a single table at 2^24 counters.
pub const MAX_INDEX_BITS: usize = 24;

/// The ways building or selecting a predictor can fail. Both are
/// configuration errors: they are raised before any prediction is made,
/// and there is no fallback scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredictorError {
    /// The scheme selector does not name a known scheme.
    UnknownScheme(String),

    /// A configured width would mis-size a table or history register.
    InvalidWidth {
        param: &'static str,
        bits: usize,
        max: usize,
    },
}

impl std::fmt::Display for PredictorError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UnknownScheme(s) => {
                write!(f, "unknown prediction scheme '{}'", s)
            }
            Self::InvalidWidth { param, bits, max } => {
                write!(
                    f,
                    "{} of {} bits is outside the supported range 1..={}",
                    param, bits, max
                )
            }
        }
    }
}

impl std::error::Error for PredictorError {}

pub(crate) fn check_index_bits(
    param: &'static str,
    bits: usize,
) -> Result<(), PredictorError> {
    if bits < 1 || bits > MAX_INDEX_BITS {
        return Err(PredictorError::InvalidWidth {
            param,
            bits,
            max: MAX_INDEX_BITS,
        });
    }
    Ok(())
}

pub(crate) fn check_history_bits(
    param: &'static str,
    bits: usize,
) -> Result<(), PredictorError> {
    if bits < 1 || bits > HISTORY_WIDTH {
        return Err(PredictorError::InvalidWidth {
            param,
            bits,
            max: HISTORY_WIDTH,
        });
    }
    Ok(())
}

/// The available prediction schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeKind {
    Static,
    Gshare,
    Tournament,
    Custom,
}

impl SchemeKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Gshare => "Gshare",
            Self::Tournament => "Tournament",
            Self::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SchemeKind {
    type Err = PredictorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "gshare" => Ok(Self::Gshare),
            "tournament" => Ok(Self::Tournament),
            "custom" => Ok(Self::Custom),
            _ => Err(PredictorError::UnknownScheme(s.to_string())),
        }
    }
}

/// Top-level configuration for a [`Predictor`]: the active scheme plus the
/// table widths of every scheme. Fixed for the life of the instance.
#[derive(Clone, Copy, Debug)]
pub struct PredictorConfig {
    pub scheme: SchemeKind,
    pub gshare: GshareConfig,
    pub tournament: TournamentConfig,
    pub custom: CustomConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            scheme: SchemeKind::Static,
            gshare: GshareConfig::default(),
            tournament: TournamentConfig::default(),
            custom: CustomConfig::default(),
        }
    }
}

impl PredictorConfig {
    pub fn with_scheme(scheme: SchemeKind) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    /// Get the number of table storage bits for the active scheme.
    pub fn storage_bits(&self) -> usize {
        match self.scheme {
            SchemeKind::Static => 0,
            SchemeKind::Gshare => self.gshare.storage_bits(),
            SchemeKind::Tournament => self.tournament.storage_bits(),
            SchemeKind::Custom => self.custom.storage_bits(),
        }
    }

    /// Allocate and seed the active scheme's tables, returning the facade.
    /// An invalid configuration is rejected here, before any prediction.
    pub fn build(self) -> Result<Predictor, PredictorError> {
        let scheme = match self.scheme {
            SchemeKind::Static => Scheme::Static(TakenPredictor),
            SchemeKind::Gshare => Scheme::Gshare(self.gshare.build()?),
            SchemeKind::Tournament => Scheme::Tournament(self.tournament.build()?),
            SchemeKind::Custom => Scheme::Custom(self.custom.build()?),
        };
        Ok(Predictor {
            kind: self.scheme,
            scheme,
        })
    }
}

/// The active scheme instance owned by a [`Predictor`].
enum Scheme {
    Static(TakenPredictor),
    Gshare(GsharePredictor),
    Tournament(TournamentPredictor),
    Custom(CustomPredictor),
}

/// Facade over the configured prediction scheme.
///
/// All tables live for the life of this instance and are released when it
/// drops. Branches are resolved strictly in program order: one `predict`
/// per branch, then its `train`, with no interleaving between branches.
pub struct Predictor {
    kind: SchemeKind,
    scheme: Scheme,
}

impl Predictor {
    /// The active scheme selection.
    pub fn scheme(&self) -> SchemeKind {
        self.kind
    }

    /// Return the predicted outcome for the conditional branch at `pc`.
    ///
    /// `target` and `is_direct` are accepted for interface symmetry with
    /// non-conditional branch types; the in-scope schemes ignore them.
    pub fn predict(&self, pc: u32, _target: u32, _is_direct: bool) -> Outcome {
        match &self.scheme {
            Scheme::Static(p) => p.predict(),
            Scheme::Gshare(p) => p.predict(pc),
            Scheme::Tournament(p) => p.predict(pc),
            Scheme::Custom(p) => p.predict(pc),
        }
    }

    /// Inform the predictor of a branch's resolved outcome.
    ///
    /// Only conditional branches update predictor state: when
    /// `is_conditional` is false this is a no-op. The remaining branch-kind
    /// flags are accepted for interface symmetry and unused by the in-scope
    /// schemes.
    #[allow(clippy::too_many_arguments)]
    pub fn train(
        &mut self,
        pc: u32,
        _target: u32,
        outcome: Outcome,
        is_conditional: bool,
        _is_call: bool,
        _is_return: bool,
        _is_direct: bool,
    ) {
        if !is_conditional {
            return;
        }
        match &mut self.scheme {
            Scheme::Static(_) => {}
            Scheme::Gshare(p) => p.train(pc, outcome),
            Scheme::Tournament(p) => p.train(pc, outcome),
            Scheme::Custom(p) => p.train(pc, outcome),
        }
    }

    /// Reset every table and history register of the active scheme.
    pub fn reset(&mut self) {
        match &mut self.scheme {
            Scheme::Static(_) => {}
            Scheme::Gshare(p) => p.reset(),
            Scheme::Tournament(p) => p.reset(),
            Scheme::Custom(p) => p.reset(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn static_scheme_always_predicts_taken() {
        let mut p = PredictorConfig::with_scheme(SchemeKind::Static)
            .build()
            .unwrap();
        assert_eq!(p.predict(0x1000, 0x2000, true), Outcome::T);
        p.train(0x1000, 0x2000, Outcome::N, true, false, false, true);
        assert_eq!(p.predict(0x1000, 0x2000, true), Outcome::T);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = "perceptron".parse::<SchemeKind>().unwrap_err();
        assert_eq!(err, PredictorError::UnknownScheme("perceptron".to_string()));
    }

    #[test]
    fn scheme_names_round_trip() {
        for kind in [
            SchemeKind::Static,
            SchemeKind::Gshare,
            SchemeKind::Tournament,
            SchemeKind::Custom,
        ] {
            assert_eq!(kind.name().parse::<SchemeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn invalid_width_is_rejected_at_build() {
        let mut cfg = PredictorConfig::with_scheme(SchemeKind::Gshare);
        cfg.gshare.ghistory_bits = 40;
        assert_eq!(
            cfg.build().err(),
            Some(PredictorError::InvalidWidth {
                param: "ghistory_bits",
                bits: 40,
                max: MAX_INDEX_BITS,
            })
        );

        let mut cfg = PredictorConfig::with_scheme(SchemeKind::Custom);
        cfg.custom.history_bits = 0;
        assert!(cfg.build().is_err());
    }

    #[test]
    fn unconditional_branches_do_not_train() {
        let mut p = PredictorConfig::with_scheme(SchemeKind::Gshare)
            .build()
            .unwrap();
        p.train(0x1000, 0x2000, Outcome::T, false, true, false, true);
        p.train(0x1004, 0x3000, Outcome::T, false, false, true, false);

        match &p.scheme {
            Scheme::Gshare(g) => {
                assert_eq!(g.ghistory.raw(), 0);
                assert!(g
                    .bht
                    .entries()
                    .iter()
                    .all(|c| *c == SaturatingCounter::WeakNotTaken));
            }
            _ => unreachable!(),
        }
    }

    // The facade adds nothing to a scheme's behavior besides dispatch.
    #[test]
    fn facade_matches_the_bare_scheme() {
        let mut facade = PredictorConfig::with_scheme(SchemeKind::Tournament)
            .build()
            .unwrap();
        let mut bare = TournamentConfig::default().build().unwrap();

        let mut pc: u32 = 0x8000;
        for step in 0..512u32 {
            pc = pc.wrapping_mul(0x0101_0101).wrapping_add(step);
            let outcome = Outcome::from_bool(step % 5 < 3);
            assert_eq!(facade.predict(pc, 0, true), bare.predict(pc));
            facade.train(pc, 0, outcome, true, false, false, true);
            bare.train(pc, outcome);
        }
    }
}
