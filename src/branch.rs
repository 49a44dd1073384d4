//! Types for representing branches and branch outcomes.

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1,
}

impl Outcome {
    pub fn from_bool(b: bool) -> Self {
        match b {
            true => Self::T,
            false => Self::N,
        }
    }

    /// Returns 'true' if this outcome is 'taken'.
    pub fn is_taken(self) -> bool {
        self == Self::T
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N,
        }
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> bool {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}

/// Flag bits describing one executed branch instruction.
///
/// NOTE: The layout of this word is the contract with whatever tool produced
/// the trace (see [`crate::trace::BinaryTrace`]).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchFlags(pub u32);
impl BranchFlags {
    const BRN_FLAG: u32 = 1 << 0;
    const CALL_FLAG: u32 = 1 << 1;
    const RET_FLAG: u32 = 1 << 2;
    const IND_FLAG: u32 = 1 << 3;
    const TAKEN_FLAG: u32 = 1 << 4;

    pub fn is_brn(&self) -> bool { self.0 & Self::BRN_FLAG != 0 }
    pub fn is_call(&self) -> bool { self.0 & Self::CALL_FLAG != 0 }
    pub fn is_ret(&self) -> bool { self.0 & Self::RET_FLAG != 0 }
    pub fn is_direct(&self) -> bool { self.0 & Self::IND_FLAG == 0 }
    pub fn is_indirect(&self) -> bool { self.0 & Self::IND_FLAG != 0 }
    pub fn is_taken(&self) -> bool { self.0 & Self::TAKEN_FLAG != 0 }
}

/// A record of branch execution.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: u32,

    /// The target address evaluated for this branch
    pub tgt: u32,

    pub flags: BranchFlags,
}
impl BranchRecord {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_bool(self.flags.is_taken())
    }

    /// Returns 'true' if this is a conditional instruction.
    pub fn is_conditional(&self) -> bool {
        self.flags.is_brn()
    }

    /// Returns 'true' if this is a procedure call.
    pub fn is_call(&self) -> bool {
        self.flags.is_call()
    }

    /// Returns 'true' if this is a procedure return.
    pub fn is_return(&self) -> bool {
        self.flags.is_ret()
    }

    /// Returns 'true' if this instruction directly specifies the target.
    pub fn is_direct(&self) -> bool {
        self.flags.is_direct()
    }
}
