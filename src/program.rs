use std::fmt;
use std::ops::Index;

use crate::event::Event;

pub type InstPtr = usize;

/// A single bytecode instruction.
///
/// `Jump` and `Split` offsets are relative to the instruction's own address;
/// `Call` targets are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    /// Match the next buffered event against the matcher.
    Consume(Event),
    Jump(isize),
    /// Continue at the first offset and fork a copy at the second.
    Split(isize, isize),
    CapStart,
    /// Close the innermost capture and expand its template.
    CapEnd(String),
    End,
    Call(InstPtr),
    Return,
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Consume(ev) => write!(f, "consume {ev}"),
            Inst::Jump(lbl) => write!(f, "jump {lbl}"),
            Inst::Split(lbl1, lbl2) => write!(f, "split {lbl1}, {lbl2}"),
            Inst::CapStart => f.write_str("cap start"),
            Inst::CapEnd(cmd) => write!(f, "cap end '{cmd}'"),
            Inst::End => f.write_str("end"),
            Inst::Call(addr) => write!(f, "call {addr}"),
            Inst::Return => f.write_str("ret"),
        }
    }
}

/// A compiled, immutable sequence of instructions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    insts: Vec<Inst>,
}

impl Program {
    pub fn new(insts: Vec<Inst>) -> Self {
        Self { insts }
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn get(&self, pc: InstPtr) -> Option<&Inst> {
        self.insts.get(pc)
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }
}

impl Index<InstPtr> for Program {
    type Output = Inst;

    fn index(&self, pc: InstPtr) -> &Inst {
        &self.insts[pc]
    }
}

/// Disassembly, one instruction per line prefixed with its address.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.insts.iter().enumerate() {
            writeln!(f, "{pc:>4}: {inst}")?;
        }
        Ok(())
    }
}
