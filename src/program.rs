use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::instructions::Op;

/// One parsed instruction, operands still in semantic form.
///
/// Immediate and jump records carry their own position (`pc`, an instruction
/// index, not a byte address) because branch displacements are PC-relative
/// and jump targets are resolved against the boot address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instr {
    R {
        op: Op,
        rs: u32,
        rt: u32,
        rd: u32,
        shamt: i32,
    },
    I {
        op: Op,
        rs: u32,
        rt: u32,
        imm: i32,
        label: Option<String>,
        pc: u32,
    },
    J {
        op: Op,
        addr: i64,
        label: Option<String>,
        pc: u32,
    },
}

/// The program assembly buffer: the ordered instruction sequence plus the
/// label table, built up during parsing and read-only during binding.
///
/// One `Program` is one assembly session; start a new session with
/// [`Program::new`] rather than reusing a stale buffer.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Program {
    instrs: Vec<Instr>,
    labels: HashMap<String, u32>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    pub fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    /// Next position to be assigned, i.e. the pseudo-PC of the next append.
    fn next_pc(&self) -> u32 {
        self.instrs.len() as u32
    }

    pub fn push_r(&mut self, op: Op, rs: u32, rt: u32, rd: u32, shamt: i32) {
        self.instrs.push(Instr::R {
            op,
            rs,
            rt,
            rd,
            shamt,
        });
    }

    pub fn push_i(&mut self, op: Op, rs: u32, rt: u32, imm: i32, label: Option<String>) {
        let pc = self.next_pc();
        self.instrs.push(Instr::I {
            op,
            rs,
            rt,
            imm,
            label,
            pc,
        });
    }

    pub fn push_j(&mut self, op: Op, addr: i64, label: Option<String>) {
        let pc = self.next_pc();
        self.instrs.push(Instr::J {
            op,
            addr,
            label,
            pc,
        });
    }

    /// Declare `name` at the position of the next instruction to be appended.
    /// Re-declaring overwrites the earlier position; last declaration wins.
    pub fn declare_label(&mut self, name: &str) {
        let pos = self.next_pc();
        if let Some(old) = self.labels.insert(name.to_owned(), pos) {
            tracing::warn!(label = name, old, new = pos, "label re-declared");
        }
    }

    /// Look up a label's position. `None` surfaces as an undeclared-label
    /// bind error; resolution is deferred to bind time so forward references
    /// work once the whole buffer is populated.
    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }
}
