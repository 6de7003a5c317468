use thiserror::Error;

use crate::instructions::Op;
use crate::isa::mips1;
use crate::program::{Instr, Program};

/// Binding-time failures. Every variant is terminal for the whole assembly:
/// the caller must not emit a partial instruction image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("register ${0} doesn't exist, should be between 0 and 31")]
    InvalidRegister(u32),
    #[error("shift amount {0} should be between 0 and 31")]
    InvalidShiftAmount(i32),
    /// The accepted range is [-32767, 65535]; the field is packed as the
    /// low 16 bits of the word regardless of sign.
    #[error("immediate {0} should be 16 bits long")]
    ImmediateOutOfRange(i32),
    #[error("{0:#x} is not a valid 26-bit unsigned address")]
    AddressOutOfRange(i64),
    #[error("label {0} has not been declared")]
    UndeclaredLabel(String),
}

fn check_reg(reg: u32) -> Result<(), BindError> {
    if reg > 31 {
        return Err(BindError::InvalidRegister(reg));
    }
    Ok(())
}

impl Instr {
    /// Encode this instruction into its 32-bit word, resolving any label
    /// operand against `prog`'s label table. Read-only: label resolution
    /// never mutates the program.
    pub fn bind(&self, prog: &Program, boot_addr: u32) -> Result<u32, BindError> {
        match self {
            Instr::R {
                op,
                rs,
                rt,
                rd,
                shamt,
            } => bind_r(*op, *rs, *rt, *rd, *shamt),
            Instr::I {
                op,
                rs,
                rt,
                imm,
                label,
                pc,
            } => bind_i(prog, *op, *rs, *rt, *imm, label.as_deref(), *pc),
            Instr::J {
                op,
                addr,
                label,
                pc: _,
            } => bind_j(prog, boot_addr, *op, *addr, label.as_deref()),
        }
    }
}

fn bind_r(op: Op, rs: u32, rt: u32, rd: u32, shamt: i32) -> Result<u32, BindError> {
    for reg in [rs, rt, rd] {
        check_reg(reg)?;
    }

    let mut bin = (mips1::opcode(op) & 0x3f) << 26;
    bin |= mips1::funct(op) & 0x3f;

    bin |= (rs & 0x1f) << 21;
    bin |= (rt & 0x1f) << 16;
    bin |= (rd & 0x1f) << 11;

    if !(0..=31).contains(&shamt) {
        return Err(BindError::InvalidShiftAmount(shamt));
    }
    bin |= ((shamt as u32) & 0x1f) << 6;
    Ok(bin)
}

fn bind_i(
    prog: &Program,
    op: Op,
    rs: u32,
    rt: u32,
    mut imm: i32,
    label: Option<&str>,
    pc: u32,
) -> Result<u32, BindError> {
    check_reg(rs)?;
    check_reg(rt)?;

    let mut bin = (mips1::opcode(op) & 0x3f) << 26;
    bin |= (rs & 0x1f) << 21;
    bin |= (rt & 0x1f) << 16;

    if let Some(name) = label {
        let target = prog
            .resolve(name)
            .ok_or_else(|| BindError::UndeclaredLabel(name.to_owned()))?;
        // pc + 1 + imm = target: the displacement is relative to the
        // instruction after the branch.
        imm = target as i32 - pc as i32 - 1;
    }

    if imm <= -(1 << 15) || imm > (1 << 16) - 1 {
        return Err(BindError::ImmediateOutOfRange(imm));
    }
    bin |= (imm as u32) & 0xffff;
    Ok(bin)
}

fn bind_j(
    prog: &Program,
    boot_addr: u32,
    op: Op,
    mut addr: i64,
    label: Option<&str>,
) -> Result<u32, BindError> {
    if let Some(name) = label {
        let target = prog
            .resolve(name)
            .ok_or_else(|| BindError::UndeclaredLabel(name.to_owned()))?;
        // Jump targets are word-aligned absolute addresses sharing their
        // upper bits with the boot address region.
        addr = ((boot_addr >> 2) as i64 + target as i64) & 0x03ff_ffff;
    }

    if !(0..1i64 << 26).contains(&addr) {
        return Err(BindError::AddressOutOfRange(addr));
    }

    let mut bin = (mips1::opcode(op) & 0x3f) << 26;
    bin |= (addr as u32) & 0x03ff_ffff;
    Ok(bin)
}

impl Program {
    /// Pass 2: encode the whole buffer in program order. The first failure
    /// aborts the assembly; no partial word sequence is returned.
    pub fn bind_all(&self, boot_addr: u32) -> Result<Vec<u32>, BindError> {
        let mut words = Vec::with_capacity(self.len());
        for instr in self.instrs() {
            words.push(instr.bind(self, boot_addr)?);
        }
        tracing::debug!(instructions = words.len(), "bound program");
        Ok(words)
    }
}
