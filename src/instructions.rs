use serde::{Deserialize, Serialize};

/// Operation identities for the MIPS-I subset this assembler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    // Register format
    Sll,
    Srl,
    Jr,
    Add,
    Addu,
    Sub,
    Subu,
    And,
    Or,
    Xor,
    Nor,
    Slt,
    Sltu,
    // Immediate format
    Beq,
    Bneq,
    Addi,
    Andi,
    Ori,
    Lui,
    Lw,
    Lbu,
    Lhu,
    Sw,
    // Jump format
    J,
}

/// Operand shape of a mnemonic as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `op $rd, $rs, $rt`
    ThreeReg,
    /// `op $rd, $rt, shamt`
    Shift,
    /// `op $rs, $rt, imm|label`
    Branch,
    /// `op $rt, $rs, imm`
    ArithImm,
    /// `op $rt, imm($rs)`
    Mem,
    /// `op addr|label`
    Jump,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub syntax: Syntax,
}

pub const TABLE: &[InstrDesc] = &[
    InstrDesc {
        op: Op::And,
        mnemonic: "and",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Or,
        mnemonic: "or",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Xor,
        mnemonic: "xor",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Nor,
        mnemonic: "nor",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Add,
        mnemonic: "add",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Addu,
        mnemonic: "addu",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Sub,
        mnemonic: "sub",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Subu,
        mnemonic: "subu",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Slt,
        mnemonic: "slt",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Sltu,
        mnemonic: "sltu",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Jr,
        mnemonic: "jr",
        syntax: Syntax::ThreeReg,
    },
    InstrDesc {
        op: Op::Sll,
        mnemonic: "sll",
        syntax: Syntax::Shift,
    },
    InstrDesc {
        op: Op::Srl,
        mnemonic: "srl",
        syntax: Syntax::Shift,
    },
    InstrDesc {
        op: Op::Beq,
        mnemonic: "beq",
        syntax: Syntax::Branch,
    },
    InstrDesc {
        op: Op::Bneq,
        mnemonic: "bneq",
        syntax: Syntax::Branch,
    },
    InstrDesc {
        op: Op::Addi,
        mnemonic: "addi",
        syntax: Syntax::ArithImm,
    },
    InstrDesc {
        op: Op::Andi,
        mnemonic: "andi",
        syntax: Syntax::ArithImm,
    },
    InstrDesc {
        op: Op::Ori,
        mnemonic: "ori",
        syntax: Syntax::ArithImm,
    },
    InstrDesc {
        op: Op::Lui,
        mnemonic: "lui",
        syntax: Syntax::Mem,
    },
    InstrDesc {
        op: Op::Lw,
        mnemonic: "lw",
        syntax: Syntax::Mem,
    },
    InstrDesc {
        op: Op::Lbu,
        mnemonic: "lbu",
        syntax: Syntax::Mem,
    },
    InstrDesc {
        op: Op::Lhu,
        mnemonic: "lhu",
        syntax: Syntax::Mem,
    },
    InstrDesc {
        op: Op::Sw,
        mnemonic: "sw",
        syntax: Syntax::Mem,
    },
    InstrDesc {
        op: Op::J,
        mnemonic: "j",
        syntax: Syntax::Jump,
    },
];

/// Mnemonics are reserved words; a name that resolves here cannot be a label.
pub fn by_mnemonic(name: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic == name)
}
