use serde::{Deserialize, Serialize};

pub use crate::instructions::Op;

/// Operand slot value: a register index or an already reconstructed immediate.
/// Register indices carry no register-file tag; the identity implies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    #[default]
    None,
    Reg(u8),
    Imm(u64),
}

impl Operand {
    pub fn reg(self) -> Option<u8> {
        match self {
            Operand::Reg(r) => Some(r),
            _ => None,
        }
    }

    pub fn imm(self) -> Option<u64> {
        match self {
            Operand::Imm(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Operand::None)
    }
}

/// Control-flow class assigned after a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrType {
    #[default]
    Normal,
    Branch,
    Jump,
    Indirect,
}

/// State of one in-flight instruction. Owned by the step that decodes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeContext {
    pub pc: u64,
    /// Static next pc; doubles as the fetch cursor.
    pub snpc: u64,
    /// Jump/branch target when statically known.
    pub jnpc: u64,
    pub raw: u32,
    pub width: u8, // 2 or 4
    pub op: Op,
    pub ty: InstrType,
    pub dest: Operand,
    pub src1: Operand,
    pub src2: Operand,
    pub src3: Operand,
}

impl DecodeContext {
    pub fn new(pc: u64) -> Self {
        Self {
            pc,
            snpc: pc,
            jnpc: pc,
            ..Self::default()
        }
    }

    /// Context for a word that is already in hand (disassemblers, tests).
    pub fn with_raw(pc: u64, raw: u32) -> Self {
        let width = width_of(raw);
        let raw = if width == 2 { raw & 0xFFFF } else { raw };
        Self {
            pc,
            snpc: pc.wrapping_add(width as u64),
            jnpc: pc,
            raw,
            width,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, pc: u64) {
        *self = Self::new(pc);
    }

    pub fn is_compressed(&self) -> bool {
        self.width == 2
    }
}

/// Instruction length from the quadrant bits.
pub fn width_of(raw: u32) -> u8 {
    if raw & 0b11 == 0b11 {
        4
    } else {
        2
    }
}

pub trait Decoder {
    /// Resolve `s.raw` at `s.pc`: sets identity, operands and control-flow class.
    fn decode(&self, s: &mut DecodeContext) -> Op;

    /// Whether the trigger hooks around fetch are enabled.
    fn sdtrig(&self) -> bool {
        false
    }
}
