//! Control-flow classification of a decoded instruction.

use crate::decoder::{DecodeContext, InstrType, Op};
use crate::format::{csr, funct3};

/// funct12 values of `ecall`, `sret` and `mret`.
const TRAP_RETURNS: [u32; 3] = [0x000, 0x102, 0x302];

/// Sets `s.ty`, and `s.jnpc` when the target is known statically.
/// Identity checks and the raw SYSTEM field check both apply, so the
/// result does not depend on which privileged variant built the tables.
pub fn classify(s: &mut DecodeContext) {
    let ty = match s.op {
        Op::Jal | Op::PJal | Op::CJ => {
            if let Some(target) = s.src1.imm() {
                s.jnpc = target;
            }
            InstrType::Jump
        }
        Op::Beq
        | Op::Bne
        | Op::Blt
        | Op::Bge
        | Op::Bltu
        | Op::Bgeu
        | Op::PBltz
        | Op::PBgez
        | Op::PBlez
        | Op::PBgtz
        | Op::CBeqz
        | Op::CBnez => {
            if let Some(target) = s.dest.imm() {
                s.jnpc = target;
            }
            InstrType::Branch
        }
        Op::Jalr | Op::PRet | Op::CJr | Op::CJalr => InstrType::Indirect,
        Op::Ecall | Op::Sret | Op::Mret => InstrType::Indirect,
        Op::Priv if funct3(s.raw) == 0 && TRAP_RETURNS.contains(&csr(s.raw)) => {
            InstrType::Indirect
        }
        _ => InstrType::Normal,
    };
    s.ty = ty;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Operand;

    #[test]
    fn priv_classified_by_fields() {
        let mut s = DecodeContext::with_raw(0, 0x3020_0073);
        s.op = Op::Priv;
        classify(&mut s);
        assert_eq!(s.ty, InstrType::Indirect);

        // wfi
        let mut s = DecodeContext::with_raw(0, 0x1050_0073);
        s.op = Op::Priv;
        classify(&mut s);
        assert_eq!(s.ty, InstrType::Normal);
    }

    #[test]
    fn jump_records_target() {
        let mut s = DecodeContext::with_raw(0x100, 0x0000_006F);
        s.op = Op::Jal;
        s.src1 = Operand::Imm(0x180);
        classify(&mut s);
        assert_eq!((s.ty, s.jnpc), (InstrType::Jump, 0x180));
    }

    #[test]
    fn invalid_is_normal() {
        let mut s = DecodeContext::with_raw(0x100, 0);
        classify(&mut s);
        assert_eq!(s.ty, InstrType::Normal);
        assert_eq!(s.jnpc, 0x100);
    }
}
