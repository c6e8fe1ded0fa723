//! RVV extension point: configuration-setting forms are fully decoded, the
//! arithmetic and memory families collapse to one identity each with the
//! raw fields carried in the operand slots.

use serde::{Deserialize, Serialize};

use crate::decoder::{DecodeContext, Op, Operand};
use crate::format::{bit, bits, rd, rs1, rs2, sext, Format};
use crate::pattern::{TableBuilder, TableError, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VFormat {
    /// rd, rs1, zimm[10:0]
    Vsetvli,
    /// rd, uimm[4:0], zimm[9:0]
    Vsetivli,
    /// vd, vs1/rs1/simm5, vs2, funct6:vm
    Varith,
    /// vd/vs3, rs1, vs2/rs2, mop:mew:nf:vm
    Vmem,
}

impl VFormat {
    pub fn extract(self, s: &mut DecodeContext) {
        let raw = s.raw;
        match self {
            VFormat::Vsetvli => {
                s.dest = Operand::Reg(rd(raw));
                s.src1 = Operand::Reg(rs1(raw));
                s.src2 = Operand::Imm(bits(raw, 30, 20) as u64);
            }
            VFormat::Vsetivli => {
                s.dest = Operand::Reg(rd(raw));
                s.src1 = Operand::Imm(rs1(raw) as u64);
                s.src2 = Operand::Imm(bits(raw, 29, 20) as u64);
            }
            VFormat::Varith => {
                s.dest = Operand::Reg(rd(raw));
                s.src1 = if bits(raw, 14, 12) == 0b011 {
                    // OPIVI
                    Operand::Imm(sext(rs1(raw) as u64, 5))
                } else {
                    Operand::Reg(rs1(raw))
                };
                s.src2 = Operand::Reg(rs2(raw));
                s.src3 = Operand::Imm(((bits(raw, 31, 26) << 1) | bit(raw, 25)) as u64);
            }
            VFormat::Vmem => {
                s.dest = Operand::Reg(rd(raw));
                s.src1 = Operand::Reg(rs1(raw));
                s.src2 = Operand::Reg(rs2(raw));
                s.src3 = Operand::Imm(bits(raw, 31, 25) as u64);
            }
        }
    }
}

/// Tables owned by the vector module.
#[derive(Debug, Clone, Copy)]
pub struct VectorTables {
    pub op_v: TableId,
    /// Unit/strided/indexed loads sharing the LOAD-FP major opcode.
    pub load: TableId,
    pub store: TableId,
}

pub fn register(b: &mut TableBuilder) -> Result<VectorTables, TableError> {
    let v = |f| Some(Format::V(f));

    let op_v = b.table("op-v", 32);
    b.push(op_v, "0?????? ????? ????? 111 ????? ????? ??", v(VFormat::Vsetvli), Op::Vsetvli)?;
    b.push(op_v, "11????? ????? ????? 111 ????? ????? ??", v(VFormat::Vsetivli), Op::Vsetivli)?;
    b.push(op_v, "1000000 ????? ????? 111 ????? ????? ??", Some(Format::R), Op::Vsetvl)?;
    b.push(op_v, "??????? ????? ????? 0?? ????? ????? ??", v(VFormat::Varith), Op::Vop)?;
    b.push(op_v, "??????? ????? ????? 10? ????? ????? ??", v(VFormat::Varith), Op::Vop)?;
    b.push(op_v, "??????? ????? ????? 110 ????? ????? ??", v(VFormat::Varith), Op::Vop)?;

    // Element widths 8, 16, 32, 64 (and the reserved wide forms) live in the
    // funct3 values scalar FP never uses.
    let load = b.table("vload", 32);
    let store = b.table("vstore", 32);
    const WIDTHS: [&str; 3] = [
        "??????? ????? ????? 000 ????? ????? ??",
        "??????? ????? ????? 101 ????? ????? ??",
        "??????? ????? ????? 11? ????? ????? ??",
    ];
    for template in WIDTHS {
        b.push(load, template, v(VFormat::Vmem), Op::Vload)?;
        b.push(store, template, v(VFormat::Vmem), Op::Vstore)?;
    }

    Ok(VectorTables { op_v, load, store })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vsetvli_keeps_vtype_unsigned() {
        // vsetvli x5, x10, e64,m1,ta,ma -> zimm = 0xd8
        let raw = (0x0D8 << 20) | (10 << 15) | (0b111 << 12) | (5 << 7) | 0x57;
        let mut s = DecodeContext::with_raw(0, raw);
        VFormat::Vsetvli.extract(&mut s);
        assert_eq!(s.dest, Operand::Reg(5));
        assert_eq!(s.src1, Operand::Reg(10));
        assert_eq!(s.src2, Operand::Imm(0xD8));
    }

    #[test]
    fn opivi_immediate_is_signed() {
        // vadd.vi v1, v2, -1 (vm=1)
        let raw = (1 << 25) | (2 << 20) | (0x1F << 15) | (0b011 << 12) | (1 << 7) | 0x57;
        let mut s = DecodeContext::with_raw(0, raw);
        VFormat::Varith.extract(&mut s);
        assert_eq!(s.src1, Operand::Imm(u64::MAX));
        assert_eq!(s.src3, Operand::Imm(1));
    }
}
