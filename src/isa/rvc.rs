//! RV64C: 16-bit encodings and their operand layouts.
//!
//! Compressed forms are expanded into the same operand slots their 32-bit
//! equivalents use, so `c.jalr rs1` reads like `jalr x1, 0(rs1)` and
//! `c.lw rd', off(rs1')` like `lw rd, off(rs1)`.

use serde::{Deserialize, Serialize};

use crate::decoder::{DecodeContext, Op, Operand};
use crate::format::{bit, bits, sext, Format};
use crate::isa::{FpuMode, IsaConfig};
use crate::pattern::{TableBuilder, TableError, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CFormat {
    /// c.addi4spn
    Ciw,
    ClW,
    ClD,
    CsW,
    CsD,
    /// c.addi / c.addiw: rd = rd + simm6
    CiAddi,
    /// c.li: rd = x0 + simm6
    CiLi,
    CiLui,
    CiAddi16sp,
    CiShamt,
    CiLwsp,
    CiLdsp,
    CssSwsp,
    CssSdsp,
    CrMv,
    CrAdd,
    CrJr,
    CrJalr,
    Ca,
    CbShamt,
    CbAndi,
    /// c.beqz / c.bnez
    Cb,
    Cj,
}

/// rd'/rs1'/rs2' name x8..x15.
#[inline]
fn creg(v: u32) -> Operand {
    Operand::Reg((v + 8) as u8)
}

#[inline]
fn reg(v: u32) -> Operand {
    Operand::Reg(v as u8)
}

const SP: Operand = Operand::Reg(2);
const RA: Operand = Operand::Reg(1);
const ZERO: Operand = Operand::Reg(0);

fn simm6(raw: u32) -> u64 {
    sext(((bit(raw, 12) << 5) | bits(raw, 6, 2)) as u64, 6)
}

fn shamt6(raw: u32) -> u64 {
    ((bit(raw, 12) << 5) | bits(raw, 6, 2)) as u64
}

/// uimm[5:3|2|6] for word loads/stores.
fn uimm_w(raw: u32) -> u64 {
    ((bits(raw, 12, 10) << 3) | (bit(raw, 6) << 2) | (bit(raw, 5) << 6)) as u64
}

/// uimm[5:3|7:6] for doubleword loads/stores.
fn uimm_d(raw: u32) -> u64 {
    ((bits(raw, 12, 10) << 3) | (bits(raw, 6, 5) << 6)) as u64
}

/// offset[8|4:3|7:6|2:1|5]
pub fn imm_cb(raw: u32) -> u64 {
    let v = (bit(raw, 12) << 8)
        | (bits(raw, 11, 10) << 3)
        | (bits(raw, 6, 5) << 6)
        | (bits(raw, 4, 3) << 1)
        | (bit(raw, 2) << 5);
    sext(v as u64, 9)
}

/// offset[11|4|9:8|10|6|7|3:1|5]
pub fn imm_cj(raw: u32) -> u64 {
    let v = (bit(raw, 12) << 11)
        | (bit(raw, 11) << 4)
        | (bits(raw, 10, 9) << 8)
        | (bit(raw, 8) << 10)
        | (bit(raw, 7) << 6)
        | (bit(raw, 6) << 7)
        | (bits(raw, 5, 3) << 1)
        | (bit(raw, 2) << 5);
    sext(v as u64, 12)
}

impl CFormat {
    pub fn extract(self, s: &mut DecodeContext) {
        let raw = s.raw;
        let (dest, src1, src2) = match self {
            CFormat::Ciw => {
                let nzuimm = (bits(raw, 12, 11) << 4)
                    | (bits(raw, 10, 7) << 6)
                    | (bit(raw, 6) << 2)
                    | (bit(raw, 5) << 3);
                (creg(bits(raw, 4, 2)), SP, Operand::Imm(nzuimm as u64))
            }
            CFormat::ClW => (creg(bits(raw, 4, 2)), creg(bits(raw, 9, 7)), Operand::Imm(uimm_w(raw))),
            CFormat::ClD => (creg(bits(raw, 4, 2)), creg(bits(raw, 9, 7)), Operand::Imm(uimm_d(raw))),
            CFormat::CsW => (creg(bits(raw, 4, 2)), creg(bits(raw, 9, 7)), Operand::Imm(uimm_w(raw))),
            CFormat::CsD => (creg(bits(raw, 4, 2)), creg(bits(raw, 9, 7)), Operand::Imm(uimm_d(raw))),
            CFormat::CiAddi => {
                let r = reg(bits(raw, 11, 7));
                (r, r, Operand::Imm(simm6(raw)))
            }
            CFormat::CiLi => (reg(bits(raw, 11, 7)), ZERO, Operand::Imm(simm6(raw))),
            CFormat::CiLui => {
                let imm = sext(((bit(raw, 12) << 17) | (bits(raw, 6, 2) << 12)) as u64, 18);
                (reg(bits(raw, 11, 7)), Operand::Imm(imm), Operand::None)
            }
            CFormat::CiAddi16sp => {
                let v = (bit(raw, 12) << 9)
                    | (bit(raw, 6) << 4)
                    | (bit(raw, 5) << 6)
                    | (bits(raw, 4, 3) << 7)
                    | (bit(raw, 2) << 5);
                (SP, SP, Operand::Imm(sext(v as u64, 10)))
            }
            CFormat::CiShamt => {
                let r = reg(bits(raw, 11, 7));
                (r, r, Operand::Imm(shamt6(raw)))
            }
            CFormat::CiLwsp => {
                let v = (bit(raw, 12) << 5) | (bits(raw, 6, 4) << 2) | (bits(raw, 3, 2) << 6);
                (reg(bits(raw, 11, 7)), SP, Operand::Imm(v as u64))
            }
            CFormat::CiLdsp => {
                let v = (bit(raw, 12) << 5) | (bits(raw, 6, 5) << 3) | (bits(raw, 4, 2) << 6);
                (reg(bits(raw, 11, 7)), SP, Operand::Imm(v as u64))
            }
            CFormat::CssSwsp => {
                let v = (bits(raw, 12, 9) << 2) | (bits(raw, 8, 7) << 6);
                (reg(bits(raw, 6, 2)), SP, Operand::Imm(v as u64))
            }
            CFormat::CssSdsp => {
                let v = (bits(raw, 12, 10) << 3) | (bits(raw, 9, 7) << 6);
                (reg(bits(raw, 6, 2)), SP, Operand::Imm(v as u64))
            }
            CFormat::CrMv => (reg(bits(raw, 11, 7)), ZERO, reg(bits(raw, 6, 2))),
            CFormat::CrAdd => {
                let r = reg(bits(raw, 11, 7));
                (r, r, reg(bits(raw, 6, 2)))
            }
            CFormat::CrJr => (ZERO, reg(bits(raw, 11, 7)), Operand::Imm(0)),
            CFormat::CrJalr => (RA, reg(bits(raw, 11, 7)), Operand::Imm(0)),
            CFormat::Ca => {
                let r = creg(bits(raw, 9, 7));
                (r, r, creg(bits(raw, 4, 2)))
            }
            CFormat::CbShamt => {
                let r = creg(bits(raw, 9, 7));
                (r, r, Operand::Imm(shamt6(raw)))
            }
            CFormat::CbAndi => {
                let r = creg(bits(raw, 9, 7));
                (r, r, Operand::Imm(simm6(raw)))
            }
            CFormat::Cb => (
                Operand::Imm(s.pc.wrapping_add(imm_cb(raw))),
                creg(bits(raw, 9, 7)),
                ZERO,
            ),
            CFormat::Cj => (ZERO, Operand::Imm(s.pc.wrapping_add(imm_cj(raw))), Operand::None),
        };
        s.dest = dest;
        s.src1 = src1;
        s.src2 = src2;
    }
}

fn c(f: CFormat) -> Option<Format> {
    Some(Format::C(f))
}

/// Builds the 16-bit table. Reserved encodings that would otherwise fall
/// into a coarser entry are claimed as `Op::Inv` ahead of it.
pub fn register(b: &mut TableBuilder, cfg: &IsaConfig) -> Result<TableId, TableError> {
    use CFormat::*;
    let t = b.table("rvc", 16);
    let fpd = cfg.fpu == FpuMode::Double;

    // Quadrant 0
    b.push(t, "000 0 00000 00??? 00", None, Op::Inv)?;
    b.push(t, "000 ? ????? ????? 00", c(Ciw), Op::CAddi4spn)?;
    if fpd {
        b.push(t, "001 ? ????? ????? 00", c(ClD), Op::CFld)?;
    }
    b.push(t, "010 ? ????? ????? 00", c(ClW), Op::CLw)?;
    b.push(t, "011 ? ????? ????? 00", c(ClD), Op::CLd)?;
    if fpd {
        b.push(t, "101 ? ????? ????? 00", c(CsD), Op::CFsd)?;
    }
    b.push(t, "110 ? ????? ????? 00", c(CsW), Op::CSw)?;
    b.push(t, "111 ? ????? ????? 00", c(CsD), Op::CSd)?;

    // Quadrant 1
    b.push(t, "000 ? 00000 ????? 01", Some(Format::None), Op::CNop)?;
    b.push(t, "000 ? ????? ????? 01", c(CiAddi), Op::CAddi)?;
    b.push(t, "001 ? 00000 ????? 01", None, Op::Inv)?;
    b.push(t, "001 ? ????? ????? 01", c(CiAddi), Op::CAddiw)?;
    b.push(t, "010 ? ????? ????? 01", c(CiLi), Op::CLi)?;
    b.push(t, "011 0 00010 00000 01", None, Op::Inv)?;
    b.push(t, "011 ? 00010 ????? 01", c(CiAddi16sp), Op::CAddi16sp)?;
    b.push(t, "011 0 ????? 00000 01", None, Op::Inv)?;
    b.push(t, "011 ? ????? ????? 01", c(CiLui), Op::CLui)?;
    b.push(t, "100 ? 00 ??? ????? 01", c(CbShamt), Op::CSrli)?;
    b.push(t, "100 ? 01 ??? ????? 01", c(CbShamt), Op::CSrai)?;
    b.push(t, "100 ? 10 ??? ????? 01", c(CbAndi), Op::CAndi)?;
    b.push(t, "100 0 11 ??? 00 ??? 01", c(Ca), Op::CSub)?;
    b.push(t, "100 0 11 ??? 01 ??? 01", c(Ca), Op::CXor)?;
    b.push(t, "100 0 11 ??? 10 ??? 01", c(Ca), Op::COr)?;
    b.push(t, "100 0 11 ??? 11 ??? 01", c(Ca), Op::CAnd)?;
    b.push(t, "100 1 11 ??? 00 ??? 01", c(Ca), Op::CSubw)?;
    b.push(t, "100 1 11 ??? 01 ??? 01", c(Ca), Op::CAddw)?;
    b.push(t, "101 ? ????? ????? 01", c(Cj), Op::CJ)?;
    b.push(t, "110 ? ????? ????? 01", c(Cb), Op::CBeqz)?;
    b.push(t, "111 ? ????? ????? 01", c(Cb), Op::CBnez)?;

    // Quadrant 2
    b.push(t, "000 ? ????? ????? 10", c(CiShamt), Op::CSlli)?;
    if fpd {
        b.push(t, "001 ? ????? ????? 10", c(CiLdsp), Op::CFldsp)?;
    }
    b.push(t, "010 ? 00000 ????? 10", None, Op::Inv)?;
    b.push(t, "010 ? ????? ????? 10", c(CiLwsp), Op::CLwsp)?;
    b.push(t, "011 ? 00000 ????? 10", None, Op::Inv)?;
    b.push(t, "011 ? ????? ????? 10", c(CiLdsp), Op::CLdsp)?;
    b.push(t, "100 0 00000 00000 10", None, Op::Inv)?;
    b.push(t, "100 0 ????? 00000 10", c(CrJr), Op::CJr)?;
    b.push(t, "100 0 ????? ????? 10", c(CrMv), Op::CMv)?;
    b.push(t, "100 1 00000 00000 10", Some(Format::None), Op::CEbreak)?;
    b.push(t, "100 1 ????? 00000 10", c(CrJalr), Op::CJalr)?;
    b.push(t, "100 1 ????? ????? 10", c(CrAdd), Op::CAdd)?;
    if fpd {
        b.push(t, "101 ? ????? ????? 10", c(CssSdsp), Op::CFsdsp)?;
    }
    b.push(t, "110 ? ????? ????? 10", c(CssSwsp), Op::CSwsp)?;
    b.push(t, "111 ? ????? ????? 10", c(CssSdsp), Op::CSdsp)?;

    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(f: CFormat, pc: u64, raw: u16) -> DecodeContext {
        let mut s = DecodeContext::with_raw(pc, raw as u32);
        f.extract(&mut s);
        s
    }

    #[test]
    fn reserved_forms_are_invalid() {
        let mut b = TableBuilder::new();
        let t = register(&mut b, &IsaConfig::default()).unwrap();
        let tables = b.finish();
        // c.addi16sp with nzimm = 0
        assert_eq!(tables.lookup(t, 0x6101).op, Op::Inv);
        // c.lui x1 with nzimm = 0
        assert_eq!(tables.lookup(t, 0x6081).op, Op::Inv);
        // c.lwsp x0 and c.ldsp x0
        assert_eq!(tables.lookup(t, 0x4002).op, Op::Inv);
        assert_eq!(tables.lookup(t, 0x6002).op, Op::Inv);
        // neighbours keep their meaning
        assert_eq!(tables.lookup(t, 0x6141).op, Op::CAddi16sp);
        assert_eq!(tables.lookup(t, 0x6085).op, Op::CLui);
        assert_eq!(tables.lookup(t, 0x4082).op, Op::CLwsp);
        assert_eq!(tables.lookup(t, 0x60A2).op, Op::CLdsp);
    }

    #[test]
    fn addi4spn_scales_unsigned() {
        // c.addi4spn x8, sp, 16: nzuimm[4] sits at bit 11
        let s = extract(CFormat::Ciw, 0, 0x0800);
        assert_eq!((s.dest, s.src1, s.src2), (Operand::Reg(8), SP, Operand::Imm(16)));
    }

    #[test]
    fn cb_offset_is_signed() {
        // c.beqz x8, -2: offset bits all ones except bit 0
        let raw = 0b110_1_11_000_11_11_1_01u16;
        let s = extract(CFormat::Cb, 0x100, raw);
        assert_eq!(s.src1, Operand::Reg(8));
        assert_eq!(s.dest, Operand::Imm(0xFE));
        assert_eq!(imm_cb(0b110_0_00_000_00_00_1_01) as i64, 32);
    }

    #[test]
    fn cj_offset_round_trips_known_encoding() {
        // c.j -4 assembles to 0xBFF5
        assert_eq!(imm_cj(0xBFF5) as i64, -4);
        let s = extract(CFormat::Cj, 0x2004, 0xBFF5);
        assert_eq!(s.src1, Operand::Imm(0x2000));
        assert_eq!(s.dest, ZERO);
    }

    #[test]
    fn jalr_links_through_ra() {
        // c.jalr x5
        let s = extract(CFormat::CrJalr, 0, 0x9282);
        assert_eq!((s.dest, s.src1), (RA, Operand::Reg(5)));
    }

    #[test]
    fn lui_sign_extends_from_bit_17() {
        // c.lui x10, 0xfffff (nzimm = -1)
        let s = extract(CFormat::CiLui, 0, 0x757D);
        assert_eq!(s.dest, Operand::Reg(10));
        assert_eq!(s.src1, Operand::Imm(0xFFFF_FFFF_FFFF_F000));
    }

    #[test]
    fn sp_relative_offsets() {
        // c.ldsp x1, 8(sp) = 0x60A2
        let s = extract(CFormat::CiLdsp, 0, 0x60A2);
        assert_eq!((s.dest, s.src1, s.src2), (RA, SP, Operand::Imm(8)));
        // c.sdsp x1, 8(sp) = 0xE406
        let s = extract(CFormat::CssSdsp, 0, 0xE406);
        assert_eq!((s.dest, s.src1, s.src2), (RA, SP, Operand::Imm(8)));
    }
}
