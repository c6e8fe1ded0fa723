use serde::{Deserialize, Serialize};

use crate::decoder::{DecodeContext, Operand};
use crate::isa::rvc::CFormat;
use crate::isa::rvv::VFormat;

/// Operand layout of a matched entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// rd, rs1, rs2
    R,
    /// rd, rs1, imm[11:0]
    I,
    /// rs2 (in `dest`), rs1, imm[11:5|4:0]
    S,
    /// rd, imm[31:12] << 12
    U,
    /// rs1, rs2, pc-relative target (in `dest`)
    B,
    /// rd, pc-relative target (in `src1`)
    J,
    /// rd, rs1, rs2, rs3
    R4,
    /// rd, rs1, csr
    Csr,
    /// rd, uimm[4:0], csr
    CsrI,
    None,
    C(CFormat),
    V(VFormat),
}

impl Format {
    pub fn extract(self, s: &mut DecodeContext) {
        match self {
            Format::R => decode_r(s),
            Format::I => decode_i(s),
            Format::S => decode_s(s),
            Format::U => decode_u(s),
            Format::B => decode_b(s),
            Format::J => decode_j(s),
            Format::R4 => decode_r4(s),
            Format::Csr => decode_csr(s),
            Format::CsrI => decode_csri(s),
            Format::None => {}
            Format::C(f) => f.extract(s),
            Format::V(f) => f.extract(s),
        }
    }
}

/// Bits `hi..=lo` of `raw`, shifted down.
#[inline]
pub fn bits(raw: u32, hi: u32, lo: u32) -> u32 {
    (raw >> lo) & ((1u32 << (hi - lo + 1)) - 1)
}

#[inline]
pub fn bit(raw: u32, n: u32) -> u32 {
    (raw >> n) & 1
}

/// Sign-extend the low `width` bits of `v` to 64 bits.
#[inline]
pub fn sext(v: u64, width: u32) -> u64 {
    let s = 64 - width;
    ((v << s) as i64 >> s) as u64
}

#[inline]
pub fn rd(raw: u32) -> u8 {
    bits(raw, 11, 7) as u8
}

#[inline]
pub fn rs1(raw: u32) -> u8 {
    bits(raw, 19, 15) as u8
}

#[inline]
pub fn rs2(raw: u32) -> u8 {
    bits(raw, 24, 20) as u8
}

#[inline]
pub fn rs3(raw: u32) -> u8 {
    bits(raw, 31, 27) as u8
}

#[inline]
pub fn funct3(raw: u32) -> u32 {
    bits(raw, 14, 12)
}

#[inline]
pub fn csr(raw: u32) -> u32 {
    bits(raw, 31, 20)
}

pub fn imm_i(raw: u32) -> u64 {
    sext(bits(raw, 31, 20) as u64, 12)
}

pub fn imm_s(raw: u32) -> u64 {
    let v = (bits(raw, 31, 25) << 5) | bits(raw, 11, 7);
    sext(v as u64, 12)
}

pub fn imm_u(raw: u32) -> u64 {
    sext((raw & 0xFFFF_F000) as u64, 32)
}

/// imm[12|10:5] in 31:25, imm[4:1|11] in 11:7.
pub fn imm_b(raw: u32) -> u64 {
    let v = (bit(raw, 31) << 12)
        | (bit(raw, 7) << 11)
        | (bits(raw, 30, 25) << 5)
        | (bits(raw, 11, 8) << 1);
    sext(v as u64, 13)
}

/// imm[20|10:1|11|19:12] in 31:12.
pub fn imm_j(raw: u32) -> u64 {
    let v = (bit(raw, 31) << 20)
        | (bits(raw, 19, 12) << 12)
        | (bit(raw, 20) << 11)
        | (bits(raw, 30, 21) << 1);
    sext(v as u64, 21)
}

fn decode_r(s: &mut DecodeContext) {
    let raw = s.raw;
    s.dest = Operand::Reg(rd(raw));
    s.src1 = Operand::Reg(rs1(raw));
    s.src2 = Operand::Reg(rs2(raw));
}

fn decode_i(s: &mut DecodeContext) {
    let raw = s.raw;
    s.dest = Operand::Reg(rd(raw));
    s.src1 = Operand::Reg(rs1(raw));
    s.src2 = Operand::Imm(imm_i(raw));
}

fn decode_s(s: &mut DecodeContext) {
    let raw = s.raw;
    s.dest = Operand::Reg(rs2(raw));
    s.src1 = Operand::Reg(rs1(raw));
    s.src2 = Operand::Imm(imm_s(raw));
}

fn decode_u(s: &mut DecodeContext) {
    s.dest = Operand::Reg(rd(s.raw));
    s.src1 = Operand::Imm(imm_u(s.raw));
}

fn decode_b(s: &mut DecodeContext) {
    let raw = s.raw;
    s.src1 = Operand::Reg(rs1(raw));
    s.src2 = Operand::Reg(rs2(raw));
    s.dest = Operand::Imm(s.pc.wrapping_add(imm_b(raw)));
}

fn decode_j(s: &mut DecodeContext) {
    s.dest = Operand::Reg(rd(s.raw));
    s.src1 = Operand::Imm(s.pc.wrapping_add(imm_j(s.raw)));
}

fn decode_r4(s: &mut DecodeContext) {
    decode_r(s);
    s.src3 = Operand::Reg(rs3(s.raw));
}

fn decode_csr(s: &mut DecodeContext) {
    let raw = s.raw;
    s.dest = Operand::Reg(rd(raw));
    s.src1 = Operand::Reg(rs1(raw));
    s.src2 = Operand::Imm(csr(raw) as u64);
}

fn decode_csri(s: &mut DecodeContext) {
    let raw = s.raw;
    s.dest = Operand::Reg(rd(raw));
    s.src1 = Operand::Imm(rs1(raw) as u64);
    s.src2 = Operand::Imm(csr(raw) as u64);
}
