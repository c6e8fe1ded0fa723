use riscv_rs::{DecodeContext, Decoder, InstrType, IsaConfig, Op, Operand, Rv64Decoder};

// J-type: imm[20|10:1|11|19:12] rd 1101111
fn enc_j(off: i32, rd: u32) -> u32 {
    let o = (off as u32) & 0x1F_FFFF;
    (((o >> 20) & 1) << 31)
        | (((o >> 1) & 0x3FF) << 21)
        | (((o >> 11) & 1) << 20)
        | (((o >> 12) & 0xFF) << 12)
        | (rd << 7)
        | 0x6F
}

fn enc_jalr(imm: i32, rs1: u32, rd: u32) -> u32 {
    (((imm as u32) & 0xFFF) << 20) | (rs1 << 15) | (rd << 7) | 0x67
}

fn decode(pc: u64, raw: u32) -> DecodeContext {
    let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
    let mut s = DecodeContext::with_raw(pc, raw);
    dec.decode(&mut s);
    s
}

#[test]
fn jal_ra_is_the_call_pseudo_form() {
    let s = decode(0x200, enc_j(16, 1));
    assert_eq!(s.op, Op::PJal);
    assert_eq!(s.ty, InstrType::Jump);
    assert_eq!(s.dest, Operand::Reg(1));
    assert_eq!(s.jnpc, 0x210);
}

#[test]
fn plain_jal_keeps_its_rd() {
    let s = decode(0x200, enc_j(-8, 0));
    assert_eq!(s.op, Op::Jal);
    assert_eq!(s.dest, Operand::Reg(0));
    assert_eq!(s.jnpc, 0x1F8);

    let s = decode(0x200, enc_j(0x8_0000, 5));
    assert_eq!(s.op, Op::Jal);
    assert_eq!(s.jnpc, 0x200 + 0x8_0000);
}

#[test]
fn jalr_is_indirect() {
    let s = decode(0x300, enc_jalr(4, 5, 1));
    assert_eq!(s.op, Op::Jalr);
    assert_eq!(s.ty, InstrType::Indirect);
    assert_eq!(s.src1, Operand::Reg(5));
    assert_eq!(s.src2, Operand::Imm(4));
    // target unknown statically
    assert_eq!(s.jnpc, 0x300);
}

#[test]
fn ret_pseudo_form() {
    let s = decode(0, 0x0000_8067);
    assert_eq!(s.op, Op::PRet);
    assert_eq!(s.ty, InstrType::Indirect);
    // jalr x0, 4(x1) is not ret
    assert_eq!(decode(0, enc_jalr(4, 1, 0)).op, Op::Jalr);
    // funct3 != 000 is reserved
    assert_eq!(decode(0, 0x0000_9067).op, Op::Inv);
}

#[test]
fn compressed_jumps() {
    let s = decode(0x2004, 0xBFF5);
    assert_eq!(s.op, Op::CJ);
    assert_eq!(s.ty, InstrType::Jump);
    assert_eq!(s.jnpc, 0x2000);

    // c.jalr x5 links through ra
    let s = decode(0, 0x9282);
    assert_eq!(s.op, Op::CJalr);
    assert_eq!(s.ty, InstrType::Indirect);
    assert_eq!(s.dest, Operand::Reg(1));
    assert_eq!(s.src1, Operand::Reg(5));

    // c.jr ra
    let s = decode(0, 0x8082);
    assert_eq!(s.op, Op::CJr);
    assert_eq!(s.dest, Operand::Reg(0));
    assert_eq!(s.ty, InstrType::Indirect);
}
