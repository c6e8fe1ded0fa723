use riscv_rs::{DecodeContext, Decoder, IsaConfig, Op, Operand, Rv64Decoder};

fn enc_r(f7: u32, rs2: u32, rs1: u32, f3: u32, rd: u32, opc: u32) -> u32 {
    (f7 << 25) | (rs2 << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opc
}

fn enc_i(imm: i32, rs1: u32, f3: u32, rd: u32, opc: u32) -> u32 {
    (((imm as u32) & 0xFFF) << 20) | (rs1 << 15) | (f3 << 12) | (rd << 7) | opc
}

fn decode(raw: u32) -> DecodeContext {
    let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
    let mut s = DecodeContext::with_raw(0, raw);
    dec.decode(&mut s);
    s
}

#[test]
fn register_register_ops() {
    let cases = [
        (0b0000000, 0b000, Op::Add),
        (0b0100000, 0b000, Op::Sub),
        (0b0000000, 0b001, Op::Sll),
        (0b0000000, 0b010, Op::Slt),
        (0b0000000, 0b011, Op::Sltu),
        (0b0000000, 0b100, Op::Xor),
        (0b0000000, 0b101, Op::Srl),
        (0b0100000, 0b101, Op::Sra),
        (0b0000000, 0b110, Op::Or),
        (0b0000000, 0b111, Op::And),
        (0b0000001, 0b000, Op::Mul),
        (0b0000001, 0b011, Op::Mulhu),
        (0b0000001, 0b100, Op::Div),
        (0b0000001, 0b111, Op::Remu),
    ];
    for (f7, f3, op) in cases {
        let s = decode(enc_r(f7, 3, 2, f3, 1, 0x33));
        assert_eq!(s.op, op, "funct7 {f7:07b} funct3 {f3:03b}");
        assert_eq!(s.dest, Operand::Reg(1));
        assert_eq!(s.src1, Operand::Reg(2));
        assert_eq!(s.src2, Operand::Reg(3));
    }
    // sub with funct3 001 does not exist
    assert_eq!(decode(enc_r(0b0100000, 3, 2, 0b001, 1, 0x33)).op, Op::Inv);
}

#[test]
fn word_ops() {
    assert_eq!(decode(enc_r(0, 3, 2, 0b000, 1, 0x3B)).op, Op::Addw);
    assert_eq!(decode(enc_r(0b0100000, 3, 2, 0b101, 1, 0x3B)).op, Op::Sraw);
    assert_eq!(decode(enc_r(0b0000001, 3, 2, 0b000, 1, 0x3B)).op, Op::Mulw);
    assert_eq!(decode(enc_r(0b0000001, 3, 2, 0b111, 1, 0x3B)).op, Op::Remuw);
    // mulhw does not exist
    assert_eq!(decode(enc_r(0b0000001, 3, 2, 0b001, 1, 0x3B)).op, Op::Inv);
    // slliw with shamt[5] set is reserved
    assert_eq!(decode(enc_i(0x20, 2, 0b001, 1, 0x1B)).op, Op::Inv);
    let s = decode(enc_i(-1, 2, 0b000, 1, 0x1B));
    assert_eq!(s.op, Op::Addiw);
    assert_eq!(s.src2, Operand::Imm(u64::MAX));
}

#[test]
fn shifts_take_six_bit_shamt() {
    let s = decode(enc_i(63, 2, 0b001, 1, 0x13));
    assert_eq!(s.op, Op::Slli);
    assert_eq!(s.src2, Operand::Imm(63));
    // srai x1, x2, 33: imm field = 0x400 | 33
    let s = decode(enc_i(0x421, 2, 0b101, 1, 0x13));
    assert_eq!(s.op, Op::Srai);
    assert_eq!(s.src2.imm().map(|v| v & 0x3F), Some(33));
}

#[test]
fn upper_immediates() {
    // lui x3, 0x80000
    let s = decode(0x8000_01B7);
    assert_eq!(s.op, Op::Lui);
    assert_eq!(s.src1, Operand::Imm(0xFFFF_FFFF_8000_0000));
    // auipc x5, 0x1
    let s = decode(0x0000_1297);
    assert_eq!(s.op, Op::Auipc);
    assert_eq!(s.dest, Operand::Reg(5));
    assert_eq!(s.src1, Operand::Imm(0x1000));
}

#[test]
fn compressed_alu() {
    // c.sub x8, x9
    let s = decode(0x8C05);
    assert_eq!(s.op, Op::CSub);
    assert_eq!(s.dest, Operand::Reg(8));
    assert_eq!(s.src1, Operand::Reg(8));
    assert_eq!(s.src2, Operand::Reg(9));
    // c.srai x8, 1
    let s = decode(0x8405);
    assert_eq!(s.op, Op::CSrai);
    assert_eq!(s.src2, Operand::Imm(1));
    // c.addi16sp sp, 16
    let s = decode(0x6141);
    assert_eq!(s.op, Op::CAddi16sp);
    assert_eq!(s.src2, Operand::Imm(16));
}

#[test]
fn compressed_reserved_encodings() {
    // all-zero half-word
    assert_eq!(decode(0x0000).op, Op::Inv);
    // c.addiw with rd = x0
    assert_eq!(decode(0x2005).op, Op::Inv);
    // c.jr with rs1 = x0
    assert_eq!(decode(0x8002).op, Op::Inv);
    assert_eq!(decode(0x9002).op, Op::CEbreak);
}
