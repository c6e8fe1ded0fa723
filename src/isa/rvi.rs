//! RV64I sub-tables, keyed on funct3/funct7 under each major opcode.

use crate::decoder::Op;
use crate::pattern::{TableBuilder, TableError, TableId};

/// Tables owned by the base integer module.
#[derive(Debug, Clone, Copy)]
pub struct BaseTables {
    pub load: TableId,
    pub store: TableId,
    pub op_imm: TableId,
    pub op_imm32: TableId,
    pub op: TableId,
    pub op32: TableId,
    pub branch: TableId,
    pub jal: TableId,
    pub jalr: TableId,
    pub fence: TableId,
}

pub fn register(b: &mut TableBuilder) -> Result<BaseTables, TableError> {
    let load = b.table("load", 32);
    b.push(load, "??????? ????? ????? 000 ????? ????? ??", None, Op::Lb)?;
    b.push(load, "??????? ????? ????? 001 ????? ????? ??", None, Op::Lh)?;
    b.push(load, "??????? ????? ????? 010 ????? ????? ??", None, Op::Lw)?;
    b.push(load, "??????? ????? ????? 011 ????? ????? ??", None, Op::Ld)?;
    b.push(load, "??????? ????? ????? 100 ????? ????? ??", None, Op::Lbu)?;
    b.push(load, "??????? ????? ????? 101 ????? ????? ??", None, Op::Lhu)?;
    b.push(load, "??????? ????? ????? 110 ????? ????? ??", None, Op::Lwu)?;

    let store = b.table("store", 32);
    b.push(store, "??????? ????? ????? 000 ????? ????? ??", None, Op::Sb)?;
    b.push(store, "??????? ????? ????? 001 ????? ????? ??", None, Op::Sh)?;
    b.push(store, "??????? ????? ????? 010 ????? ????? ??", None, Op::Sw)?;
    b.push(store, "??????? ????? ????? 011 ????? ????? ??", None, Op::Sd)?;

    // RV64 shifts take a 6-bit shamt, so bit 25 belongs to the immediate.
    let op_imm = b.table("op-imm", 32);
    b.push(op_imm, "??????? ????? ????? 000 ????? ????? ??", None, Op::Addi)?;
    b.push(op_imm, "000000? ????? ????? 001 ????? ????? ??", None, Op::Slli)?;
    b.push(op_imm, "??????? ????? ????? 010 ????? ????? ??", None, Op::Slti)?;
    b.push(op_imm, "??????? ????? ????? 011 ????? ????? ??", None, Op::Sltiu)?;
    b.push(op_imm, "??????? ????? ????? 100 ????? ????? ??", None, Op::Xori)?;
    b.push(op_imm, "000000? ????? ????? 101 ????? ????? ??", None, Op::Srli)?;
    b.push(op_imm, "010000? ????? ????? 101 ????? ????? ??", None, Op::Srai)?;
    b.push(op_imm, "??????? ????? ????? 110 ????? ????? ??", None, Op::Ori)?;
    b.push(op_imm, "??????? ????? ????? 111 ????? ????? ??", None, Op::Andi)?;

    let op_imm32 = b.table("op-imm-32", 32);
    b.push(op_imm32, "??????? ????? ????? 000 ????? ????? ??", None, Op::Addiw)?;
    b.push(op_imm32, "0000000 ????? ????? 001 ????? ????? ??", None, Op::Slliw)?;
    b.push(op_imm32, "0000000 ????? ????? 101 ????? ????? ??", None, Op::Srliw)?;
    b.push(op_imm32, "0100000 ????? ????? 101 ????? ????? ??", None, Op::Sraiw)?;

    let op = b.table("op", 32);
    b.push(op, "0000000 ????? ????? 000 ????? ????? ??", None, Op::Add)?;
    b.push(op, "0100000 ????? ????? 000 ????? ????? ??", None, Op::Sub)?;
    b.push(op, "0000000 ????? ????? 001 ????? ????? ??", None, Op::Sll)?;
    b.push(op, "0000000 ????? ????? 010 ????? ????? ??", None, Op::Slt)?;
    b.push(op, "0000000 ????? ????? 011 ????? ????? ??", None, Op::Sltu)?;
    b.push(op, "0000000 ????? ????? 100 ????? ????? ??", None, Op::Xor)?;
    b.push(op, "0000000 ????? ????? 101 ????? ????? ??", None, Op::Srl)?;
    b.push(op, "0100000 ????? ????? 101 ????? ????? ??", None, Op::Sra)?;
    b.push(op, "0000000 ????? ????? 110 ????? ????? ??", None, Op::Or)?;
    b.push(op, "0000000 ????? ????? 111 ????? ????? ??", None, Op::And)?;

    let op32 = b.table("op-32", 32);
    b.push(op32, "0000000 ????? ????? 000 ????? ????? ??", None, Op::Addw)?;
    b.push(op32, "0100000 ????? ????? 000 ????? ????? ??", None, Op::Subw)?;
    b.push(op32, "0000000 ????? ????? 001 ????? ????? ??", None, Op::Sllw)?;
    b.push(op32, "0000000 ????? ????? 101 ????? ????? ??", None, Op::Srlw)?;
    b.push(op32, "0100000 ????? ????? 101 ????? ????? ??", None, Op::Sraw)?;

    // Compare-with-zero pseudo forms come first so they win over the general branch.
    let branch = b.table("branch", 32);
    b.push(branch, "??????? 00000 ????? 100 ????? ????? ??", None, Op::PBltz)?;
    b.push(branch, "??????? 00000 ????? 101 ????? ????? ??", None, Op::PBgez)?;
    b.push(branch, "??????? ????? 00000 100 ????? ????? ??", None, Op::PBgtz)?;
    b.push(branch, "??????? ????? 00000 101 ????? ????? ??", None, Op::PBlez)?;
    b.push(branch, "??????? ????? ????? 000 ????? ????? ??", None, Op::Beq)?;
    b.push(branch, "??????? ????? ????? 001 ????? ????? ??", None, Op::Bne)?;
    b.push(branch, "??????? ????? ????? 100 ????? ????? ??", None, Op::Blt)?;
    b.push(branch, "??????? ????? ????? 101 ????? ????? ??", None, Op::Bge)?;
    b.push(branch, "??????? ????? ????? 110 ????? ????? ??", None, Op::Bltu)?;
    b.push(branch, "??????? ????? ????? 111 ????? ????? ??", None, Op::Bgeu)?;

    let jal = b.table("jal", 32);
    b.push(jal, "??????? ????? ????? ??? 00001 ????? ??", None, Op::PJal)?;
    b.push(jal, "??????? ????? ????? ??? ????? ????? ??", None, Op::Jal)?;

    let jalr = b.table("jalr", 32);
    b.push(jalr, "0000000 00000 00001 000 00000 ????? ??", None, Op::PRet)?;
    b.push(jalr, "??????? ????? ????? 000 ????? ????? ??", None, Op::Jalr)?;

    let fence = b.table("fence", 32);
    b.push(fence, "??????? ????? ????? 000 ????? ????? ??", None, Op::Fence)?;
    b.push(fence, "??????? ????? ????? 001 ????? ????? ??", None, Op::FenceI)?;

    Ok(BaseTables {
        load,
        store,
        op_imm,
        op_imm32,
        op,
        op32,
        branch,
        jal,
        jalr,
        fence,
    })
}
