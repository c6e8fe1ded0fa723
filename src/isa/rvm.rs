//! RV64M: funct7 = 0000001 under OP and OP-32.

use crate::decoder::Op;
use crate::pattern::{TableBuilder, TableError, TableId};

#[derive(Debug, Clone, Copy)]
pub struct MulDivTables {
    pub op: TableId,
    pub op32: TableId,
}

pub fn register(b: &mut TableBuilder) -> Result<MulDivTables, TableError> {
    let op = b.table("rvm", 32);
    let ops = [
        Op::Mul,
        Op::Mulh,
        Op::Mulhsu,
        Op::Mulhu,
        Op::Div,
        Op::Divu,
        Op::Rem,
        Op::Remu,
    ];
    for (template, op_id) in FUNCT3.into_iter().zip(ops) {
        b.push(op, template, None, op_id)?;
    }

    let op32 = b.table("rvm-32", 32);
    b.push(op32, FUNCT3[0], None, Op::Mulw)?;
    b.push(op32, FUNCT3[4], None, Op::Divw)?;
    b.push(op32, FUNCT3[5], None, Op::Divuw)?;
    b.push(op32, FUNCT3[6], None, Op::Remw)?;
    b.push(op32, FUNCT3[7], None, Op::Remuw)?;

    Ok(MulDivTables { op, op32 })
}

const FUNCT3: [&str; 8] = [
    "??????? ????? ????? 000 ????? ????? ??",
    "??????? ????? ????? 001 ????? ????? ??",
    "??????? ????? ????? 010 ????? ????? ??",
    "??????? ????? ????? 011 ????? ????? ??",
    "??????? ????? ????? 100 ????? ????? ??",
    "??????? ????? ????? 101 ????? ????? ??",
    "??????? ????? ????? 110 ????? ????? ??",
    "??????? ????? ????? 111 ????? ????? ??",
];
