//! RV64F: single-precision loads/stores, fused multiply-add and OP-FP.

use crate::decoder::Op;
use crate::pattern::{TableBuilder, TableError, TableId};

/// Tables one floating-point precision contributes. The decoder composes
/// the per-precision tables into the shared LOAD-FP, STORE-FP, fused and
/// OP-FP groups.
#[derive(Debug, Clone, Copy)]
pub struct FpTables {
    pub load: TableId,
    pub store: TableId,
    pub fmadd: TableId,
    pub op_fp: TableId,
}

pub fn register(b: &mut TableBuilder) -> Result<FpTables, TableError> {
    let load = b.table("flw", 32);
    b.push(load, "??????? ????? ????? 010 ????? ????? ??", None, Op::Flw)?;

    let store = b.table("fsw", 32);
    b.push(store, "??????? ????? ????? 010 ????? ????? ??", None, Op::Fsw)?;

    // fmt = 00 in bits 26:25; the major opcode picks the variant
    let fmadd = b.table("fmadd.s", 32);
    b.push(fmadd, "?????00 ????? ????? ??? ????? 10000 ??", None, Op::FmaddS)?;
    b.push(fmadd, "?????00 ????? ????? ??? ????? 10001 ??", None, Op::FmsubS)?;
    b.push(fmadd, "?????00 ????? ????? ??? ????? 10010 ??", None, Op::FnmsubS)?;
    b.push(fmadd, "?????00 ????? ????? ??? ????? 10011 ??", None, Op::FnmaddS)?;

    let op_fp = b.table("op-fp.s", 32);
    b.push(op_fp, "0000000 ????? ????? ??? ????? ????? ??", None, Op::FaddS)?;
    b.push(op_fp, "0000100 ????? ????? ??? ????? ????? ??", None, Op::FsubS)?;
    b.push(op_fp, "0001000 ????? ????? ??? ????? ????? ??", None, Op::FmulS)?;
    b.push(op_fp, "0001100 ????? ????? ??? ????? ????? ??", None, Op::FdivS)?;
    b.push(op_fp, "0101100 00000 ????? ??? ????? ????? ??", None, Op::FsqrtS)?;
    b.push(op_fp, "0010000 ????? ????? 000 ????? ????? ??", None, Op::FsgnjS)?;
    b.push(op_fp, "0010000 ????? ????? 001 ????? ????? ??", None, Op::FsgnjnS)?;
    b.push(op_fp, "0010000 ????? ????? 010 ????? ????? ??", None, Op::FsgnjxS)?;
    b.push(op_fp, "0010100 ????? ????? 000 ????? ????? ??", None, Op::FminS)?;
    b.push(op_fp, "0010100 ????? ????? 001 ????? ????? ??", None, Op::FmaxS)?;
    b.push(op_fp, "1100000 00000 ????? ??? ????? ????? ??", None, Op::FcvtWS)?;
    b.push(op_fp, "1100000 00001 ????? ??? ????? ????? ??", None, Op::FcvtWuS)?;
    b.push(op_fp, "1100000 00010 ????? ??? ????? ????? ??", None, Op::FcvtLS)?;
    b.push(op_fp, "1100000 00011 ????? ??? ????? ????? ??", None, Op::FcvtLuS)?;
    b.push(op_fp, "1110000 00000 ????? 000 ????? ????? ??", None, Op::FmvXW)?;
    b.push(op_fp, "1110000 00000 ????? 001 ????? ????? ??", None, Op::FclassS)?;
    b.push(op_fp, "1010000 ????? ????? 010 ????? ????? ??", None, Op::FeqS)?;
    b.push(op_fp, "1010000 ????? ????? 001 ????? ????? ??", None, Op::FltS)?;
    b.push(op_fp, "1010000 ????? ????? 000 ????? ????? ??", None, Op::FleS)?;
    b.push(op_fp, "1101000 00000 ????? ??? ????? ????? ??", None, Op::FcvtSW)?;
    b.push(op_fp, "1101000 00001 ????? ??? ????? ????? ??", None, Op::FcvtSWu)?;
    b.push(op_fp, "1101000 00010 ????? ??? ????? ????? ??", None, Op::FcvtSL)?;
    b.push(op_fp, "1101000 00011 ????? ??? ????? ????? ??", None, Op::FcvtSLu)?;
    b.push(op_fp, "1111000 00000 ????? 000 ????? ????? ??", None, Op::FmvWX)?;

    Ok(FpTables {
        load,
        store,
        fmadd,
        op_fp,
    })
}
