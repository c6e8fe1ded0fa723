//! RV64D. Same layout as RV64F with fmt = 01; also owns the S/D conversions.

use crate::decoder::Op;
use crate::isa::rvf::FpTables;
use crate::pattern::{TableBuilder, TableError};

pub fn register(b: &mut TableBuilder) -> Result<FpTables, TableError> {
    let load = b.table("fld", 32);
    b.push(load, "??????? ????? ????? 011 ????? ????? ??", None, Op::Fld)?;

    let store = b.table("fsd", 32);
    b.push(store, "??????? ????? ????? 011 ????? ????? ??", None, Op::Fsd)?;

    let fmadd = b.table("fmadd.d", 32);
    b.push(fmadd, "?????01 ????? ????? ??? ????? 10000 ??", None, Op::FmaddD)?;
    b.push(fmadd, "?????01 ????? ????? ??? ????? 10001 ??", None, Op::FmsubD)?;
    b.push(fmadd, "?????01 ????? ????? ??? ????? 10010 ??", None, Op::FnmsubD)?;
    b.push(fmadd, "?????01 ????? ????? ??? ????? 10011 ??", None, Op::FnmaddD)?;

    let op_fp = b.table("op-fp.d", 32);
    b.push(op_fp, "0000001 ????? ????? ??? ????? ????? ??", None, Op::FaddD)?;
    b.push(op_fp, "0000101 ????? ????? ??? ????? ????? ??", None, Op::FsubD)?;
    b.push(op_fp, "0001001 ????? ????? ??? ????? ????? ??", None, Op::FmulD)?;
    b.push(op_fp, "0001101 ????? ????? ??? ????? ????? ??", None, Op::FdivD)?;
    b.push(op_fp, "0101101 00000 ????? ??? ????? ????? ??", None, Op::FsqrtD)?;
    b.push(op_fp, "0010001 ????? ????? 000 ????? ????? ??", None, Op::FsgnjD)?;
    b.push(op_fp, "0010001 ????? ????? 001 ????? ????? ??", None, Op::FsgnjnD)?;
    b.push(op_fp, "0010001 ????? ????? 010 ????? ????? ??", None, Op::FsgnjxD)?;
    b.push(op_fp, "0010101 ????? ????? 000 ????? ????? ??", None, Op::FminD)?;
    b.push(op_fp, "0010101 ????? ????? 001 ????? ????? ??", None, Op::FmaxD)?;
    b.push(op_fp, "0100000 00001 ????? ??? ????? ????? ??", None, Op::FcvtSD)?;
    b.push(op_fp, "0100001 00000 ????? ??? ????? ????? ??", None, Op::FcvtDS)?;
    b.push(op_fp, "1010001 ????? ????? 010 ????? ????? ??", None, Op::FeqD)?;
    b.push(op_fp, "1010001 ????? ????? 001 ????? ????? ??", None, Op::FltD)?;
    b.push(op_fp, "1010001 ????? ????? 000 ????? ????? ??", None, Op::FleD)?;
    b.push(op_fp, "1110001 00000 ????? 001 ????? ????? ??", None, Op::FclassD)?;
    b.push(op_fp, "1100001 00000 ????? ??? ????? ????? ??", None, Op::FcvtWD)?;
    b.push(op_fp, "1100001 00001 ????? ??? ????? ????? ??", None, Op::FcvtWuD)?;
    b.push(op_fp, "1100001 00010 ????? ??? ????? ????? ??", None, Op::FcvtLD)?;
    b.push(op_fp, "1100001 00011 ????? ??? ????? ????? ??", None, Op::FcvtLuD)?;
    b.push(op_fp, "1110001 00000 ????? 000 ????? ????? ??", None, Op::FmvXD)?;
    b.push(op_fp, "1101001 00000 ????? ??? ????? ????? ??", None, Op::FcvtDW)?;
    b.push(op_fp, "1101001 00001 ????? ??? ????? ????? ??", None, Op::FcvtDWu)?;
    b.push(op_fp, "1101001 00010 ????? ??? ????? ????? ??", None, Op::FcvtDL)?;
    b.push(op_fp, "1101001 00011 ????? ??? ????? ????? ??", None, Op::FcvtDLu)?;
    b.push(op_fp, "1111001 00000 ????? 000 ????? ????? ??", None, Op::FmvDX)?;

    Ok(FpTables {
        load,
        store,
        fmadd,
        op_fp,
    })
}
