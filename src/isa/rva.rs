//! RV64A: funct5 picks the operation, funct3 the width. The aq/rl bits
//! are ordering hints and stay wildcards.

use crate::decoder::Op;
use crate::pattern::{TableBuilder, TableError, TableId};

pub fn register(b: &mut TableBuilder) -> Result<TableId, TableError> {
    let t = b.table("amo", 32);

    b.push(t, "00010?? 00000 ????? 010 ????? ????? ??", None, Op::LrW)?;
    b.push(t, "00011?? ????? ????? 010 ????? ????? ??", None, Op::ScW)?;
    b.push(t, "00001?? ????? ????? 010 ????? ????? ??", None, Op::AmoswapW)?;
    b.push(t, "00000?? ????? ????? 010 ????? ????? ??", None, Op::AmoaddW)?;
    b.push(t, "00100?? ????? ????? 010 ????? ????? ??", None, Op::AmoxorW)?;
    b.push(t, "01100?? ????? ????? 010 ????? ????? ??", None, Op::AmoandW)?;
    b.push(t, "01000?? ????? ????? 010 ????? ????? ??", None, Op::AmoorW)?;
    b.push(t, "10000?? ????? ????? 010 ????? ????? ??", None, Op::AmominW)?;
    b.push(t, "10100?? ????? ????? 010 ????? ????? ??", None, Op::AmomaxW)?;
    b.push(t, "11000?? ????? ????? 010 ????? ????? ??", None, Op::AmominuW)?;
    b.push(t, "11100?? ????? ????? 010 ????? ????? ??", None, Op::AmomaxuW)?;

    b.push(t, "00010?? 00000 ????? 011 ????? ????? ??", None, Op::LrD)?;
    b.push(t, "00011?? ????? ????? 011 ????? ????? ??", None, Op::ScD)?;
    b.push(t, "00001?? ????? ????? 011 ????? ????? ??", None, Op::AmoswapD)?;
    b.push(t, "00000?? ????? ????? 011 ????? ????? ??", None, Op::AmoaddD)?;
    b.push(t, "00100?? ????? ????? 011 ????? ????? ??", None, Op::AmoxorD)?;
    b.push(t, "01100?? ????? ????? 011 ????? ????? ??", None, Op::AmoandD)?;
    b.push(t, "01000?? ????? ????? 011 ????? ????? ??", None, Op::AmoorD)?;
    b.push(t, "10000?? ????? ????? 011 ????? ????? ??", None, Op::AmominD)?;
    b.push(t, "10100?? ????? ????? 011 ????? ????? ??", None, Op::AmomaxD)?;
    b.push(t, "11000?? ????? ????? 011 ????? ????? ??", None, Op::AmominuD)?;
    b.push(t, "11100?? ????? ????? 011 ????? ????? ??", None, Op::AmomaxuD)?;

    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_bits_are_ignored() {
        let mut b = TableBuilder::new();
        let t = register(&mut b).unwrap();
        let tables = b.finish();
        // amoswap.d.aqrl x1, x3, (x2)
        assert_eq!(tables.lookup(t, 0x0E31_30AF).op, Op::AmoswapD);
        // amomaxu.d.rl x1, x3, (x2)
        assert_eq!(tables.lookup(t, 0xE231_30AF).op, Op::AmomaxuD);
    }

    #[test]
    fn lr_needs_zero_rs2_and_width_is_checked() {
        let mut b = TableBuilder::new();
        let t = register(&mut b).unwrap();
        let tables = b.finish();
        // lr.w x1, (x2)
        assert_eq!(tables.lookup(t, 0x1001_20AF).op, Op::LrW);
        assert_eq!(tables.lookup(t, 0x1031_20AF).op, Op::Inv);
        // funct3 000 is not an AMO width
        assert_eq!(tables.lookup(t, 0x0031_00AF).op, Op::Inv);
    }
}
