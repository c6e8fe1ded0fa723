//! SYSTEM major opcode: Zicsr, trap return and fences, and the hypervisor
//! virtual-machine loads/stores.

use crate::decoder::Op;
use crate::format::Format;
use crate::isa::IsaConfig;
use crate::pattern::{TableBuilder, TableError, TableId};

pub fn register(b: &mut TableBuilder, cfg: &IsaConfig) -> Result<TableId, TableError> {
    let t = b.table("system", 32);
    let csr = Some(Format::Csr);
    let csri = Some(Format::CsrI);
    let r = Some(Format::R);

    b.push(t, "??????? ????? ????? 001 ????? ????? ??", csr, Op::Csrrw)?;
    b.push(t, "??????? ????? ????? 010 ????? ????? ??", csr, Op::Csrrs)?;
    b.push(t, "??????? ????? ????? 011 ????? ????? ??", csr, Op::Csrrc)?;
    b.push(t, "??????? ????? ????? 101 ????? ????? ??", csri, Op::Csrrwi)?;
    b.push(t, "??????? ????? ????? 110 ????? ????? ??", csri, Op::Csrrsi)?;
    b.push(t, "??????? ????? ????? 111 ????? ????? ??", csri, Op::Csrrci)?;

    if cfg.debug {
        let none = Some(Format::None);
        b.push(t, "0000000 00000 00000 000 00000 ????? ??", none, Op::Ecall)?;
        b.push(t, "0000000 00001 00000 000 00000 ????? ??", none, Op::Ebreak)?;
        b.push(t, "0001000 00010 00000 000 00000 ????? ??", none, Op::Sret)?;
        b.push(t, "0011000 00010 00000 000 00000 ????? ??", none, Op::Mret)?;
        b.push(t, "0001000 00101 00000 000 00000 ????? ??", none, Op::Wfi)?;
        b.push(t, "0001001 ????? ????? 000 00000 ????? ??", r, Op::SfenceVma)?;
        if cfg.hypervisor {
            b.push(t, "0010001 ????? ????? 000 00000 ????? ??", r, Op::HfenceVvma)?;
            b.push(t, "0110001 ????? ????? 000 00000 ????? ??", r, Op::HfenceGvma)?;
        }
    }
    // Everything else under funct3 = 000 is left to the executor, which
    // reads the csr field as funct12.
    b.push(t, "??????? ????? ????? 000 ????? ????? ??", csr, Op::Priv)?;

    if cfg.hypervisor {
        b.push(t, "0110000 00000 ????? 100 ????? ????? ??", r, Op::HlvB)?;
        b.push(t, "0110000 00001 ????? 100 ????? ????? ??", r, Op::HlvBu)?;
        b.push(t, "0110010 00000 ????? 100 ????? ????? ??", r, Op::HlvH)?;
        b.push(t, "0110010 00001 ????? 100 ????? ????? ??", r, Op::HlvHu)?;
        b.push(t, "0110010 00011 ????? 100 ????? ????? ??", r, Op::HlvxHu)?;
        b.push(t, "0110100 00000 ????? 100 ????? ????? ??", r, Op::HlvW)?;
        b.push(t, "0110100 00001 ????? 100 ????? ????? ??", r, Op::HlvWu)?;
        b.push(t, "0110100 00011 ????? 100 ????? ????? ??", r, Op::HlvxWu)?;
        b.push(t, "0110110 00000 ????? 100 ????? ????? ??", r, Op::HlvD)?;
        b.push(t, "0110001 ????? ????? 100 00000 ????? ??", r, Op::HsvB)?;
        b.push(t, "0110011 ????? ????? 100 00000 ????? ??", r, Op::HsvH)?;
        b.push(t, "0110101 ????? ????? 100 00000 ????? ??", r, Op::HsvW)?;
        b.push(t, "0110111 ????? ????? 100 00000 ????? ??", r, Op::HsvD)?;
    }

    Ok(t)
}
