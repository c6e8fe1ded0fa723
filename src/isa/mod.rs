//! RV64 table assembly. Each extension module registers the tables it owns;
//! this module stitches them under the major-opcode table in priority order.

pub mod privileged;
pub mod rva;
pub mod rvc;
pub mod rvd;
pub mod rvf;
pub mod rvi;
pub mod rvm;
pub mod rvv;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classify::classify;
use crate::decoder::{DecodeContext, Decoder, Op};
use crate::format::Format;
use crate::pattern::{DecodeTables, TableBuilder, TableError, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FpuMode {
    None,
    Single,
    #[default]
    Double,
}

/// Which extensions and privileged variants the tables are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsaConfig {
    pub compressed: bool,
    pub mul_div: bool,
    pub atomic: bool,
    pub fpu: FpuMode,
    pub vector: bool,
    /// Hypervisor privileged-mode variant.
    pub hypervisor: bool,
    /// Register trap-return identities instead of the generic SYSTEM entry.
    pub debug: bool,
    /// Consult the trigger module around instruction fetch.
    pub sdtrig: bool,
}

impl Default for IsaConfig {
    /// RV64GC.
    fn default() -> Self {
        Self {
            compressed: true,
            mul_div: true,
            atomic: true,
            fpu: FpuMode::Double,
            vector: false,
            hypervisor: false,
            debug: false,
            sdtrig: false,
        }
    }
}

impl IsaConfig {
    /// Conventional ISA string, e.g. `rv64imafdc`.
    pub fn isa_string(&self) -> String {
        let mut s = String::from("rv64i");
        if self.mul_div {
            s.push('m');
        }
        if self.atomic {
            s.push('a');
        }
        match self.fpu {
            FpuMode::None => {}
            FpuMode::Single => s.push('f'),
            FpuMode::Double => s.push_str("fd"),
        }
        if self.compressed {
            s.push('c');
        }
        if self.vector {
            s.push('v');
        }
        if self.hypervisor {
            s.push('h');
        }
        s
    }
}

pub struct Rv64Decoder {
    cfg: IsaConfig,
    tables: DecodeTables,
    main: TableId,
    rvc: TableId,
}

impl Rv64Decoder {
    pub fn new(cfg: IsaConfig) -> Result<Self, TableError> {
        let mut b = TableBuilder::new();

        let base = rvi::register(&mut b)?;
        let muldiv = if cfg.mul_div { Some(rvm::register(&mut b)?) } else { None };
        let amo = if cfg.atomic { Some(rva::register(&mut b)?) } else { None };
        let mut fp = Vec::new();
        if cfg.fpu != FpuMode::None {
            fp.push(rvf::register(&mut b)?);
        }
        if cfg.fpu == FpuMode::Double {
            fp.push(rvd::register(&mut b)?);
        }
        let vector = if cfg.vector { Some(rvv::register(&mut b)?) } else { None };
        let system = privileged::register(&mut b, &cfg)?;
        let rvc = if cfg.compressed {
            rvc::register(&mut b, &cfg)?
        } else {
            b.table("rvc", 16)
        };

        // Shared major-opcode groups, composed without touching module tables.
        let mut loads: Vec<TableId> = fp.iter().map(|t| t.load).collect();
        let mut stores: Vec<TableId> = fp.iter().map(|t| t.store).collect();
        if let Some(v) = &vector {
            loads.push(v.load);
            stores.push(v.store);
        }
        let fload = b.concat("load-fp", &loads)?;
        let fstore = b.concat("store-fp", &stores)?;
        let fmadd = b.concat("fmadd", &fp.iter().map(|t| t.fmadd).collect::<Vec<_>>())?;
        let op_fp = b.concat("op-fp", &fp.iter().map(|t| t.op_fp).collect::<Vec<_>>())?;

        let main = b.table("main", 32);
        let (i, s, u, r) = (Some(Format::I), Some(Format::S), Some(Format::U), Some(Format::R));
        b.push(main, "??????? ????? ????? ??? ????? 00000 11", i, base.load)?;
        if !b.is_empty(fload) {
            b.push(main, "??????? ????? ????? ??? ????? 00001 11", i, fload)?;
        }
        b.push(main, "??????? ????? ????? ??? ????? 00011 11", i, base.fence)?;
        b.push(main, "??????? ????? ????? ??? ????? 00100 11", i, base.op_imm)?;
        b.push(main, "??????? ????? ????? ??? ????? 00101 11", u, Op::Auipc)?;
        b.push(main, "??????? ????? ????? ??? ????? 00110 11", i, base.op_imm32)?;
        b.push(main, "??????? ????? ????? ??? ????? 01000 11", s, base.store)?;
        if !b.is_empty(fstore) {
            b.push(main, "??????? ????? ????? ??? ????? 01001 11", s, fstore)?;
        }
        if let Some(amo) = amo {
            b.push(main, "??????? ????? ????? ??? ????? 01011 11", r, amo)?;
        }
        if let Some(m) = muldiv {
            b.push(main, "0000001 ????? ????? ??? ????? 01100 11", r, m.op)?;
        }
        b.push(main, "??????? ????? ????? ??? ????? 01100 11", r, base.op)?;
        b.push(main, "??????? ????? ????? ??? ????? 01101 11", u, Op::Lui)?;
        if let Some(m) = muldiv {
            b.push(main, "0000001 ????? ????? ??? ????? 01110 11", r, m.op32)?;
        }
        b.push(main, "??????? ????? ????? ??? ????? 01110 11", r, base.op32)?;
        if !fp.is_empty() {
            b.push(main, "??????? ????? ????? ??? ????? 100?? 11", Some(Format::R4), fmadd)?;
            b.push(main, "??????? ????? ????? ??? ????? 10100 11", r, op_fp)?;
        }
        if let Some(v) = &vector {
            b.push(main, "??????? ????? ????? ??? ????? 10101 11", Some(Format::None), v.op_v)?;
        }
        b.push(main, "??????? ????? ????? ??? ????? 11000 11", Some(Format::B), base.branch)?;
        b.push(main, "??????? ????? ????? ??? ????? 11001 11", i, base.jalr)?;
        b.push(main, "??????? ????? ????? ??? ????? 11010 11", Some(Format::None), Op::HaltTrap)?;
        b.push(main, "??????? ????? ????? ??? ????? 11011 11", Some(Format::J), base.jal)?;
        b.push(main, "??????? ????? ????? ??? ????? 11100 11", Some(Format::None), system)?;

        Ok(Self {
            cfg,
            tables: b.finish(),
            main,
            rvc,
        })
    }

    pub fn config(&self) -> &IsaConfig {
        &self.cfg
    }

    pub fn tables(&self) -> &DecodeTables {
        &self.tables
    }

    /// Root table for a word of the given width (2 or 4 bytes).
    pub fn root(&self, width: u8) -> TableId {
        if width == 2 {
            self.rvc
        } else {
            self.main
        }
    }
}

impl Decoder for Rv64Decoder {
    fn decode(&self, s: &mut DecodeContext) -> Op {
        let m = self.tables.lookup(self.root(s.width), s.raw);
        s.op = m.op;
        if m.op == Op::Inv {
            trace!(pc = s.pc, raw = s.raw, "invalid encoding");
        } else if let Some(format) = m.format {
            format.extract(s);
        }
        classify(s);
        s.op
    }

    fn sdtrig(&self) -> bool {
        self.cfg.sdtrig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Operand;
    use pretty_assertions::assert_eq;

    fn decode(dec: &Rv64Decoder, raw: u32) -> DecodeContext {
        let mut s = DecodeContext::with_raw(0x8000_0000, raw);
        dec.decode(&mut s);
        s
    }

    #[test]
    fn default_is_rv64gc() {
        let cfg = IsaConfig::default();
        assert_eq!(cfg.isa_string(), "rv64imafdc");
        assert!(Rv64Decoder::new(cfg).is_ok());
    }

    #[test]
    fn every_variant_builds() {
        for fpu in [FpuMode::None, FpuMode::Single, FpuMode::Double] {
            for flags in 0..64u32 {
                let cfg = IsaConfig {
                    compressed: flags & 1 != 0,
                    mul_div: flags & 2 != 0,
                    atomic: flags & 4 != 0,
                    fpu,
                    vector: flags & 8 != 0,
                    hypervisor: flags & 16 != 0,
                    debug: flags & 32 != 0,
                    sdtrig: false,
                };
                if let Err(e) = Rv64Decoder::new(cfg) {
                    panic!("{cfg:?}: {e}");
                }
            }
        }
    }

    #[test]
    fn disabled_extensions_decode_invalid() {
        let dec = Rv64Decoder::new(IsaConfig {
            mul_div: false,
            atomic: false,
            fpu: FpuMode::None,
            compressed: false,
            ..IsaConfig::default()
        })
        .unwrap();
        // mul x1, x2, x3
        assert_eq!(decode(&dec, 0x0231_00B3).op, Op::Inv);
        // fadd.d f1, f2, f3
        assert_eq!(decode(&dec, 0x0231_70D3).op, Op::Inv);
        // c.addi x1, 1
        assert_eq!(decode(&dec, 0x0085).op, Op::Inv);
        assert_eq!(decode(&dec, 0x0000_0013).op, Op::Addi);
    }

    #[test]
    fn single_precision_has_no_double_forms() {
        let dec = Rv64Decoder::new(IsaConfig {
            fpu: FpuMode::Single,
            ..IsaConfig::default()
        })
        .unwrap();
        // fadd.s f1, f2, f3
        assert_eq!(decode(&dec, 0x0031_70D3).op, Op::FaddS);
        assert_eq!(decode(&dec, 0x0231_70D3).op, Op::Inv);
        // c.fld f8, 0(x8) needs D
        assert_eq!(decode(&dec, 0x2000).op, Op::Inv);
    }

    #[test]
    fn vector_extension_point() {
        let dec = Rv64Decoder::new(IsaConfig {
            vector: true,
            ..IsaConfig::default()
        })
        .unwrap();
        // vsetvli x5, x10, e64
        let s = decode(&dec, 0x0D85_72D7);
        assert_eq!(s.op, Op::Vsetvli);
        assert_eq!(s.src2, Operand::Imm(0xD8));
        // vle64.v v1, (x10)
        assert_eq!(decode(&dec, 0x0205_7087).op, Op::Vload);
        // fld still wins its own width
        assert_eq!(decode(&dec, 0x0005_3087).op, Op::Fld);
    }

    #[test]
    fn halt_trap_on_custom_2() {
        let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
        let s = decode(&dec, 0x0000_006B);
        assert_eq!(s.op, Op::HaltTrap);
        assert!(s.dest.is_none());
    }
}
