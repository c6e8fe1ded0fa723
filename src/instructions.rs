use serde::{Deserialize, Serialize};

// One line per identity: variant and its assembler mnemonic.
macro_rules! instructions {
    ($($op:ident => $mnemonic:literal,)*) => {
        /// Resolved instruction identity. `Op::Inv` marks an encoding no table claims.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Op {
            $($op,)*
        }

        impl Op {
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Op::$op => $mnemonic,)*
                }
            }
        }

        /// Every identity, in declaration order.
        pub const ALL: &[Op] = &[$(Op::$op,)*];
    };
}

instructions! {
    Inv => "inv",

    // RV64I
    Lui => "lui",
    Auipc => "auipc",
    Jal => "jal",
    Jalr => "jalr",
    Beq => "beq",
    Bne => "bne",
    Blt => "blt",
    Bge => "bge",
    Bltu => "bltu",
    Bgeu => "bgeu",
    Lb => "lb",
    Lh => "lh",
    Lw => "lw",
    Ld => "ld",
    Lbu => "lbu",
    Lhu => "lhu",
    Lwu => "lwu",
    Sb => "sb",
    Sh => "sh",
    Sw => "sw",
    Sd => "sd",
    Addi => "addi",
    Slti => "slti",
    Sltiu => "sltiu",
    Xori => "xori",
    Ori => "ori",
    Andi => "andi",
    Slli => "slli",
    Srli => "srli",
    Srai => "srai",
    Addiw => "addiw",
    Slliw => "slliw",
    Srliw => "srliw",
    Sraiw => "sraiw",
    Add => "add",
    Sub => "sub",
    Sll => "sll",
    Slt => "slt",
    Sltu => "sltu",
    Xor => "xor",
    Srl => "srl",
    Sra => "sra",
    Or => "or",
    And => "and",
    Addw => "addw",
    Subw => "subw",
    Sllw => "sllw",
    Srlw => "srlw",
    Sraw => "sraw",
    Fence => "fence",
    FenceI => "fence.i",
    HaltTrap => "halt",

    // Pseudo forms resolved at decode time
    PJal => "jal",
    PRet => "ret",
    PBltz => "bltz",
    PBgez => "bgez",
    PBlez => "blez",
    PBgtz => "bgtz",

    // RV64M
    Mul => "mul",
    Mulh => "mulh",
    Mulhsu => "mulhsu",
    Mulhu => "mulhu",
    Div => "div",
    Divu => "divu",
    Rem => "rem",
    Remu => "remu",
    Mulw => "mulw",
    Divw => "divw",
    Divuw => "divuw",
    Remw => "remw",
    Remuw => "remuw",

    // RV64A
    LrW => "lr.w",
    ScW => "sc.w",
    AmoswapW => "amoswap.w",
    AmoaddW => "amoadd.w",
    AmoxorW => "amoxor.w",
    AmoandW => "amoand.w",
    AmoorW => "amoor.w",
    AmominW => "amomin.w",
    AmomaxW => "amomax.w",
    AmominuW => "amominu.w",
    AmomaxuW => "amomaxu.w",
    LrD => "lr.d",
    ScD => "sc.d",
    AmoswapD => "amoswap.d",
    AmoaddD => "amoadd.d",
    AmoxorD => "amoxor.d",
    AmoandD => "amoand.d",
    AmoorD => "amoor.d",
    AmominD => "amomin.d",
    AmomaxD => "amomax.d",
    AmominuD => "amominu.d",
    AmomaxuD => "amomaxu.d",

    // RV64F
    Flw => "flw",
    Fsw => "fsw",
    FmaddS => "fmadd.s",
    FmsubS => "fmsub.s",
    FnmsubS => "fnmsub.s",
    FnmaddS => "fnmadd.s",
    FaddS => "fadd.s",
    FsubS => "fsub.s",
    FmulS => "fmul.s",
    FdivS => "fdiv.s",
    FsqrtS => "fsqrt.s",
    FsgnjS => "fsgnj.s",
    FsgnjnS => "fsgnjn.s",
    FsgnjxS => "fsgnjx.s",
    FminS => "fmin.s",
    FmaxS => "fmax.s",
    FcvtWS => "fcvt.w.s",
    FcvtWuS => "fcvt.wu.s",
    FcvtLS => "fcvt.l.s",
    FcvtLuS => "fcvt.lu.s",
    FmvXW => "fmv.x.w",
    FclassS => "fclass.s",
    FeqS => "feq.s",
    FltS => "flt.s",
    FleS => "fle.s",
    FcvtSW => "fcvt.s.w",
    FcvtSWu => "fcvt.s.wu",
    FcvtSL => "fcvt.s.l",
    FcvtSLu => "fcvt.s.lu",
    FmvWX => "fmv.w.x",

    // RV64D
    Fld => "fld",
    Fsd => "fsd",
    FmaddD => "fmadd.d",
    FmsubD => "fmsub.d",
    FnmsubD => "fnmsub.d",
    FnmaddD => "fnmadd.d",
    FaddD => "fadd.d",
    FsubD => "fsub.d",
    FmulD => "fmul.d",
    FdivD => "fdiv.d",
    FsqrtD => "fsqrt.d",
    FsgnjD => "fsgnj.d",
    FsgnjnD => "fsgnjn.d",
    FsgnjxD => "fsgnjx.d",
    FminD => "fmin.d",
    FmaxD => "fmax.d",
    FcvtSD => "fcvt.s.d",
    FcvtDS => "fcvt.d.s",
    FeqD => "feq.d",
    FltD => "flt.d",
    FleD => "fle.d",
    FclassD => "fclass.d",
    FcvtWD => "fcvt.w.d",
    FcvtWuD => "fcvt.wu.d",
    FcvtLD => "fcvt.l.d",
    FcvtLuD => "fcvt.lu.d",
    FmvXD => "fmv.x.d",
    FcvtDW => "fcvt.d.w",
    FcvtDWu => "fcvt.d.wu",
    FcvtDL => "fcvt.d.l",
    FcvtDLu => "fcvt.d.lu",
    FmvDX => "fmv.d.x",

    // RV64C
    CAddi4spn => "c.addi4spn",
    CFld => "c.fld",
    CLw => "c.lw",
    CLd => "c.ld",
    CFsd => "c.fsd",
    CSw => "c.sw",
    CSd => "c.sd",
    CNop => "c.nop",
    CAddi => "c.addi",
    CAddiw => "c.addiw",
    CLi => "c.li",
    CAddi16sp => "c.addi16sp",
    CLui => "c.lui",
    CSrli => "c.srli",
    CSrai => "c.srai",
    CAndi => "c.andi",
    CSub => "c.sub",
    CXor => "c.xor",
    COr => "c.or",
    CAnd => "c.and",
    CSubw => "c.subw",
    CAddw => "c.addw",
    CJ => "c.j",
    CBeqz => "c.beqz",
    CBnez => "c.bnez",
    CSlli => "c.slli",
    CFldsp => "c.fldsp",
    CLwsp => "c.lwsp",
    CLdsp => "c.ldsp",
    CJr => "c.jr",
    CMv => "c.mv",
    CEbreak => "c.ebreak",
    CJalr => "c.jalr",
    CAdd => "c.add",
    CFsdsp => "c.fsdsp",
    CSwsp => "c.swsp",
    CSdsp => "c.sdsp",

    // Zicsr and privileged
    Csrrw => "csrrw",
    Csrrs => "csrrs",
    Csrrc => "csrrc",
    Csrrwi => "csrrwi",
    Csrrsi => "csrrsi",
    Csrrci => "csrrci",
    Ecall => "ecall",
    Ebreak => "ebreak",
    Sret => "sret",
    Mret => "mret",
    Wfi => "wfi",
    SfenceVma => "sfence.vma",
    Priv => "priv",

    // Hypervisor
    HfenceVvma => "hfence.vvma",
    HfenceGvma => "hfence.gvma",
    HlvB => "hlv.b",
    HlvBu => "hlv.bu",
    HlvH => "hlv.h",
    HlvHu => "hlv.hu",
    HlvxHu => "hlvx.hu",
    HlvW => "hlv.w",
    HlvWu => "hlv.wu",
    HlvxWu => "hlvx.wu",
    HlvD => "hlv.d",
    HsvB => "hsv.b",
    HsvH => "hsv.h",
    HsvW => "hsv.w",
    HsvD => "hsv.d",

    // Vector extension point
    Vsetvli => "vsetvli",
    Vsetivli => "vsetivli",
    Vsetvl => "vsetvl",
    Vop => "vop",
    Vload => "vl",
    Vstore => "vs",
}

impl Default for Op {
    fn default() -> Self {
        Op::Inv
    }
}
