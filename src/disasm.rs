use crate::decoder::{DecodeContext, Op, Operand};
use crate::format::{bits, funct3};

/// Register file an operand slot names.
#[derive(Clone, Copy, PartialEq, Eq)]
enum File {
    X,
    F,
    V,
}

impl File {
    fn prefix(self) -> char {
        match self {
            File::X => 'x',
            File::F => 'f',
            File::V => 'v',
        }
    }
}

const FP_MEM: &[&str] = &[
    "flw", "fld", "fsw", "fsd", "c.fld", "c.fsd", "c.fldsp", "c.fsdsp",
];
const FP_TO_INT: &[&str] = &["fmv.x.", "fcvt.w", "fcvt.l", "fclass", "feq", "flt", "fle"];
const INT_TO_FP: &[&str] = &["fmv.w.x", "fmv.d.x", "fcvt.s.w", "fcvt.s.l", "fcvt.d.w", "fcvt.d.l"];

/// (dest file, source file) for an identity.
fn files(s: &DecodeContext) -> (File, File) {
    let mn = s.op.mnemonic();
    if FP_MEM.contains(&mn) {
        return (File::F, File::X);
    }
    if FP_TO_INT.iter().any(|p| mn.starts_with(p)) {
        return (File::X, File::F);
    }
    if INT_TO_FP.iter().any(|p| mn.starts_with(p)) {
        return (File::F, File::X);
    }
    match s.op {
        Op::Vop => {
            let src = match funct3(s.raw) {
                0b000..=0b010 => File::V,
                0b101 => File::F,
                _ => File::X,
            };
            (File::V, src)
        }
        Op::Vload | Op::Vstore => (File::V, File::X),
        _ if mn.starts_with('f') && !mn.starts_with("fence") => (File::F, File::F),
        _ => (File::X, File::X),
    }
}

fn opnd(o: Operand, file: File) -> String {
    match o {
        Operand::Reg(r) => format!("{}{}", file.prefix(), r),
        Operand::Imm(v) => format!("{}", v as i64),
        Operand::None => String::new(),
    }
}

fn reg(o: Operand) -> u8 {
    o.reg().unwrap_or(0)
}

fn imm(o: Operand) -> i64 {
    o.imm().unwrap_or(0) as i64
}

/// One line of assembly for a decoded instruction.
pub fn fmt_decoded(s: &DecodeContext) -> String {
    let mn = s.op.mnemonic();
    let (df, sf) = files(s);
    match s.op {
        Op::Inv => format!("inv {:#x}", s.raw),

        Op::Lb | Op::Lh | Op::Lw | Op::Ld | Op::Lbu | Op::Lhu | Op::Lwu | Op::Flw | Op::Fld
        | Op::CLw | Op::CLd | Op::CFld | Op::CLwsp | Op::CLdsp | Op::CFldsp
        | Op::Sb | Op::Sh | Op::Sw | Op::Sd | Op::Fsw | Op::Fsd
        | Op::CSw | Op::CSd | Op::CFsd | Op::CSwsp | Op::CSdsp | Op::CFsdsp
        | Op::Jalr => mem(mn, s, df),

        Op::HlvB | Op::HlvBu | Op::HlvH | Op::HlvHu | Op::HlvxHu | Op::HlvW | Op::HlvWu
        | Op::HlvxWu | Op::HlvD => format!("{} x{}, (x{})", mn, reg(s.dest), reg(s.src1)),
        Op::HsvB | Op::HsvH | Op::HsvW | Op::HsvD => {
            format!("{} x{}, (x{})", mn, reg(s.src2), reg(s.src1))
        }

        Op::Beq | Op::Bne | Op::Blt | Op::Bge | Op::Bltu | Op::Bgeu => format!(
            "{} x{}, x{}, {:#x}",
            mn,
            reg(s.src1),
            reg(s.src2),
            s.jnpc
        ),
        Op::PBltz | Op::PBgez | Op::CBeqz | Op::CBnez => {
            format!("{} x{}, {:#x}", mn, reg(s.src1), s.jnpc)
        }
        Op::PBgtz | Op::PBlez => format!("{} x{}, {:#x}", mn, reg(s.src2), s.jnpc),
        Op::Jal => format!("{} x{}, {:#x}", mn, reg(s.dest), s.jnpc),
        Op::PJal | Op::CJ => format!("{} {:#x}", mn, s.jnpc),
        Op::PRet => mn.to_string(),
        Op::CJr | Op::CJalr => format!("{} x{}", mn, reg(s.src1)),

        // Two-operand compressed forms read rd twice; print it once.
        Op::CLi | Op::CMv | Op::CAddi | Op::CAddiw | Op::CAddi16sp | Op::CSlli | Op::CSrli
        | Op::CSrai | Op::CAndi | Op::CAdd | Op::CSub | Op::CXor | Op::COr | Op::CAnd
        | Op::CSubw | Op::CAddw => {
            format!("{} x{}, {}", mn, reg(s.dest), opnd(s.src2, File::X))
        }

        Op::Lui | Op::Auipc | Op::CLui => format!(
            "{} x{}, {:#x}",
            mn,
            reg(s.dest),
            (s.src1.imm().unwrap_or(0) >> 12) & 0xF_FFFF
        ),

        Op::Csrrw | Op::Csrrs | Op::Csrrc => {
            format!("{} x{}, {:#x}, x{}", mn, reg(s.dest), imm(s.src2), reg(s.src1))
        }
        Op::Csrrwi | Op::Csrrsi | Op::Csrrci => {
            format!("{} x{}, {:#x}, {}", mn, reg(s.dest), imm(s.src2), imm(s.src1))
        }
        Op::Priv => format!("{} {:#x}", mn, bits(s.raw, 31, 20)),

        Op::LrW | Op::LrD => format!("{} x{}, (x{})", mn, reg(s.dest), reg(s.src1)),
        Op::ScW | Op::ScD | Op::AmoswapW | Op::AmoaddW | Op::AmoxorW | Op::AmoandW
        | Op::AmoorW | Op::AmominW | Op::AmomaxW | Op::AmominuW | Op::AmomaxuW
        | Op::AmoswapD | Op::AmoaddD | Op::AmoxorD | Op::AmoandD | Op::AmoorD
        | Op::AmominD | Op::AmomaxD | Op::AmominuD | Op::AmomaxuD => format!(
            "{} x{}, x{}, (x{})",
            mn,
            reg(s.dest),
            reg(s.src2),
            reg(s.src1)
        ),

        Op::Vsetvli | Op::Vsetivli => format!(
            "{} x{}, {}, {:#x}",
            mn,
            reg(s.dest),
            opnd(s.src1, File::X),
            imm(s.src2)
        ),
        Op::Vload | Op::Vstore => format!("{} v{}, (x{})", mn, reg(s.dest), reg(s.src1)),
        Op::Vop => format!(
            "{} v{}, {}, v{}, {:#x}",
            mn,
            reg(s.dest),
            opnd(s.src1, sf),
            reg(s.src2),
            imm(s.src3)
        ),

        _ => generic(mn, s, df, sf),
    }
}

fn mem(mn: &str, s: &DecodeContext, data: File) -> String {
    format!(
        "{} {}{}, {}(x{})",
        mn,
        data.prefix(),
        reg(s.dest),
        imm(s.src2),
        reg(s.src1)
    )
}

/// Float ops whose rs2 field selects a variant rather than a register.
const FP_UNARY: &[&str] = &["fsqrt", "fcvt", "fmv", "fclass"];

fn generic(mn: &str, s: &DecodeContext, df: File, sf: File) -> String {
    let mut parts = Vec::new();
    if !s.dest.is_none() {
        parts.push(opnd(s.dest, df));
    }
    let srcs = [s.src1, s.src2, s.src3];
    let n = if FP_UNARY.iter().any(|p| mn.starts_with(p)) { 1 } else { 3 };
    for &o in &srcs[..n] {
        if !o.is_none() {
            parts.push(opnd(o, sf));
        }
    }
    if parts.is_empty() {
        mn.to_string()
    } else {
        format!("{} {}", mn, parts.join(", "))
    }
}
