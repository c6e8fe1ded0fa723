use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use riscv_rs::disasm::fmt_decoded;
use riscv_rs::{DecodeContext, Decoder, FpuMode, InstrType, IsaConfig, Op, Operand, Rv64Decoder};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode RV64 instruction words with the riscv-rs tables"
)]
struct Opts {
    /// Address of the first word; later words follow at their own width
    #[arg(long, default_value = "0")]
    pc: String,
    /// ISA configuration as JSON (fields not given keep their RV64GC defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    #[arg(long, value_enum)]
    fpu: Option<FpuMode>,
    #[arg(long)]
    no_compressed: bool,
    #[arg(long)]
    vector: bool,
    #[arg(long)]
    hypervisor: bool,
    /// Name trap-return instructions instead of the generic SYSTEM identity
    #[arg(long)]
    debug_variant: bool,
    /// Print one JSON object per word
    #[arg(long)]
    json: bool,
    /// Instruction words in hex
    #[arg(value_name = "WORD", required = true)]
    words: Vec<String>,
}

#[derive(Serialize)]
struct Line {
    pc: u64,
    raw: u32,
    width: u8,
    op: Op,
    text: String,
    ty: InstrType,
    target: Option<u64>,
    dest: Operand,
    src1: Operand,
    src2: Operand,
    src3: Operand,
}

fn hex_digits(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn parse_u64(s: &str) -> Result<u64> {
    let s = s.trim();
    match hex_digits(s) {
        Some(hex) => Ok(u64::from_str_radix(hex, 16)?),
        None => Ok(s.parse::<u64>()?),
    }
}

/// Instruction words are hex with or without a prefix.
fn parse_word(s: &str) -> Result<u32> {
    let s = s.trim();
    let raw = u32::from_str_radix(hex_digits(s).unwrap_or(s), 16)
        .with_context(|| format!("bad instruction word `{s}`"))?;
    Ok(raw)
}

fn load_config(opts: &Opts) -> Result<IsaConfig> {
    let mut cfg = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => IsaConfig::default(),
    };
    if let Some(fpu) = opts.fpu {
        cfg.fpu = fpu;
    }
    cfg.compressed &= !opts.no_compressed;
    cfg.vector |= opts.vector;
    cfg.hypervisor |= opts.hypervisor;
    cfg.debug |= opts.debug_variant;
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let cfg = load_config(&opts)?;
    let dec = Rv64Decoder::new(cfg)?;
    tracing::debug!(isa = %cfg.isa_string(), "decoder ready");

    let mut pc = parse_u64(&opts.pc)?;
    for word in &opts.words {
        let raw = parse_word(word)?;
        let mut s = DecodeContext::with_raw(pc, raw);
        dec.decode(&mut s);

        let target = matches!(s.ty, InstrType::Jump | InstrType::Branch).then_some(s.jnpc);
        if opts.json {
            let line = Line {
                pc: s.pc,
                raw: s.raw,
                width: s.width,
                op: s.op,
                text: fmt_decoded(&s),
                ty: s.ty,
                target,
                dest: s.dest,
                src1: s.src1,
                src2: s.src2,
                src3: s.src3,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            let raw_txt = if s.width == 2 {
                format!("{:04x}    ", s.raw)
            } else {
                format!("{:08x}", s.raw)
            };
            let mut out = format!("{:#010x}: {}  {:<32} {:?}", s.pc, raw_txt, fmt_decoded(&s), s.ty);
            if let Some(t) = target {
                out.push_str(&format!(" -> {t:#x}"));
            }
            println!("{out}");
        }
        pc = s.snpc;
    }

    Ok(())
}
