use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use riscv_disasm::{
    analyze_entries, block_edges, build_blocks, decode_at, enrich_blocks_with_mnemonics, functions,
    load_raw_bin, render, Label, Report,
};
use riscv_rs::{FpuMode, IsaConfig, Rv64Decoder};

#[derive(Parser, Debug)]
#[command(author, version, about = "RV64 disassembler CLI", long_about = None)]
struct Cli {
    /// Load address for the binary in target address space
    #[arg(long, default_value = "0x80000000")]
    base: String,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: String,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// ISA configuration as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    #[arg(long, value_enum)]
    fpu: Option<FpuMode>,
    #[arg(long)]
    no_compressed: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded segments (simple single-segment for raw .bin)
    Sections,
    /// Disassemble a range [start, end) in bytes
    Range {
        start: String,
        /// Exclusive
        end: String,
        #[arg(long)]
        show_bytes: bool,
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
    /// Analyze code graph from entry points
    Analyze {
        /// Entry addresses (hex or dec). Repeat flag to add multiple entries.
        #[arg(long = "entry", value_name = "ADDR", num_args = 1..)]
        entries: Vec<String>,
        /// Maximum instructions to decode before stopping
        #[arg(long, default_value_t = 100_000usize)]
        max_instr: usize,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Emit a linear disassembly listing of analyzed code (text format only)
        #[arg(long)]
        listing: bool,
        #[arg(long)]
        show_bytes: bool,
        /// Import labels from JSON (Vec<{ addr, name }>)
        #[arg(long, value_name = "FILE")]
        labels_in: Option<String>,
        /// Export labels to JSON
        #[arg(long, value_name = "FILE")]
        labels_out: Option<String>,
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_u64(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u64::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u64>()?)
    }
}

fn isa_config(cli: &Cli) -> Result<IsaConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => IsaConfig::default(),
    };
    if let Some(fpu) = cli.fpu {
        cfg.fpu = fpu;
    }
    cfg.compressed &= !cli.no_compressed;
    Ok(cfg)
}

fn emit(out: Option<String>, text: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(&path, text).with_context(|| format!("writing {path}")),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn read_labels(path: &str) -> Result<Vec<Label>> {
    let txt = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    Ok(serde_json::from_str(&txt)?)
}

fn sorted_labels(labels: &HashMap<u64, String>) -> Vec<Label> {
    let mut v: Vec<Label> = labels
        .iter()
        .map(|(&addr, name)| Label {
            addr,
            name: name.clone(),
        })
        .collect();
    v.sort_by_key(|l| l.addr);
    v
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let base = parse_u64(&cli.base)?;
    let mut img = load_raw_bin(Path::new(&cli.input), base, cli.skip, cli.len)?;
    let cfg = isa_config(&cli)?;
    let dec = Rv64Decoder::new(cfg)?;

    match cli.cmd {
        Command::Sections => {
            println!("{:<10} {:<18} {:<18} {:<6} {:<6}", "name", "start", "end", "perms", "kind");
            for s in &img.segments {
                println!(
                    "{:<10} {:#018x} {:#018x} {:<6} {:<6}",
                    s.name,
                    s.base,
                    s.end(),
                    s.perms,
                    s.kind
                );
            }
        }
        Command::Range {
            start,
            end,
            show_bytes,
            out,
        } => {
            let start = parse_u64(&start)?;
            let end = parse_u64(&end)?;
            anyhow::ensure!(end >= start, "end must be >= start");

            let mut pc = start;
            let mut buf = String::new();
            while pc < end {
                match decode_at(&mut img, &dec, pc) {
                    Ok(s) => {
                        let _ = writeln!(buf, "{}", render(&img, &s, show_bytes));
                        pc = s.snpc;
                    }
                    Err(_) => {
                        let _ = writeln!(buf, "{pc:#010x}: <oob>");
                        break;
                    }
                }
            }
            emit(out, &buf)?;
        }
        Command::Analyze {
            entries,
            max_instr,
            format,
            listing,
            show_bytes,
            labels_in,
            labels_out,
            out,
        } => {
            let mut seeds: Vec<u64> = if entries.is_empty() {
                img.first_base().into_iter().collect()
            } else {
                entries.iter().map(|e| parse_u64(e)).collect::<Result<_>>()?
            };
            seeds.sort_unstable();
            seeds.dedup();

            let a = analyze_entries(&mut img, &dec, &seeds, max_instr);
            let (blocks, owner) = build_blocks(&a, &seeds);
            let edges_out = block_edges(&a, &owner);
            let fns = functions(&seeds, &edges_out);

            let mut labels: HashMap<u64, String> = HashMap::new();
            if let Some(path) = &labels_in {
                labels.extend(read_labels(path)?.into_iter().map(|l| (l.addr, l.name)));
            }
            for &e in &seeds {
                labels.entry(e).or_insert_with(|| format!("sub_{e:08x}"));
            }
            for b in &blocks {
                labels
                    .entry(b.start)
                    .or_insert_with(|| format!("loc_{:08x}", b.start));
            }
            if let Some(path) = &labels_out {
                std::fs::write(path, serde_json::to_string_pretty(&sorted_labels(&labels))?)?;
            }

            match format {
                OutputFormat::Json => {
                    let report = Report {
                        entries: seeds.clone(),
                        blocks: enrich_blocks_with_mnemonics(&mut img, &dec, &blocks, show_bytes),
                        edges: edges_out,
                        functions: fns,
                        labels: sorted_labels(&labels),
                    };
                    let mut json = serde_json::to_string_pretty(&report)?;
                    json.push('\n');
                    emit(out, &json)?;
                }
                OutputFormat::Text => {
                    let mut buf = String::new();
                    let _ = writeln!(buf, "Analysis summary ({}):", cfg.isa_string());
                    let entries: Vec<String> = seeds.iter().map(|a| format!("{a:#010x}")).collect();
                    let _ = writeln!(buf, "  entries   : {entries:?}");
                    let _ = writeln!(buf, "  insts     : {}", a.visited.len());
                    let _ = writeln!(buf, "  invalid   : {}", a.invalid.len());
                    let _ = writeln!(buf, "  blocks    : {}", blocks.len());
                    let _ = writeln!(buf, "  edges     : {}", a.edges.len());
                    let _ = writeln!(buf, "  functions : {}", fns.len());
                    let _ = writeln!(buf, "Edges:");
                    for e in &edges_out {
                        let _ = writeln!(buf, "  {:#010x} -> {:#010x} ({})", e.from, e.to, e.kind);
                    }
                    if listing {
                        let mut pcs: Vec<u64> = a.visited.iter().copied().collect();
                        pcs.sort_unstable();
                        let _ = writeln!(buf, "\nListing (analyzed PCs):");
                        for pc in pcs {
                            if let Some(lbl) = labels.get(&pc) {
                                let _ = writeln!(buf, "{pc:#010x} <{lbl}>:");
                            }
                            if let Ok(s) = decode_at(&mut img, &dec, pc) {
                                let _ = writeln!(buf, "  {}", render(&img, &s, show_bytes));
                            }
                        }
                    }
                    emit(out, &buf)?;
                }
            }
        }
    }

    Ok(())
}
