pub mod analyze;
pub mod listing;
pub mod model;

pub use analyze::{
    analyze_entries, block_edges, build_blocks, functions, Analysis, Block, EdgeKind, EdgeOut,
    FunctionOut, Label, Report,
};
pub use listing::{decode_at, enrich_blocks_with_mnemonics, render, BlockOut};
pub use model::{is_mapped, load_raw_bin, read_bytes, read_u8, Image, Segment};
