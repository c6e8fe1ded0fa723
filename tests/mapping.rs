use riscv_rs::{fetch_decode, DecodeContext, InstrType, IsaConfig, LinearMemory, Op, Rv64Decoder};

#[test]
fn high_mapped_memory_fetches() {
    // Image mapped at the usual RISC-V DRAM base.
    let load = 0x8000_0000u64;
    let mut mem = LinearMemory::with_image(load, &[0; 16]);
    // jal x0, +8 ; c.nop ; c.nop ; addi x0,x0,0
    mem.load_words(load, &[0x0080_006F, 0x0001, 0x0001, 0x0000_0013])
        .unwrap();

    let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
    let mut s = DecodeContext::new(load);
    assert_eq!(fetch_decode(&mut mem, &dec, &mut s, None).unwrap(), Op::Jal);
    assert_eq!(s.ty, InstrType::Jump);
    assert_eq!(s.jnpc, load + 8);

    s.pc = s.jnpc;
    assert_eq!(fetch_decode(&mut mem, &dec, &mut s, None).unwrap(), Op::Addi);
}

#[test]
fn below_base_faults() {
    let mut mem = LinearMemory::with_image(0x1000, &[0x13, 0, 0, 0]);
    let dec = Rv64Decoder::new(IsaConfig::default()).unwrap();
    let mut s = DecodeContext::new(0x0FFE);
    let err = fetch_decode(&mut mem, &dec, &mut s, None).unwrap_err();
    assert_eq!(err.addr(), 0x0FFE);
}
