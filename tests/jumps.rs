use mipsasm_rs::parse_source;

const BOOT: u32 = 0xbfc0_0000;

fn words(src: &str, boot_addr: u32) -> Vec<u32> {
    parse_source(src).unwrap().bind_all(boot_addr).unwrap()
}

#[test]
fn absolute_jump_ignores_boot_address() {
    assert_eq!(words("j 0x42", 0)[0], 0x08000042);
    assert_eq!(words("j 0x42", BOOT)[0], 0x08000042);
}

#[test]
fn label_jump_offsets_by_boot_address() {
    // Position 0, boot 0: plain zero address field.
    assert_eq!(words("label: j label", 0)[0], 0x08000000);
    // Boot 0xbfc00000: the address field shares the boot region's upper bits.
    assert_eq!(words("label: j label", BOOT)[0], 0x0bf00000);
}

#[test]
fn label_jump_adds_position() {
    let src = "add $1, $2, $3\nlabel: j label";
    assert_eq!(words(src, BOOT)[1], 0x0bf00001);
    assert_eq!(words(src, 0)[1], 0x08000001);
}

#[test]
fn widest_valid_address() {
    assert_eq!(words("j 0x3ffffff", 0)[0], 0x0bffffff);
}
