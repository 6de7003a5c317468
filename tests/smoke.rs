use pretty_assertions::assert_eq;

use mipsasm_rs::emit::write_image;
use mipsasm_rs::{parse_source, OutputFormat};

const SRC: &str = "\
; count down from 3, then store the result
main:   addi $1, $0, 3
        addi $2, $0, 1
loop:   beq $1, $0, done
        sub $1, $1, $2
        j loop
done:   sw $1, 0($3)
";

#[test]
fn assemble_a_small_loop() {
    let prog = parse_source(SRC).unwrap();
    assert_eq!(prog.len(), 6);
    assert_eq!(prog.resolve("main"), Some(0));
    assert_eq!(prog.resolve("loop"), Some(2));
    assert_eq!(prog.resolve("done"), Some(5));

    let words = prog.bind_all(0).unwrap();
    assert_eq!(
        words,
        vec![
            0x20010003, // addi $1, $0, 3
            0x20020001, // addi $2, $0, 1
            0x10200002, // beq $1, $0, +2
            0x00220822, // sub $1, $1, $2
            0x08000002, // j 2
            0xac610000, // sw $1, 0($3)
        ]
    );
}

#[test]
fn boot_address_only_moves_jumps() {
    let prog = parse_source(SRC).unwrap();
    let at_zero = prog.bind_all(0).unwrap();
    let at_rom = prog.bind_all(0xbfc0_0000).unwrap();
    assert_eq!(at_rom[4], 0x0bf00002);
    for pos in [0, 1, 2, 3, 5] {
        assert_eq!(at_rom[pos], at_zero[pos], "position {pos}");
    }
}

#[test]
fn vhdl_rendering_of_the_whole_image() {
    let prog = parse_source(SRC).unwrap();
    let words = prog.bind_all(0).unwrap();
    let mut out = Vec::new();
    write_image(&mut out, &words, 0, OutputFormat::Vhdl).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert_eq!(
        text.lines().next().unwrap(),
        "when \"00000000000000000000000000000000\"=>output<=\"00100000000000010000000000000011\";"
    );
    // Instruction 5 sits at address 20.
    assert_eq!(
        text.lines().last().unwrap(),
        "when \"00000000000000000000000000010100\"=>output<=\"10101100011000010000000000000000\";"
    );
}
