use pretty_assertions::assert_eq;

use mipsasm_rs::emit::{bits32, write_image};
use mipsasm_rs::OutputFormat;

const WORDS: [u32; 3] = [0x00430820, 0x1022fffe, 0x08000042];

fn render(words: &[u32], boot_addr: u32, format: OutputFormat) -> Vec<u8> {
    let mut out = Vec::new();
    write_image(&mut out, words, boot_addr, format).unwrap();
    out
}

#[test]
fn binary_is_little_endian() {
    let out = render(&WORDS, 0, OutputFormat::Binary);
    assert_eq!(
        out,
        vec![
            0x20, 0x08, 0x43, 0x00, //
            0xfe, 0xff, 0x22, 0x10, //
            0x42, 0x00, 0x00, 0x08,
        ]
    );
}

#[test]
fn print_is_one_bit_line_per_word() {
    let out = String::from_utf8(render(&WORDS, 0, OutputFormat::Print)).unwrap();
    assert_eq!(
        out,
        "00000000010000110000100000100000\n\
         00010000001000101111111111111110\n\
         00001000000000000000000001000010\n"
    );
}

#[test]
fn vhdl_entries_are_in_ascending_address_order() {
    let boot = 0xbfc0_0000;
    let out = String::from_utf8(render(&WORDS, boot, OutputFormat::Vhdl)).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    for (pos, line) in lines.iter().enumerate() {
        let addr = boot + pos as u32 * 4;
        assert_eq!(
            *line,
            format!(
                "when \"{}\"=>output<=\"{}\";",
                bits32(addr),
                bits32(WORDS[pos])
            )
        );
    }
}

#[test]
fn vhdl_template_is_exact() {
    let out = String::from_utf8(render(&[0x08000042], 0, OutputFormat::Vhdl)).unwrap();
    assert_eq!(
        out,
        "when \"00000000000000000000000000000000\"=>output<=\"00001000000000000000000001000010\";\n"
    );
}

#[test]
fn empty_program_emits_nothing() {
    for format in [OutputFormat::Binary, OutputFormat::Print, OutputFormat::Vhdl] {
        assert!(render(&[], 0, format).is_empty());
    }
}
