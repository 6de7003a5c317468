use bitvec::prelude::*;
use clap::ValueEnum;
use std::io::{self, Write};

/// External representations of a bound instruction image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw words, least-significant byte first.
    Binary,
    /// One line of 32 '0'/'1' characters per word, MSB first.
    Print,
    /// Lookup-table entries for an instruction ROM in a hardware description.
    Vhdl,
}

/// Render `word` as 32 ASCII bits, most-significant first.
pub fn bits32(word: u32) -> String {
    word.view_bits::<Msb0>()
        .iter()
        .map(|b| if *b { '1' } else { '0' })
        .collect()
}

/// Serialize the bound word sequence in program order. Each word's memory
/// address is `boot_addr + position * 4`; the caller must only hand over a
/// fully bound sequence, so nothing here can fail besides the writer.
pub fn write_image<W: Write>(
    out: &mut W,
    words: &[u32],
    boot_addr: u32,
    format: OutputFormat,
) -> io::Result<()> {
    for (pos, &word) in words.iter().enumerate() {
        match format {
            OutputFormat::Binary => out.write_all(&word.to_le_bytes())?,
            OutputFormat::Print => writeln!(out, "{}", bits32(word))?,
            OutputFormat::Vhdl => {
                let addr = boot_addr.wrapping_add(pos as u32 * 4);
                writeln!(out, "when \"{}\"=>output<=\"{}\";", bits32(addr), bits32(word))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_msb_first() {
        assert_eq!(bits32(0x8000_0001), "10000000000000000000000000000001");
        assert_eq!(bits32(0), "0".repeat(32));
    }
}
