use log::info;

use crate::error::LoadError;

// NB. addresses are u16 as per the chip-8; every access is reduced modulo
//     MEMORY_SIZE so nothing can index past the end of RAM

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// largest program image that fits between PROGRAM_ADDR and the top of RAM
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_ADDR as usize;

/// where the hex digit glyphs live
pub const FONT_ADDR: u16 = 0x050;
pub const BYTES_PER_GLYPH: u16 = 5;

const ADDR_MASK: u16 = (MEMORY_SIZE - 1) as u16;

#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4K RAM with the glyph table baked in below the program area.
///
/// Layout:
///   0x000-0x04f  unused
///   0x050-0x09f  hex digit glyphs
///   0x0a0-0x1ff  unused
///   0x200-0xfff  program
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// zeroed RAM with the glyphs installed
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; MEMORY_SIZE]);
        let font_start = usize::from(FONT_ADDR);
        bytes[font_start..font_start + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[usize::from(addr & ADDR_MASK)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[usize::from(addr & ADDR_MASK)] = value;
    }

    /// big-endian two-byte word; the second byte wraps to 0x000 at the top of RAM
    pub fn word(&self, addr: u16) -> u16 {
        let high = u16::from(self.read(addr));
        let low = u16::from(self.read(addr.wrapping_add(1)));
        (high << 8) | low
    }

    /// copy a program image in at PROGRAM_ADDR; the rest of the program area is
    /// zeroed so nothing from a previous image survives
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }

        let start = usize::from(PROGRAM_ADDR);
        self.bytes[start..].fill(0);
        self.bytes[start..start + program.len()].copy_from_slice(program);
        info!("loaded {} bytes at {:#05x}", program.len(), PROGRAM_ADDR);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_zeroed_outside_font() {
        let m = Memory::new();
        assert!(m.as_slice()[..0x50].iter().all(|&b| b == 0));
        assert!(m.as_slice()[0xa0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_font_installed() {
        let m = Memory::new();
        assert_eq!(&m.as_slice()[0x50..0xa0], &FONT[..]);
        // glyph for A starts 50 bytes in
        assert_eq!(m.read(FONT_ADDR + 50), 0xF0);
        assert_eq!(m.read(FONT_ADDR + 53), 0x90);
    }

    #[test]
    fn test_read_word() {
        let mut m = Memory::new();
        m.write(0x300, 0x12);
        m.write(0x301, 0x34);
        assert_eq!(m.word(0x300), 0x1234);
    }

    #[test]
    fn test_addresses_wrap() {
        let mut m = Memory::new();
        m.write(0x1234, 0xab);
        assert_eq!(m.read(0x0234), 0xab);

        m.write(0x0fff, 0xcd);
        m.write(0x0000, 0xef);
        assert_eq!(m.word(0x0fff), 0xcdef);
    }

    #[test]
    fn test_program_load_ok() {
        let mut m = Memory::new();
        m.load_program(&[0x00, 0xe0]).unwrap();
        assert_eq!(&m.as_slice()[0x200..0x202], &[0x00, 0xe0]);
    }

    #[test]
    fn test_program_fills_memory_exactly() {
        let mut m = Memory::new();
        let program = vec![0x11; MAX_PROGRAM_SIZE];
        m.load_program(&program).unwrap();
        assert_eq!(m.read(0x0fff), 0x11);
        assert_eq!(&m.as_slice()[0x50..0xa0], &FONT[..]);
    }

    #[test]
    fn test_program_too_large() {
        let mut m = Memory::new();
        let program = vec![0x11; MAX_PROGRAM_SIZE + 1];
        match m.load_program(&program) {
            Err(LoadError::TooLarge { size, max_size }) => {
                assert_eq!(size, 0xe01);
                assert_eq!(max_size, 0xe00);
            }
            other => panic!("unexpected result {:?}", other),
        }
        // nothing was written
        assert_eq!(m.read(0x200), 0);
    }

    #[test]
    fn test_reload_overwrites_program_region() {
        let mut m = Memory::new();
        m.load_program(&[0xaa, 0xbb, 0xcc]).unwrap();
        m.load_program(&[0x11]).unwrap();
        assert_eq!(&m.as_slice()[0x200..0x203], &[0x11, 0x00, 0x00]);
    }
}
