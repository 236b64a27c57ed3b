use std::fmt;

const NNN: u16 = 0x0fff;
const NN: u16 = 0x00ff;
const N: u16 = 0x000f;
const X: u16 = 0x0f00;
const Y: u16 = 0x00f0;

/// Instruction family, the top nibble.
pub fn family(opcode: u16) -> u8 {
    ((opcode & 0xf000) >> 12) as u8
}

pub fn get_x(opcode: u16) -> usize {
    usize::from((opcode & X) >> 8)
}

pub fn get_y(opcode: u16) -> usize {
    usize::from((opcode & Y) >> 4)
}

pub fn get_n(opcode: u16) -> u8 {
    (opcode & N) as u8
}

pub fn get_kk(opcode: u16) -> u8 {
    (opcode & NN) as u8
}

pub fn get_nnn(opcode: u16) -> u16 {
    opcode & NNN
}

/// Every handler the interpreter can route an opcode to. Register operands
/// are indices into the register file (0x0..=0xf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XKK
    SkipEqImm { x: usize, kk: u8 },
    /// 4XKK
    SkipNeqImm { x: usize, kk: u8 },
    /// 5XY0
    SkipEqReg { x: usize, y: usize },
    /// 6XKK
    LoadImm { x: usize, kk: u8 },
    /// 7XKK
    AddImm { x: usize, kk: u8 },
    /// 8XY0
    Move { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    AddReg { x: usize, y: usize },
    /// 8XY5
    SubReg { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize },
    /// 8XY7
    SubnReg { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize },
    /// 9XY0
    SkipNeqReg { x: usize, y: usize },
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXKK
    RandomAnd { x: usize, kk: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipKeyPressed { x: usize },
    /// EXA1
    SkipKeyNotPressed { x: usize },
    /// FX07
    LoadDelay { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    LoadGlyphAddr { x: usize },
    /// FX33
    StoreBcd { x: usize },
    /// FX55
    StoreRegs { x: usize },
    /// FX65
    LoadRegs { x: usize },
    /// any encoding without a handler; executes as a no-op
    Unassigned(u16),
}

impl Instruction {
    /// Route an opcode through the two-level table: the family picks a
    /// handler, except families 0, 8 and E which pick by the low nibble and
    /// family F which picks by the low byte.
    pub fn decode(opcode: u16) -> Instruction {
        let x = get_x(opcode);
        let y = get_y(opcode);
        let kk = get_kk(opcode);
        let nnn = get_nnn(opcode);

        match family(opcode) {
            0x0 => match get_n(opcode) {
                0x0 => Instruction::ClearScreen,
                0xe => Instruction::Return,
                _ => Instruction::Unassigned(opcode),
            },
            0x1 => Instruction::Jump(nnn),
            0x2 => Instruction::Call(nnn),
            0x3 => Instruction::SkipEqImm { x, kk },
            0x4 => Instruction::SkipNeqImm { x, kk },
            0x5 => Instruction::SkipEqReg { x, y },
            0x6 => Instruction::LoadImm { x, kk },
            0x7 => Instruction::AddImm { x, kk },
            0x8 => match get_n(opcode) {
                0x0 => Instruction::Move { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddReg { x, y },
                0x5 => Instruction::SubReg { x, y },
                0x6 => Instruction::ShiftRight { x },
                0x7 => Instruction::SubnReg { x, y },
                0xe => Instruction::ShiftLeft { x },
                _ => Instruction::Unassigned(opcode),
            },
            0x9 => Instruction::SkipNeqReg { x, y },
            0xa => Instruction::SetIndex(nnn),
            0xb => Instruction::JumpOffset(nnn),
            0xc => Instruction::RandomAnd { x, kk },
            0xd => Instruction::Draw {
                x,
                y,
                n: get_n(opcode),
            },
            0xe => match get_n(opcode) {
                0xe => Instruction::SkipKeyPressed { x },
                0x1 => Instruction::SkipKeyNotPressed { x },
                _ => Instruction::Unassigned(opcode),
            },
            0xf => match kk {
                0x07 => Instruction::LoadDelay { x },
                0x0a => Instruction::WaitKey { x },
                0x15 => Instruction::SetDelay { x },
                0x18 => Instruction::SetSound { x },
                0x1e => Instruction::AddIndex { x },
                0x29 => Instruction::LoadGlyphAddr { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreRegs { x },
                0x65 => Instruction::LoadRegs { x },
                _ => Instruction::Unassigned(opcode),
            },
            _ => unreachable!("family is a nibble"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::ClearScreen => write!(f, "cls"),
            Instruction::Return => write!(f, "ret"),
            Instruction::Jump(addr) => write!(f, "jp {:#05x}", addr),
            Instruction::Call(addr) => write!(f, "call {:#05x}", addr),
            Instruction::SkipEqImm { x, kk } => write!(f, "se v{:x}, {:#04x}", x, kk),
            Instruction::SkipNeqImm { x, kk } => write!(f, "sne v{:x}, {:#04x}", x, kk),
            Instruction::SkipEqReg { x, y } => write!(f, "se v{:x}, v{:x}", x, y),
            Instruction::LoadImm { x, kk } => write!(f, "ld v{:x}, {:#04x}", x, kk),
            Instruction::AddImm { x, kk } => write!(f, "add v{:x}, {:#04x}", x, kk),
            Instruction::Move { x, y } => write!(f, "ld v{:x}, v{:x}", x, y),
            Instruction::Or { x, y } => write!(f, "or v{:x}, v{:x}", x, y),
            Instruction::And { x, y } => write!(f, "and v{:x}, v{:x}", x, y),
            Instruction::Xor { x, y } => write!(f, "xor v{:x}, v{:x}", x, y),
            Instruction::AddReg { x, y } => write!(f, "add v{:x}, v{:x}", x, y),
            Instruction::SubReg { x, y } => write!(f, "sub v{:x}, v{:x}", x, y),
            Instruction::ShiftRight { x } => write!(f, "shr v{:x}", x),
            Instruction::SubnReg { x, y } => write!(f, "subn v{:x}, v{:x}", x, y),
            Instruction::ShiftLeft { x } => write!(f, "shl v{:x}", x),
            Instruction::SkipNeqReg { x, y } => write!(f, "sne v{:x}, v{:x}", x, y),
            Instruction::SetIndex(addr) => write!(f, "ld i, {:#05x}", addr),
            Instruction::JumpOffset(addr) => write!(f, "jp v0, {:#05x}", addr),
            Instruction::RandomAnd { x, kk } => write!(f, "rnd v{:x}, {:#04x}", x, kk),
            Instruction::Draw { x, y, n } => write!(f, "drw v{:x}, v{:x}, {}", x, y, n),
            Instruction::SkipKeyPressed { x } => write!(f, "skp v{:x}", x),
            Instruction::SkipKeyNotPressed { x } => write!(f, "sknp v{:x}", x),
            Instruction::LoadDelay { x } => write!(f, "ld v{:x}, dt", x),
            Instruction::WaitKey { x } => write!(f, "ld v{:x}, k", x),
            Instruction::SetDelay { x } => write!(f, "ld dt, v{:x}", x),
            Instruction::SetSound { x } => write!(f, "ld st, v{:x}", x),
            Instruction::AddIndex { x } => write!(f, "add i, v{:x}", x),
            Instruction::LoadGlyphAddr { x } => write!(f, "ld f, v{:x}", x),
            Instruction::StoreBcd { x } => write!(f, "ld b, v{:x}", x),
            Instruction::StoreRegs { x } => write!(f, "ld [i], v{:x}", x),
            Instruction::LoadRegs { x } => write!(f, "ld v{:x}, [i]", x),
            Instruction::Unassigned(opcode) => write!(f, "unknown {:#06x}", opcode),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fields() {
        assert_eq!(family(0xd12f), 0xd);
        assert_eq!(get_x(0xd12f), 0x1);
        assert_eq!(get_y(0xd12f), 0x2);
        assert_eq!(get_n(0xd12f), 0xf);
        assert_eq!(get_kk(0xd12f), 0x2f);
        assert_eq!(get_nnn(0xd12f), 0x12f);
    }

    #[test]
    fn test_top_level_families() {
        assert_eq!(Instruction::decode(0x1234), Instruction::Jump(0x234));
        assert_eq!(Instruction::decode(0x2abc), Instruction::Call(0xabc));
        assert_eq!(
            Instruction::decode(0x3a42),
            Instruction::SkipEqImm { x: 0xa, kk: 0x42 }
        );
        assert_eq!(Instruction::decode(0xa123), Instruction::SetIndex(0x123));
        assert_eq!(Instruction::decode(0xb300), Instruction::JumpOffset(0x300));
        assert_eq!(
            Instruction::decode(0xd015),
            Instruction::Draw { x: 0, y: 1, n: 5 }
        );
    }

    #[test]
    fn test_family_zero_routes_on_low_nibble() {
        assert_eq!(Instruction::decode(0x00e0), Instruction::ClearScreen);
        assert_eq!(Instruction::decode(0x00ee), Instruction::Return);
        // only the low nibble takes part in routing
        assert_eq!(Instruction::decode(0x0120), Instruction::ClearScreen);
        assert_eq!(Instruction::decode(0x0fde), Instruction::Return);
        assert_eq!(Instruction::decode(0x00e1), Instruction::Unassigned(0x00e1));
    }

    #[test]
    fn test_family_eight_routes_on_low_nibble() {
        assert_eq!(
            Instruction::decode(0x8126),
            Instruction::ShiftRight { x: 1 }
        );
        assert_eq!(Instruction::decode(0x812e), Instruction::ShiftLeft { x: 1 });
        assert_eq!(
            Instruction::decode(0x8127),
            Instruction::SubnReg { x: 1, y: 2 }
        );
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            let opcode = 0x8120 | n;
            assert_eq!(Instruction::decode(opcode), Instruction::Unassigned(opcode));
        }
    }

    #[test]
    fn test_family_e_routes_on_low_nibble() {
        assert_eq!(
            Instruction::decode(0xe39e),
            Instruction::SkipKeyPressed { x: 3 }
        );
        assert_eq!(
            Instruction::decode(0xe3a1),
            Instruction::SkipKeyNotPressed { x: 3 }
        );
        assert_eq!(
            Instruction::decode(0xe30e),
            Instruction::SkipKeyPressed { x: 3 }
        );
        assert_eq!(Instruction::decode(0xe3a2), Instruction::Unassigned(0xe3a2));
    }

    #[test]
    fn test_family_f_routes_on_low_byte() {
        assert_eq!(Instruction::decode(0xf50a), Instruction::WaitKey { x: 5 });
        assert_eq!(Instruction::decode(0xf529), Instruction::LoadGlyphAddr { x: 5 });
        assert_eq!(Instruction::decode(0xf565), Instruction::LoadRegs { x: 5 });
        assert_eq!(Instruction::decode(0xf575), Instruction::Unassigned(0xf575));
        assert_eq!(Instruction::decode(0xf5ff), Instruction::Unassigned(0xf5ff));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x00e0).to_string(), "cls");
        assert_eq!(Instruction::decode(0x6afe).to_string(), "ld va, 0xfe");
        assert_eq!(Instruction::decode(0xd125).to_string(), "drw v1, v2, 5");
        assert_eq!(Instruction::decode(0x1200).to_string(), "jp 0x200");
        assert_eq!(Instruction::decode(0xf1ff).to_string(), "unknown 0xf1ff");
    }
}
