use std::fs;
use std::path::Path;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{LoadError, RuntimeError};
use crate::instruction::Instruction;
use crate::memory::{Memory, BYTES_PER_GLYPH, FONT_ADDR, PROGRAM_ADDR};

pub const VIDEO_WIDTH: usize = 64; // Pixels
pub const VIDEO_HEIGHT: usize = 32; // Pixels

pub const KEY_COUNT: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_LEVELS: usize = 16;

const FLAG: usize = 0xf;

/// The whole machine: memory, registers, stack, timers, video and keypad.
///
/// One call to [`Chip8::tick`] runs one fetch, decode, execute and timer step.
/// The keypad is the only state written from outside; video and the sound
/// timer are read by the frontend after a batch of ticks.
pub struct Chip8<R: Rng = StdRng> {
    memory: Memory,
    registers: [u8; REGISTER_COUNT],
    ireg: u16,
    pc: u16,
    sp: u8,
    stack: [u16; STACK_LEVELS],
    delay_timer: u8,
    sound_timer: u8,
    video: [bool; VIDEO_WIDTH * VIDEO_HEIGHT],
    key_pad: [bool; KEY_COUNT],
    opcode: u16,
    rng: R,
}

impl Chip8<StdRng> {
    pub fn new() -> Self {
        Chip8::with_rng(StdRng::from_entropy())
    }
}

impl Default for Chip8<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Chip8<R> {
    /// Fresh machine drawing random bytes from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Chip8 {
            memory: Memory::new(),
            registers: [0; REGISTER_COUNT],
            ireg: 0,
            pc: PROGRAM_ADDR,
            sp: 0,
            stack: [0; STACK_LEVELS],
            delay_timer: 0,
            sound_timer: 0,
            video: [false; VIDEO_WIDTH * VIDEO_HEIGHT],
            key_pad: [false; KEY_COUNT],
            opcode: 0,
            rng,
        }
    }

    /// Back to power-on state. The random generator is kept.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.registers = [0; REGISTER_COUNT];
        self.ireg = 0;
        self.pc = PROGRAM_ADDR;
        self.sp = 0;
        self.stack = [0; STACK_LEVELS];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.video = [false; VIDEO_WIDTH * VIDEO_HEIGHT];
        self.key_pad = [false; KEY_COUNT];
        self.opcode = 0;
    }

    /// Copy a program image to 0x200. Registers, timers and the stack are
    /// left as they are; call [`Chip8::reset`] first for a clean restart.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.memory.load_program(program)
    }

    pub fn load_rom(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let rom = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program(&rom)
    }

    /// Run one instruction and one timer step.
    ///
    /// A stack fault abandons the tick: `pc` is put back on the faulting
    /// instruction and the timers are not stepped.
    pub fn tick(&mut self) -> Result<(), RuntimeError> {
        let instr_addr = self.pc;
        let instr = self.fetch();
        let instruction = Instruction::decode(instr);
        trace!("{:#05x}: {:#06x} {}", instr_addr, instr, instruction);

        if let Err(err) = self.execute(instruction) {
            self.pc = instr_addr;
            return Err(err);
        }

        self.decrement_timers();
        Ok(())
    }

    /// Run up to `cycles` ticks, stopping at the first error.
    pub fn run_cycles(&mut self, cycles: u32) -> Result<(), RuntimeError> {
        for _ in 0..cycles {
            self.tick()?;
        }
        Ok(())
    }

    fn fetch(&mut self) -> u16 {
        self.opcode = self.memory.word(self.pc);
        self.pc = self.pc.wrapping_add(2);
        self.opcode
    }

    fn skip_instructions(&mut self, num_instr: u16) {
        self.pc = self.pc.wrapping_add(num_instr * 2);
    }

    fn decrement_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    fn push_stack(&mut self, addr: u16) -> Result<(), RuntimeError> {
        let sp = usize::from(self.sp);
        if sp >= STACK_LEVELS {
            return Err(RuntimeError::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.stack[sp] = addr;
        self.sp += 1;
        Ok(())
    }

    fn pop_stack(&mut self) -> Result<u16, RuntimeError> {
        if self.sp == 0 {
            return Err(RuntimeError::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        Ok(self.stack[usize::from(self.sp)])
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), RuntimeError> {
        match instruction {
            Instruction::ClearScreen => {
                self.video.fill(false);
            }
            Instruction::Return => {
                self.pc = self.pop_stack()?;
            }
            Instruction::Jump(addr) => {
                self.pc = addr;
            }
            Instruction::Call(addr) => {
                self.push_stack(self.pc)?;
                self.pc = addr;
            }
            Instruction::SkipEqImm { x, kk } => {
                if self.registers[x] == kk {
                    self.skip_instructions(1);
                }
            }
            Instruction::SkipNeqImm { x, kk } => {
                if self.registers[x] != kk {
                    self.skip_instructions(1);
                }
            }
            Instruction::SkipEqReg { x, y } => {
                if self.registers[x] == self.registers[y] {
                    self.skip_instructions(1);
                }
            }
            Instruction::SkipNeqReg { x, y } => {
                if self.registers[x] != self.registers[y] {
                    self.skip_instructions(1);
                }
            }
            Instruction::LoadImm { x, kk } => {
                self.registers[x] = kk;
            }
            Instruction::AddImm { x, kk } => {
                self.registers[x] = self.registers[x].wrapping_add(kk);
            }
            Instruction::Move { x, y } => {
                self.registers[x] = self.registers[y];
            }
            Instruction::Or { x, y } => {
                self.registers[x] |= self.registers[y];
            }
            Instruction::And { x, y } => {
                self.registers[x] &= self.registers[y];
            }
            Instruction::Xor { x, y } => {
                self.registers[x] ^= self.registers[y];
            }
            Instruction::AddReg { x, y } => {
                let (sum, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[FLAG] = carry as u8;
                self.registers[x] = sum;
            }
            Instruction::SubReg { x, y } => {
                let (reg_x, reg_y) = (self.registers[x], self.registers[y]);
                self.registers[FLAG] = (reg_x > reg_y) as u8;
                self.registers[x] = reg_x.wrapping_sub(reg_y);
            }
            Instruction::ShiftRight { x } => {
                let reg_x = self.registers[x];
                self.registers[FLAG] = reg_x & 0x01;
                self.registers[x] = reg_x >> 1;
            }
            Instruction::SubnReg { x, y } => {
                let (reg_x, reg_y) = (self.registers[x], self.registers[y]);
                self.registers[FLAG] = (reg_y >= reg_x) as u8;
                self.registers[x] = reg_y.wrapping_sub(reg_x);
            }
            Instruction::ShiftLeft { x } => {
                let reg_x = self.registers[x];
                self.registers[FLAG] = (reg_x >> 7) & 0x01;
                self.registers[x] = reg_x << 1;
            }
            Instruction::SetIndex(addr) => {
                self.ireg = addr;
            }
            Instruction::JumpOffset(addr) => {
                self.pc = addr + u16::from(self.registers[0]);
            }
            Instruction::RandomAnd { x, kk } => {
                self.registers[x] = self.rng.gen::<u8>() & kk;
            }
            Instruction::Draw { x, y, n } => {
                let (col, row) = (self.registers[x], self.registers[y]);
                self.draw_instr(col, row, n);
            }
            Instruction::SkipKeyPressed { x } => {
                if self.key_pad[usize::from(self.registers[x] & 0x0f)] {
                    self.skip_instructions(1);
                }
            }
            Instruction::SkipKeyNotPressed { x } => {
                if !self.key_pad[usize::from(self.registers[x] & 0x0f)] {
                    self.skip_instructions(1);
                }
            }
            Instruction::LoadDelay { x } => {
                self.registers[x] = self.delay_timer;
            }
            Instruction::WaitKey { x } => match self.key_pad.iter().position(|&down| down) {
                Some(key) => self.registers[x] = key as u8,
                // run this instruction again next tick
                None => self.pc = self.pc.wrapping_sub(2),
            },
            Instruction::SetDelay { x } => {
                self.delay_timer = self.registers[x];
            }
            Instruction::SetSound { x } => {
                self.sound_timer = self.registers[x];
            }
            Instruction::AddIndex { x } => {
                self.ireg = self.ireg.wrapping_add(u16::from(self.registers[x]));
            }
            Instruction::LoadGlyphAddr { x } => {
                self.ireg = FONT_ADDR + BYTES_PER_GLYPH * u16::from(self.registers[x]);
            }
            Instruction::StoreBcd { x } => {
                let value = self.registers[x];
                self.memory.write(self.ireg, value / 100);
                self.memory.write(self.ireg.wrapping_add(1), (value / 10) % 10);
                self.memory.write(self.ireg.wrapping_add(2), value % 10);
            }
            Instruction::StoreRegs { x } => {
                for i in 0..=x {
                    self.memory
                        .write(self.ireg.wrapping_add(i as u16), self.registers[i]);
                }
            }
            Instruction::LoadRegs { x } => {
                for i in 0..=x {
                    self.registers[i] = self.memory.read(self.ireg.wrapping_add(i as u16));
                }
            }
            Instruction::Unassigned(instr) => {
                debug!("unknown instruction {:#06x}, ignored", instr);
            }
        }
        Ok(())
    }

    /// XOR an 8-wide, `height`-tall sprite from memory at I onto the screen,
    /// wrapping at the edges. VF ends up 1 iff some lit pixel was turned off.
    fn draw_instr(&mut self, col: u8, row: u8, height: u8) {
        let start_x = usize::from(col) % VIDEO_WIDTH;
        let start_y = usize::from(row) % VIDEO_HEIGHT;

        self.registers[FLAG] = 0;

        for isprite in 0..height {
            let sprite = self.memory.read(self.ireg.wrapping_add(u16::from(isprite)));
            let y = (start_y + usize::from(isprite)) % VIDEO_HEIGHT;

            for bit in 0..8 {
                if (0x80 >> bit) & sprite == 0 {
                    continue;
                }

                let x = (start_x + bit) % VIDEO_WIDTH;
                let pixel = &mut self.video[y * VIDEO_WIDTH + x];
                if *pixel {
                    self.registers[FLAG] = 1;
                }
                *pixel = !*pixel;
            }
        }
    }

    pub fn video(&self) -> &[bool] {
        &self.video
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.video[(y % VIDEO_HEIGHT) * VIDEO_WIDTH + (x % VIDEO_WIDTH)]
    }

    /// true while the buzzer should sound
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.key_pad[key & 0x0f] = pressed;
    }

    pub fn set_keypad(&mut self, keys: [bool; KEY_COUNT]) {
        self.key_pad = keys;
    }

    pub fn keypad(&self) -> &[bool; KEY_COUNT] {
        &self.key_pad
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.ireg
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// the most recently fetched instruction word
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }
}
