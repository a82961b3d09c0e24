//! Space Invaders machine
//!
//! The cabinet is an 8080 at 2 MHz with 8 KiB of ROM at 0x0000, RAM and
//! the 7 KiB video bitmap at 0x2400..0x3FFF, a discrete bit-shift
//! coprocessor on the I/O ports and a CRT mounted sideways: the 256x224
//! bitmap is rotated 90 degrees, so the visible screen is 224 wide and
//! 256 tall.
//!
//! Port map:
//!
//! | Port | Dir | Meaning |
//! |------|-----|---------|
//! | 1    | IN  | coin (bit 0, active low), P2 start, P1 start, fire, left, right |
//! | 2    | IN  | dip switches and P2 controls |
//! | 3    | IN  | shift register read: `((shift1:shift0) >> (8 - offset)) & 0xFF` |
//! | 2    | OUT | shift offset (bits 0-2) |
//! | 4    | OUT | shift register feed: shift0 := shift1, shift1 := value |
//! | 3,5,6| OUT | sound latches, unemulated |
//!
//! The video hardware interrupts twice per frame: `RST 1` as the beam
//! reaches mid-screen and `RST 2` at vblank, 120 times a second in total.

use crate::cpu::{Cpu, Mode};
use crate::memory::MemError;
use std::cell::RefCell;
use std::rc::Rc;

/// Visible screen size after rotation
pub const SCREEN_WIDTH: usize = 224;
pub const SCREEN_HEIGHT: usize = 256;

/// Start of the video bitmap
pub const VRAM_BASE: u16 = 0x2400;

/// 2 MHz CPU, 120 interrupt periods per second
const HALF_FRAME_CYCLES: u64 = 2_000_000 / 120;

/// Mid-screen interrupt: RST 1
const RST_1: u8 = 0xCF;
/// Vblank interrupt: RST 2
const RST_2: u8 = 0xD7;

/// Cabinet input state, written by the frontend between frames
#[derive(Debug, Clone, Copy, Default)]
pub struct Buttons {
    pub coin: bool,
    pub start1: bool,
    pub start2: bool,
    pub fire: bool,
    pub left: bool,
    pub right: bool,
}

/// Shift coprocessor and input matrix, shared with the port handlers
#[derive(Default)]
struct Ports {
    shift0: u8,
    shift1: u8,
    shift_offset: u8,
    buttons: Buttons,
}

impl Ports {
    fn read(&self, port: u8) -> u8 {
        match port {
            1 => {
                // Bit 0 is the coin switch, 0 when a coin drops
                let b = &self.buttons;
                let mut v = if b.coin { 0x00 } else { 0x01 };
                if b.start2 {
                    v |= 0x02;
                }
                if b.start1 {
                    v |= 0x04;
                }
                if b.fire {
                    v |= 0x10;
                }
                if b.left {
                    v |= 0x20;
                }
                if b.right {
                    v |= 0x40;
                }
                v
            }
            // Dip switches: three lives, bonus at 1500, coin info on
            2 => 0x03,
            3 => {
                let word = ((self.shift1 as u16) << 8) | self.shift0 as u16;
                (word >> (8 - self.shift_offset)) as u8
            }
            _ => 0,
        }
    }

    fn write(&mut self, port: u8, val: u8) {
        match port {
            2 => self.shift_offset = val & 0x07,
            4 => {
                self.shift0 = self.shift1;
                self.shift1 = val;
            }
            // Sound latches
            _ => {}
        }
    }
}

pub struct Invaders {
    pub cpu: Cpu,
    ports: Rc<RefCell<Ports>>,
    /// Vector for the next half-frame interrupt, alternating RST 1/RST 2
    next_vector: u8,
    framebuffer: Vec<u32>,
}

impl Invaders {
    /// Build the machine from the ROM images, loaded back to back from
    /// 0x0000 (the cabinet order is invaders.h, .g, .f, .e). A single
    /// concatenated image works as well.
    pub fn new(roms: &[Vec<u8>]) -> Result<Self, MemError> {
        let mut cpu = Cpu::new(Mode::I8080);

        let mut base = 0usize;
        for rom in roms {
            if base > u16::MAX as usize {
                return Err(MemError::RomTooLarge);
            }
            cpu.load(base as u16, rom)?;
            base += rom.len();
        }

        let ports = Rc::new(RefCell::new(Ports::default()));

        let p = Rc::clone(&ports);
        cpu.register_in_handler(Box::new(move |port| p.borrow().read(port)));
        let p = Rc::clone(&ports);
        cpu.register_out_handler(Box::new(move |port, val| p.borrow_mut().write(port, val)));

        Ok(Self {
            cpu,
            ports,
            next_vector: RST_2,
            framebuffer: vec![0xFF00_0000; SCREEN_WIDTH * SCREEN_HEIGHT],
        })
    }

    /// Update the input matrix
    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.ports.borrow_mut().buttons = buttons;
    }

    /// Run one 60 Hz frame: two half-frames, each ending in its video
    /// interrupt
    pub fn run_frame(&mut self) {
        self.run_half_frame();
        self.run_half_frame();
    }

    /// Step until the half-frame T-state budget is spent, then raise the
    /// alternating video interrupt
    pub fn run_half_frame(&mut self) {
        let target = self.cpu.cycles + HALF_FRAME_CYCLES;
        while self.cpu.cycles < target {
            self.cpu.step();
        }
        self.next_vector = if self.next_vector == RST_2 { RST_1 } else { RST_2 };
        self.cpu.request_interrupt(self.next_vector);
    }

    /// Render the video bitmap into the rotated ARGB framebuffer
    pub fn render(&mut self) -> &[u32] {
        for y in 0..SCREEN_WIDTH {
            for x8 in (0..SCREEN_HEIGHT).step_by(8) {
                let offset = (y * 256 + x8) / 8;
                let mut byte = self.cpu.read8(VRAM_BASE + offset as u16);
                for bit in 0..8 {
                    let row = 255 - (x8 + bit);
                    let color = if byte & 0x01 != 0 { 0xFFFF_FFFF } else { 0xFF00_0000 };
                    self.framebuffer[row * SCREEN_WIDTH + y] = color;
                    byte >>= 1;
                }
            }
        }
        &self.framebuffer
    }
}
