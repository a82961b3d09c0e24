//! Space Invaders cabinet frontend.
//!
//! Usage: invaders <rom-dir | rom-file>
//!
//! A directory is expected to hold the four cabinet images invaders.h,
//! invaders.g, invaders.f and invaders.e; a single file is loaded as one
//! concatenated image.
//!
//! Keys: C inserts a coin, 1/2 start, arrows move, space fires,
//! Escape quits.

use emu80::harness::invaders::{Buttons, Invaders, SCREEN_HEIGHT, SCREEN_WIDTH};
use minifb::{Key, Scale, Window, WindowOptions};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn load_roms(path: &Path) -> std::io::Result<Vec<Vec<u8>>> {
    if path.is_dir() {
        ["invaders.h", "invaders.g", "invaders.f", "invaders.e"]
            .iter()
            .map(|name| fs::read(path.join(name)))
            .collect()
    } else {
        Ok(vec![fs::read(path)?])
    }
}

fn main() {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: invaders <rom-dir | rom-file>");
        process::exit(2);
    };

    let roms = match load_roms(Path::new(&path)) {
        Ok(roms) => roms,
        Err(e) => {
            eprintln!("invaders: {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut machine = match Invaders::new(&roms) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("invaders: {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut window = Window::new(
        "emu80 - Space Invaders",
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        WindowOptions {
            scale: Scale::X2,
            ..WindowOptions::default()
        },
    )
    .unwrap_or_else(|e| {
        eprintln!("invaders: window: {}", e);
        process::exit(1);
    });
    window.set_target_fps(60);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        machine.set_buttons(Buttons {
            coin: window.is_key_down(Key::C),
            start1: window.is_key_down(Key::Key1),
            start2: window.is_key_down(Key::Key2),
            fire: window.is_key_down(Key::Space),
            left: window.is_key_down(Key::Left),
            right: window.is_key_down(Key::Right),
        });

        machine.run_frame();
        let fb = machine.render();
        window
            .update_with_buffer(fb, SCREEN_WIDTH, SCREEN_HEIGHT)
            .expect("window update failed");
    }
}
