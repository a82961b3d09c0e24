//! Run a CP/M diagnostic ROM against the CPU core.
//!
//! Usage: diag [--cpudiag | --8080 | --z80] [--trace] <rom.com>
//!
//! Without a workload flag it is guessed from the file name: names
//! containing "diag" run as cpudiag, names containing "zex" as the Z80
//! exerciser, anything else as the 8080 exerciser. `--trace` prints every
//! instruction to stderr as it executes.

use emu80::harness::cpm::{DiagHarness, Workload};
use std::env;
use std::fs;
use std::process;

fn usage() -> ! {
    eprintln!("usage: diag [--cpudiag | --8080 | --z80] [--trace] <rom.com>");
    process::exit(2);
}

fn main() {
    let mut workload = None;
    let mut trace = false;
    let mut path = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--cpudiag" => workload = Some(Workload::Cpudiag),
            "--8080" => workload = Some(Workload::Exerciser8080),
            "--z80" => workload = Some(Workload::ExerciserZ80),
            "--trace" => trace = true,
            _ if arg.starts_with("--") => usage(),
            _ if path.is_none() => path = Some(arg),
            _ => usage(),
        }
    }

    let Some(path) = path else { usage() };

    let workload = workload.unwrap_or_else(|| {
        let name = path.to_lowercase();
        if name.contains("diag") {
            Workload::Cpudiag
        } else if name.contains("zex") {
            Workload::ExerciserZ80
        } else {
            Workload::Exerciser8080
        }
    });

    let rom = match fs::read(&path) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("diag: {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut harness = match DiagHarness::new(workload, &rom) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("diag: {}: {}", path, e);
            process::exit(1);
        }
    };
    harness.echo = true;
    harness.trace = trace;
    harness.run();

    println!();
    println!("T-states: {}", harness.cpu.cycles);
}
