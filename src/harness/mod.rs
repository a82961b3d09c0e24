//! Collaborator shells
//!
//! The machines that run on top of the CPU core. Each harness owns a
//! `Cpu`, drives it with repeated `step()` calls and touches its state
//! only between steps - the core itself never intercepts anything.

pub mod cpm;
pub mod invaders;
