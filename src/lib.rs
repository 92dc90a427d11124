//! A virtual machine for a one-instruction-set computer built on subleq.

pub mod dump;
pub mod error;
pub mod image;
pub mod inst;
pub mod memory;
pub mod observer;
pub mod vm;
