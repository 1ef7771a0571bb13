//! Drive core for TB6612FNG dual H-bridge motor drivers on no-std embedded platforms.
//!
//! For a host-side runnable setup, see the `tb6612-app/mock-mcu` binary.
#![no_std]

pub mod utils;
