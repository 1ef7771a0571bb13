//! Math utilities for the TB6612 drive core.
//!
//! This module maps signed motor power onto H-bridge direction and PWM magnitude.

pub mod power;
