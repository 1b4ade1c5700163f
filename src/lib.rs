#![allow(non_snake_case)]

pub mod Integrity {
    pub mod BLAKE;
}

pub mod Feistel_network;

pub use Feistel_network::{
    f4_jumble, f4_jumble_inv, f4_jumble_inv_mut, f4_jumble_mut, F4JumbleError, MAX_MESSAGE_LEN,
    MIN_MESSAGE_LEN,
};
