use crate::Integrity::BLAKE::blake2b;
use thiserror::Error;

/// Smallest message the jumble is defined for.
pub const MIN_MESSAGE_LEN: usize = 48;
/// Largest message the jumble is defined for.
pub const MAX_MESSAGE_LEN: usize = 4194368;

const PERSONALIZATION_PREFIX: &[u8; 12] = b"UA_F4Jumble_";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum F4JumbleError {
    #[error("message length {0} is outside 48..=4194368")]
    InvalidMessageLength(usize),
}

fn check_message_length(len: usize) -> Result<(), F4JumbleError> {
    match (MIN_MESSAGE_LEN..=MAX_MESSAGE_LEN).contains(&len) {
        true => Ok(()),
        false => Err(F4JumbleError::InvalidMessageLength(len)),
    }
}

/// 16 byte personalization: 12 byte prefix, role byte, round index, little-endian chunk index.
fn personalization(role: u8, round: u8, chunk: u16) -> [u8; 16] {
    let mut personal = [0x00u8; 16];
    personal[0..12].copy_from_slice(PERSONALIZATION_PREFIX);
    personal[12] = role;
    personal[13] = round;
    personal[14..16].copy_from_slice(&chunk.to_le_bytes());
    personal
}

/// Round function G: stretches the hash to `out_len` bytes by concatenating 64 byte
/// digests under per-chunk personalizations. The final digest is truncated, never
/// rounded up, so the output is exactly `out_len` bytes.
fn G(round: u8, input: &[u8], out_len: usize) -> Vec<u8> {
    let mut output = vec![0x00u8; out_len];
    for (chunk, block) in output.chunks_mut(64).enumerate() {
        let digest = blake2b(64, &personalization(b'G', round, chunk as u16), input);
        block.copy_from_slice(&digest[0..block.len()]);
    }
    output
}

/// Round function H: a single digest of `out_len` bytes (`out_len` never exceeds 64
/// because the left half is capped at 64 bytes).
fn H(round: u8, input: &[u8], out_len: usize) -> Vec<u8> {
    blake2b(out_len, &personalization(b'H', round, 0), input)
}

fn xor_in_place(target: &mut [u8], mask: &[u8]) {
    debug_assert_eq!(target.len(), mask.len());
    for (byte, mask_byte) in target.iter_mut().zip(mask.iter()) {
        *byte ^= mask_byte;
    }
}

fn left_half_length(message_len: usize) -> usize {
    usize::min(64, message_len / 2)
}

/// Jumbles `message` in place. Four unkeyed Feistel steps over the unequal halves:
/// the right half is XORed with G of the left, then the left with H of the right,
/// twice, under round indices 0 and 1.
///
/// Fails with [`F4JumbleError::InvalidMessageLength`] (leaving the buffer untouched)
/// unless `MIN_MESSAGE_LEN <= message.len() <= MAX_MESSAGE_LEN`.
pub fn f4_jumble_mut(message: &mut [u8]) -> Result<(), F4JumbleError> {
    check_message_length(message.len())?;
    let (left, right) = message.split_at_mut(left_half_length(message.len()));

    xor_in_place(right, &G(0, left, right.len()));
    xor_in_place(left, &H(0, right, left.len()));
    xor_in_place(right, &G(1, left, right.len()));
    xor_in_place(left, &H(1, right, left.len()));
    Ok(())
}

/// Un-jumbles `message` in place by undoing the four XOR steps in reverse order.
/// XOR is self-inverse, so no round function is ever inverted.
///
/// Fails with [`F4JumbleError::InvalidMessageLength`] (leaving the buffer untouched)
/// unless `MIN_MESSAGE_LEN <= message.len() <= MAX_MESSAGE_LEN`.
pub fn f4_jumble_inv_mut(message: &mut [u8]) -> Result<(), F4JumbleError> {
    check_message_length(message.len())?;
    let (left, right) = message.split_at_mut(left_half_length(message.len()));

    xor_in_place(left, &H(1, right, left.len()));
    xor_in_place(right, &G(1, left, right.len()));
    xor_in_place(left, &H(0, right, left.len()));
    xor_in_place(right, &G(0, left, right.len()));
    Ok(())
}

/// Jumbles `message`, returning a new buffer of the same length.
pub fn f4_jumble(message: &[u8]) -> Result<Vec<u8>, F4JumbleError> {
    let mut jumbled = message.to_vec();
    f4_jumble_mut(&mut jumbled)?;
    Ok(jumbled)
}

/// Inverts [`f4_jumble`], returning a new buffer of the same length.
pub fn f4_jumble_inv(message: &[u8]) -> Result<Vec<u8>, F4JumbleError> {
    let mut unjumbled = message.to_vec();
    f4_jumble_inv_mut(&mut unjumbled)?;
    Ok(unjumbled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn hamming_bytes(a: &[u8], b: &[u8]) -> usize {
        a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn personalization_layout_test() {
        assert_eq!(personalization(b'G', 1, 0x0302), *b"UA_F4Jumble_G\x01\x02\x03");
        assert_eq!(personalization(b'H', 0, 0), *b"UA_F4Jumble_H\x00\x00\x00");
    }

    #[test]
    fn g_truncates_final_chunk_test() {
        let input = b"some left half";
        let stream = G(0, input, 100);
        assert_eq!(stream.len(), 100);
        // the stream is the per-chunk digests laid out in ascending chunk order
        assert_eq!(&stream[0..64], &blake2b(64, &personalization(b'G', 0, 0), input)[..]);
        assert_eq!(
            &stream[64..100],
            &blake2b(64, &personalization(b'G', 0, 1), input)[0..36]
        );
    }

    #[test]
    fn g_and_h_domain_separation_test() {
        let input = [0x5au8; 64];
        assert_ne!(G(0, &input, 64), G(1, &input, 64));
        assert_ne!(H(0, &input, 64), H(1, &input, 64));
        assert_ne!(G(0, &input, 64), H(0, &input, 64));
    }

    #[test]
    fn too_short_test() {
        let message = [0x00u8; 47];
        assert_eq!(
            f4_jumble(&message),
            Err(F4JumbleError::InvalidMessageLength(47))
        );
        assert_eq!(
            f4_jumble_inv(&message),
            Err(F4JumbleError::InvalidMessageLength(47))
        );
    }

    #[test]
    fn too_long_test() {
        let message = vec![0x00u8; MAX_MESSAGE_LEN + 1];
        assert_eq!(
            f4_jumble(&message),
            Err(F4JumbleError::InvalidMessageLength(MAX_MESSAGE_LEN + 1))
        );
        assert_eq!(
            f4_jumble_inv(&message),
            Err(F4JumbleError::InvalidMessageLength(MAX_MESSAGE_LEN + 1))
        );
    }

    #[test]
    fn minimum_length_round_trip_test() {
        let message: Vec<u8> = (0u8..48).collect();
        let jumbled = f4_jumble(&message).unwrap();
        assert_eq!(jumbled.len(), 48);
        assert_ne!(jumbled, message);
        assert_eq!(f4_jumble_inv(&jumbled).unwrap(), message);
    }

    #[test]
    fn maximum_length_round_trip_test() {
        let mut message = vec![0x00u8; MAX_MESSAGE_LEN];
        for (i, byte) in message.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let jumbled = f4_jumble(&message).unwrap();
        assert_eq!(jumbled.len(), MAX_MESSAGE_LEN);
        assert_eq!(f4_jumble_inv(&jumbled).unwrap(), message);
    }

    #[test]
    fn zero_message_scenario_test() {
        // 96 zero bytes through the jumble and back: not the identity, and fully restored
        let message = [0x00u8; 96];
        let jumbled = f4_jumble(&message).unwrap();
        assert_eq!(jumbled.len(), 96);
        assert_ne!(jumbled, message);
        assert_eq!(f4_jumble_inv(&jumbled).unwrap(), message);
    }

    #[test]
    fn both_directions_invert_each_other_test() {
        // the inverse is itself a valid permutation, so the round trip works both ways
        let message: Vec<u8> = (0..200).map(|i| (i * 7) as u8).collect();
        assert_eq!(
            f4_jumble(&f4_jumble_inv(&message).unwrap()).unwrap(),
            message
        );
        assert_eq!(
            f4_jumble_inv(&f4_jumble(&message).unwrap()).unwrap(),
            message
        );
    }

    #[test]
    fn determinism_test() {
        let message = [0x42u8; 128];
        assert_eq!(f4_jumble(&message).unwrap(), f4_jumble(&message).unwrap());
    }

    #[test]
    fn mut_variants_match_owned_test() {
        let message: Vec<u8> = (0u8..130).collect();
        let mut buffer = message.clone();
        f4_jumble_mut(&mut buffer).unwrap();
        assert_eq!(buffer, f4_jumble(&message).unwrap());
        f4_jumble_inv_mut(&mut buffer).unwrap();
        assert_eq!(buffer, message);
    }

    #[test]
    fn diffusion_test() {
        let message = [0x11u8; 96];
        let baseline = f4_jumble(&message).unwrap();
        for position in [0usize, 47, 48, 95] {
            let mut tweaked = message;
            tweaked[position] ^= 0x01;
            let jumbled = f4_jumble(&tweaked).unwrap();
            // a one-byte tweak should scramble a large majority of the output
            assert!(hamming_bytes(&baseline, &jumbled) >= 96 * 2 / 5);
        }
    }

    #[test]
    fn random_length_round_trip_test() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xf4);
        for _ in 0..20 {
            let length = rng.gen_range(MIN_MESSAGE_LEN..=4096);
            let mut message = vec![0x00u8; length];
            rng.fill(&mut message[..]);
            let jumbled = f4_jumble(&message).unwrap();
            assert_eq!(jumbled.len(), length);
            assert_eq!(f4_jumble_inv(&jumbled).unwrap(), message);
        }
    }
}
