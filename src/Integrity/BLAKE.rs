const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

const INITIALIZATION_VECTOR_2B: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

#[inline]
fn mix_2b(work_vector: &mut [u64], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    work_vector[a] = work_vector[a].wrapping_add(work_vector[b]).wrapping_add(x);
    work_vector[d] = (work_vector[d] ^ work_vector[a]).rotate_right(32);

    work_vector[c] = work_vector[c].wrapping_add(work_vector[d]);
    work_vector[b] = (work_vector[b] ^ work_vector[c]).rotate_right(24);

    work_vector[a] = work_vector[a].wrapping_add(work_vector[b]).wrapping_add(y);
    work_vector[d] = (work_vector[d] ^ work_vector[a]).rotate_right(16);

    work_vector[c] = work_vector[c].wrapping_add(work_vector[d]);
    work_vector[b] = (work_vector[b] ^ work_vector[c]).rotate_right(63);
}

fn compress_2b(state: &mut [u64; 8], chunk: &[u8; 128], offset: u128, is_last: bool) {
    // Init work and message vectors
    let mut work_vector: Vec<u64> = [*state, INITIALIZATION_VECTOR_2B].concat();
    let message_chunk: [u64; 16] = chunk
        .chunks(8)
        .map(|word| u64::from_le_bytes(word.try_into().unwrap()))
        .collect::<Vec<u64>>()
        .try_into()
        .unwrap();
    work_vector[12] ^= offset as u64;
    work_vector[13] ^= (offset >> 64) as u64;

    // invert if last
    if is_last {
        work_vector[14] = !work_vector[14]
    }

    let mut round_sigma: [usize; 16];
    // Throw them into the cryptographic blender
    for i in 0..12 {
        round_sigma = SIGMA[i % 10];
        mix_2b(
            &mut work_vector,
            0,
            4,
            8,
            12,
            message_chunk[round_sigma[0]],
            message_chunk[round_sigma[1]],
        );
        mix_2b(
            &mut work_vector,
            1,
            5,
            9,
            13,
            message_chunk[round_sigma[2]],
            message_chunk[round_sigma[3]],
        );
        mix_2b(
            &mut work_vector,
            2,
            6,
            10,
            14,
            message_chunk[round_sigma[4]],
            message_chunk[round_sigma[5]],
        );
        mix_2b(
            &mut work_vector,
            3,
            7,
            11,
            15,
            message_chunk[round_sigma[6]],
            message_chunk[round_sigma[7]],
        );
        mix_2b(
            &mut work_vector,
            0,
            5,
            10,
            15,
            message_chunk[round_sigma[8]],
            message_chunk[round_sigma[9]],
        );
        mix_2b(
            &mut work_vector,
            1,
            6,
            11,
            12,
            message_chunk[round_sigma[10]],
            message_chunk[round_sigma[11]],
        );
        mix_2b(
            &mut work_vector,
            2,
            7,
            8,
            13,
            message_chunk[round_sigma[12]],
            message_chunk[round_sigma[13]],
        );
        mix_2b(
            &mut work_vector,
            3,
            4,
            9,
            14,
            message_chunk[round_sigma[14]],
            message_chunk[round_sigma[15]],
        );
    }

    // Xor them in
    for i in 0..8 {
        state[i] = state[i] ^ work_vector[i] ^ work_vector[i + 8];
    }
}

/// The BLAKE2B hash function with a 16 byte personalization. `hash_len` is the digest length
/// in bytes and is between 1 and 64.<br>Runs unkeyed and unsalted; a personalization of 16
/// zero bytes gives plain BLAKE2b.
///
/// ## Panics
/// if `hash_len == 0` or `hash_len > 64`
pub fn blake2b(hash_len: usize, personal: &[u8; 16], input: &[u8]) -> Vec<u8> {
    assert!(hash_len <= 64 && 0 < hash_len);
    // Init the state: digest length sits in parameter word 0, the personalization in words 6 and 7
    let mut state: [u64; 8] = INITIALIZATION_VECTOR_2B;
    state[0] ^= 0x01010000 ^ hash_len as u64;
    state[6] ^= u64::from_le_bytes(personal[0..8].try_into().unwrap());
    state[7] ^= u64::from_le_bytes(personal[8..16].try_into().unwrap());

    let mut bytes_compressed: u128 = 0;
    let mut bytes_remaning: u128 = input.len() as u128;

    // start compressing
    let mut chunks = input.chunks(128);
    let mut chunk: [u8; 128];
    while bytes_remaning > 128 {
        chunk = chunks
            .next()
            .expect("There was no next element")
            .try_into()
            .unwrap();
        bytes_compressed += 128;
        bytes_remaning -= 128;
        compress_2b(&mut state, &chunk, bytes_compressed, false);
    }

    // compress the last chunk
    chunk = pad_with_zeros(chunks.next().unwrap_or(&[]), 128)
        .try_into()
        .expect("Padding did not work");
    bytes_compressed += bytes_remaning;
    compress_2b(&mut state, &chunk, bytes_compressed, true);

    // Return the first hash_len bytes of the state
    state
        .into_iter()
        .flat_map(|word| word.to_le_bytes())
        .take(hash_len)
        .collect()
}

fn pad_with_zeros(input: &[u8], size: u32) -> Vec<u8> {
    match size as usize > input.len() {
        true => [input, &[0x00].repeat(size as usize - input.len())].concat(),
        false => input.to_vec(),
    }
}
