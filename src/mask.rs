//! WebSocket payload masking
//!
//! Masking and unmasking are the same operation: XOR with a repeating
//! 4-byte key is its own inverse, so [`apply_mask`] serves both the
//! read path (unmasking client frames) and the write path (masking a
//! copy of the payload for client-originated frames).

/// Apply a WebSocket mask in place
///
/// XORs `data[i]` with `mask[i % 4]`. Applying the same key twice
/// restores the original buffer.
pub fn apply_mask(data: &mut [u8], mask: [u8; 4]) {
    if data.is_empty() {
        return;
    }

    // Process 8 bytes at a time with a doubled key word. The word size
    // is a multiple of the key length, so the tail continues the key
    // rotation from index 0.
    let mask_u64 = u64::from_ne_bytes([
        mask[0], mask[1], mask[2], mask[3], mask[0], mask[1], mask[2], mask[3],
    ]);

    let mut chunks = data.chunks_exact_mut(8);
    for chunk in chunks.by_ref() {
        let word = u64::from_ne_bytes(<[u8; 8]>::try_from(&chunk[..]).unwrap()) ^ mask_u64;
        chunk.copy_from_slice(&word.to_ne_bytes());
    }

    for (i, byte) in chunks.into_remainder().iter_mut().enumerate() {
        *byte ^= mask[i & 3];
    }
}

/// Generate a random masking key (client-side)
///
/// Uses a thread-local xorshift64 state seeded from the clock; masking
/// keys need unpredictability against proxies, not cryptographic
/// strength.
pub fn generate_mask() -> [u8; 4] {
    use std::cell::Cell;

    thread_local! {
        static RNG_STATE: Cell<u64> = const { Cell::new(0) };
    }

    RNG_STATE.with(|state| {
        let mut s = state.get();

        if s == 0 {
            s = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64;
            s ^= &s as *const _ as u64;
        }

        // xorshift64
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;

        state.set(s);
        (s as u32).to_ne_bytes()
    })
}
