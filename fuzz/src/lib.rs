use std::mem;

/// Reinterprets `data` as little-endian `u64` values, trailing bytes are ignored.
pub fn u8_as_u64(data: &[u8]) -> Vec<u64> {
    data.chunks_exact(mem::size_of::<u64>())
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            u64::from_le_bytes(bytes)
        })
        .collect()
}

/// Pairs every byte with its position, the key is the byte itself.
pub fn tagged(data: &[u8]) -> Vec<(u8, usize)> {
    data.iter().copied().zip(0..).collect()
}

pub fn is_sorted<T: Ord>(v: &[T]) -> bool {
    v.windows(2).all(|w| w[0] <= w[1])
}
