//! Fletcher checksum of ISO 8473 as used by LSAs. The LS age field is left
//! out, so both functions take the whole LSA and skip its first two bytes.

const CHECKSUM_OFFSET: usize = 14;
const MODX: usize = 4102;

fn accumulate(data: &[u8]) -> (i64, i64) {
    let (mut c0, mut c1) = (0i64, 0i64);
    // reducing every MODX bytes keeps the sums in range
    for chunk in data.chunks(MODX) {
        for &b in chunk {
            c0 += b as i64;
            c1 += c0;
        }
        c0 %= 255;
        c1 %= 255;
    }
    (c0, c1)
}

/// Checksum value for the LSA in `lsa`. The checksum field itself is taken
/// as zero.
pub fn fletcher_checksum(lsa: &[u8]) -> u16 {
    if lsa.len() < 2 + CHECKSUM_OFFSET + 2 {
        return 0;
    }
    let mut data = lsa[2..].to_vec();
    data[CHECKSUM_OFFSET] = 0;
    data[CHECKSUM_OFFSET + 1] = 0;
    let (c0, c1) = accumulate(&data);

    let len = data.len() as i64;
    let mut x = ((len - CHECKSUM_OFFSET as i64 - 1) * c0 - c1) % 255;
    if x <= 0 {
        x += 255;
    }
    let mut y = 510 - c0 - x;
    if y > 255 {
        y -= 255;
    }
    ((x as u16) << 8) | (y as u16 & 0xFF)
}

pub fn fletcher_valid(lsa: &[u8]) -> bool {
    if lsa.len() < 2 + CHECKSUM_OFFSET + 2 {
        return false;
    }
    if lsa[2 + CHECKSUM_OFFSET] == 0 && lsa[2 + CHECKSUM_OFFSET + 1] == 0 {
        return false;
    }
    accumulate(&lsa[2..]) == (0, 0)
}
