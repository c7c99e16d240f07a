//! 十六进制半字节查找表

/// 表中非十六进制字符的标记值
const INVALID: u8 = 0xFF;

/// ASCII → 半字节值，非法字符为 `INVALID`。
static HEX_NIBBLES: [u8; 128] = build_table();

const fn build_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        table[b'a' as usize + i] = 10 + i as u8;
        table[b'A' as usize + i] = 10 + i as u8;
        i += 1;
    }
    table
}

/// 单个十六进制字符转半字节。
pub fn nibble(c: u8) -> Option<u8> {
    match HEX_NIBBLES.get(c as usize) {
        Some(&v) if v != INVALID => Some(v),
        _ => None,
    }
}

/// 两个十六进制字符组成一个字节。
pub fn byte(hi: u8, lo: u8) -> Option<u8> {
    Some((nibble(hi)? << 4) | nibble(lo)?)
}

/// 解析 `RRGGBB`（不含 `#`），长度必须恰好为 6。
pub fn rgb(digits: &str) -> Option<[u8; 3]> {
    let b = digits.as_bytes();
    if b.len() != 6 {
        return None;
    }
    Some([byte(b[0], b[1])?, byte(b[2], b[3])?, byte(b[4], b[5])?])
}
