//! 属性内容与 8 位文字编码
//!
//! 提示窗使用 8 位核心字体：属性文字按 Latin-1 往返，
//! PolyText8 的每个文字项最多 254 字节，较长文字拆为多项。
//! `COMMAND` 属性只作字节传递，不经过文字解码。

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

use crate::error::AppError;

/// 单个 TEXTELT8 的最大字节数
const MAX_ITEM_LEN: usize = 254;

/// 属性字节 → 文字：合法 UTF-8 原样保留，否则按 Latin-1 解释。
pub fn decode_property_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// `TOOLTIP` 属性值 → 显示文字；属性不存在（类型为 None）属于读取失败。
pub fn tooltip_property_text(value: Option<Vec<u8>>) -> Result<String, AppError> {
    value
        .map(|bytes| decode_property_text(&bytes))
        .ok_or_else(|| AppError::RuntimeIo("TOOLTIP 属性不存在".to_string()))
}

/// `COMMAND` 属性值 → 命令行，字节原样保留。
pub fn command_property(value: Vec<u8>) -> OsString {
    OsString::from_vec(value)
}

/// 文字 → Latin-1 字节，超出范围的字符替换为 `?`。
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// 构造 PolyText8 的文字项序列：`[len, delta = 0, bytes...]*`。
pub fn poly_text_items(bytes: &[u8]) -> Vec<u8> {
    let mut items = Vec::with_capacity(bytes.len() + 2 * bytes.len().div_ceil(MAX_ITEM_LEN));
    for chunk in bytes.chunks(MAX_ITEM_LEN) {
        items.push(chunk.len() as u8);
        items.push(0);
        items.extend_from_slice(chunk);
    }
    items
}
