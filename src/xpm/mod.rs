//! # 文本像素图解码模块（xpm）
//!
//! 将精简的 XPM 风格文本图片解码为设备位图与 1 位透明遮罩。
//!
//! - `hex`：十六进制半字节查找表
//! - `header`：头部与颜色表解析
//! - `palette`：颜色分配接缝（请求 / 回复关联）
//! - `mask`：透明遮罩
//! - `decoder`：解码主流程
//!
//! ```text
//! 文本行
//!    ↓
//! header.rs（头部 + 颜色表 + 按深度选色）
//!    ↓
//! decoder.rs ── palette.rs（批量发出请求 → 批量收取回复）
//!    ↓
//! PixelSink 位图 + TransparencyMask
//! ```

mod decoder;
mod header;
mod hex;
mod mask;
mod palette;

pub use decoder::{decode, DecodeOptions, DecodedImage, PixelSink};
pub use header::{parse_color_entry, parse_header, ColorSpec, ColorTableEntry, ColorTag, ImageSpec};
pub use mask::TransparencyMask;
pub use palette::{ColorAllocator, Rgb16};

/// 内置背景图（64x64）
pub const BUILTIN_BACKGROUND: &str = include_str!("../../assets/wmdia.xpm");

/// 解码错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XpmError {
    #[error("无法解析头部：\"{0}\"")]
    Header(String),

    #[error("颜色数量 {0} 不在 1..=255 范围内")]
    ColorCount(i64),

    #[error("不支持每颜色 {0} 字节的图片")]
    BytesPerColor(i64),

    #[error("图片尺寸无效：{width}x{height}")]
    Dimensions { width: i64, height: i64 },

    #[error("颜色表错误：{0}")]
    ColorEntry(String),

    #[error("未知的像素类型 '{tag}'：\"{line}\"")]
    UnknownTag { tag: char, line: String },

    #[error("无法解析颜色值：\"{0}\"")]
    ColorSpec(String),

    #[error("颜色 '{0}' 存在相互冲突的重复定义")]
    DuplicateSpec(char),

    #[error("颜色字符 '{0}' 重复声明")]
    DuplicateCode(char),

    #[error("像素 ({x}, {y}) 使用了未声明的颜色字符 '{code}'")]
    UndeclaredCode { code: char, x: u16, y: u16 },

    #[error("像素行不足：需要 {expected} 行，只有 {found} 行")]
    MissingRows { expected: u16, found: u16 },

    #[error("第 {row} 行像素长度应为 {expected}")]
    RowLength { row: u16, expected: u16 },

    #[error("无法分配颜色：{0}")]
    Allocation(String),
}

