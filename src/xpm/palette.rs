//! # 调色板分配接口
//!
//! 解码器只依赖 `ColorAllocator` 这一接缝：先为所有颜色发出请求，
//! 再逐个收取回复。X11 实现见 `crate::x11::palette`，测试中使用内存实现。

use super::XpmError;

/// 16 位通道的颜色（X11 `AllocColor` 的入参格式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb16 {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// 8 位通道线性扩展到 16 位：`v * 65535 / 255`（整数截断）。
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(scale_channel(r), scale_channel(g), scale_channel(b))
    }
}

fn scale_channel(value: u8) -> u16 {
    (65535 * value as u32 / 255) as u16
}

/// 异步颜色分配服务。
///
/// `request` 不得阻塞等待回复；`resolve` 收取对应请求的回复并返回设备像素值。
/// 每个 `request` 返回的句柄都必须被 `resolve` 恰好一次。
pub trait ColorAllocator {
    /// 未完成请求的关联句柄
    type Pending;

    fn request(&mut self, color: Rgb16) -> Result<Self::Pending, XpmError>;

    fn resolve(&mut self, pending: Self::Pending) -> Result<u32, XpmError>;
}
