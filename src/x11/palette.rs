//! X11 颜色分配与原生位图
//!
//! `AllocColor` 请求通过 cookie 关联回复：`request` 只写出请求，
//! `resolve` 时才阻塞读取回复，所有请求共用一次往返。

use x11rb::connection::Connection;
use x11rb::cookie::Cookie;
use x11rb::image::Image;
use x11rb::protocol::xproto::{AllocColorReply, Colormap, ConnectionExt as _, Setup};

use crate::error::AppError;
use crate::xpm::{ColorAllocator, PixelSink, Rgb16, XpmError};

pub struct X11Palette<'c, C: Connection> {
    conn: &'c C,
    colormap: Colormap,
}

impl<'c, C: Connection> X11Palette<'c, C> {
    pub fn new(conn: &'c C, colormap: Colormap) -> Self {
        Self { conn, colormap }
    }
}

impl<'c, C: Connection> ColorAllocator for X11Palette<'c, C> {
    type Pending = Cookie<'c, C, AllocColorReply>;

    fn request(&mut self, color: Rgb16) -> Result<Self::Pending, XpmError> {
        self.conn
            .alloc_color(self.colormap, color.red, color.green, color.blue)
            .map_err(|e| XpmError::Allocation(e.to_string()))
    }

    fn resolve(&mut self, pending: Self::Pending) -> Result<u32, XpmError> {
        pending
            .reply()
            .map(|reply| reply.pixel)
            .map_err(|e| XpmError::Allocation(e.to_string()))
    }
}

impl PixelSink for Image<'static> {
    fn put_pixel(&mut self, x: u16, y: u16, pixel: u32) {
        Image::put_pixel(self, x, y, pixel);
    }
}

/// 按服务器像素格式分配原生位图。
pub fn native_image(width: u16, height: u16, depth: u8, setup: &Setup) -> Result<Image<'static>, AppError> {
    Image::allocate_native(width, height, depth, setup)
        .map_err(|e| AppError::Resource(format!("无法创建 {width}x{height}@{depth} 位图: {e}")))
}
