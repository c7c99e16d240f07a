//! 背景表面构建
//!
//! 解码结果写入临时像素图后复制到宿主背景；若存在透明像素，
//! 遮罩经 1 位像素图设置为窗口的 bounding 形状。临时资源用后即释放。

use x11rb::connection::Connection;
use x11rb::errors::ConnectionError;
use x11rb::image::Image;
use x11rb::protocol::shape::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{ConnectionExt as _, CreateGCAux, Pixmap};

use super::palette::native_image;
use super::session::X11Session;
use crate::error::AppError;
use crate::xpm::{DecodedImage, TransparencyMask};

/// 将解码后的图片装为宿主窗口的背景与形状。
pub fn install_background(session: &X11Session, image: &DecodedImage<Image<'static>>) -> Result<(), AppError> {
    let conn = session.conn();
    let depth = session.screen().root_depth;

    let pixmap = conn.generate_id()?;
    conn.create_pixmap(depth, pixmap, session.window(), image.width, image.height)?;
    image.bitmap.put(conn, pixmap, session.gc(), 0, 0)?;

    if let Some(mask) = image.mask.as_ref().filter(|m| m.has_transparency()) {
        apply_shape(session, mask)?;
    }

    conn.copy_area(
        pixmap,
        session.background(),
        session.gc(),
        0,
        0,
        0,
        0,
        image.width,
        image.height,
    )?;
    conn.free_pixmap(pixmap)?;
    session.clear()?;
    log::debug!("背景已安装: {}x{}", image.width, image.height);
    Ok(())
}

/// 1 位遮罩 → bounding 形状
fn apply_shape(session: &X11Session, mask: &TransparencyMask) -> Result<(), AppError> {
    let conn = session.conn();
    let (width, height) = (mask.width(), mask.height());

    let mut bits = native_image(width, height, 1, conn.setup())?;
    for y in 0..height {
        for x in 0..width {
            bits.put_pixel(x, y, u32::from(mask.is_set(x, y)));
        }
    }

    let pixmap: Pixmap = conn.generate_id()?;
    let gc = conn.generate_id()?;
    conn.create_pixmap(1, pixmap, session.window(), width, height)?;
    conn.create_gc(gc, pixmap, &CreateGCAux::new().foreground(1).background(0))?;
    bits.put(conn, pixmap, gc, 0, 0)?;

    match conn.shape_mask(shape::SO::SET, shape::SK::BOUNDING, session.window(), 0, 0, pixmap) {
        Ok(_) => {}
        Err(ConnectionError::UnsupportedExtension) => {
            log::warn!("X 服务器不支持 SHAPE 扩展，窗口保持矩形");
        }
        Err(err) => return Err(err.into()),
    }

    conn.free_gc(gc)?;
    conn.free_pixmap(pixmap)?;
    Ok(())
}
