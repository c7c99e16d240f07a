//! X11 提示窗后端
//!
//! # 实现思路
//!
//! - 提示窗在首次显示时创建：override-redirect + save-under，1 像素黑边，黄色背景
//! - 字体用带检查的 `OpenFont` 打开，失败即致命
//! - 属性通过 `GetProperty` 读取原始字节：`TOOLTIP` 解码为文字，属性不存在或读取失败
//!   归为运行期错误，由控制器换成占位文本；`COMMAND` 字节原样交给启动器
//! - 宿主原点 = 几何位置从父窗口坐标转换到根窗口坐标
//!
//! 提示窗资源在 `Drop` 时释放。

use std::ffi::OsString;

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, Char2b, ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux,
    EventMask, Font, Gcontext, StackMode, Window, WindowClass,
};
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT, NONE};

use super::session::X11Session;
use super::{text, Atoms};
use crate::dock::DockBackend;
use crate::error::AppError;
use crate::tooltip::geometry::{Position, Size, TextExtents, TooltipGeometry, TEXT_OFFSET_X};
use crate::tooltip::TooltipBackend;

/// 提示窗背景色（16 位通道）
const TOOLTIP_BACKGROUND: (u16, u16, u16) = (0xD000, 0xD000, 0x0000);

/// 已创建的提示窗资源
struct TooltipWindow {
    window: Window,
    gc: Gcontext,
    font: Font,
    background_pixel: u32,
}

pub struct X11Backend<'s> {
    session: &'s X11Session,
    atoms: Atoms,
    font_name: String,
    tooltip: Option<TooltipWindow>,
}

impl<'s> X11Backend<'s> {
    pub fn new(session: &'s X11Session, atoms: Atoms, font_name: impl Into<String>) -> Self {
        Self {
            session,
            atoms,
            font_name: font_name.into(),
            tooltip: None,
        }
    }

    fn tooltip_window(&self) -> Result<&TooltipWindow, AppError> {
        self.tooltip
            .as_ref()
            .ok_or_else(|| AppError::Resource("提示窗尚未创建".to_string()))
    }

    /// 读取宿主窗口上的属性字节；属性不存在返回 `Ok(None)`。
    fn read_property_bytes(&self, property: Atom) -> Result<Option<Vec<u8>>, AppError> {
        let conn = self.session.conn();
        let reply = conn
            .get_property(false, self.session.window(), property, AtomEnum::ANY, 0, u32::MAX / 4)
            .map_err(|e| AppError::RuntimeIo(e.to_string()))?
            .reply()
            .map_err(|e| AppError::RuntimeIo(e.to_string()))?;

        if reply.type_ == NONE {
            return Ok(None);
        }
        Ok(Some(reply.value))
    }
}

impl TooltipBackend for X11Backend<'_> {
    fn create(&mut self) -> Result<(), AppError> {
        if self.tooltip.is_some() {
            return Ok(());
        }

        let conn = self.session.conn();
        let screen = self.session.screen();
        let (red, green, blue) = TOOLTIP_BACKGROUND;
        let background_pixel = conn
            .alloc_color(screen.default_colormap, red, green, blue)?
            .reply()?
            .pixel;

        let font = conn.generate_id()?;
        conn.open_font(font, self.font_name.as_bytes())?
            .check()
            .map_err(|e| AppError::Protocol(format!("无法打开字体 {}: {e}", self.font_name)))?;

        let window = conn.generate_id()?;
        conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            screen.root,
            0,
            0,
            16,
            16,
            1,
            WindowClass::INPUT_OUTPUT,
            COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixel(background_pixel)
                .border_pixel(screen.black_pixel)
                .override_redirect(1u32)
                .save_under(1u32)
                .event_mask(EventMask::BUTTON_PRESS),
        )?;

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            window,
            &CreateGCAux::new()
                .foreground(screen.black_pixel)
                .background(background_pixel)
                .font(font)
                .graphics_exposures(0u32),
        )?;
        conn.flush()?;

        log::info!("提示窗已创建: 0x{:x}, font={}", window, self.font_name);
        self.tooltip = Some(TooltipWindow {
            window,
            gc,
            font,
            background_pixel,
        });
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, AppError> {
        text::tooltip_property_text(self.read_property_bytes(self.atoms.TOOLTIP)?)
    }

    fn measure(&mut self, text: &str) -> Result<TextExtents, AppError> {
        let font = self.tooltip_window()?.font;
        let chars: Vec<Char2b> = text::encode_latin1(text)
            .into_iter()
            .map(|byte2| Char2b { byte1: 0, byte2 })
            .collect();

        let reply = self.session.conn().query_text_extents(font, &chars)?.reply()?;
        Ok(TextExtents {
            font_ascent: reply.font_ascent,
            font_descent: reply.font_descent,
            overall_width: reply.overall_width,
        })
    }

    fn owner_origin(&mut self) -> Result<Position, AppError> {
        let conn = self.session.conn();
        let window = self.session.window();

        let geometry = conn.get_geometry(window)?.reply()?;
        let tree = conn.query_tree(window)?.reply()?;
        let translated = conn
            .translate_coordinates(tree.parent, tree.root, geometry.x, geometry.y)?
            .reply()?;
        Ok(Position::new(translated.dst_x.into(), translated.dst_y.into()))
    }

    fn screen_size(&self) -> Size {
        let screen = self.session.screen();
        Size::new(screen.width_in_pixels.into(), screen.height_in_pixels.into())
    }

    fn show(&mut self, geometry: &TooltipGeometry, text: &str) -> Result<(), AppError> {
        let tooltip = self.tooltip_window()?;
        let conn = self.session.conn();

        conn.configure_window(
            tooltip.window,
            &ConfigureWindowAux::new()
                .x(geometry.position.x)
                .y(geometry.position.y)
                .width(geometry.size.width)
                .height(geometry.size.height)
                .stack_mode(StackMode::ABOVE),
        )?;
        conn.map_window(tooltip.window)?;
        conn.clear_area(false, tooltip.window, 0, 0, 0, 0)?;

        let items = text::poly_text_items(&text::encode_latin1(text));
        if !items.is_empty() {
            conn.poly_text8(tooltip.window, tooltip.gc, TEXT_OFFSET_X, geometry.baseline, &items)?;
        }
        conn.flush()?;
        Ok(())
    }

    fn hide(&mut self) -> Result<(), AppError> {
        let tooltip = self.tooltip_window()?;
        let conn = self.session.conn();
        conn.unmap_window(tooltip.window)?;
        conn.flush()?;
        Ok(())
    }
}

impl DockBackend for X11Backend<'_> {
    fn read_command(&mut self) -> Result<Option<OsString>, AppError> {
        Ok(self.read_property_bytes(self.atoms.COMMAND)?.map(text::command_property))
    }
}

impl Drop for X11Backend<'_> {
    fn drop(&mut self) {
        let Some(tooltip) = self.tooltip.take() else {
            return;
        };
        let conn = self.session.conn();
        let colormap = self.session.screen().default_colormap;
        let result = conn
            .destroy_window(tooltip.window)
            .and_then(|_| conn.free_gc(tooltip.gc))
            .and_then(|_| conn.close_font(tooltip.font))
            .and_then(|_| conn.free_colors(colormap, 0, &[tooltip.background_pixel]))
            .and_then(|_| conn.flush());
        if let Err(err) = result {
            log::debug!("释放提示窗资源失败: {err}");
        }
    }
}
