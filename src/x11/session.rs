//! X11 会话：连接、宿主窗口与背景像素图
//!
//! # 实现思路
//!
//! 1. 连接默认显示，创建 64x64 的背景像素图与宿主窗口（背景即该像素图）
//! 2. 写入 ICCCM 属性：标题、类名、尺寸提示、图标 / 窗口组、`WM_COMMAND`
//! 3. 映射窗口并刷新
//!
//! 会话在 `Drop` 时释放 GC、像素图与窗口，连接随结构体一起关闭。

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask, Gcontext, Pixmap, PropMode,
    Screen, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::COPY_DEPTH_FROM_PARENT;
use x11rb::COPY_FROM_PARENT;

use super::hints;
use crate::config::{DockConfig, DOCK_SIZE};
use crate::error::AppError;

/// 宿主窗口订阅的事件
fn dock_events() -> EventMask {
    EventMask::EXPOSURE
        | EventMask::BUTTON_PRESS
        | EventMask::ENTER_WINDOW
        | EventMask::LEAVE_WINDOW
        | EventMask::PROPERTY_CHANGE
        | EventMask::STRUCTURE_NOTIFY
}

pub struct X11Session {
    conn: RustConnection,
    screen_num: usize,
    window: Window,
    gc: Gcontext,
    background: Pixmap,
}

impl X11Session {
    pub fn open(config: &DockConfig) -> Result<Self, AppError> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        log::info!("已连接 X11 显示, screen={}", screen_num);

        let screen = &conn.setup().roots[screen_num];
        let (root, depth) = (screen.root, screen.root_depth);
        let (black, white) = (screen.black_pixel, screen.white_pixel);

        let window = conn.generate_id()?;
        let gc = conn.generate_id()?;
        let background = conn.generate_id()?;

        conn.create_pixmap(depth, background, root, DOCK_SIZE, DOCK_SIZE)?;
        conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            root,
            0,
            0,
            DOCK_SIZE,
            DOCK_SIZE,
            0,
            WindowClass::INPUT_OUTPUT,
            COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixmap(background)
                .event_mask(dock_events()),
        )?;
        conn.create_gc(
            gc,
            window,
            &CreateGCAux::new()
                .foreground(black)
                .background(white)
                .graphics_exposures(0u32),
        )?;

        let session = Self {
            conn,
            screen_num,
            window,
            gc,
            background,
        };
        session.set_wm_properties(config)?;
        session.conn.map_window(window)?;
        session.conn.flush()?;
        log::debug!("宿主窗口已映射: 0x{:x}", window);
        Ok(session)
    }

    fn set_wm_properties(&self, config: &DockConfig) -> Result<(), AppError> {
        let (conn, window) = (&self.conn, self.window);
        let name = config.name.as_bytes();

        conn.change_property8(PropMode::REPLACE, window, AtomEnum::WM_NAME, AtomEnum::STRING, name)?;
        conn.change_property8(PropMode::REPLACE, window, AtomEnum::WM_ICON_NAME, AtomEnum::STRING, name)?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            &hints::wm_class(&config.name),
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NORMAL_HINTS,
            AtomEnum::WM_SIZE_HINTS,
            &hints::normal_hints(DOCK_SIZE, DOCK_SIZE),
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_HINTS,
            AtomEnum::WM_HINTS,
            &hints::wm_hints(self.background, window, config.window_mode),
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_COMMAND,
            AtomEnum::STRING,
            &hints::wm_command(&config.argv),
        )?;
        Ok(())
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn gc(&self) -> Gcontext {
        self.gc
    }

    pub fn background(&self) -> Pixmap {
        self.background
    }

    /// 以背景像素图重绘整个窗口。
    pub fn clear(&self) -> Result<(), AppError> {
        self.conn.clear_area(false, self.window, 0, 0, 0, 0)?;
        self.conn.flush()?;
        Ok(())
    }
}

impl Drop for X11Session {
    fn drop(&mut self) {
        let result = self
            .conn
            .free_gc(self.gc)
            .and_then(|_| self.conn.free_pixmap(self.background))
            .and_then(|_| self.conn.destroy_window(self.window))
            .and_then(|_| self.conn.flush());
        if let Err(err) = result {
            log::debug!("释放宿主窗口资源失败: {err}");
        }
    }
}
