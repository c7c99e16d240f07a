//! # 启动流程
//!
//! ```text
//! 连接 + 宿主窗口 ──► intern COMMAND/TOOLTIP（请求先发出）
//!        │
//!        ▼
//! 解码内置背景（批量分配颜色）──► 背景像素图 + 形状
//!        │
//!        ▼
//! 收取 atom 回复 ──► 执行 -e 命令 ──► 重绘 ──► 事件循环
//! ```
//!
//! 启动期任何错误都直接返回给 `main`；事件循环结束后，
//! 提示窗与宿主窗口资源按作用域逆序释放。

use std::ffi::OsStr;

use x11rb::connection::Connection;

use crate::config::DockConfig;
use crate::dock::Dock;
use crate::error::AppError;
use crate::event_loop::{self, LoopExit};
use crate::launcher::{Launcher, ShellLauncher};
use crate::x11::{self, Atoms, X11Backend, X11Events, X11Palette, X11Session};
use crate::xpm::{self, DecodeOptions};

pub fn run(config: &DockConfig) -> Result<LoopExit, AppError> {
    let session = X11Session::open(config)?;
    let atoms_cookie = Atoms::new(session.conn())?;

    let screen = session.screen();
    let options = DecodeOptions {
        depth: screen.root_depth,
        transparent_pixel: 0,
        with_mask: true,
    };
    let mut palette = X11Palette::new(session.conn(), screen.default_colormap);
    let image = xpm::decode(
        xpm::BUILTIN_BACKGROUND.lines(),
        &options,
        &mut palette,
        |width, height, depth| x11::native_image(width, height, depth, session.conn().setup()),
    )?;
    x11::install_background(&session, &image)?;

    let atoms = atoms_cookie.reply()?;
    log::debug!("atoms: COMMAND={}, TOOLTIP={}", atoms.COMMAND, atoms.TOOLTIP);

    let mut launcher = ShellLauncher;
    if let Some(command) = config.execute.as_deref() {
        if let Err(err) = launcher.launch(OsStr::new(command)) {
            log::warn!("启动命令执行失败: {err}");
        }
    }
    session.clear()?;

    let mut dock = Dock::new(X11Backend::new(&session, atoms, config.font.as_str()), launcher);
    let mut events = X11Events::new(session.conn(), session.window());
    log::info!("进入事件循环");
    let exit = event_loop::run(&mut events, &mut dock)?;
    log::info!("事件循环结束: {:?}", exit);
    Ok(exit)
}
