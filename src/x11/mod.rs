//! # X11 窗口系统后端
//!
//! 基于 x11rb 的纯 Rust 协议实现：
//!
//! | 子模块 | 职责 |
//! |--------|------|
//! | `session` | 连接、宿主窗口、背景像素图、ICCCM 属性 |
//! | `surface` | 解码结果 → 背景像素图 + bounding 形状 |
//! | `palette` | 批量 `AllocColor`（cookie 关联回复）与原生位图 |
//! | `backend` | 提示窗与属性读取（`TooltipBackend` / `DockBackend`） |
//! | `events` | `poll(2)` 等待与事件翻译（`EventSource`） |
//! | `hints` / `text` | 属性与文字的纯编码函数 |

mod backend;
mod events;
mod hints;
mod palette;
mod session;
mod surface;
mod text;

pub use backend::X11Backend;
pub use events::X11Events;
pub use palette::{native_image, X11Palette};
pub use session::X11Session;
pub use surface::install_background;

x11rb::atom_manager! {
    /// 宿主窗口上的自定义属性（一次性批量 intern）
    pub Atoms: AtomsCookie {
        COMMAND,
        TOOLTIP,
    }
}
