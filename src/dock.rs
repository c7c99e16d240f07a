//! # 应用上下文
//!
//! `Dock` 持有窗口系统后端、命令启动器与提示窗控制器，
//! 作为事件循环的唯一分发目标。不存在进程级全局状态：
//! 上下文随 `run` 创建，循环结束后随作用域一起释放。

use std::ffi::OsString;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::event_loop::DockHandler;
use crate::launcher::Launcher;
use crate::tooltip::{TooltipBackend, TooltipController};

/// 宿主窗口所需的窗口系统能力
pub trait DockBackend: TooltipBackend {
    /// 读取宿主窗口的 `COMMAND` 属性原始字节；`Ok(None)` 表示属性不存在。
    fn read_command(&mut self) -> Result<Option<OsString>, AppError>;
}

pub struct Dock<B, L> {
    backend: B,
    launcher: L,
    tooltip: TooltipController,
}

impl<B: DockBackend, L: Launcher> Dock<B, L> {
    pub fn new(backend: B, launcher: L) -> Self {
        Self {
            backend,
            launcher,
            tooltip: TooltipController::new(),
        }
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

impl<B: DockBackend, L: Launcher> DockHandler for Dock<B, L> {
    fn timeout(&self, now: Instant) -> Option<Duration> {
        self.tooltip.timeout(now)
    }

    /// 曝光后提示窗内容不再有效，直接隐藏。
    fn redraw(&mut self) -> Result<(), AppError> {
        self.tooltip.hide(&mut self.backend);
        Ok(())
    }

    fn pointer_enter(&mut self, now: Instant) -> Result<(), AppError> {
        self.tooltip.pointer_enter(&mut self.backend, now)
    }

    fn pointer_leave(&mut self) -> Result<(), AppError> {
        self.tooltip.pointer_leave(&mut self.backend);
        Ok(())
    }

    fn click(&mut self) -> Result<(), AppError> {
        match self.backend.read_command() {
            Ok(Some(command)) if !command.is_empty() => {
                if let Err(err) = self.launcher.launch(&command) {
                    log::warn!("启动命令失败: {err}");
                }
            }
            Ok(_) => log::debug!("未设置 COMMAND 属性，忽略点击"),
            Err(err) => log::warn!("读取 COMMAND 属性失败: {err}"),
        }
        Ok(())
    }

    fn property_changed(&mut self, _atom: u32, now: Instant) -> Result<(), AppError> {
        self.tooltip.property_changed(&mut self.backend, now)
    }

    fn timeout_fired(&mut self) -> Result<(), AppError> {
        self.tooltip.timeout_fired(&mut self.backend);
        Ok(())
    }
}
