//! # 提示窗状态机
//!
//! ## 状态与转换
//!
//! ```text
//!              PointerEnter（读取 TOOLTIP、测量、定位、显示）
//!   Hidden ───────────────────────────────────────────────▶ Shown
//!     ▲                                                      │ PointerEnter：仅刷新截止时间
//!     │   Timeout / PointerLeave（无待触发超时时）/ Redraw     │ PropertyChanged：隐藏后重新显示
//!     └──────────────────────────────────────────────────────┘
//! ```
//!
//! 截止时间由 `Timer` 持有，事件循环通过 `TooltipController::timeout` 读取等待时长。
//! 窗口、字体与文字绘制等平台细节下沉到 `TooltipBackend`。

pub mod geometry;
pub mod timer;

use std::borrow::Cow;
use std::time::{Duration, Instant};

use crate::error::AppError;
use geometry::{Position, Size, TextExtents, TooltipGeometry};
use timer::Timer;

/// 提示窗显示时长
pub const TOOLTIP_LIFETIME: Duration = Duration::from_millis(5000);

/// 属性为空或不存在时显示的文字
pub const NO_TOOLTIP_TEXT: &str = "No tooltip set!";

/// 属性读取失败时显示的文字
pub const ERROR_TOOLTIP_TEXT: &str = "Error tooltip";

/// 提示窗的平台实现（由窗口系统协作方提供）
pub trait TooltipBackend {
    /// 首次显示前创建提示窗。字体打开失败时返回错误，对进程致命。
    fn create(&mut self) -> Result<(), AppError>;

    /// 读取宿主窗口的 `TOOLTIP` 属性。属性不存在视为读取失败。
    fn read_text(&mut self) -> Result<String, AppError>;

    fn measure(&mut self, text: &str) -> Result<TextExtents, AppError>;

    /// 宿主窗口在屏幕中的左上角
    fn owner_origin(&mut self) -> Result<Position, AppError>;

    fn screen_size(&self) -> Size;

    /// 置顶、移动/缩放、映射提示窗并绘制文字。
    fn show(&mut self, geometry: &TooltipGeometry, text: &str) -> Result<(), AppError>;

    /// 取消映射并刷新请求。
    fn hide(&mut self) -> Result<(), AppError>;
}

/// 当前显示中的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownTooltip {
    pub text: String,
    pub geometry: TooltipGeometry,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Shown(ShownTooltip),
}

/// 提示窗控制器：持有状态与唯一的超时计时器。
#[derive(Debug, Default)]
pub struct TooltipController {
    state: TooltipState,
    timer: Timer,
    created: bool,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, TooltipState::Shown(_))
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// 事件循环的等待时长；`None` 表示无限等待。
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn pointer_enter<B: TooltipBackend>(&mut self, backend: &mut B, now: Instant) -> Result<(), AppError> {
        if self.is_shown() {
            self.timer.arm(now, TOOLTIP_LIFETIME);
            return Ok(());
        }
        self.show(backend, now)
    }

    /// 仅在没有待触发超时时隐藏；倒计时期间的离开事件被忽略。
    pub fn pointer_leave<B: TooltipBackend>(&mut self, backend: &mut B) {
        if !self.timer.is_armed() {
            self.hide(backend);
        }
    }

    /// 外部属性变化：显示中则按新属性值重新显示。
    pub fn property_changed<B: TooltipBackend>(&mut self, backend: &mut B, now: Instant) -> Result<(), AppError> {
        if !self.is_shown() {
            return Ok(());
        }
        self.hide(backend);
        self.show(backend, now)
    }

    pub fn timeout_fired<B: TooltipBackend>(&mut self, backend: &mut B) {
        self.hide(backend);
        self.timer.disarm();
    }

    pub fn hide<B: TooltipBackend>(&mut self, backend: &mut B) {
        if let TooltipState::Shown(_) = self.state {
            if let Err(err) = backend.hide() {
                log::warn!("隐藏提示窗失败: {err}");
            }
            self.state = TooltipState::Hidden;
            self.timer.disarm();
        }
    }

    fn show<B: TooltipBackend>(&mut self, backend: &mut B, now: Instant) -> Result<(), AppError> {
        if !self.created {
            backend.create()?;
            self.created = true;
        }

        let text = tooltip_text(backend.read_text()).into_owned();

        let extents = match backend.measure(&text) {
            Ok(extents) => extents,
            Err(err) => {
                log::warn!("无法测量提示文字，放弃显示: {err}");
                return Ok(());
            }
        };

        let origin = backend.owner_origin().unwrap_or_else(|err| {
            log::warn!("获取窗口原点失败，使用 (0, 0): {err}");
            Position::default()
        });
        let geometry = TooltipGeometry::layout(extents, origin, backend.screen_size());

        if let Err(err) = backend.show(&geometry, &text) {
            log::warn!("显示提示窗失败: {err}");
        }
        log::debug!(
            "提示窗显示于 ({}, {}) {}x{}",
            geometry.position.x,
            geometry.position.y,
            geometry.size.width,
            geometry.size.height
        );

        self.state = TooltipState::Shown(ShownTooltip { text, geometry });
        self.timer.arm(now, TOOLTIP_LIFETIME);
        Ok(())
    }
}

/// 属性读取结果 → 显示文字：空属性与读取失败（含属性不存在）各有占位文字。
pub fn tooltip_text(read: Result<String, AppError>) -> Cow<'static, str> {
    match read {
        Ok(text) if !text.is_empty() => Cow::Owned(text),
        Ok(_) => Cow::Borrowed(NO_TOOLTIP_TEXT),
        Err(err) => {
            log::warn!("读取 TOOLTIP 属性失败: {err}");
            Cow::Borrowed(ERROR_TOOLTIP_TEXT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_text_uses_property() {
        assert_eq!(tooltip_text(Ok("Firefox".to_string())), "Firefox");
    }

    #[test]
    fn test_tooltip_text_placeholders() {
        assert_eq!(tooltip_text(Ok(String::new())), NO_TOOLTIP_TEXT);
        assert_eq!(
            tooltip_text(Err(AppError::RuntimeIo("TOOLTIP".to_string()))),
            ERROR_TOOLTIP_TEXT
        );
    }

    #[test]
    fn test_new_controller_is_hidden_without_timeout() {
        let controller = TooltipController::new();
        assert_eq!(controller.state(), &TooltipState::Hidden);
        assert_eq!(controller.timeout(Instant::now()), None);
    }
}
