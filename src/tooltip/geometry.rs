//! 提示窗几何计算模块
//!
//! 纯函数：输入为文字度量、宿主窗口原点与屏幕尺寸，输出提示窗的位置与尺寸。
//!
//! # 定位规则
//!
//! - 锚点为宿主窗口在屏幕中的左上角
//! - **X 轴**：右侧放不下 → 向左翻转一个提示窗宽度，仍越界则贴左边界
//! - **Y 轴**：下方放不下 → 贴屏幕下边界
//! - 最终位置在锚点基础上再偏移 `TOOLTIP_MARGIN`

/// 提示窗相对锚点的偏移像素
pub const TOOLTIP_MARGIN: i32 = 32;

/// 提示窗最小边长
const MIN_EXTENT: i32 = 16;

/// 文字左侧留白
pub const TEXT_OFFSET_X: i16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 字体与文字度量（对应 X11 `QueryTextExtents` 回复）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtents {
    pub font_ascent: i16,
    pub font_descent: i16,
    pub overall_width: i32,
}

/// 提示窗的最终布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipGeometry {
    pub position: Position,
    pub size: Size,
    /// 文字基线的 y 坐标（窗口内）
    pub baseline: i16,
}

impl TooltipGeometry {
    /// 根据文字度量、宿主原点与屏幕尺寸计算布局。
    pub fn layout(extents: TextExtents, owner_origin: Position, screen: Size) -> Self {
        let size = tooltip_size(extents);
        let anchor = calculate_tooltip_anchor(owner_origin, size, screen);
        Self {
            position: Position::new(anchor.x + TOOLTIP_MARGIN, anchor.y + TOOLTIP_MARGIN),
            size,
            baseline: text_baseline(extents, size.height),
        }
    }
}

/// 提示窗尺寸：高 = max(16, 4 + ascent + descent)，宽 = max(16, 文字宽 + 16)。
pub fn tooltip_size(extents: TextExtents) -> Size {
    let height = (4 + extents.font_ascent as i32 + extents.font_descent as i32).max(MIN_EXTENT);
    let width = extents.overall_width.saturating_add(16).max(MIN_EXTENT);
    Size::new(width as u32, height as u32)
}

/// 在屏幕范围内修正锚点（翻转 + 收敛）。
///
/// # 后置条件
/// - `result.x >= 0`
/// - 提示窗不高于屏幕时：`result.y + size.height <= screen.height`
pub fn calculate_tooltip_anchor(origin: Position, size: Size, screen: Size) -> Position {
    let sw = screen.width as i32;
    let sh = screen.height as i32;
    let tw = size.width as i32;
    let th = size.height as i32;

    let x = if origin.x + tw > sw {
        (origin.x - tw).max(0)
    } else {
        origin.x
    };

    let y = if origin.y + th > sh { sh - th } else { origin.y };

    Position::new(x, y)
}

/// 文字基线：`4 + (ascent + descent - height) / 2 + ascent`。
pub fn text_baseline(extents: TextExtents, height: u32) -> i16 {
    let ascent = extents.font_ascent as i32;
    let descent = extents.font_descent as i32;
    (4 + (ascent + descent - height as i32) / 2 + ascent) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extents(ascent: i16, descent: i16, width: i32) -> TextExtents {
        TextExtents { font_ascent: ascent, font_descent: descent, overall_width: width }
    }

    #[test]
    fn test_tooltip_size_for_regular_font() {
        let size = tooltip_size(extents(16, 4, 120));
        assert_eq!(size, Size::new(136, 24));
    }

    #[test]
    fn test_tooltip_size_minimum() {
        let size = tooltip_size(extents(5, 2, -20));
        assert_eq!(size, Size::new(16, 16));
    }

    #[test]
    fn test_anchor_fits_on_screen() {
        let anchor = calculate_tooltip_anchor(Position::new(100, 200), Size::new(80, 20), Size::new(1920, 1080));
        assert_eq!(anchor, Position::new(100, 200));
    }

    #[test]
    fn test_anchor_flips_left_on_right_overflow() {
        // 1900 + 80 > 1920 → 1900 - 80
        let anchor = calculate_tooltip_anchor(Position::new(1900, 200), Size::new(80, 20), Size::new(1920, 1080));
        assert_eq!(anchor.x, 1820);
    }

    #[test]
    fn test_anchor_flip_clamps_to_zero() {
        // 50 + 90 > 100 → 50 - 90 = -40 → 0
        let anchor = calculate_tooltip_anchor(Position::new(50, 10), Size::new(90, 16), Size::new(100, 100));
        assert_eq!(anchor.x, 0);
    }

    #[test]
    fn test_anchor_clamps_bottom() {
        let anchor = calculate_tooltip_anchor(Position::new(10, 1070), Size::new(80, 24), Size::new(1920, 1080));
        assert_eq!(anchor.y, 1080 - 24);
    }

    #[test]
    fn test_text_baseline() {
        // 4 + (16 + 4 - 24) / 2 + 16 = 18
        assert_eq!(text_baseline(extents(16, 4, 0), 24), 18);
    }

    #[test]
    fn test_layout_applies_margin() {
        let geometry = TooltipGeometry::layout(extents(16, 4, 120), Position::new(0, 0), Size::new(1920, 1080));
        assert_eq!(geometry.position, Position::new(TOOLTIP_MARGIN, TOOLTIP_MARGIN));
        assert_eq!(geometry.size, Size::new(136, 24));
        assert_eq!(geometry.baseline, 18);
    }

    #[test]
    fn test_layout_deterministic() {
        let e = extents(13, 3, 300);
        let a = TooltipGeometry::layout(e, Position::new(1800, 1050), Size::new(1920, 1080));
        let b = TooltipGeometry::layout(e, Position::new(1800, 1050), Size::new(1920, 1080));
        assert_eq!(a, b);
    }
}
