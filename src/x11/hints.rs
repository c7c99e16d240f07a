//! ICCCM 窗口属性编码
//!
//! 与窗口管理器约定的属性均按协议格式手工编码为 32 位 / 8 位数组。

/// `WM_NORMAL_HINTS` 标志位
const US_POSITION: u32 = 1 << 0;
const US_SIZE: u32 = 1 << 1;

/// `WM_HINTS` 标志位
const STATE_HINT: u32 = 1 << 1;
const ICON_PIXMAP_HINT: u32 = 1 << 2;
const WINDOW_GROUP_HINT: u32 = 1 << 6;

/// `WM_HINTS.initial_state` 的 WithdrawnState
const WITHDRAWN_STATE: u32 = 0;

/// 窗口类名第二段
pub const CLASS_NAME: &str = "wmdia";

/// 用户指定位置 (0, 0) 与尺寸的 `WM_NORMAL_HINTS`（18 个 CARD32）。
pub fn normal_hints(width: u16, height: u16) -> [u32; 18] {
    let mut hints = [0u32; 18];
    hints[0] = US_POSITION | US_SIZE;
    hints[3] = width as u32;
    hints[4] = height as u32;
    hints
}

/// `WM_HINTS`（9 个 CARD32）：图标像素图 + 窗口组，非窗口模式下初始为 withdrawn。
pub fn wm_hints(icon_pixmap: u32, window_group: u32, window_mode: bool) -> [u32; 9] {
    let mut flags = ICON_PIXMAP_HINT | WINDOW_GROUP_HINT;
    if !window_mode {
        flags |= STATE_HINT;
    }
    [flags, 0, WITHDRAWN_STATE, icon_pixmap, 0, 0, 0, 0, window_group]
}

/// `WM_CLASS`：`<instance>\0wmdia\0`
pub fn wm_class(instance: &str) -> Vec<u8> {
    nul_joined([instance, CLASS_NAME])
}

/// `WM_COMMAND`：argv 各项以 NUL 结尾依次拼接
pub fn wm_command<S: AsRef<str>>(argv: &[S]) -> Vec<u8> {
    nul_joined(argv.iter().map(AsRef::as_ref))
}

fn nul_joined<'a>(parts: impl IntoIterator<Item = &'a str>) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(part.as_bytes());
        out.push(0);
    }
    out
}
