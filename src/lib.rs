//! # wmdia：DIA dockapp 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main ── config (clap 短选项) ── env_logger              │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ DockConfig
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  app ── 启动流程                                          │
//! │   ├─ xpm ──────── 文本图片解码（批量颜色分配）             │
//! │   └─ x11 ──────── 会话 / 背景 / 提示窗 / 事件来源         │
//! │                                                          │
//! │  event_loop ── 等待 + 分发 ──► dock (DockHandler)         │
//! │                                  ├─ tooltip 状态机 + 计时器│
//! │                                  └─ launcher 脱离式启动   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`config`] | 命令行解析与运行期配置 |
//! | [`xpm`] | 精简 XPM 文本的解析、按深度选色、批量分配与遮罩 |
//! | [`tooltip`] | 提示窗状态机、单一计时器、几何计算 |
//! | [`event_loop`] | 带超时的阻塞等待与事件分发 |
//! | [`dock`] | 应用上下文，连接状态机与命令启动 |
//! | [`launcher`] | `/bin/sh -c` 脱离式启动命令 |
//! | [`x11`] | x11rb 实现的窗口系统后端 |
//! | [`app`] | 启动顺序与资源生命周期 |

pub mod app;
pub mod config;
pub mod dock;
pub mod error;
pub mod event_loop;
pub mod launcher;
pub mod tooltip;
pub mod x11;
pub mod xpm;
