//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，按失败阶段划分为五类：
//! - **Format**：内置图片文本格式错误（启动期，致命）
//! - **Protocol**：颜色分配回复缺失、字体打开失败等协议级错误（启动期，致命）
//! - **Resource**：窗口、像素图等资源创建失败（启动期，致命）
//! - **RuntimeIo**：运行期属性读取失败（就地恢复为占位文本）
//! - **Argument**：命令行用法错误（提示用户后以非零码退出）
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `XpmError` 与 x11rb 的错误类型提供 `From` 转换，调用侧直接 `?`。

use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

use crate::xpm::XpmError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片文本格式错误
    #[error("图片格式错误: {0}")]
    Format(XpmError),

    /// 协议错误（回复缺失、字体打开失败等）
    #[error("协议错误: {0}")]
    Protocol(String),

    /// 资源创建失败
    #[error("资源创建失败: {0}")]
    Resource(String),

    /// 运行期属性读取失败
    #[error("属性读取失败: {0}")]
    RuntimeIo(String),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Argument(String),

    /// 无法连接 X11 服务器
    #[error("无法连接 X11 服务器: {0}")]
    Connect(#[from] ConnectError),

    /// 已建立的连接上发生 I/O 错误
    #[error("X11 连接错误: {0}")]
    Connection(#[from] ConnectionError),

    /// 进程启动等本地 I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 颜色分配失败属于协议错误，其余解码错误均为格式错误。
impl From<XpmError> for AppError {
    fn from(error: XpmError) -> Self {
        match error {
            XpmError::Allocation(_) => AppError::Protocol(error.to_string()),
            other => AppError::Format(other),
        }
    }
}

impl From<ReplyError> for AppError {
    fn from(error: ReplyError) -> Self {
        match error {
            ReplyError::ConnectionError(e) => AppError::Connection(e),
            ReplyError::X11Error(e) => AppError::Protocol(format!("{:?}", e.error_kind)),
        }
    }
}

impl From<ReplyOrIdError> for AppError {
    fn from(error: ReplyOrIdError) -> Self {
        match error {
            ReplyOrIdError::ConnectionError(e) => AppError::Connection(e),
            other => AppError::Resource(other.to_string()),
        }
    }
}

impl AppError {
    /// 是否属于启动期致命错误（按错误分类表）。
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::RuntimeIo(_))
    }
}
