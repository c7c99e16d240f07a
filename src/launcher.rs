//! 命令启动模块
//!
//! 点击窗口或 `-e` 参数触发的命令原样交给 `/bin/sh -c` 执行，并与事件循环完全脱离：
//! 只等待中间的那一层 shell 退出，真正的命令在后台运行并被 init 接管，
//! 不成为本进程的子进程，也不再被跟踪。

use std::ffi::OsStr;
use std::process::{Command, Stdio};

use crate::error::AppError;

const SHELL: &str = "/bin/sh";

/// 中间 shell 的脚本：把 `$1` 交给新的 shell 在后台执行后立即退出。
const DETACH_SCRIPT: &str = "/bin/sh -c \"$1\" &";

/// 命令启动方式
pub trait Launcher {
    /// `command` 为属性中的原始字节，不做任何编码转换。
    fn launch(&mut self, command: &OsStr) -> Result<(), AppError>;
}

/// 通过 shell 以脱离方式启动命令
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn launch(&mut self, command: &OsStr) -> Result<(), AppError> {
        spawn_detached(command)
    }
}

/// 构造中间 shell 的命令行（不执行）。
pub fn detached_command(command: impl AsRef<OsStr>) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c")
        .arg(DETACH_SCRIPT)
        .arg("wmdia")
        .arg(command)
        .stdin(Stdio::null());
    cmd
}

/// 启动命令并只等待中间 shell 退出。
pub fn spawn_detached(command: &OsStr) -> Result<(), AppError> {
    log::info!("执行命令: {}", command.to_string_lossy());
    let status = detached_command(command).status()?;
    if !status.success() {
        log::warn!("中间 shell 异常退出: {status}");
    }
    Ok(())
}
