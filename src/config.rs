//! # 配置模块
//!
//! 命令行只接受短选项，解析结果收敛为 `DockConfig`。
//! 用法错误（未知选项、缺少参数值、多余的位置参数）由 clap 报告并以非零码退出，
//! `-h` / `-?` 打印版本与用法后以 0 退出。

use std::ffi::OsString;

use clap::{ArgAction, Parser};

use crate::error::AppError;

/// 默认窗口 / 进程名
pub const DEFAULT_NAME: &str = "wmdia";

/// 默认提示窗字体
pub const DEFAULT_FONT: &str = "-misc-fixed-medium-r-normal--20-*-75-75-c-*-iso8859-*";

/// 宿主窗口边长
pub const DOCK_SIZE: u16 = 64;

/// 版本行（随用法一起打印）
pub const VERSION_LINE: &str = concat!(
    "wmdia DIA dockapp Version ",
    env!("CARGO_PKG_VERSION"),
    "\n\tLicense AGPLv3: GNU Affero General Public License version 3"
);

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "wmdia",
    before_help = VERSION_LINE,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Execute command after setup
    #[arg(short = 'e', value_name = "cmd")]
    pub execute: Option<String>,

    /// Font for tooltip
    #[arg(short = 'f', value_name = "font")]
    pub font: Option<String>,

    /// Change window name
    #[arg(short = 'n', value_name = "name", default_value = DEFAULT_NAME)]
    pub name: String,

    /// Start in window mode
    #[arg(short = 'w', action = ArgAction::SetTrue)]
    pub window_mode: bool,

    /// Display this text
    #[arg(short = 'h', short_alias = '?', action = ArgAction::Help)]
    help: Option<bool>,
}

/// 解析命令行；`Ok(None)` 表示帮助已打印，调用方应以 0 退出。
pub fn parse_args<I, T>(args: I) -> Result<Option<Cli>, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) if !err.use_stderr() => {
            if let Err(io) = err.print() {
                log::warn!("打印帮助失败: {io}");
            }
            Ok(None)
        }
        Err(err) => Err(AppError::Argument(err.render().to_string())),
    }
}

/// 运行期配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockConfig {
    /// 启动完成后执行一次的命令
    pub execute: Option<String>,
    pub font: String,
    pub name: String,
    /// 不以 withdrawn 状态启动
    pub window_mode: bool,
    /// 原始 argv，写入 `WM_COMMAND`
    pub argv: Vec<String>,
}

impl DockConfig {
    pub fn from_cli(cli: Cli, argv: Vec<String>) -> Self {
        Self {
            execute: cli.execute,
            font: cli.font.unwrap_or_else(|| DEFAULT_FONT.to_string()),
            name: cli.name,
            window_mode: cli.window_mode,
            argv,
        }
    }
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            execute: None,
            font: DEFAULT_FONT.to_string(),
            name: DEFAULT_NAME.to_string(),
            window_mode: false,
            argv: vec![DEFAULT_NAME.to_string()],
        }
    }
}
