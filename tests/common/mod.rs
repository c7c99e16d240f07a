//! 集成测试共用的模拟后端
#![allow(dead_code)]

use std::ffi::{OsStr, OsString};

use wmdia::dock::DockBackend;
use wmdia::error::AppError;
use wmdia::launcher::Launcher;
use wmdia::tooltip::geometry::{Position, Size, TextExtents, TooltipGeometry};
use wmdia::tooltip::TooltipBackend;

/// 记录调用的提示窗后端
#[derive(Debug)]
pub struct MockBackend {
    /// `Err` 同时表示属性不存在与读取失败
    pub text: Result<String, String>,
    pub command: Result<Option<OsString>, String>,
    pub extents: TextExtents,
    pub origin: Result<Position, String>,
    pub screen: Size,
    pub fail_create: bool,
    pub fail_measure: bool,
    pub creates: usize,
    pub shown: Vec<(TooltipGeometry, String)>,
    pub hides: usize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            text: Ok("Slideshow".to_string()),
            command: Ok(None),
            extents: TextExtents { font_ascent: 16, font_descent: 4, overall_width: 100 },
            origin: Ok(Position::new(100, 100)),
            screen: Size::new(1920, 1080),
            fail_create: false,
            fail_measure: false,
            creates: 0,
            shown: Vec::new(),
            hides: 0,
        }
    }
}

impl MockBackend {
    pub fn with_text(text: &str) -> Self {
        Self { text: Ok(text.to_string()), ..Self::default() }
    }

    pub fn with_command(command: impl Into<OsString>) -> Self {
        Self { command: Ok(Some(command.into())), ..Self::default() }
    }

    pub fn last_text(&self) -> Option<&str> {
        self.shown.last().map(|(_, text)| text.as_str())
    }
}

impl TooltipBackend for MockBackend {
    fn create(&mut self) -> Result<(), AppError> {
        if self.fail_create {
            return Err(AppError::Protocol("无法打开字体 nosuchfont".to_string()));
        }
        self.creates += 1;
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, AppError> {
        self.text.clone().map_err(AppError::RuntimeIo)
    }

    fn measure(&mut self, _text: &str) -> Result<TextExtents, AppError> {
        if self.fail_measure {
            return Err(AppError::Protocol("BadFont".to_string()));
        }
        Ok(self.extents)
    }

    fn owner_origin(&mut self) -> Result<Position, AppError> {
        self.origin.clone().map_err(AppError::Protocol)
    }

    fn screen_size(&self) -> Size {
        self.screen
    }

    fn show(&mut self, geometry: &TooltipGeometry, text: &str) -> Result<(), AppError> {
        self.shown.push((*geometry, text.to_string()));
        Ok(())
    }

    fn hide(&mut self) -> Result<(), AppError> {
        self.hides += 1;
        Ok(())
    }
}

impl DockBackend for MockBackend {
    fn read_command(&mut self) -> Result<Option<OsString>, AppError> {
        self.command.clone().map_err(AppError::RuntimeIo)
    }
}

/// 记录命令而不执行的启动器
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    pub launched: Vec<OsString>,
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, command: &OsStr) -> Result<(), AppError> {
        self.launched.push(command.to_os_string());
        Ok(())
    }
}
