//! X11 事件来源
//!
//! 等待前先刷新请求缓冲并检查连接内部已缓存的事件，
//! 没有可处理事件时才对套接字做 `poll(2)`（超时向上取整到毫秒，`None` 为无限等待）。
//! 刷新或读取失败都视为连接关闭，事件循环随后以连接关闭退出。

use std::collections::VecDeque;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use crate::error::AppError;
use crate::event_loop::{DockEvent, EventSource, WaitOutcome};

pub struct X11Events<'c> {
    conn: &'c RustConnection,
    window: Window,
    pending: VecDeque<Event>,
    closed: bool,
}

impl<'c> X11Events<'c> {
    pub fn new(conn: &'c RustConnection, window: Window) -> Self {
        Self {
            conn,
            window,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// 非阻塞读取一个原始事件；连接出错时标记为已关闭。
    fn next_raw(&mut self) -> Option<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.closed {
            return None;
        }
        let result = self.conn.poll_for_event();
        close_on_error(&mut self.closed, "读取", result).flatten()
    }

    fn translate(&self, event: Event) -> DockEvent {
        match event {
            Event::Expose(e) if e.window == self.window => DockEvent::Redraw { count: e.count },
            Event::EnterNotify(e) if e.event == self.window => DockEvent::PointerEnter,
            Event::LeaveNotify(e) if e.event == self.window => DockEvent::PointerLeave,
            Event::ButtonPress(_) => DockEvent::ButtonPress,
            Event::PropertyNotify(e) if e.window == self.window => DockEvent::PropertyChanged { atom: e.atom },
            Event::DestroyNotify(e) if e.window == self.window => DockEvent::Destroyed,
            Event::Error(err) => {
                log::warn!("X11 协议错误: {:?}", err);
                DockEvent::Ignored
            }
            other => {
                log::debug!("忽略事件: {:?}", other);
                DockEvent::Ignored
            }
        }
    }
}

impl EventSource for X11Events<'_> {
    fn wait(&mut self, timeout: Option<Duration>) -> Result<WaitOutcome, AppError> {
        if !self.closed {
            let result = self.conn.flush();
            close_on_error(&mut self.closed, "刷新", result);
        }

        if !self.pending.is_empty() || self.closed {
            return Ok(WaitOutcome::Ready);
        }
        // 连接可能已把事件读入内部缓冲，此时套接字不再可读
        if let Some(event) = self.next_raw() {
            self.pending.push_back(event);
            return Ok(WaitOutcome::Ready);
        }
        if self.closed {
            return Ok(WaitOutcome::Ready);
        }

        if poll_readable(self.conn.stream().as_raw_fd(), timeout)? {
            Ok(WaitOutcome::Ready)
        } else {
            Ok(WaitOutcome::TimedOut)
        }
    }

    fn poll_event(&mut self) -> Option<DockEvent> {
        let event = self.next_raw()?;
        Some(self.translate(event))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// 连接操作失败时记录日志并标记关闭。
fn close_on_error<T, E: std::fmt::Display>(closed: &mut bool, action: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("X11 连接{action}失败: {err}");
            *closed = true;
            None
        }
    }
}

/// 等待毫秒数：向上取整，`None` 为 -1（无限）。
fn poll_timeout_ms(timeout: Option<Duration>) -> libc::c_int {
    match timeout {
        None => -1,
        Some(duration) => {
            let ms = duration.as_nanos().div_ceil(1_000_000);
            ms.min(libc::c_int::MAX as u128) as libc::c_int
        }
    }
}

/// 套接字在超时前是否可读；被信号打断时重试。
fn poll_readable(fd: RawFd, timeout: Option<Duration>) -> Result<bool, AppError> {
    let timeout_ms = poll_timeout_ms(timeout);
    let mut poll_fd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        let ready = unsafe { libc::poll(&mut poll_fd, 1, timeout_ms) };
        if ready >= 0 {
            return Ok(ready > 0);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err.into());
        }
    }
}
