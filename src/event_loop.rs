//! # 事件循环
//!
//! 单线程阻塞等待：等待时长取自提示窗计时器（无限或剩余毫秒）。
//! 有输入时一次性取尽当前可读事件再回到等待，连续的重绘事件合并为一次重绘；
//! 等待超时则触发 `timeout_fired`。

use std::time::{Duration, Instant};

use crate::error::AppError;

/// 事件循环关心的输入事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockEvent {
    /// 曝光事件；`count` 为同一批中其后还剩余的曝光数
    Redraw { count: u16 },
    PointerEnter,
    PointerLeave,
    ButtonPress,
    PropertyChanged { atom: u32 },
    /// 宿主窗口被销毁
    Destroyed,
    /// 不处理的事件
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

/// 输入事件来源
pub trait EventSource {
    /// 等待输入，最多 `timeout`；`None` 表示无限等待。
    fn wait(&mut self, timeout: Option<Duration>) -> Result<WaitOutcome, AppError>;

    /// 非阻塞地取出一个已到达的事件。
    fn poll_event(&mut self) -> Option<DockEvent>;

    /// 连接是否已断开
    fn is_closed(&self) -> bool;
}

/// 事件分发目标
pub trait DockHandler {
    /// 当前的等待时长
    fn timeout(&self, now: Instant) -> Option<Duration>;

    fn redraw(&mut self) -> Result<(), AppError>;

    fn pointer_enter(&mut self, now: Instant) -> Result<(), AppError>;

    fn pointer_leave(&mut self) -> Result<(), AppError>;

    fn click(&mut self) -> Result<(), AppError>;

    fn property_changed(&mut self, atom: u32, now: Instant) -> Result<(), AppError>;

    fn timeout_fired(&mut self) -> Result<(), AppError>;
}

/// 循环结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Destroyed,
    ConnectionClosed,
}

/// 运行事件循环直到窗口销毁或连接断开。
pub fn run<S, H>(source: &mut S, handler: &mut H) -> Result<LoopExit, AppError>
where
    S: EventSource,
    H: DockHandler,
{
    loop {
        let timeout = handler.timeout(Instant::now());
        match source.wait(timeout)? {
            WaitOutcome::TimedOut => absorb(handler.timeout_fired())?,
            WaitOutcome::Ready => {
                if let Some(exit) = drain(source, handler)? {
                    return Ok(exit);
                }
                if source.is_closed() {
                    log::info!("X11 连接已关闭，退出事件循环");
                    return Ok(LoopExit::ConnectionClosed);
                }
            }
        }
    }
}

/// 取尽当前事件并分发；返回 `Some` 表示循环应结束。
fn drain<S, H>(source: &mut S, handler: &mut H) -> Result<Option<LoopExit>, AppError>
where
    S: EventSource,
    H: DockHandler,
{
    let mut redraw_pending = false;

    while let Some(event) = source.poll_event() {
        if redraw_pending && !matches!(event, DockEvent::Redraw { .. }) {
            absorb(handler.redraw())?;
            redraw_pending = false;
        }

        match event {
            // 仅在一批曝光的最后一个到达时重绘
            DockEvent::Redraw { count } => redraw_pending |= count == 0,
            DockEvent::PointerEnter => absorb(handler.pointer_enter(Instant::now()))?,
            DockEvent::PointerLeave => absorb(handler.pointer_leave())?,
            DockEvent::ButtonPress => absorb(handler.click())?,
            DockEvent::PropertyChanged { atom } => {
                absorb(handler.property_changed(atom, Instant::now()))?
            }
            DockEvent::Destroyed => {
                log::info!("窗口已销毁，退出事件循环");
                return Ok(Some(LoopExit::Destroyed));
            }
            DockEvent::Ignored => {}
        }
    }

    if redraw_pending {
        absorb(handler.redraw())?;
    }
    Ok(None)
}

/// 运行期错误记录后继续循环，致命错误向上返回。
fn absorb(result: Result<(), AppError>) -> Result<(), AppError> {
    match result {
        Err(err) if !err.is_fatal() => {
            log::warn!("事件处理失败，继续运行: {err}");
            Ok(())
        }
        other => other,
    }
}
