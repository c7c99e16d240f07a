//! # 图片解码器
//!
//! ## 实现思路
//!
//! 1. 解析头部与颜色表，并按目标深度为每个条目选定候选颜色
//! 2. 为所有不透明条目**一次性**发出颜色分配请求（不等待回复）
//! 3. 按条目顺序收取所有回复；任一回复缺失即整体失败
//! 4. 逐行写入像素，透明像素写入回退值并清除遮罩位
//!
//! 第 2、3 步的“先全部发出、再全部收取”只需一次往返，顺序收发会退化为 N 次往返。

use std::collections::HashMap;

use super::header::{parse_color_table, parse_header, ColorSpec, ImageSpec};
use super::mask::TransparencyMask;
use super::palette::{ColorAllocator, Rgb16};
use super::XpmError;
use crate::error::AppError;

/// 逐像素写入的目标位图
pub trait PixelSink {
    fn put_pixel(&mut self, x: u16, y: u16, pixel: u32);
}

/// 解码参数
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// 目标表面深度
    pub depth: u8,
    /// 透明像素写入的回退值（深度 1 时固定为 1）
    pub transparent_pixel: u32,
    /// 是否生成透明遮罩
    pub with_mask: bool,
}

/// 解码结果：位图 + 可选遮罩，交给表面构建后即丢弃。
#[derive(Debug)]
pub struct DecodedImage<B> {
    pub width: u16,
    pub height: u16,
    pub bitmap: B,
    pub mask: Option<TransparencyMask>,
}

/// 已发出、尚未收取回复的分配请求
struct PendingAllocation<P> {
    entry: usize,
    handle: P,
}

/// 颜色条目的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Transparent,
    Pixel(u32),
}

/// 颜色条目的分配计划
enum Plan {
    Transparent,
    Allocate(Rgb16),
    /// 所选深度下没有候选：不透明，像素值 0
    Unspecified,
}

/// 将文本图片解码为设备位图。
///
/// `create_bitmap(width, height, depth)` 在全部颜色分配完成后调用一次。
pub fn decode<'a, I, A, B, F>(
    data: I,
    options: &DecodeOptions,
    allocator: &mut A,
    create_bitmap: F,
) -> Result<DecodedImage<B>, AppError>
where
    I: IntoIterator<Item = &'a str>,
    A: ColorAllocator,
    B: PixelSink,
    F: FnOnce(u16, u16, u8) -> Result<B, AppError>,
{
    let mut lines = data.into_iter();
    let header = lines
        .next()
        .ok_or_else(|| XpmError::Header(String::new()))?;
    let spec: ImageSpec = parse_header(header)?;
    let table = parse_color_table(&mut lines, spec.colors)?;

    let plans = table
        .iter()
        .map(|entry| {
            Ok(match entry.select(options.depth)? {
                Some(ColorSpec::Transparent) => Plan::Transparent,
                Some(ColorSpec::Rgb(rgb)) => Plan::Allocate(Rgb16::from_rgb8(rgb)),
                None => Plan::Unspecified,
            })
        })
        .collect::<Result<Vec<_>, XpmError>>()?;

    // 先全部发出
    let mut pending = Vec::new();
    for (entry, plan) in plans.iter().enumerate() {
        if let Plan::Allocate(color) = plan {
            pending.push(PendingAllocation {
                entry,
                handle: allocator.request(*color)?,
            });
        }
    }
    let requested = pending.len();

    // 再全部收取
    let mut slots: Vec<Slot> = plans
        .iter()
        .map(|plan| match plan {
            Plan::Transparent => Slot::Transparent,
            Plan::Allocate(_) | Plan::Unspecified => Slot::Pixel(0),
        })
        .collect();
    for allocation in pending {
        slots[allocation.entry] = Slot::Pixel(allocator.resolve(allocation.handle)?);
    }

    log::debug!(
        "图片 {}x{}：{} 种颜色，已分配 {} 个",
        spec.width,
        spec.height,
        spec.colors,
        requested
    );

    let lookup: HashMap<char, Slot> = table.iter().map(|e| e.code).zip(slots).collect();
    let transparent = if options.depth == 1 { 1 } else { options.transparent_pixel };

    let mut bitmap = create_bitmap(spec.width, spec.height, options.depth)?;
    let mut mask = options
        .with_mask
        .then(|| TransparencyMask::new(spec.width, spec.height));

    for y in 0..spec.height {
        let row = lines.next().ok_or(XpmError::MissingRows {
            expected: spec.height,
            found: y,
        })?;
        if row.chars().count() != spec.width as usize {
            return Err(XpmError::RowLength { row: y, expected: spec.width }.into());
        }
        for (x, code) in (0..spec.width).zip(row.chars()) {
            match lookup.get(&code) {
                Some(Slot::Transparent) => {
                    bitmap.put_pixel(x, y, transparent);
                    if let Some(mask) = mask.as_mut() {
                        mask.clear(x, y);
                    }
                }
                Some(Slot::Pixel(pixel)) => bitmap.put_pixel(x, y, *pixel),
                None => return Err(XpmError::UndeclaredCode { code, x, y }.into()),
            }
        }
    }

    Ok(DecodedImage {
        width: spec.width,
        height: spec.height,
        bitmap,
        mask,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 记录请求顺序的分配器：像素值 = 0x100 + 请求序号
    #[derive(Default)]
    struct RecordingAllocator {
        requests: Vec<Rgb16>,
        resolved: Vec<usize>,
        fail_on: Option<usize>,
    }

    impl ColorAllocator for RecordingAllocator {
        type Pending = usize;

        fn request(&mut self, color: Rgb16) -> Result<usize, XpmError> {
            assert!(self.resolved.is_empty(), "所有请求必须在收取回复之前发出");
            self.requests.push(color);
            Ok(self.requests.len() - 1)
        }

        fn resolve(&mut self, pending: usize) -> Result<u32, XpmError> {
            if self.fail_on == Some(pending) {
                return Err(XpmError::Allocation(format!("请求 {}", pending)));
            }
            self.resolved.push(pending);
            Ok(0x100 + pending as u32)
        }
    }

    #[derive(Debug)]
    struct Grid {
        width: u16,
        pixels: Vec<u32>,
    }

    impl Grid {
        fn at(&self, x: u16, y: u16) -> u32 {
            self.pixels[y as usize * self.width as usize + x as usize]
        }
    }

    impl PixelSink for Grid {
        fn put_pixel(&mut self, x: u16, y: u16, pixel: u32) {
            let w = self.width as usize;
            self.pixels[y as usize * w + x as usize] = pixel;
        }
    }

    fn grid(w: u16, h: u16, _depth: u8) -> Result<Grid, AppError> {
        Ok(Grid { width: w, pixels: vec![u32::MAX; w as usize * h as usize] })
    }

    fn options(depth: u8) -> DecodeOptions {
        DecodeOptions { depth, transparent_pixel: 7, with_mask: true }
    }

    #[test]
    fn test_issue_all_then_resolve_in_entry_order() {
        let data = ["3 1 3 1", "a c#FF0000", "b c none", "c c#0000FF", "abc"];
        let mut alloc = RecordingAllocator::default();
        let image = decode(data, &options(24), &mut alloc, grid).unwrap();

        assert_eq!(alloc.requests, vec![Rgb16::new(0xFFFF, 0, 0), Rgb16::new(0, 0, 0xFFFF)]);
        assert_eq!(alloc.resolved, vec![0, 1]);
        assert_eq!(image.bitmap.pixels, vec![0x100, 7, 0x101]);
        let mask = image.mask.unwrap();
        assert!(mask.is_set(0, 0));
        assert!(!mask.is_set(1, 0));
        assert!(mask.is_set(2, 0));
    }

    #[test]
    fn test_depth_one_forces_transparent_pixel() {
        let data = ["2 1 2 1", "a m none", "b m#000000", "ab"];
        let mut alloc = RecordingAllocator::default();
        let image = decode(data, &options(1), &mut alloc, grid).unwrap();
        assert_eq!(image.bitmap.at(0, 0), 1);
        assert_eq!(image.bitmap.at(1, 0), 0x100);
    }

    #[test]
    fn test_missing_reply_aborts() {
        let data = ["1 1 2 1", "a c#FF0000", "b c#00FF00", "a"];
        let mut alloc = RecordingAllocator { fail_on: Some(1), ..Default::default() };
        let err = decode(data, &options(24), &mut alloc, grid).unwrap_err();
        assert!(matches!(err, AppError::Protocol(_)));
    }

    #[test]
    fn test_entry_without_selected_tag_is_opaque_zero() {
        let data = ["1 1 1 1", "a c#FF0000", "a"];
        let mut alloc = RecordingAllocator::default();
        let image = decode(data, &options(1), &mut alloc, grid).unwrap();
        assert!(alloc.requests.is_empty());
        assert_eq!(image.bitmap.at(0, 0), 0);
        assert!(image.mask.unwrap().is_set(0, 0));
    }

    #[test]
    fn test_undeclared_code_fails_closed() {
        let data = ["2 1 1 1", "a c#FF0000", "az"];
        let mut alloc = RecordingAllocator::default();
        let err = decode(data, &options(24), &mut alloc, grid).unwrap_err();
        assert!(matches!(
            err,
            AppError::Format(XpmError::UndeclaredCode { code: 'z', x: 1, y: 0 })
        ));
    }

    #[test]
    fn test_row_errors() {
        let mut alloc = RecordingAllocator::default();
        let short = decode(["2 2 1 1", "a c#FF0000", "aa", "a"], &options(24), &mut alloc, grid);
        assert!(matches!(short, Err(AppError::Format(XpmError::RowLength { row: 1, .. }))));

        let mut alloc = RecordingAllocator::default();
        let missing = decode(["2 2 1 1", "a c#FF0000", "aa"], &options(24), &mut alloc, grid);
        assert!(matches!(
            missing,
            Err(AppError::Format(XpmError::MissingRows { expected: 2, found: 1 }))
        ));
    }

    #[test]
    fn test_table_error_issues_no_requests() {
        let data = ["1 1 2 1", "a c#FF0000", "b x#00FF00", "a"];
        let mut alloc = RecordingAllocator::default();
        assert!(decode(data, &options(24), &mut alloc, grid).is_err());
        assert!(alloc.requests.is_empty());
    }

    #[test]
    fn test_without_mask() {
        let data = ["1 1 1 1", "a c none", "a"];
        let mut alloc = RecordingAllocator::default();
        let opts = DecodeOptions { with_mask: false, ..options(24) };
        let image = decode(data, &opts, &mut alloc, grid).unwrap();
        assert!(image.mask.is_none());
        assert_eq!(image.bitmap.at(0, 0), 7);
    }
}
