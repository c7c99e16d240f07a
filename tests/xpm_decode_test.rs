//! 文本图片解码的端到端测试（模拟颜色分配）

use std::collections::HashMap;

use proptest::prelude::*;
use wmdia::error::AppError;
use wmdia::xpm::{self, ColorAllocator, DecodeOptions, PixelSink, Rgb16, XpmError, BUILTIN_BACKGROUND};

/// 每种颜色分配一个不同的像素值，同时记录像素值 → 颜色
#[derive(Default)]
struct FakeColormap {
    issued: Vec<Rgb16>,
    replies: HashMap<u32, Rgb16>,
}

impl ColorAllocator for FakeColormap {
    type Pending = usize;

    fn request(&mut self, color: Rgb16) -> Result<usize, XpmError> {
        self.issued.push(color);
        Ok(self.issued.len() - 1)
    }

    fn resolve(&mut self, pending: usize) -> Result<u32, XpmError> {
        let pixel = 1000 + pending as u32;
        self.replies.insert(pixel, self.issued[pending]);
        Ok(pixel)
    }
}

#[derive(Debug)]
struct Bitmap {
    width: u16,
    height: u16,
    depth: u8,
    pixels: Vec<Option<u32>>,
}

impl Bitmap {
    fn at(&self, x: u16, y: u16) -> Option<u32> {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

impl PixelSink for Bitmap {
    fn put_pixel(&mut self, x: u16, y: u16, pixel: u32) {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index] = Some(pixel);
    }
}

fn bitmap(width: u16, height: u16, depth: u8) -> Result<Bitmap, AppError> {
    Ok(Bitmap { width, height, depth, pixels: vec![None; width as usize * height as usize] })
}

fn options(depth: u8) -> DecodeOptions {
    DecodeOptions { depth, transparent_pixel: 0, with_mask: true }
}

#[test]
fn test_two_by_two_red() {
    let mut colormap = FakeColormap::default();
    let image = xpm::decode(["2 2 1 1", "a c#FF0000", "aa", "aa"], &options(24), &mut colormap, bitmap).unwrap();

    assert_eq!((image.width, image.height), (2, 2));
    assert_eq!(colormap.issued, vec![Rgb16::new(65535, 0, 0)]);
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(image.bitmap.at(x, y), Some(1000));
        }
    }
    let mask = image.mask.unwrap();
    assert!(!mask.has_transparency());
    assert!((0..2).all(|y| (0..2).all(|x| mask.is_set(x, y))));
}

#[test]
fn test_same_table_differs_by_depth() {
    let data = ["2 1 2 1", "a m none c#000000", "b c#FFFFFF m#FFFFFF", "ab"];

    let mut mono = FakeColormap::default();
    let image = xpm::decode(data, &options(1), &mut mono, bitmap).unwrap();
    assert_eq!(image.bitmap.depth, 1);
    // 深度 1 的透明像素固定写 1
    assert_eq!(image.bitmap.at(0, 0), Some(1));
    assert!(!image.mask.as_ref().unwrap().is_set(0, 0));
    assert_eq!(mono.issued, vec![Rgb16::new(65535, 65535, 65535)]);

    let mut color = FakeColormap::default();
    let image = xpm::decode(data, &options(8), &mut color, bitmap).unwrap();
    assert_eq!(image.bitmap.at(0, 0), Some(1000));
    assert!(image.mask.as_ref().unwrap().is_set(0, 0));
    assert_eq!(color.issued[0], Rgb16::new(0, 0, 0));
    assert_eq!(color.issued.len(), 2);
}

#[test]
fn test_malformed_header_issues_no_requests() {
    let mut colormap = FakeColormap::default();
    let err = xpm::decode(["bad bad bad"], &options(24), &mut colormap, bitmap).unwrap_err();
    assert!(matches!(err, AppError::Format(XpmError::Header(_))));
    assert!(colormap.issued.is_empty());
}

#[test]
fn test_undeclared_code_fails_closed() {
    let mut colormap = FakeColormap::default();
    let err = xpm::decode(["2 1 1 1", "a c#FF0000", "az"], &options(24), &mut colormap, bitmap).unwrap_err();
    assert!(matches!(
        err,
        AppError::Format(XpmError::UndeclaredCode { code: 'z', x: 1, y: 0 })
    ));
}

#[test]
fn test_builtin_background_decodes() {
    let mut colormap = FakeColormap::default();
    let image = xpm::decode(BUILTIN_BACKGROUND.lines(), &options(24), &mut colormap, bitmap).unwrap();

    assert_eq!((image.width, image.height), (64, 64));
    assert_eq!(image.bitmap.height, 64);
    // 七种颜色中一种透明
    assert_eq!(colormap.issued.len(), 6);
    assert!(image.bitmap.pixels.iter().all(Option::is_some));
    let mask = image.mask.unwrap();
    assert!(mask.has_transparency());
    assert!(!mask.is_set(0, 0));
    assert!(mask.is_set(32, 32));
}

const CODES: &[char] = &['a', 'b', 'c', 'd', '.', '#', '+', ' '];

/// 随机颜色表（含透明项）与随机像素
fn arb_image() -> impl Strategy<Value = (Vec<Option<[u8; 3]>>, u16, u16, Vec<usize>)> {
    (1usize..=CODES.len(), 1u16..=12, 1u16..=12).prop_flat_map(|(colors, width, height)| {
        (
            prop::collection::vec(prop::option::weighted(0.8, any::<[u8; 3]>()), colors),
            Just(width),
            Just(height),
            prop::collection::vec(0..colors, width as usize * height as usize),
        )
    })
}

fn render(table: &[Option<[u8; 3]>], width: u16, height: u16, pixels: &[usize]) -> Vec<String> {
    let mut lines = vec![format!("{} {} {} 1", width, height, table.len())];
    for (code, color) in CODES.iter().zip(table) {
        match color {
            Some([r, g, b]) => lines.push(format!("{code} c #{r:02X}{g:02X}{b:02X}")),
            None => lines.push(format!("{code} c none")),
        }
    }
    for row in pixels.chunks(width as usize) {
        lines.push(row.iter().map(|&i| CODES[i]).collect());
    }
    lines
}

proptest! {
    #[test]
    fn prop_every_pixel_is_fallback_or_allocated((table, width, height, pixels) in arb_image()) {
        let lines = render(&table, width, height, &pixels);
        let mut colormap = FakeColormap::default();
        let image = xpm::decode(lines.iter().map(String::as_str), &options(24), &mut colormap, bitmap).unwrap();

        for y in 0..height {
            for x in 0..width {
                let entry = pixels[y as usize * width as usize + x as usize];
                let pixel = image.bitmap.at(x, y).unwrap();
                match table[entry] {
                    None => {
                        prop_assert_eq!(pixel, 0);
                        prop_assert!(!image.mask.as_ref().unwrap().is_set(x, y));
                    }
                    Some(rgb) => {
                        prop_assert_eq!(colormap.replies.get(&pixel).copied(), Some(Rgb16::from_rgb8(rgb)));
                        prop_assert!(image.mask.as_ref().unwrap().is_set(x, y));
                    }
                }
            }
        }
        prop_assert_eq!(colormap.issued.len(), table.iter().filter(|c| c.is_some()).count());
    }
}
