//! # 图片头与颜色表解析
//!
//! ## 格式
//!
//! ```text
//! <width> <height> <colors> <bytes_per_color>
//! <code> <tag><spec> [<tag><spec> ...]     × colors
//! <pixel row>                              × height
//! ```
//!
//! - `tag`：`c`（彩色）或 `m`（单色回退），与 `spec` 之间允许有空白
//! - `spec`：`none`（不区分大小写，透明）或 `#RRGGBB`

use super::hex;
use super::XpmError;

/// 图片头信息，解析后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
    pub width: u16,
    pub height: u16,
    pub colors: usize,
    pub bytes_per_color: usize,
}

/// 候选颜色的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    /// `c`
    Color,
    /// `m`
    Mono,
}

impl ColorTag {
    /// 目标深度对应的标签：深度 1 取单色，其余取彩色。
    pub fn for_depth(depth: u8) -> Self {
        if depth == 1 { ColorTag::Mono } else { ColorTag::Color }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(ColorTag::Color),
            'm' => Some(ColorTag::Mono),
            _ => None,
        }
    }
}

/// 候选颜色值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    /// `none`
    Transparent,
    Rgb([u8; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub tag: ColorTag,
    pub spec: ColorSpec,
}

/// 颜色表中的一行：颜色字符 + 若干候选。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTableEntry {
    pub code: char,
    pub candidates: Vec<Candidate>,
}

impl ColorTableEntry {
    /// 按目标深度挑选候选颜色。
    ///
    /// 返回 `Ok(None)` 表示该深度下没有候选；同一标签出现多次且取值不同视为格式错误。
    pub fn select(&self, depth: u8) -> Result<Option<ColorSpec>, XpmError> {
        let wanted = ColorTag::for_depth(depth);
        let mut selected: Option<ColorSpec> = None;

        for candidate in self.candidates.iter().filter(|c| c.tag == wanted) {
            match selected {
                Some(previous) if previous != candidate.spec => {
                    return Err(XpmError::DuplicateSpec(self.code));
                }
                Some(_) => {}
                None => selected = Some(candidate.spec),
            }
        }

        Ok(selected)
    }
}

/// 解析头部：恰好四个以空白分隔的整数。
pub fn parse_header(line: &str) -> Result<ImageSpec, XpmError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(XpmError::Header(line.to_string()));
    }

    let mut values = [0i64; 4];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token
            .parse::<i64>()
            .map_err(|_| XpmError::Header(line.to_string()))?;
    }
    let [width, height, colors, bytes_per_color] = values;

    if !(1..=255).contains(&colors) {
        return Err(XpmError::ColorCount(colors));
    }
    if bytes_per_color != 1 {
        return Err(XpmError::BytesPerColor(bytes_per_color));
    }

    let dimension = |v: i64| u16::try_from(v).ok().filter(|&v| v > 0);
    let (Some(w), Some(h)) = (dimension(width), dimension(height)) else {
        return Err(XpmError::Dimensions { width, height });
    };

    Ok(ImageSpec {
        width: w,
        height: h,
        colors: colors as usize,
        bytes_per_color: bytes_per_color as usize,
    })
}

/// 解析一行颜色表。
pub fn parse_color_entry(line: &str) -> Result<ColorTableEntry, XpmError> {
    let mut chars = line.chars();
    let code = chars
        .next()
        .ok_or_else(|| XpmError::ColorEntry("空的颜色表行".to_string()))?;
    let mut rest = chars.as_str();
    let mut candidates = Vec::new();

    loop {
        rest = rest.trim_start();
        let Some(tag_char) = rest.chars().next() else {
            break;
        };
        let tag = ColorTag::from_char(tag_char).ok_or_else(|| XpmError::UnknownTag {
            tag: tag_char,
            line: line.to_string(),
        })?;
        rest = rest[tag_char.len_utf8()..].trim_start();

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        rest = tail;

        candidates.push(Candidate { tag, spec: parse_spec(token)? });
    }

    Ok(ColorTableEntry { code, candidates })
}

fn parse_spec(token: &str) -> Result<ColorSpec, XpmError> {
    if token.eq_ignore_ascii_case("none") {
        return Ok(ColorSpec::Transparent);
    }
    token
        .strip_prefix('#')
        .and_then(hex::rgb)
        .map(ColorSpec::Rgb)
        .ok_or_else(|| XpmError::ColorSpec(token.to_string()))
}

/// 读取 `count` 行颜色表，颜色字符不得重复。
pub fn parse_color_table<'a, I>(lines: &mut I, count: usize) -> Result<Vec<ColorTableEntry>, XpmError>
where
    I: Iterator<Item = &'a str>,
{
    let mut table: Vec<ColorTableEntry> = Vec::with_capacity(count);
    for index in 0..count {
        let line = lines.next().ok_or_else(|| {
            XpmError::ColorEntry(format!("颜色表缺少第 {} 行（共 {} 行）", index + 1, count))
        })?;
        let entry = parse_color_entry(line)?;
        if table.iter().any(|e| e.code == entry.code) {
            return Err(XpmError::DuplicateCode(entry.code));
        }
        table.push(entry);
    }
    Ok(table)
}
