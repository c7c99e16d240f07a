//! 1 位透明遮罩

/// 每像素 1 位、行按整字节对齐的遮罩，位序为 LSB 在前。
///
/// 初始全部置位（不透明），透明像素对应位被清零。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparencyMask {
    width: u16,
    height: u16,
    stride: usize,
    bits: Vec<u8>,
}

impl TransparencyMask {
    pub fn new(width: u16, height: u16) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            bits: vec![0xFF; stride * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self, x: u16, y: u16) {
        let (index, bit) = self.locate(x, y);
        self.bits[index] &= !bit;
    }

    pub fn is_set(&self, x: u16, y: u16) -> bool {
        let (index, bit) = self.locate(x, y);
        self.bits[index] & bit != 0
    }

    /// 是否存在透明像素（忽略行尾填充位）
    pub fn has_transparency(&self) -> bool {
        (0..self.height).any(|y| (0..self.width).any(|x| !self.is_set(x, y)))
    }

    fn locate(&self, x: u16, y: u16) -> (usize, u8) {
        debug_assert!(x < self.width && y < self.height);
        (y as usize * self.stride + (x as usize >> 3), 1 << (x & 7))
    }
}
