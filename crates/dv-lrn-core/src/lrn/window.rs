//! チャンネル方向ウィンドウの二乗和
//!
//! チャンネル `c` を中心とする幅 5 のウィンドウを集め、
//! 事前スケール → 二乗 → 総和の順に計算する。
//!
//! # 境界処理
//!
//! テンソル外のチャンネルはゼロとして扱う（反転・折り返しはしない）。
//! ウィンドウは縮めず常に 5 スロットで、除数 5 は係数テーブル側に織り込まれている。
//!
//! ```text
//! c = 0, C = 16:
//!   slot   : [0] [1] [2] [3] [4]
//!   channel:  -   -   0   1   2     （- はゼロ）
//! ```

use super::config::LrnConfig;
use super::constants::{HALF_WINDOW, LOCAL_SIZE};
use crate::element::Element;
use crate::tensor::Tensor3;

/// 実在チャンネル範囲 `[start, end)` と、バッファ上の書き込み開始位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: usize,
    pub end: usize,
    /// `start - c + HALF_WINDOW`
    pub offset: usize,
}

impl WindowBounds {
    /// `[max(0, c-2), min(C, c+3))` にクランプした範囲
    #[inline]
    pub fn clamped(c: usize, channels: usize) -> Self {
        debug_assert!(c < channels);
        let start = c.saturating_sub(HALF_WINDOW);
        let end = (c + HALF_WINDOW + 1).min(channels);
        Self {
            start,
            end,
            offset: start + HALF_WINDOW - c,
        }
    }

    /// 実在チャンネル数（境界付近では 5 未満）
    #[inline]
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

/// 5 スロットの一時バッファ（要素ごとに作成し、共有しない）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window([f32; LOCAL_SIZE]);

impl Window {
    /// `input[start..end, y, x]` をゼロ埋めバッファへコピー
    pub fn gather<T: Element>(input: &Tensor3<T>, c: usize, y: usize, x: usize) -> Self {
        let bounds = WindowBounds::clamped(c, input.shape().channels);
        let mut buf = [0.0f32; LOCAL_SIZE];
        for slot in 0..bounds.width() {
            buf[bounds.offset + slot] = input.get(bounds.start + slot, y, x).to_f32();
        }
        Self(buf)
    }

    /// 全スロットに `scale` を掛ける
    #[inline]
    pub fn prescale(&mut self, scale: f32) {
        for v in self.0.iter_mut() {
            *v *= scale;
        }
    }

    /// 全スロットをその場で二乗
    #[inline]
    pub fn square(&mut self) {
        for v in self.0.iter_mut() {
            *v *= *v;
        }
    }

    /// スロット 0 から順に加算（順序固定）
    #[inline]
    pub fn sum(&self) -> f32 {
        self.0.iter().fold(0.0f32, |acc, &v| acc + v)
    }

    #[inline]
    pub fn values(&self) -> &[f32; LOCAL_SIZE] {
        &self.0
    }
}

/// 事前スケール済み二乗和 `Σ (v · 2^-sf_log2)²`
#[inline]
pub fn window_sum<T: Element>(
    input: &Tensor3<T>,
    c: usize,
    y: usize,
    x: usize,
    config: &LrnConfig,
) -> f32 {
    let mut window = Window::gather(input, c, y, x);
    window.prescale(config.prescale());
    window.square();
    window.sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::ChwShape;

    fn column(values: &[f32]) -> Tensor3<f32> {
        let shape = ChwShape::new(values.len(), 1, 1).unwrap();
        Tensor3::from_vec(shape, values.to_vec()).unwrap()
    }

    #[test]
    fn test_bounds_interior() {
        let b = WindowBounds::clamped(5, 16);
        assert_eq!((b.start, b.end, b.offset), (3, 8, 0));
        assert_eq!(b.width(), 5);
    }

    #[test]
    fn test_bounds_edges() {
        let first = WindowBounds::clamped(0, 16);
        assert_eq!((first.start, first.end, first.offset), (0, 3, 2));
        let second = WindowBounds::clamped(1, 16);
        assert_eq!((second.start, second.end, second.offset), (0, 4, 1));
        let last = WindowBounds::clamped(15, 16);
        assert_eq!((last.start, last.end, last.offset), (13, 16, 0));
        assert_eq!(last.width(), 3);
    }

    #[test]
    fn test_bounds_fewer_channels_than_window() {
        let b = WindowBounds::clamped(0, 1);
        assert_eq!((b.start, b.end, b.offset), (0, 1, 2));
        let b = WindowBounds::clamped(1, 3);
        assert_eq!((b.start, b.end, b.offset), (0, 3, 1));
    }

    #[test]
    fn test_gather_zero_pads_low_edge() {
        let t = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let w = Window::gather(&t, 0, 0, 0);
        assert_eq!(w.values(), &[0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_gather_zero_pads_high_edge() {
        let t = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let w = Window::gather(&t, 5, 0, 0);
        // 反転なら [4,5,6,5,4]、折り返しなら [4,5,6,1,2] になる
        assert_eq!(w.values(), &[4.0, 5.0, 6.0, 0.0, 0.0]);
    }

    #[test]
    fn test_window_sum_edges_match_hand_computation() {
        let cfg = LrnConfig::default();
        let t = column(&[32.0, 64.0, 96.0, 128.0]);
        // 2^-5 で 1, 2, 3, 4 になる
        assert_eq!(window_sum(&t, 0, 0, 0, &cfg), 0.0 + 0.0 + 1.0 + 4.0 + 9.0);
        assert_eq!(window_sum(&t, 3, 0, 0, &cfg), 4.0 + 9.0 + 16.0 + 0.0 + 0.0);
        assert_eq!(window_sum(&t, 1, 0, 0, &cfg), 0.0 + 1.0 + 4.0 + 9.0 + 16.0);
    }

    #[test]
    fn test_window_reads_only_its_own_location() {
        let shape = ChwShape::new(3, 1, 2).unwrap();
        // x=0 は全て 32、x=1 は全て 0
        let t = Tensor3::from_vec(shape, vec![32.0, 0.0, 32.0, 0.0, 32.0, 0.0]).unwrap();
        let cfg = LrnConfig::default();
        assert_eq!(window_sum(&t, 1, 0, 0, &cfg), 3.0);
        assert_eq!(window_sum(&t, 1, 0, 1, &cfg), 0.0);
    }
}
