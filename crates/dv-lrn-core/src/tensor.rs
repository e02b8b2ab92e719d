//! CHW テンソル
//!
//! `[channel, row, column]` の順に連続配置した 3 次元配列。
//! アクセラレータ側の出力レイアウト（8 チャンネル単位のグループ）との相互変換も持つ。

use std::fmt;

use crate::element::Element;
use crate::error::{LrnError, LrnResult};

/// アクセラレータ出力レイアウトのチャンネルグループ幅
pub const DV_CHANNEL_GROUP: usize = 8;

/// テンソル形状（チャンネル数, 高さ, 幅）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChwShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl ChwShape {
    /// 形状を作成する。チャンネル数 0 はエラー。
    pub fn new(channels: usize, height: usize, width: usize) -> LrnResult<Self> {
        let shape = Self {
            channels,
            height,
            width,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// チャンネル数が正であることを確認
    pub fn validate(&self) -> LrnResult<()> {
        if self.channels == 0 {
            return Err(LrnError::EmptyChannels);
        }
        Ok(())
    }

    /// 1 チャンネル分の要素数
    #[inline]
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// 総要素数
    #[inline]
    pub fn len(&self) -> usize {
        self.channels * self.plane_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(c, y, x)` の線形インデックス
    #[inline]
    pub fn index(&self, c: usize, y: usize, x: usize) -> usize {
        debug_assert!(c < self.channels && y < self.height && x < self.width);
        (c * self.height + y) * self.width + x
    }
}

impl fmt::Display for ChwShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.channels, self.height, self.width)
    }
}

/// CHW 順の連続バッファを持つテンソル
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor3<T> {
    shape: ChwShape,
    data: Vec<T>,
}

impl<T: Element> Tensor3<T> {
    /// 既存バッファから作成。長さが形状と一致しなければエラー。
    pub fn from_vec(shape: ChwShape, data: Vec<T>) -> LrnResult<Self> {
        shape.validate()?;
        if data.len() != shape.len() {
            return Err(LrnError::BufferLength {
                shape,
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// ゼロ埋めテンソル
    pub fn zeros(shape: ChwShape) -> LrnResult<Self> {
        Self::from_vec(shape, vec![T::from_f32(0.0); shape.len()])
    }

    #[inline]
    pub fn shape(&self) -> ChwShape {
        self.shape
    }

    #[inline]
    pub fn get(&self, c: usize, y: usize, x: usize) -> T {
        self.data[self.shape.index(c, y, x)]
    }

    #[inline]
    pub fn set(&mut self, c: usize, y: usize, x: usize, value: T) {
        let idx = self.shape.index(c, y, x);
        self.data[idx] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// チャンネル `c` の平面（H×W）
    pub fn plane(&self, c: usize) -> &[T] {
        let len = self.shape.plane_len();
        &self.data[c * len..(c + 1) * len]
    }

    /// 要素型を変換した新しいテンソル（f32 経由）
    pub fn map_elements<U: Element>(&self) -> Tensor3<U> {
        Tensor3 {
            shape: self.shape,
            data: self.data.iter().map(|&v| U::from_f32(v.to_f32())).collect(),
        }
    }

    /// アクセラレータ出力レイアウトへ並べ替える
    ///
    /// # レイアウト
    ///
    /// ```text
    /// for group in (0..C).step_by(8):
    ///   for x in 0..W:
    ///     for y in 0..H:
    ///       for c in group..min(group + 8, C):
    ///         out.push(chw[c][y][x])
    /// ```
    pub fn to_dv_layout(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        let ChwShape {
            channels,
            height,
            width,
        } = self.shape;
        for group in (0..channels).step_by(DV_CHANNEL_GROUP) {
            let last = (group + DV_CHANNEL_GROUP).min(channels);
            for x in 0..width {
                for y in 0..height {
                    for c in group..last {
                        out.push(self.get(c, y, x));
                    }
                }
            }
        }
        out
    }

    /// アクセラレータ出力レイアウトのバッファから CHW テンソルを復元する
    pub fn from_dv_layout(shape: ChwShape, data: &[T]) -> LrnResult<Self> {
        let mut tensor = Self::zeros(shape)?;
        if data.len() != shape.len() {
            return Err(LrnError::BufferLength {
                shape,
                expected: shape.len(),
                actual: data.len(),
            });
        }
        let mut src = data.iter();
        for group in (0..shape.channels).step_by(DV_CHANNEL_GROUP) {
            let last = (group + DV_CHANNEL_GROUP).min(shape.channels);
            for x in 0..shape.width {
                for y in 0..shape.height {
                    for c in group..last {
                        // 長さは上で検証済み
                        if let Some(&v) = src.next() {
                            tensor.set(c, y, x, v);
                        }
                    }
                }
            }
        }
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    fn iota(shape: ChwShape) -> Tensor3<f32> {
        let data = (0..shape.len()).map(|i| i as f32).collect();
        Tensor3::from_vec(shape, data).unwrap()
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(matches!(ChwShape::new(0, 4, 4), Err(LrnError::EmptyChannels)));
        let bad = ChwShape {
            channels: 0,
            height: 1,
            width: 1,
        };
        assert!(matches!(
            Tensor3::<f32>::from_vec(bad, vec![]),
            Err(LrnError::EmptyChannels)
        ));
    }

    #[test]
    fn test_buffer_length_checked() {
        let shape = ChwShape::new(2, 2, 2).unwrap();
        let err = Tensor3::<f32>::from_vec(shape, vec![0.0; 7]).unwrap_err();
        assert!(matches!(
            err,
            LrnError::BufferLength {
                expected: 8,
                actual: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_index_is_channel_major() {
        let shape = ChwShape::new(3, 2, 4).unwrap();
        assert_eq!(shape.index(0, 0, 1), 1);
        assert_eq!(shape.index(0, 1, 0), 4);
        assert_eq!(shape.index(1, 0, 0), 8);
        assert_eq!(shape.index(2, 1, 3), 23);
        assert_eq!(shape.to_string(), "3x2x4");
    }

    #[test]
    fn test_plane() {
        let t = iota(ChwShape::new(3, 2, 2).unwrap());
        assert_eq!(t.plane(1), &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_dv_layout_single_group() {
        // C=2, H=2, W=1: x → y → c の順
        let t = iota(ChwShape::new(2, 2, 1).unwrap());
        // chw: c0=[0,1], c1=[2,3]
        assert_eq!(t.to_dv_layout(), vec![0.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_dv_layout_partial_last_group() {
        // 10 チャンネル = 8 + 2 のグループ
        let shape = ChwShape::new(10, 1, 2).unwrap();
        let t = iota(shape);
        let dv = t.to_dv_layout();
        // 先頭は x=0 の c0..c7
        let head: Vec<f32> = (0..8).map(|c| (c * 2) as f32).collect();
        assert_eq!(&dv[..8], head.as_slice());
        // 末尾は 2 チャンネルグループの x=1
        assert_eq!(&dv[18..], &[17.0, 19.0]);

        let back = Tensor3::from_dv_layout(shape, &dv).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_map_elements_to_f16() {
        let shape = ChwShape::new(1, 1, 3).unwrap();
        let t = Tensor3::from_vec(shape, vec![0.5f32, -2.0, 1.0e-8]).unwrap();
        let h: Tensor3<f16> = t.map_elements();
        assert_eq!(h.get(0, 0, 0), f16::from_f32(0.5));
        assert_eq!(h.get(0, 0, 1), f16::from_f32(-2.0));
        assert_eq!(h.get(0, 0, 2).to_bits(), 0);
    }
}
