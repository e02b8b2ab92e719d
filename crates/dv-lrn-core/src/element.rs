//! 保存形式の要素型
//!
//! 演算は常に f32 で行い、保存時のみ要素型に丸める。

use half::f16;

/// テンソル要素として扱える浮動小数点型（IEEE-754 binary32 / binary16）
pub trait Element: Copy + Send + Sync + 'static {
    /// f32 への拡張（binary16 からは無損失）
    fn to_f32(self) -> f32;

    /// f32 からの変換（binary16 へは最近接偶数丸め）
    fn from_f32(value: f32) -> Self;
}

impl Element for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
}

impl Element for f16 {
    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        f16::from_f32(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f16_widening_is_exact() {
        for bits in [0x0000u16, 0x0001, 0x3c00, 0x4a2c, 0x7bff, 0xbc00] {
            let h = f16::from_bits(bits);
            let widened = <f16 as Element>::to_f32(h);
            assert_eq!(<f16 as Element>::from_f32(widened).to_bits(), bits);
        }
    }

    #[test]
    fn test_f16_rounds_to_nearest_even() {
        // 1 + 2^-11 は 1.0 と 1 + 2^-10 のちょうど中間 → 偶数側の 1.0
        let mid = 1.0f32 + f32::powi(2.0, -11);
        assert_eq!(<f16 as Element>::from_f32(mid).to_bits(), 0x3c00);
    }
}
