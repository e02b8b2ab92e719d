//! セグメントアドレス計算
//!
//! ウィンドウ二乗和 `x`（2^-sf_log2 で事前スケール済み）の binary32 表現から
//! 指数フィールドだけを取り出し、係数テーブルのセグメント番号を決める。

use super::constants::{ADDR_STEP_LOG, F32_EXP_BIAS, F32_EXP_MASK, F32_EXP_SHIFT};

/// 2 の冪を binary32 のビット列から直接組み立てる
///
/// 正規化数の範囲（`-126..=127`）のみ受け付ける。
#[inline]
pub(crate) fn pow2(exp: i32) -> f32 {
    debug_assert!((-126..=127).contains(&exp), "pow2 exponent out of range: {exp}");
    f32::from_bits(((exp + F32_EXP_BIAS) as u32) << F32_EXP_SHIFT)
}

/// 非バイアス指数 `e = exponent_field - 127`
///
/// 符号ビットと仮数は無視する。0 と非正規化数は `-127`。
#[inline]
pub fn unbiased_exponent(x: f32) -> i32 {
    ((x.to_bits() >> F32_EXP_SHIFT) & F32_EXP_MASK) as i32 - F32_EXP_BIAS
}

/// セグメント番号
///
/// `e' = e + 2·sf_log2` を 0 で下限クランプし、`e' >> ADDR_STEP_LOG` を返す。
/// 事前スケールを戻した値が 1 未満なら先頭セグメントに飽和する。
///
/// 上限はクランプしない。テーブル外の番号は参照時に
/// [`CoefficientTable::segment`](super::CoefficientTable::segment) が検出する。
#[inline]
pub fn segment_address(x: f32, sf_log2: u32) -> usize {
    let e = unbiased_exponent(x) + 2 * sf_log2 as i32;
    (e.max(0) as u32 >> ADDR_STEP_LOG) as usize
}
