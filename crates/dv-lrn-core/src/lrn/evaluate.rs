//! 正規化係数の評価
//!
//! ```text
//! addr   = segment_address(x)
//! scaled = x · 2^(2·sf_log2) − x_sample[addr]
//! approx = scaled · comb[addr] + coef0[addr]
//! out    = approx · v
//! ```
//!
//! 演算は binary32 で 1 命令ずつ丸める（FMA にはしない）。

use super::address::segment_address;
use super::config::LrnConfig;
use crate::error::LrnResult;

/// 正規化係数 `≈ (bias + alpha/n · s)^(-beta)`
///
/// `x` はウィンドウ二乗和（事前スケール済み、`x >= 0`）。
#[inline]
pub fn scale_factor(x: f32, config: &LrnConfig) -> LrnResult<f32> {
    debug_assert!(!(x < 0.0), "window sum must be non-negative: {x}");
    let addr = segment_address(x, config.sf_log2());
    let seg = config.table().segment(addr)?;
    let scaled = x * config.unscale() - seg.x_sample;
    Ok(scaled * seg.comb + seg.coef0)
}

/// 正規化後の出力値 `scale_factor(x) · v`
///
/// `v` は事前スケール前の入力値。
#[inline]
pub fn evaluate(x: f32, v: f32, config: &LrnConfig) -> LrnResult<f32> {
    Ok(scale_factor(x, config)? * v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LrnError;
    use crate::lrn::address::pow2;
    use crate::lrn::constants::{ALPHA, BETA, BIAS, LOCAL_SIZE};

    fn exact(s: f64) -> f64 {
        (BIAS + ALPHA / LOCAL_SIZE as f64 * s).powf(-BETA)
    }

    #[test]
    fn test_zero_sum_gives_unit_scale() {
        let cfg = LrnConfig::default();
        assert_eq!(scale_factor(0.0, &cfg).unwrap(), 1.0);
        assert_eq!(evaluate(0.0, 1.5, &cfg).unwrap(), 1.5);
    }

    #[test]
    fn test_zero_value_gives_zero_output() {
        let cfg = LrnConfig::default();
        assert_eq!(evaluate(0.34, 0.0, &cfg).unwrap(), 0.0);
    }

    #[test]
    fn test_scale_factor_bounded_by_target() {
        // 下に凸な関数を弦で近似しているので、近似値は真値以上になる
        let cfg = LrnConfig::default();
        let unscale = cfg.unscale() as f64;
        let mut s = 0.5f64;
        while s < 1.6e7 {
            let x = (s / unscale) as f32;
            let approx = scale_factor(x, &cfg).unwrap() as f64;
            let target = exact(x as f64 * unscale);
            assert!(approx >= target - 1e-6, "s={s}: {approx} < {target}");
            assert!(approx - target < 0.0625, "s={s}: {approx} vs {target}");
            assert!(approx > 0.0 && approx <= 1.0);
            s *= 1.07;
        }
    }

    #[test]
    fn test_scale_factor_non_increasing() {
        let cfg = LrnConfig::default();
        let mut prev = f32::INFINITY;
        let mut x = 1e-6f32;
        while x < 16_000.0 {
            let f = scale_factor(x, &cfg).unwrap();
            assert!(f <= prev, "x={x}: {f} > {prev}");
            prev = f;
            x *= 1.01;
        }
    }

    #[test]
    fn test_out_of_table_sum_is_error() {
        let cfg = LrnConfig::default();
        // s = 2^24 → addr 12
        let x = pow2(24 - 2 * cfg.sf_log2() as i32);
        assert!(matches!(
            scale_factor(x, &cfg),
            Err(LrnError::SegmentOutOfRange { index: 12, .. })
        ));
        assert!(scale_factor(f32::INFINITY, &cfg).is_err());
    }
}
