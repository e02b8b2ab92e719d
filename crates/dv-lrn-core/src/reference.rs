//! 正確な LRN（比較用の基準値）
//!
//! チャンネル方向（across channels）の LRN を f64 で計算する。
//! ハードウェア近似の誤差を測るための基準であり、エミュレーションとは独立した経路。
//!
//! ```text
//! scale = k + alpha / n · Σ_{i ∈ [c - pre_pad, c - pre_pad + n)} v_i²   （範囲外の v_i = 0）
//! out   = v_c · scale^(-beta)
//! ```

use crate::element::Element;
use crate::error::{LrnError, LrnResult};
use crate::tensor::Tensor3;

/// LRN パラメータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LrnParams {
    /// ウィンドウ幅 n（奇数）
    pub local_size: usize,
    pub alpha: f64,
    pub beta: f64,
    pub k: f64,
}

impl Default for LrnParams {
    fn default() -> Self {
        Self {
            local_size: 5,
            alpha: 1e-4,
            beta: 0.75,
            k: 1.0,
        }
    }
}

impl LrnParams {
    pub fn validate(&self) -> LrnResult<()> {
        if self.local_size == 0 || self.local_size % 2 == 0 {
            return Err(LrnError::InvalidParams(format!(
                "local_size must be odd and positive, got {}",
                self.local_size
            )));
        }
        if !(self.alpha.is_finite() && self.beta.is_finite() && self.k.is_finite()) {
            return Err(LrnError::InvalidParams(format!(
                "alpha/beta/k must be finite: {self:?}"
            )));
        }
        Ok(())
    }

    /// 中心チャンネルより前の幅
    #[inline]
    pub fn pre_pad(&self) -> usize {
        (self.local_size - 1) / 2
    }
}

/// 正確な LRN
pub fn lrn_reference<T: Element, U: Element>(
    input: &Tensor3<T>,
    output: &mut Tensor3<U>,
    params: &LrnParams,
) -> LrnResult<()> {
    params.validate()?;
    let shape = input.shape();
    shape.validate()?;
    if shape != output.shape() {
        return Err(LrnError::ShapeMismatch {
            input: shape,
            output: output.shape(),
        });
    }

    let pre_pad = params.pre_pad();
    let coeff = params.alpha / params.local_size as f64;
    for c in 0..shape.channels {
        let start = c.saturating_sub(pre_pad);
        let end = (c + pre_pad + 1).min(shape.channels);
        for y in 0..shape.height {
            for x in 0..shape.width {
                let sum_sq: f64 = (start..end)
                    .map(|ch| {
                        let v = input.get(ch, y, x).to_f32() as f64;
                        v * v
                    })
                    .sum();
                let v = input.get(c, y, x).to_f32() as f64;
                let out = v * (params.k + coeff * sum_sq).powf(-params.beta);
                output.set(c, y, x, U::from_f32(out as f32));
            }
        }
    }
    Ok(())
}
