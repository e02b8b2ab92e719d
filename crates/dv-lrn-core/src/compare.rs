//! 出力と基準値の誤差レポート
//!
//! - `|y - t| >= threshold` の要素は失敗とし、最も誤差の大きい要素を座標付きで保持する
//! - それ以外は `|t|` の大きさで区分し、区分ごとの最大誤差を記録する

use std::fmt;

use crate::element::Element;
use crate::error::{LrnError, LrnResult};
use crate::tensor::Tensor3;

/// 既定の許容誤差
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// `|t|` の区分上限
pub const MAGNITUDE_BOUNDS: [f32; 6] = [0.1, 0.5, 1.0, 5.0, 10.0, 1_000_000.0];

/// 1 要素分の誤差記録
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiffSample {
    pub diff: f32,
    /// 出力値
    pub y: f32,
    /// 基準値
    pub t: f32,
}

/// 許容誤差を超えた要素
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffFailure {
    pub sample: DiffSample,
    pub c: usize,
    pub y: usize,
    pub x: usize,
}

/// 誤差レポート
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    pub threshold: f32,
    /// `MAGNITUDE_BOUNDS` ごとの最大誤差
    pub buckets: [DiffSample; MAGNITUDE_BOUNDS.len()],
    pub worst_failure: Option<DiffFailure>,
    pub failed_count: usize,
    /// 出力値の範囲 `(min, max)`
    pub output_range: (f32, f32),
    /// 基準値の範囲 `(min, max)`
    pub target_range: (f32, f32),
}

impl DiffReport {
    /// `output` と `target` を比較する（形状が異なればエラー）
    pub fn compute<T: Element, U: Element>(
        output: &Tensor3<T>,
        target: &Tensor3<U>,
        threshold: f32,
    ) -> LrnResult<Self> {
        let shape = output.shape();
        if shape != target.shape() {
            return Err(LrnError::ShapeMismatch {
                input: target.shape(),
                output: shape,
            });
        }

        let mut report = Self {
            threshold,
            buckets: [DiffSample::default(); MAGNITUDE_BOUNDS.len()],
            worst_failure: None,
            failed_count: 0,
            output_range: (f32::INFINITY, f32::NEG_INFINITY),
            target_range: (f32::INFINITY, f32::NEG_INFINITY),
        };

        for c in 0..shape.channels {
            for y in 0..shape.height {
                for x in 0..shape.width {
                    let yv = output.get(c, y, x).to_f32();
                    let tv = target.get(c, y, x).to_f32();
                    report.record(c, y, x, yv, tv);
                }
            }
        }
        Ok(report)
    }

    fn record(&mut self, c: usize, y: usize, x: usize, yv: f32, tv: f32) {
        self.output_range = (self.output_range.0.min(yv), self.output_range.1.max(yv));
        self.target_range = (self.target_range.0.min(tv), self.target_range.1.max(tv));

        let sample = DiffSample {
            diff: (yv - tv).abs(),
            y: yv,
            t: tv,
        };
        // NaN は失敗扱い
        if !(sample.diff < self.threshold) {
            self.failed_count += 1;
            let worse = self
                .worst_failure
                .is_none_or(|w| sample.diff > w.sample.diff || sample.diff.is_nan());
            if worse {
                self.worst_failure = Some(DiffFailure { sample, c, y, x });
            }
            return;
        }

        if let Some(i) = MAGNITUDE_BOUNDS.iter().position(|&b| tv.abs() <= b) {
            if sample.diff > self.buckets[i].diff {
                self.buckets[i] = sample;
            }
        }
    }

    /// 失敗要素が無ければ true
    pub fn passed(&self) -> bool {
        self.failed_count == 0
    }

    /// 全区分を通した最大誤差（失敗要素を除く）
    pub fn max_passing_diff(&self) -> f32 {
        self.buckets.iter().map(|b| b.diff).fold(0.0, f32::max)
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "target: [{:.6}, {:.6}] output: [{:.6}, {:.6}]",
            self.target_range.0, self.target_range.1, self.output_range.0, self.output_range.1
        )?;
        for (bound, b) in MAGNITUDE_BOUNDS.iter().zip(self.buckets.iter()) {
            writeln!(
                f,
                "t <= {bound:.1}: max_diff={:.6} on y={:.6} and t={:.6}",
                b.diff, b.y, b.t
            )?;
        }
        match &self.worst_failure {
            Some(w) => write!(
                f,
                "FAILED: {} element(s), failed_diff={:.6} on y={:.6} and t={:.6} xy=({}, {}) chan={}",
                self.failed_count, w.sample.diff, w.sample.y, w.sample.t, w.x, w.y, w.c
            ),
            None => write!(f, "PASSED (threshold {})", self.threshold),
        }
    }
}
