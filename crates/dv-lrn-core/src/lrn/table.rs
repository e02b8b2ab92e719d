//! 係数テーブル
//!
//! `f(s) = (bias + alpha/n · s)^(-beta)` を 12 区間の 1 次式で近似するための定数。
//! ここで `s` は元スケールでのウィンドウ二乗和。
//!
//! # セグメント
//!
//! ```text
//! addr :  0       1        2          ...  11
//! s    : [0,4)   [4,16)   [16,64)     ...  [4^11, 4^12)
//! ```
//!
//! 各セグメントは `x_sample`（展開点）、`coef0`（展開点での値）、
//! `coef1`（区間全体での変化量）、`h_inv`（区間幅の逆数）を持ち、
//! 評価時には傾き `comb = h_inv · coef1` を使う。
//!
//! 値はビット列で固定しており、読み込み後に変更されることはない。

use serde::{Deserialize, Serialize};

use super::constants::NUM_SEGMENTS;
use crate::error::{LrnError, LrnResult};

/// 同梱テーブルの版
///
/// alpha, beta, bias, ウィンドウ幅のいずれかを変えた場合は作り直しになる。
pub const TABLE_VERSION: &str = "dv-lrn-a1e-4-b0.75-k1-n5-r1";

const COEF0_BITS: [u32; NUM_SEGMENTS] = [
    0x3f80_0000, 0x3f7f_fc11, 0x3f7f_f047, 0x3f7f_c128, 0x3f7f_0577, 0x3f7c_2313,
    0x3f71_51f6, 0x3f4e_f9d9, 0x3f08_97e4, 0x3e81_a33e, 0x3dc9_ce6e, 0x3d12_76ee,
];

const COEF1_BITS: [u32; NUM_SEGMENTS] = [
    0xb87b_a400, 0xb93c_ad7a, 0xba3c_7ad2, 0xbb3b_b120, 0xbc38_98fb, 0xbd2d_11ce,
    0xbe09_6076, 0xbe8c_c3e9, 0xbe8f_8c8a, 0xbe1e_5f46, 0xbd80_92f7, 0xbcbc_abe2,
];

const H_INV_BITS: [u32; NUM_SEGMENTS] = [
    0x3e80_0000, 0x3daa_aaab, 0x3caa_aaab, 0x3baa_aaab, 0x3aaa_aaab, 0x39aa_aaab,
    0x38aa_aaab, 0x37aa_aaab, 0x36aa_aaab, 0x35aa_aaab, 0x34aa_aaab, 0x33aa_aaab,
];

const X_SAMPLE_BITS: [u32; NUM_SEGMENTS] = [
    0x0000_0000, 0x4080_0000, 0x4180_0000, 0x4280_0000, 0x4380_0000, 0x4480_0000,
    0x4580_0000, 0x4680_0000, 0x4780_0000, 0x4880_0000, 0x4980_0000, 0x4a80_0000,
];

fn from_bits_table(bits: &[u32; NUM_SEGMENTS]) -> [f32; NUM_SEGMENTS] {
    bits.map(f32::from_bits)
}

/// 1 セグメント分の係数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub coef0: f32,
    pub coef1: f32,
    pub h_inv: f32,
    pub x_sample: f32,
    /// `h_inv · coef1`
    pub comb: f32,
}

/// 12 セグメントの係数テーブル（不変）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableSpec", into = "TableSpec")]
pub struct CoefficientTable {
    coef0: [f32; NUM_SEGMENTS],
    coef1: [f32; NUM_SEGMENTS],
    h_inv: [f32; NUM_SEGMENTS],
    x_sample: [f32; NUM_SEGMENTS],
    comb: [f32; NUM_SEGMENTS],
}

impl CoefficientTable {
    /// 同梱テーブル
    pub fn published() -> Self {
        Self::from_columns(
            from_bits_table(&COEF0_BITS),
            from_bits_table(&COEF1_BITS),
            from_bits_table(&H_INV_BITS),
            from_bits_table(&X_SAMPLE_BITS),
        )
    }

    /// 4 列から作成し、`comb` を前計算する
    pub fn from_columns(
        coef0: [f32; NUM_SEGMENTS],
        coef1: [f32; NUM_SEGMENTS],
        h_inv: [f32; NUM_SEGMENTS],
        x_sample: [f32; NUM_SEGMENTS],
    ) -> Self {
        let mut comb = [0.0f32; NUM_SEGMENTS];
        for (i, c) in comb.iter_mut().enumerate() {
            *c = h_inv[i] * coef1[i];
        }
        Self {
            coef0,
            coef1,
            h_inv,
            x_sample,
            comb,
        }
    }

    /// セグメント数
    #[inline]
    pub fn len(&self) -> usize {
        NUM_SEGMENTS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// セグメント `addr` の係数
    ///
    /// テーブル外の番号は `SegmentOutOfRange`。
    #[inline]
    pub fn segment(&self, addr: usize) -> LrnResult<Segment> {
        if addr >= NUM_SEGMENTS {
            return Err(LrnError::SegmentOutOfRange {
                index: addr,
                len: NUM_SEGMENTS,
            });
        }
        Ok(Segment {
            coef0: self.coef0[addr],
            coef1: self.coef1[addr],
            h_inv: self.h_inv[addr],
            x_sample: self.x_sample[addr],
            comb: self.comb[addr],
        })
    }
}

impl Default for CoefficientTable {
    fn default() -> Self {
        Self::published()
    }
}

// =============================================================================
// ファイル表現
// =============================================================================

/// テーブルファイル（JSON / TOML）の表現
///
/// `comb` は保存せず、読み込み時に再計算する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    #[serde(default)]
    pub version: Option<String>,
    pub coef0: Vec<f32>,
    pub coef1: Vec<f32>,
    pub h_inv: Vec<f32>,
    pub x_sample: Vec<f32>,
}

fn column(name: &'static str, values: Vec<f32>) -> LrnResult<[f32; NUM_SEGMENTS]> {
    let actual = values.len();
    let col: [f32; NUM_SEGMENTS] = values.try_into().map_err(|_| LrnError::TableLength {
        column: name,
        expected: NUM_SEGMENTS,
        actual,
    })?;
    if let Some(i) = col.iter().position(|v| !v.is_finite()) {
        return Err(LrnError::InvalidTable(format!("{name}[{i}] is not finite")));
    }
    Ok(col)
}

impl TryFrom<TableSpec> for CoefficientTable {
    type Error = LrnError;

    fn try_from(spec: TableSpec) -> LrnResult<Self> {
        Ok(Self::from_columns(
            column("coef0", spec.coef0)?,
            column("coef1", spec.coef1)?,
            column("h_inv", spec.h_inv)?,
            column("x_sample", spec.x_sample)?,
        ))
    }
}

impl From<CoefficientTable> for TableSpec {
    fn from(table: CoefficientTable) -> Self {
        Self {
            version: Some(TABLE_VERSION.to_string()),
            coef0: table.coef0.to_vec(),
            coef1: table.coef1.to_vec(),
            h_inv: table.h_inv.to_vec(),
            x_sample: table.x_sample.to_vec(),
        }
    }
}
