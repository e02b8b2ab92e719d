//! LRN ユニットの設定
//!
//! 係数テーブルと sf_log2 の組。一度作成したら変更しない。

use super::address::pow2;
use super::constants::{DEFAULT_SF_LOG2, SF_LOG2_MAX};
use super::table::CoefficientTable;
use crate::error::{LrnError, LrnResult};

/// LRN ユニット設定
#[derive(Debug, Clone, PartialEq)]
pub struct LrnConfig {
    pub(super) table: CoefficientTable,
    pub(super) sf_log2: u32,
}

impl LrnConfig {
    /// sf_log2 は 0..=15（コマンドワードの 4bit フィールド）
    pub fn new(table: CoefficientTable, sf_log2: u32) -> LrnResult<Self> {
        if sf_log2 > SF_LOG2_MAX {
            return Err(LrnError::ScaleFactorOutOfRange(sf_log2));
        }
        Ok(Self { table, sf_log2 })
    }

    #[inline]
    pub fn table(&self) -> &CoefficientTable {
        &self.table
    }

    #[inline]
    pub fn sf_log2(&self) -> u32 {
        self.sf_log2
    }

    /// ウィンドウ値の事前スケール `2^(-sf_log2)`
    #[inline]
    pub fn prescale(&self) -> f32 {
        pow2(-(self.sf_log2 as i32))
    }

    /// 二乗和を元スケールへ戻す係数 `2^(2·sf_log2)`
    #[inline]
    pub fn unscale(&self) -> f32 {
        pow2(2 * self.sf_log2 as i32)
    }
}

impl Default for LrnConfig {
    fn default() -> Self {
        Self {
            table: CoefficientTable::published(),
            sf_log2: DEFAULT_SF_LOG2,
        }
    }
}
