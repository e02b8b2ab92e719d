//! LRN コマンドワード
//!
//! 畳み込みランの `lrn` フィールド（16bit）。
//!
//! ```text
//! bit  0    : LRN 有効
//! bit  1    : べき乗関数を含む
//! bits 8..11: x² スケールファクタ log2（sf_log2）
//! ```

use super::config::LrnConfig;
use super::constants::SF_LOG2_MAX;
use super::table::CoefficientTable;
use crate::error::{LrnError, LrnResult};

const ENABLE_BIT: u16 = 1 << 0;
const POWER_BIT: u16 = 1 << 1;
const SF_SHIFT: u16 = 8;
const SF_MASK: u16 = 0xf;

/// `lrn` フィールドのデコード結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LrnRegister {
    pub enable: bool,
    pub power: bool,
    sf_log2: u32,
}

impl LrnRegister {
    /// LRN 有効・べき乗関数込みのワード
    pub fn new(sf_log2: u32) -> LrnResult<Self> {
        if sf_log2 > SF_LOG2_MAX {
            return Err(LrnError::ScaleFactorOutOfRange(sf_log2));
        }
        Ok(Self {
            enable: true,
            power: true,
            sf_log2,
        })
    }

    /// デコード（予約ビットは無視）
    pub fn from_bits(bits: u16) -> Self {
        Self {
            enable: bits & ENABLE_BIT != 0,
            power: bits & POWER_BIT != 0,
            sf_log2: ((bits >> SF_SHIFT) & SF_MASK) as u32,
        }
    }

    pub fn to_bits(self) -> u16 {
        let mut bits = (self.sf_log2 as u16 & SF_MASK) << SF_SHIFT;
        if self.enable {
            bits |= ENABLE_BIT;
        }
        if self.power {
            bits |= POWER_BIT;
        }
        bits
    }

    #[inline]
    pub fn sf_log2(&self) -> u32 {
        self.sf_log2
    }

    /// 有効ビットかべき乗ビットが落ちていれば、その内容
    ///
    /// このエミュレータはどちらの場合も通常の LRN を計算する。
    pub fn inactive_reason(&self) -> Option<&'static str> {
        if !self.enable {
            Some("enable bit is clear")
        } else if !self.power {
            Some("power function bit is clear")
        } else {
            None
        }
    }
}

impl LrnConfig {
    /// コマンドワードの sf_log2 と同梱テーブルから設定を作る
    pub fn from_register(reg: LrnRegister) -> Self {
        Self::from_register_with_table(reg, CoefficientTable::published())
    }

    /// コマンドワードの sf_log2 と任意のテーブルから設定を作る
    pub fn from_register_with_table(reg: LrnRegister, table: CoefficientTable) -> Self {
        if let Some(reason) = reg.inactive_reason() {
            log::warn!("LRN register {:#06x}: {reason}", reg.to_bits());
        }
        // 4bit フィールド由来なので検証不要
        Self {
            table,
            sf_log2: reg.sf_log2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lrn::table::TableSpec;

    #[test]
    fn test_default_word() {
        let reg = LrnRegister::new(5).unwrap();
        assert_eq!(reg.to_bits(), 0x0503);
        assert_eq!(LrnRegister::from_bits(0x0503), reg);
    }

    #[test]
    fn test_disabled_word() {
        let reg = LrnRegister::from_bits(0x0000);
        assert!(!reg.enable);
        assert!(!reg.power);
        assert_eq!(reg.sf_log2(), 0);
    }

    #[test]
    fn test_reserved_bits_ignored() {
        let reg = LrnRegister::from_bits(0xf0fd);
        assert!(reg.enable);
        assert!(!reg.power);
        assert_eq!(reg.sf_log2(), 0);
        assert_eq!(reg.to_bits(), 0x0001);
    }

    #[test]
    fn test_sf_log2_field_width() {
        assert_eq!(LrnRegister::from_bits(0x0f01).sf_log2(), 15);
        assert!(LrnRegister::new(16).is_err());
    }

    #[test]
    fn test_inactive_reason() {
        assert_eq!(LrnRegister::from_bits(0x0503).inactive_reason(), None);
        assert_eq!(
            LrnRegister::from_bits(0x0502).inactive_reason(),
            Some("enable bit is clear")
        );
        assert_eq!(
            LrnRegister::from_bits(0x0501).inactive_reason(),
            Some("power function bit is clear")
        );
    }

    #[test]
    fn test_config_from_register_with_table() {
        let mut spec = TableSpec::from(CoefficientTable::published());
        spec.coef0[0] = 0.5;
        let table = CoefficientTable::try_from(spec).unwrap();

        // べき乗ビットが落ちていても sf_log2 とテーブルはそのまま使う
        let reg = LrnRegister::from_bits(0x0701);
        let cfg = LrnConfig::from_register_with_table(reg, table.clone());
        assert_eq!(cfg.sf_log2(), 7);
        assert_eq!(cfg.table(), &table);
    }

    #[test]
    fn test_config_from_register() {
        let cfg = LrnConfig::from_register(LrnRegister::from_bits(0x0303));
        assert_eq!(cfg.sf_log2(), 3);
        assert_eq!(cfg.table(), &CoefficientTable::published());
    }
}
