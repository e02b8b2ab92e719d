//! 係数テーブルファイルの読み込みと LRN 設定の組み立て
//!
//! テーブルは拡張子で形式を判別する（`.json` / `.toml`）。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dv_lrn_core::{CoefficientTable, LrnConfig, LrnRegister};

/// テーブルファイルを読み込む
pub fn load_table(path: &Path) -> Result<CoefficientTable> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read table file: {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let table: CoefficientTable = match ext {
        "json" => serde_json::from_str(&text)
            .with_context(|| format!("Invalid table JSON: {}", path.display()))?,
        "toml" => toml::from_str(&text)
            .with_context(|| format!("Invalid table TOML: {}", path.display()))?,
        other => bail!("Unsupported table format {other:?}: {}", path.display()),
    };
    log::info!("Loaded coefficient table from {}", path.display());
    Ok(table)
}

/// コマンドライン引数から設定を作る
///
/// `register` があればそのスケール指数を使い、`sf_log2` は無視する。
pub fn build_config(
    table: Option<&Path>,
    sf_log2: u32,
    register: Option<u16>,
) -> Result<LrnConfig> {
    let table = match table {
        Some(path) => load_table(path)?,
        None => CoefficientTable::published(),
    };
    match register {
        Some(bits) => Ok(LrnConfig::from_register_with_table(
            LrnRegister::from_bits(bits),
            table,
        )),
        None => LrnConfig::new(table, sf_log2).context("Invalid LRN configuration"),
    }
}
