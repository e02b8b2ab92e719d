//! fixture 生成・比較ツールの共通部品

pub mod config;
pub mod shape;
