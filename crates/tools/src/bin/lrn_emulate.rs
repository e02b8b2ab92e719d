//! 既存の入力ファイルに LRN ハードウェア近似を適用する

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dv_lrn_core::fixture::{read_half_file, write_half_file};
use dv_lrn_core::lrn::DEFAULT_SF_LOG2;
use dv_lrn_core::{Tensor3, lrn_forward_par};
use env_logger::Env;
use half::f16;
use tools::config::build_config;
use tools::shape::{ShapeArg, parse_u16};

#[derive(Parser, Debug)]
#[command(name = "lrn_emulate")]
#[command(about = "binary16 入力ファイルに LRN 近似を適用する")]
struct Cli {
    /// 入力ファイル（CHW 順 binary16）
    #[arg(long)]
    input: PathBuf,

    /// 形状 WxHxC
    #[arg(long)]
    shape: ShapeArg,

    /// 出力ファイル
    #[arg(short, long)]
    output: PathBuf,

    /// 係数テーブル（.json / .toml、省略時は同梱テーブル）
    #[arg(long)]
    table: Option<PathBuf>,

    /// x² スケールファクタ log2
    #[arg(long, default_value_t = DEFAULT_SF_LOG2)]
    sf_log2: u32,

    /// LRN コマンドワード（例: 0x0503）。指定時は --sf-log2 より優先
    #[arg(long, value_parser = parse_u16)]
    register: Option<u16>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = build_config(cli.table.as_deref(), cli.sf_log2, cli.register)?;
    let shape = cli.shape.0.shape()?;

    let input = read_half_file(&cli.input, shape)
        .with_context(|| format!("Failed to read input: {}", cli.input.display()))?;
    let mut output = Tensor3::<f16>::zeros(shape)?;
    lrn_forward_par(&input, &mut output, &config)?;

    write_half_file(&cli.output, output.as_slice())
        .with_context(|| format!("Failed to write output: {}", cli.output.display()))?;
    log::info!(
        "{shape} (sf_log2={}) -> {}",
        config.sf_log2(),
        cli.output.display()
    );
    Ok(())
}
