//! LRN 出力と期待出力の比較
//!
//! 誤差レポートを標準出力に表示し、失敗要素があれば終了コード 1 で終わる。

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dv_lrn_core::compare::DEFAULT_THRESHOLD;
use dv_lrn_core::fixture::{read_half_file, read_half_values};
use dv_lrn_core::{DiffReport, Tensor3};
use env_logger::Env;
use tools::shape::ShapeArg;

/// 出力ファイルの要素順
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// CHW 順
    Chw,
    /// デバイス順（8 チャンネル単位）
    Dv,
}

#[derive(Parser, Debug)]
#[command(name = "lrn_compare")]
#[command(about = "LRN 出力を期待出力と比較する")]
struct Cli {
    /// 比較対象の出力ファイル
    #[arg(long)]
    output: PathBuf,

    /// 期待出力ファイル（CHW 順）
    #[arg(long)]
    golden: PathBuf,

    /// 形状 WxHxC
    #[arg(long)]
    shape: ShapeArg,

    /// 出力ファイルの要素順
    #[arg(long, value_enum, default_value_t = Layout::Chw)]
    layout: Layout,

    /// 許容誤差
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,
}

fn run(cli: &Cli) -> Result<bool> {
    let shape = cli.shape.0.shape()?;
    let golden = read_half_file(&cli.golden, shape)
        .with_context(|| format!("Failed to read golden: {}", cli.golden.display()))?;
    let output = match cli.layout {
        Layout::Chw => read_half_file(&cli.output, shape)?,
        Layout::Dv => {
            let raw = read_half_values(&cli.output)?;
            Tensor3::from_dv_layout(shape, &raw)?
        }
    };

    let report = DiffReport::compute(&output, &golden, cli.threshold)?;
    println!("{shape}");
    println!("{report}");
    Ok(report.passed())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
