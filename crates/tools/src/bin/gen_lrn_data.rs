//! LRN テスト fixture 生成ツール
//!
//! 形状ごとに乱数入力を作り、期待出力を計算して
//! `{out_dir}/{w}x{h}/{c}.i.bin` / `.o.bin` に書き出す。
//!
//! 期待出力は既定でハードウェア近似の結果。`--exact` を付けると厳密な LRN
//! （f64 で計算し binary16 に丸めた値）を書く。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use dv_lrn_core::fixture::{DEFAULT_SEED, FixtureSpec, ValuePool, generate_input, write_half_file};
use dv_lrn_core::{LrnConfig, LrnParams, Tensor3, lrn_forward_par, lrn_reference};
use env_logger::Env;
use half::f16;
use tools::shape::ShapeArg;

#[derive(Parser, Debug)]
#[command(name = "gen_lrn_data")]
#[command(
    about = "LRN の入力と期待出力の fixture を生成する（期待出力は既定でハードウェア近似、--exact で厳密な LRN）"
)]
struct Cli {
    /// 入力値を U(-1, 1) のプールから引く（既定は {-2..2}）
    #[arg(long, default_value_t = false)]
    float: bool,

    /// 乱数シード
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// 出力ディレクトリ
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// 形状 WxHxC（複数指定可、省略時は標準セット）
    #[arg(long = "shape")]
    shapes: Vec<ShapeArg>,

    /// 期待出力をハードウェア近似ではなく厳密な LRN で計算する
    #[arg(long, default_value_t = false)]
    exact: bool,

    /// スレッド数（0 = 自動）
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn generate(spec: FixtureSpec, cli: &Cli, config: &LrnConfig) -> Result<()> {
    let shape = spec.shape()?;
    let pool = if cli.float { ValuePool::Uniform } else { ValuePool::Discrete };
    let input = generate_input(shape, pool, cli.seed)?;

    let output: Tensor3<f16> = if cli.exact {
        let mut exact = Tensor3::<f32>::zeros(shape)?;
        lrn_reference(&input, &mut exact, &LrnParams::default())?;
        exact.map_elements()
    } else {
        let mut emulated = Tensor3::<f16>::zeros(shape)?;
        lrn_forward_par(&input, &mut emulated, config)
            .with_context(|| format!("LRN emulation failed for shape {shape}"))?;
        emulated
    };

    let input_path = spec.input_path(&cli.out_dir);
    let output_path = spec.output_path(&cli.out_dir);
    write_half_file(&input_path, input.as_slice())
        .with_context(|| format!("Failed to write {}", input_path.display()))?;
    write_half_file(&output_path, output.as_slice())
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    log::info!("{} / {}", input_path.display(), output_path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .unwrap_or_else(|e| {
                log::warn!("Failed to set thread count: {e}");
            });
    }

    let specs: Vec<FixtureSpec> = if cli.shapes.is_empty() {
        FixtureSpec::canonical()
    } else {
        cli.shapes.iter().map(|s| s.0).collect()
    };

    let config = LrnConfig::default();
    log::info!(
        "Generating {} fixture(s): pool={}, seed={}, expected={}",
        specs.len(),
        if cli.float { "uniform" } else { "discrete" },
        cli.seed,
        if cli.exact { "exact" } else { "emulated" },
    );

    let start = Instant::now();
    for spec in specs {
        generate(spec, &cli, &config)?;
    }
    log::info!("Done in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
