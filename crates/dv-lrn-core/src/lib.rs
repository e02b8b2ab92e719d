//! DV アクセラレータ LRN ユニットのエミュレーションとテスト fixture
//!
//! - `lrn`: ハードウェアと bit-exact な LRN カーネル（セグメント多項式近似）
//! - `reference`: 正確な LRN（比較用の基準値）
//! - `compare`: 出力と基準値の誤差レポート
//! - `fixture`: 入出力ファイル（`.i.bin` / `.o.bin`）と乱数入力の生成
//! - `tensor`: CHW レイアウトの 3 次元テンソル

pub mod compare;
pub mod element;
pub mod error;
pub mod fixture;
pub mod lrn;
pub mod reference;
pub mod tensor;

pub use compare::DiffReport;
pub use element::Element;
pub use error::{LrnError, LrnResult};
pub use lrn::{CoefficientTable, LrnConfig, LrnRegister, lrn_forward};
#[cfg(feature = "parallel")]
pub use lrn::lrn_forward_par;
pub use reference::{LrnParams, lrn_reference};
pub use tensor::{ChwShape, Tensor3};
