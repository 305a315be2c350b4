//! # bands 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/bands.rs`

use clap::Args;
use std::path::PathBuf;

/// bands 子命令参数
#[derive(Args, Debug)]
pub struct BandsArgs {
    /// Structure file (POSCAR, .vasp, .cell or .json)
    pub structure: PathBuf,

    /// Cluster whose cores per node the band count is rounded to
    #[arg(long, default_value = "leibniz")]
    pub cluster: String,

    /// Spin polarization (1 = non-polarized, 2 = polarized)
    #[arg(long, default_value_t = 1)]
    pub ispin: u8,

    /// Total number of valence electrons (default: from the valence table)
    #[arg(long)]
    pub nelect: Option<f64>,
}
