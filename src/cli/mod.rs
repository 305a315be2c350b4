//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `bands`: 由结构估算 NBANDS
//! - `submit`: 为一组节点数提交并行测试工作流
//! - `clusters`: 列出已配置的集群
//! - `analyze`: 计时数据分析（嵌套子命令）
//!   - `summary`, `timestep`, `chessboard`, `tetris`, `optimal`, `npar`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: analyze, bands, submit

pub mod analyze;
pub mod bands;
pub mod submit;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// parbench - VASP 并行设置测试工具
#[derive(Parser)]
#[command(name = "parbench")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Set up VASP parallelization benchmarks and analyze their timings", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Cluster configuration file (JSON)
    #[arg(long, global = true, env = "PARBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Estimate the number of bands for a structure
    Bands(bands::BandsArgs),

    /// Submit parallelization workflows for a list of node counts
    Submit(submit::SubmitArgs),

    /// List the configured clusters
    Clusters,

    /// Analyze timing results of parallelization runs
    Analyze(analyze::AnalyzeArgs),
}
