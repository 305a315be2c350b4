//! # parbench - VASP 并行设置测试工具
//!
//! 为同一结构在不同节点数、KPAR、NCORE 组合下提交测试计算，
//! 并分析每个电子步的耗时，找出最优并行设置。
//!
//! ## 子命令
//! - `bands`    - 由结构估算 NBANDS
//! - `submit`   - 提交并行测试工作流
//! - `clusters` - 列出已配置的集群
//! - `analyze`  - 计时数据分析
//!   - `summary`, `timestep`, `chessboard`, `tetris`, `optimal`, `npar`
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── workflow/  (工作流构造与作业队列)
//!   │     ├── analysis/  (计时数据透视与统计)
//!   │     ├── plot/      (图表渲染)
//!   │     ├── params/    (NBANDS / k 点 / 节点列表)
//!   │     ├── parsers/   (结构解析器)
//!   │     └── models/    (数据模型)
//!   ├── config/     (集群配置)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod params;
mod parsers;
mod plot;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command, cli.config.as_deref()) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
