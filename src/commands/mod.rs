//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config/`, `workflow/`, `analysis/`, `plot/`, `utils/`
//! - 子模块: analyze, bands, clusters, submit

pub mod analyze;
pub mod bands;
pub mod clusters;
pub mod submit;

use crate::cli::Commands;
use crate::config::Config;
use crate::error::Result;

use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Commands::Bands(args) => bands::execute(args, &Config::load(config_path)?),
        Commands::Submit(args) => submit::execute(args, &Config::load(config_path)?),
        Commands::Clusters => clusters::execute(&Config::load(config_path)?),
        Commands::Analyze(args) => analyze::execute(args),
    }
}
