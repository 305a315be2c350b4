//! # 统一错误处理模块
//!
//! 定义 parbench 的所有错误类型，使用 `thiserror` 派生。
//! 所有错误都会冒泡到 `main.rs`，以 `[ERR]` 形式报告给用户，不会 panic。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// parbench 统一错误类型
#[derive(Error, Debug)]
pub enum ParbenchError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 计时数据错误
    // ─────────────────────────────────────────────────────────────
    #[error("Please select an existing file: {path}")]
    TimingFileNotFound { path: String },

    #[error("timing_list is not a List. Please check your input file: {path}")]
    TimingNotAList { path: String },

    #[error("Chosen combination of Nodes/KPAR/NCORE results in empty plot for {nodes} nodes.")]
    EmptySelection { nodes: u32 },

    #[error("No timing records found for {nodes} nodes")]
    NoRecordsForNodes { nodes: u32 },

    // ─────────────────────────────────────────────────────────────
    // 结构输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Please select a geometry input file.")]
    NoGeometry,

    #[error("Issue with geometry input file: {filename}")]
    GeometryDecode { filename: String },

    #[error("Incorrect format for input file: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Incorrect node list input: '{0}'")]
    InvalidNodeList(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown cluster '{name}' (available: {available})")]
    UnknownCluster { name: String, available: String },

    #[error("No valence electron count known for element '{0}'; add it to the config overrides")]
    UnknownElement(String),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 序列化 / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Plotting failed: {0}")]
    PlotError(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ParbenchError>;
