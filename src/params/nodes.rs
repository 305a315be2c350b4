//! # 节点列表与范围解析
//!
//! - 节点列表："1, 2, 4" 形式的逗号分隔正整数
//! - KPAR 范围："1-8,12" 形式的范围表达式
//!
//! ## 依赖关系
//! - 被 `workflow/` 和 `commands/` 使用
//! - 无外部模块依赖

use crate::error::{ParbenchError, Result};

/// 解析节点列表
///
/// 先去掉首尾的逗号和空格，再按逗号切分，每一项去空白后按正整数解析。
/// 任一项失败（包括空输入）都返回 `None`。
pub fn parse_nodes_list(input: &str) -> Option<Vec<u32>> {
    input
        .trim_matches(|c| c == ',' || c == ' ')
        .split(',')
        .map(|item| match item.trim().parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => None,
        })
        .collect()
}

/// 单个范围片段最多展开的取值个数
pub const MAX_RANGE_SPAN: u32 = 10_000;

/// 解析范围表达式 (e.g., "1-8,12")，结果升序去重
///
/// 每个 `a-b` 片段最多包含 [`MAX_RANGE_SPAN`] 个取值。
pub fn parse_range(expr: &str) -> Result<Vec<u32>> {
    let mut items = Vec::new();

    for chunk in expr.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        let invalid = || ParbenchError::InvalidRange(chunk.to_string());

        match chunk.split_once('-') {
            Some((a, b)) => {
                let a: u32 = a.trim().parse().map_err(|_| invalid())?;
                let b: u32 = b.trim().parse().map_err(|_| invalid())?;
                if a < 1 || b < a || b - a >= MAX_RANGE_SPAN {
                    return Err(invalid());
                }
                items.extend(a..=b);
            }
            None => {
                let v: u32 = chunk.parse().map_err(|_| invalid())?;
                if v < 1 {
                    return Err(invalid());
                }
                items.push(v);
            }
        }
    }

    if items.is_empty() {
        return Err(ParbenchError::InvalidRange(expr.to_string()));
    }

    items.sort_unstable();
    items.dedup();
    Ok(items)
}
