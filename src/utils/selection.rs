//! # 轨道选择解析
//!
//! 解析 `1,2,5-8` 形式的 1 起索引列表，结果升序去重。
//!
//! ## 依赖关系
//! - 被 `commands/common.rs` 使用

use crate::error::{CubeViewError, Result};

/// 允许的最大轨道索引，超出即视为格式错误
pub const MAX_MO_INDEX: usize = 1_000_000;

/// 解析轨道列表 (e.g., "1-5,8,10-12")
pub fn parse_mo_list(expr: &str) -> Result<Vec<usize>> {
    let mut items = Vec::new();

    for chunk in expr.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let invalid = || CubeViewError::InvalidRange(chunk.to_string());

        match chunk.split_once('-') {
            Some((a, b)) => {
                let a: usize = a.trim().parse().map_err(|_| invalid())?;
                let b: usize = b.trim().parse().map_err(|_| invalid())?;
                if a < 1 || b < a || b > MAX_MO_INDEX {
                    return Err(invalid());
                }
                items.extend(a..=b);
            }
            None => {
                let v: usize = chunk.parse().map_err(|_| invalid())?;
                if v < 1 || v > MAX_MO_INDEX {
                    return Err(invalid());
                }
                items.push(v);
            }
        }
    }

    if items.is_empty() {
        return Err(CubeViewError::InvalidRange(expr.to_string()));
    }

    items.sort_unstable();
    items.dedup();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_ranges() {
        assert_eq!(parse_mo_list("1,2,5-8").unwrap(), vec![1, 2, 5, 6, 7, 8]);
        assert_eq!(parse_mo_list(" 3 ").unwrap(), vec![3]);
        assert_eq!(parse_mo_list("4-4").unwrap(), vec![4]);
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        assert_eq!(parse_mo_list("5,1-3,2").unwrap(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_invalid() {
        for bad in ["", ",", "0", "3-1", "a", "1-", "-2", "1-2-3"] {
            assert!(
                matches!(parse_mo_list(bad), Err(CubeViewError::InvalidRange(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_oversized_indices_rejected() {
        for bad in ["1-18446744073709551615", "1-4000000000", "18446744073709551616"] {
            assert!(
                matches!(parse_mo_list(bad), Err(CubeViewError::InvalidRange(_))),
                "accepted {:?}",
                bad
            );
        }
        let top = format!("{}", MAX_MO_INDEX);
        assert_eq!(parse_mo_list(&top).unwrap(), vec![MAX_MO_INDEX]);
        let over = format!("{}-{}", MAX_MO_INDEX - 1, MAX_MO_INDEX + 1);
        assert!(parse_mo_list(&over).is_err());
    }
}
