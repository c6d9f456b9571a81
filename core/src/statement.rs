//! 语句构建：LIMIT 注入、表前缀替换、参数插值

use crate::driver::DbDriver;
use crate::error::{DatabaseError, Result};

/// 表前缀占位符
pub const TABLE_PREFIX_TOKEN: &str = "{TABLE_PREFIX}";

/// 为语句追加 LIMIT 子句
///
/// `count` 为 `None` 或 0 时原样返回。语句中已有的 ` LIMIT ...`（不区分大小写）
/// 会被截掉后再追加新的子句。
pub fn add_limit(driver: DbDriver, stmt: &str, count: Option<u64>, offset: u64) -> String {
    let count = match count {
        Some(count) if count > 0 => count,
        _ => return stmt.to_string(),
    };

    // 只改动 ASCII 字符，字节位置与原串一致
    let base = match stmt.to_ascii_uppercase().find(" LIMIT ") {
        Some(pos) => &stmt[..pos],
        None => stmt,
    };

    format!("{} {}", base, driver.limit_clause(count, offset))
}

/// 将已转义的字面量按位置代入语句
///
/// 支持 `%s`、`%d`（按顺序取下一个参数）、`%N$s`（取第 N 个参数，从 1 开始）以及 `%%`。
/// 没有参数时语句原样返回，语句中的 `%` 不做任何处理。
pub fn interpolate(stmt: &str, literals: &[String]) -> Result<String> {
    if literals.is_empty() {
        return Ok(stmt.to_string());
    }

    let mut out = String::with_capacity(stmt.len() + literals.iter().map(String::len).sum::<usize>());
    let mut next_arg = 0usize;
    let mut chars = stmt.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        let mut position = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if c.is_ascii_digit() {
                position.push(c);
                chars.next();
            } else {
                break;
            }
        }

        let invalid = |end: usize| DatabaseError::InvalidPlaceholder {
            stmt: stmt.to_string(),
            placeholder: stmt[start..end].to_string(),
        };

        if position.is_empty() {
            match chars.next() {
                Some((_, '%')) => out.push('%'),
                Some((_, 's' | 'd')) => {
                    let literal = literals.get(next_arg).ok_or_else(|| too_few(stmt, literals))?;
                    out.push_str(literal);
                    next_arg += 1;
                }
                Some((i, c)) => return Err(invalid(i + c.len_utf8())),
                None => return Err(invalid(stmt.len())),
            }
            continue;
        }

        // %N$s
        match (chars.next(), chars.next()) {
            (Some((_, '$')), Some((_, 's' | 'd'))) => {
                let index: usize = position.parse().unwrap_or(0);
                if index == 0 {
                    return Err(invalid(start + 1 + position.len() + 2));
                }
                let literal = literals.get(index - 1).ok_or_else(|| too_few(stmt, literals))?;
                out.push_str(literal);
            }
            (_, Some((i, c))) => return Err(invalid(i + c.len_utf8())),
            _ => return Err(invalid(stmt.len())),
        }
    }

    Ok(out)
}

fn too_few(stmt: &str, literals: &[String]) -> DatabaseError {
    DatabaseError::TooFewArguments {
        stmt: stmt.to_string(),
        given: literals.len(),
    }
}

/// 替换表前缀占位符
pub fn apply_prefix(stmt: &str, prefix: &str) -> String {
    stmt.replace(TABLE_PREFIX_TOKEN, prefix)
}
