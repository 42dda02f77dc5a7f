//! Placeholder normalization between SQL dialects.
//!
//! Statements are written with PostgreSQL's numbered placeholders (`$1`,
//! `$2`, ...). SQLite binds positionally with `?`, so statements headed for
//! it are rewritten first. Arguments bind in the order they are given, so
//! placeholders must appear in ascending order in the source statement.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Rewrite every `$<digits>` placeholder to `?`, leaving all other text as is.
///
/// Returns the input unchanged (borrowed) when there is nothing to rewrite.
pub fn postgres_to_sqlite(sql: &str) -> Cow<'_, str> {
    static PG_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

    let regex = PG_PLACEHOLDER
        .get_or_init(|| Regex::new(r"\$\d+").expect("failed to compile placeholder regex"));

    regex.replace_all(sql, "?")
}
