//! Case-insensitive substring matching that behaves the same on SQLite and
//! Postgres.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// `%q%` lowercased, with `%`, `_` and `\` escaped by `\`.
fn like_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `LOWER(col) LIKE '%q%'`; wildcards typed by the user match literally.
pub fn contains_ci(col: impl IntoColumnRef, q: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(like_pattern(q)).escape('\\'))
}
