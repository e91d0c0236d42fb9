pub mod category;
pub mod film;

use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};

/// `CAST(<table>.<column> AS SIGNED)`.
///
/// Catalog ids, lengths and years are unsigned or `YEAR` typed on MySQL; casting
/// them lets every backend decode the value as a plain `i64`.
pub(crate) fn signed<C: ColumnTrait>(column: C) -> SimpleExpr {
    signed_expr(Expr::col((column.entity_name(), column)).into())
}

pub(crate) fn signed_expr(expr: SimpleExpr) -> SimpleExpr {
    Func::cast_as(expr, Alias::new("SIGNED")).into()
}

pub(crate) fn narrow(value: i64) -> anyhow::Result<i32> {
    i32::try_from(value).map_err(|_| anyhow::anyhow!("Catalog value out of range: {value}"))
}
