//! Translate core post filters into SeaORM conditions.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select};

use daybook_core::query::{DateFilter, PostFilter, Scope, StoreOrder};

use super::entity::post::{Column, Entity as PostEntity};

/// Full WHERE clause for `filter`.
pub(crate) fn condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all().add(scope_condition(filter.scope()));

    if let Some(keyword) = filter.keyword() {
        let pattern = format!("%{}%", escape_like(keyword));
        cond = cond.add(
            Condition::any()
                .add(lower_like(Column::Description, &pattern))
                .add(lower_like(Column::Location, &pattern)),
        );
    }

    if let Some(date) = filter.date() {
        cond = cond.add(date_condition(date));
    }

    cond
}

pub(crate) fn scope_condition(scope: Scope) -> Condition {
    match scope {
        Scope::Owner(owner) => Condition::all().add(Column::UserId.eq(owner)),
        Scope::PublicApproved => Condition::all()
            .add(Column::IsPublic.eq(true))
            .add(Column::IsApproved.eq(true)),
        Scope::PublicPending => Condition::all()
            .add(Column::IsPublic.eq(true))
            .add(Column::IsApproved.eq(false)),
    }
}

fn date_condition(date: DateFilter) -> Condition {
    match date {
        DateFilter::DayMonth { day, month } => Condition::all()
            .add(Expr::cust_with_values(
                r#"EXTRACT(DAY FROM "posts"."created_on") = $1"#,
                [day as i32],
            ))
            .add(Expr::cust_with_values(
                r#"EXTRACT(MONTH FROM "posts"."created_on") = $1"#,
                [month as i32],
            )),
        DateFilter::YearRange { .. } => match date.year_bounds() {
            Some((first, last)) => Condition::all().add(Column::CreatedOn.between(first, last)),
            None => Condition::all(),
        },
    }
}

/// `LOWER(col) LIKE pattern ESCAPE '\'`; `pattern` must already be lower-cased.
fn lower_like(column: Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col((PostEntity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Keywords are literal text, so LIKE metacharacters are escaped.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Apply `order`. `Natural` has no meaning in SQL, so insertion order is
/// approximated by creation time; the id breaks ties for stable windows.
pub(crate) fn ordered(select: Select<PostEntity>, order: StoreOrder) -> Select<PostEntity> {
    match order {
        StoreOrder::CreatedDesc => select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id),
        StoreOrder::CreatedAsc | StoreOrder::Natural => select
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id),
    }
}

/// Base select for `filter`.
pub(crate) fn select(filter: &PostFilter) -> Select<PostEntity> {
    PostEntity::find().filter(condition(filter))
}
