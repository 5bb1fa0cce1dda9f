use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::{menu, order_items, orders};

/// `price` is kept as decimal text; SQLite has no exact numeric type.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = menu)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MenuRow {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub image: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub id: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Insertable)]
#[diesel(table_name = order_items)]
#[diesel(primary_key(order_id, position))]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItemRow {
    pub order_id: i64,
    pub position: i32,
    pub menu_item_id: i64,
    pub quantity: i32,
}
