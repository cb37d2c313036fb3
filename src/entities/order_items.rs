use sea_orm::entity::prelude::*;

/// Immutable once the order is placed. Dish name and unit price are
/// checkout-time snapshots so later menu edits don't rewrite history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub dish_id: Uuid,
    pub dish_name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
