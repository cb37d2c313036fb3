use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Never deleted; the status column only moves forward through the lifecycle
/// validated by `models::lifecycle`. Money columns are integer naira captured
/// at checkout.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub status: String,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub service_fee: i64,
    pub total: i64,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
