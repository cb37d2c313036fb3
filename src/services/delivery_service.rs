use crate::entities::{
    delivery_entity as deliveries, order_entity as orders, order_item_entity as order_items,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::order_service::apply_order_transition;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct DeliveryService {
    pool: DatabaseConnection,
}

impl DeliveryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Orders a rider can claim right now. `ready` status implies no
    /// delivery exists yet, because winning a claim flips the order to
    /// `picked_up` in the same conditional update.
    pub async fn list_available(&self) -> AppResult<Vec<OrderResponse>> {
        let order_models = orders::Entity::find()
            .filter(orders::Column::Status.eq(OrderStatus::Ready.as_str()))
            .order_by_asc(orders::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        self.attach_items(order_models).await
    }

    /// Exclusive claim. The conditional `ready -> picked_up` update is the
    /// serialization point: of two concurrent riders exactly one sees
    /// rows_affected == 1, the other gets a conflict and refetches.
    pub async fn claim(&self, rider_id: Uuid, order_id: Uuid) -> AppResult<ActiveDeliveryResponse> {
        let existing = deliveries::Entity::find()
            .filter(deliveries::Column::RiderId.eq(rider_id))
            .filter(deliveries::Column::Status.ne(DeliveryStatus::Completed.as_str()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "Finish the current delivery before claiming another".to_string(),
            ));
        }

        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let from = order.status.parse::<OrderStatus>()?;
        validate_transition(from, OrderStatus::PickedUp, Role::Rider)?;

        let order = apply_order_transition(&self.pool, order_id, from, OrderStatus::PickedUp).await?;

        let delivery_result = deliveries::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            rider_id: Set(rider_id),
            status: Set(DeliveryStatus::Pickup.to_string()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        let delivery = match delivery_result {
            Ok(delivery) => delivery,
            Err(insert_err) => {
                log::error!("Delivery creation failed for order {order_id}: {insert_err}");
                // best-effort compensation: hand the order back to the pool
                let revert = orders::Entity::update_many()
                    .col_expr(
                        orders::Column::Status,
                        Expr::value(OrderStatus::Ready.as_str()),
                    )
                    .col_expr(orders::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
                    .filter(orders::Column::Id.eq(order_id))
                    .filter(orders::Column::Status.eq(OrderStatus::PickedUp.as_str()))
                    .exec(&self.pool)
                    .await;
                if let Err(revert_err) = revert {
                    log::error!(
                        "Compensating status revert failed for order {order_id}: {revert_err}"
                    );
                }
                return Err(AppError::DatabaseError(insert_err));
            }
        };

        let items = self.fetch_items(order.id).await?;
        Ok(ActiveDeliveryResponse {
            delivery: DeliveryResponse::try_from(delivery)?,
            order: OrderResponse::from_parts(order, items)?,
        })
    }

    /// The rider's delivery in flight, if any.
    pub async fn active_for_rider(
        &self,
        rider_id: Uuid,
    ) -> AppResult<Option<ActiveDeliveryResponse>> {
        let delivery = deliveries::Entity::find()
            .filter(deliveries::Column::RiderId.eq(rider_id))
            .filter(deliveries::Column::Status.ne(DeliveryStatus::Completed.as_str()))
            .one(&self.pool)
            .await?;

        let Some(delivery) = delivery else {
            return Ok(None);
        };

        let order = orders::Entity::find_by_id(delivery.order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let items = self.fetch_items(order.id).await?;

        Ok(Some(ActiveDeliveryResponse {
            delivery: DeliveryResponse::try_from(delivery)?,
            order: OrderResponse::from_parts(order, items)?,
        }))
    }

    /// Manual rider transition. Completing the delivery also completes the
    /// order through the shared transition function.
    pub async fn advance(
        &self,
        delivery_id: Uuid,
        rider_id: Uuid,
        to: DeliveryStatus,
    ) -> AppResult<DeliveryResponse> {
        let delivery = deliveries::Entity::find_by_id(delivery_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Delivery not found".to_string()))?;

        if delivery.rider_id != rider_id {
            return Err(AppError::PermissionDenied(
                "This delivery belongs to another rider".to_string(),
            ));
        }

        let from = delivery.status.parse::<DeliveryStatus>()?;
        validate_delivery_transition(from, to, Role::Rider)?;

        let result = deliveries::Entity::update_many()
            .col_expr(deliveries::Column::Status, Expr::value(to.as_str()))
            .col_expr(deliveries::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(deliveries::Column::Id.eq(delivery_id))
            .filter(deliveries::Column::Status.eq(from.as_str()))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "Delivery is no longer in status {from}"
            )));
        }

        if to == DeliveryStatus::Completed {
            let order = orders::Entity::find_by_id(delivery.order_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
            let order_from = order.status.parse::<OrderStatus>()?;
            validate_transition(order_from, OrderStatus::Completed, Role::Rider)?;
            apply_order_transition(
                &self.pool,
                delivery.order_id,
                order_from,
                OrderStatus::Completed,
            )
            .await?;
        }

        let updated = deliveries::Entity::find_by_id(delivery_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Delivery not found".to_string()))?;
        Ok(DeliveryResponse::try_from(updated)?)
    }

    /// Admin monitoring: all deliveries, read-only.
    pub async fn list_all(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<DeliveryResponse>> {
        let finder = deliveries::Entity::find();
        let total = finder.clone().count(&self.pool).await?;

        let models = finder
            .order_by_desc(deliveries::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(DeliveryResponse::try_from(model)?);
        }

        Ok(PaginatedResponse::new(items, params, total))
    }

    async fn attach_items(
        &self,
        order_models: Vec<orders::Model>,
    ) -> AppResult<Vec<OrderResponse>> {
        let order_ids: Vec<Uuid> = order_models.iter().map(|o| o.id).collect();
        let mut items_by_order: HashMap<Uuid, Vec<order_items::Model>> = HashMap::new();
        if !order_ids.is_empty() {
            let all_items = order_items::Entity::find()
                .filter(order_items::Column::OrderId.is_in(order_ids))
                .all(&self.pool)
                .await?;
            for item in all_items {
                items_by_order.entry(item.order_id).or_default().push(item);
            }
        }

        let mut responses = Vec::with_capacity(order_models.len());
        for order in order_models {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            responses.push(OrderResponse::from_parts(order, items)?);
        }
        Ok(responses)
    }

    async fn fetch_items(&self, order_id: Uuid) -> AppResult<Vec<order_items::Model>> {
        Ok(order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .all(&self.pool)
            .await?)
    }
}
