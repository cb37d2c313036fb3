use crate::entities::{
    dish_entity as dishes, order_entity as orders, order_item_entity as order_items,
    restaurant_entity as restaurants,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionError, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// The one place that mutates a persisted order status. Validation against
/// the transition table happens before the write; the write itself is
/// conditional on the expected current status, so a fetch-then-update race
/// surfaces as a conflict instead of silently overwriting a concurrent
/// transition.
pub async fn apply_order_transition(
    db: &DatabaseConnection,
    order_id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
) -> AppResult<orders::Model> {
    let result = orders::Entity::update_many()
        .col_expr(orders::Column::Status, Expr::value(to.as_str()))
        .col_expr(orders::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(orders::Column::Id.eq(order_id))
        .filter(orders::Column::Status.eq(from.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::Conflict(format!(
            "Order is no longer in status {from}"
        )));
    }

    orders::Entity::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Customer checkout: creates the order row plus its items atomically,
    /// with the total computed once and persisted. Replaying the same
    /// idempotency key returns the original order.
    pub async fn checkout(
        &self,
        customer_id: Uuid,
        request: CheckoutRequest,
    ) -> AppResult<OrderResponse> {
        if request.items.is_empty() {
            return Err(AppError::ValidationError("Cart is empty".to_string()));
        }
        if request.items.iter().any(|item| item.quantity < 1) {
            return Err(AppError::ValidationError(
                "Quantities must be at least 1".to_string(),
            ));
        }

        if let Some(key) = request.idempotency_key.as_deref() {
            let existing = orders::Entity::find()
                .filter(orders::Column::IdempotencyKey.eq(key))
                .one(&self.pool)
                .await?;
            if let Some(order) = existing {
                if order.customer_id != customer_id {
                    return Err(AppError::Conflict(
                        "Idempotency key already used by another customer".to_string(),
                    ));
                }
                return self.fetch_order_response(order).await;
            }
        }

        let restaurant = restaurants::Entity::find_by_id(request.restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;
        if !restaurant.accepting_orders {
            return Err(AppError::Conflict(
                "Restaurant is not accepting orders right now".to_string(),
            ));
        }

        let dish_ids: Vec<Uuid> = request.items.iter().map(|item| item.dish_id).collect();
        let dish_models = dishes::Entity::find()
            .filter(dishes::Column::Id.is_in(dish_ids))
            .all(&self.pool)
            .await?;
        let dish_by_id: HashMap<Uuid, dishes::Model> =
            dish_models.into_iter().map(|d| (d.id, d)).collect();

        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let dish = dish_by_id
                .get(&item.dish_id)
                .ok_or_else(|| AppError::NotFound(format!("Dish {} not found", item.dish_id)))?;
            if dish.restaurant_id != restaurant.id {
                return Err(AppError::ValidationError(
                    "All dishes must belong to the ordered restaurant".to_string(),
                ));
            }
            if !dish.is_available {
                return Err(AppError::Conflict(format!(
                    "Dish {} is currently unavailable",
                    dish.name
                )));
            }
            lines.push((dish.clone(), item.quantity));
        }

        let subtotal = order_subtotal(lines.iter().map(|(dish, qty)| (dish.price, *qty)));
        let total = order_total(subtotal);

        let order_id = Uuid::new_v4();
        let restaurant_id = restaurant.id;
        let idempotency_key = request.idempotency_key.clone();

        let order = self
            .pool
            .transaction::<_, orders::Model, AppError>(move |txn| {
                Box::pin(async move {
                    let order = orders::ActiveModel {
                        id: Set(order_id),
                        customer_id: Set(customer_id),
                        restaurant_id: Set(restaurant_id),
                        status: Set(OrderStatus::Pending.to_string()),
                        subtotal: Set(subtotal),
                        delivery_fee: Set(DELIVERY_FEE),
                        service_fee: Set(SERVICE_FEE),
                        total: Set(total),
                        idempotency_key: Set(idempotency_key),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let item_models: Vec<order_items::ActiveModel> = lines
                        .iter()
                        .map(|(dish, qty)| order_items::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            order_id: Set(order_id),
                            dish_id: Set(dish.id),
                            dish_name: Set(dish.name.clone()),
                            unit_price: Set(dish.price),
                            quantity: Set(*qty as i32),
                        })
                        .collect();

                    order_items::Entity::insert_many(item_models)
                        .exec(txn)
                        .await?;

                    Ok(order)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => AppError::DatabaseError(db_err),
                TransactionError::Transaction(app_err) => app_err,
            })?;

        self.fetch_order_response(order).await
    }

    pub async fn list_customer_orders(
        &self,
        customer_id: Uuid,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let finder = orders::Entity::find().filter(orders::Column::CustomerId.eq(customer_id));
        self.list_orders(finder, query).await
    }

    /// Chef dashboard listing; everything is scoped by the signed-in chef's
    /// restaurant at the data layer, not just in the UI.
    pub async fn list_restaurant_orders(
        &self,
        chef_id: Uuid,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let restaurant = self.find_restaurant_for_chef(chef_id).await?;
        let finder =
            orders::Entity::find().filter(orders::Column::RestaurantId.eq(restaurant.id));
        self.list_orders(finder, query).await
    }

    /// Admin monitoring: all orders, read-only.
    pub async fn list_all_orders(
        &self,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        self.list_orders(orders::Entity::find(), query).await
    }

    /// Chef-facing transition endpoint (`pending -> preparing -> ready`).
    /// Riders drive their transitions through the delivery service, which
    /// funnels into the same `apply_order_transition`.
    pub async fn transition_status(
        &self,
        order_id: Uuid,
        to: OrderStatus,
        actor: AuthenticatedUser,
    ) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if actor.role == Role::Chef {
            let restaurant = self.find_restaurant_for_chef(actor.id).await?;
            if order.restaurant_id != restaurant.id {
                return Err(AppError::PermissionDenied(
                    "This order belongs to another restaurant".to_string(),
                ));
            }
        }

        let from = order.status.parse::<OrderStatus>()?;
        validate_transition(from, to, actor.role)?;

        let updated = apply_order_transition(&self.pool, order_id, from, to).await?;
        self.fetch_order_response(updated).await
    }

    async fn list_orders(
        &self,
        mut finder: sea_orm::Select<orders::Entity>,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        match query.scope {
            Some(OrderScope::Active) => {
                let statuses: Vec<&str> = OrderStatus::active_statuses()
                    .iter()
                    .map(|s| s.as_str())
                    .collect();
                finder = finder.filter(orders::Column::Status.is_in(statuses));
            }
            Some(OrderScope::Past) => {
                let statuses: Vec<&str> = OrderStatus::past_statuses()
                    .iter()
                    .map(|s| s.as_str())
                    .collect();
                finder = finder.filter(orders::Column::Status.is_in(statuses));
            }
            None => {}
        }

        let params = query.pagination();
        let total = finder.clone().count(&self.pool).await?;

        let order_models = finder
            .order_by_desc(orders::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.pool)
            .await?;

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

        Ok(PaginatedResponse::new(responses, &params, total))
    }

    pub(crate) async fn fetch_order_response(
        &self,
        order: orders::Model,
    ) -> AppResult<OrderResponse> {
        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .all(&self.pool)
            .await?;
        Ok(OrderResponse::from_parts(order, items)?)
    }

    async fn find_restaurant_for_chef(&self, chef_id: Uuid) -> AppResult<restaurants::Model> {
        restaurants::Entity::find()
            .filter(restaurants::Column::OwnerId.eq(chef_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("This chef has no restaurant yet".to_string()))
    }
}
