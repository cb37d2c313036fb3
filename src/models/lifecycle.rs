use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Flat delivery fee in naira, applied to every order at checkout.
pub const DELIVERY_FEE: i64 = 500;
/// Flat service fee in naira, applied to every order at checkout.
pub const SERVICE_FEE: i64 = 100;

/// Closed set of account roles. A role is assigned when the profile is
/// created and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Chef,
    Rider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Chef => "chef",
            Role::Rider => "rider",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown value: {0}")]
pub struct ParseEnumError(String);

impl ParseEnumError {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "chef" => Ok(Role::Chef),
            "rider" => Ok(Role::Rider),
            "admin" => Ok(Role::Admin),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

/// Order lifecycle: `pending -> preparing -> ready -> picked_up -> completed`.
/// No transition is reversible and there is no cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    PickedUp,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Completed => "completed",
        }
    }

    /// Display partition only; nothing is persisted for it. An order leaves
    /// the active set once a rider has picked it up.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    pub fn active_statuses() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ]
    }

    pub fn past_statuses() -> &'static [OrderStatus] {
        &[OrderStatus::PickedUp, OrderStatus::Completed]
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

/// Delivery lifecycle: `pickup -> delivering -> completed`. Completing the
/// delivery is what drives the owning order `picked_up -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pickup,
    Delivering,
    Completed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pickup => "pickup",
            DeliveryStatus::Delivering => "delivering",
            DeliveryStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(DeliveryStatus::Pickup),
            "delivering" => Ok(DeliveryStatus::Delivering),
            "completed" => Ok(DeliveryStatus::Completed),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("order cannot move from {from} to {to}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },

    #[error("delivery cannot move from {from} to {to}")]
    InvalidDeliveryTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("role {role} may not move an order from {from} to {to}")]
    RoleNotPermitted {
        role: Role,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("role {role} may not advance a delivery")]
    DeliveryRoleNotPermitted { role: Role },
}

/// The complete order transition table: (from, to, permitted actor). Creation
/// (none -> pending) is handled by checkout, not by this table.
const ORDER_TRANSITIONS: &[(OrderStatus, OrderStatus, Role)] = &[
    (OrderStatus::Pending, OrderStatus::Preparing, Role::Chef),
    (OrderStatus::Preparing, OrderStatus::Ready, Role::Chef),
    (OrderStatus::Ready, OrderStatus::PickedUp, Role::Rider),
    (OrderStatus::PickedUp, OrderStatus::Completed, Role::Rider),
];

const DELIVERY_TRANSITIONS: &[(DeliveryStatus, DeliveryStatus)] = &[
    (DeliveryStatus::Pickup, DeliveryStatus::Delivering),
    (DeliveryStatus::Delivering, DeliveryStatus::Completed),
];

/// Validate one order status transition against the table. Every persisted
/// status mutation in the service layer goes through this check first.
pub fn validate_transition(
    from: OrderStatus,
    to: OrderStatus,
    actor: Role,
) -> Result<(), TransitionError> {
    let edge = ORDER_TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to);

    match edge {
        None => Err(TransitionError::InvalidOrderTransition { from, to }),
        Some((_, _, role)) if *role != actor => Err(TransitionError::RoleNotPermitted {
            role: actor,
            from,
            to,
        }),
        Some(_) => Ok(()),
    }
}

/// Validate one delivery status transition. Only riders drive deliveries.
pub fn validate_delivery_transition(
    from: DeliveryStatus,
    to: DeliveryStatus,
    actor: Role,
) -> Result<(), TransitionError> {
    if actor != Role::Rider {
        return Err(TransitionError::DeliveryRoleNotPermitted { role: actor });
    }

    let known = DELIVERY_TRANSITIONS
        .iter()
        .any(|(f, t)| *f == from && *t == to);
    if !known {
        return Err(TransitionError::InvalidDeliveryTransition { from, to });
    }

    Ok(())
}

/// Sum of `unit_price * quantity` over the cart lines, in naira.
pub fn order_subtotal<I>(lines: I) -> i64
where
    I: IntoIterator<Item = (i64, i64)>,
{
    lines.into_iter().map(|(price, qty)| price * qty).sum()
}

/// Checkout total: subtotal plus the two flat fees. Computed once at checkout
/// and persisted on the order row.
pub fn order_total(subtotal: i64) -> i64 {
    subtotal + DELIVERY_FEE + SERVICE_FEE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(
            validate_transition(OrderStatus::Pending, OrderStatus::Preparing, Role::Chef).is_ok()
        );
        assert!(validate_transition(OrderStatus::Preparing, OrderStatus::Ready, Role::Chef).is_ok());
        assert!(validate_transition(OrderStatus::Ready, OrderStatus::PickedUp, Role::Rider).is_ok());
        assert!(
            validate_transition(OrderStatus::PickedUp, OrderStatus::Completed, Role::Rider).is_ok()
        );
    }

    #[test]
    fn test_backwards_transition_rejected() {
        let err = validate_transition(OrderStatus::Ready, OrderStatus::Preparing, Role::Chef)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidOrderTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::Preparing,
            }
        );
    }

    #[test]
    fn test_skipping_transition_rejected() {
        let err = validate_transition(OrderStatus::Pending, OrderStatus::Completed, Role::Rider)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidOrderTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Completed,
            }
        );
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(
            validate_transition(OrderStatus::Pending, OrderStatus::Pending, Role::Chef).is_err()
        );
    }

    #[test]
    fn test_wrong_role_rejected() {
        // a rider cannot run the kitchen
        let err = validate_transition(OrderStatus::Pending, OrderStatus::Preparing, Role::Rider)
            .unwrap_err();
        assert!(matches!(err, TransitionError::RoleNotPermitted { .. }));

        // a chef cannot pick up their own order
        let err =
            validate_transition(OrderStatus::Ready, OrderStatus::PickedUp, Role::Chef).unwrap_err();
        assert!(matches!(err, TransitionError::RoleNotPermitted { .. }));

        // customers and admins observe, they never transition
        for (from, to, _) in ORDER_TRANSITIONS {
            assert!(validate_transition(*from, *to, Role::Customer).is_err());
            assert!(validate_transition(*from, *to, Role::Admin).is_err());
        }
    }

    #[test]
    fn test_active_past_partition() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Preparing.is_active());
        assert!(OrderStatus::Ready.is_active());
        assert!(!OrderStatus::PickedUp.is_active());
        assert!(!OrderStatus::Completed.is_active());
        assert_eq!(
            OrderStatus::active_statuses().len() + OrderStatus::past_statuses().len(),
            5
        );
    }

    #[test]
    fn test_delivery_transitions() {
        assert!(validate_delivery_transition(
            DeliveryStatus::Pickup,
            DeliveryStatus::Delivering,
            Role::Rider
        )
        .is_ok());
        assert!(validate_delivery_transition(
            DeliveryStatus::Delivering,
            DeliveryStatus::Completed,
            Role::Rider
        )
        .is_ok());

        // skip and backwards
        assert!(validate_delivery_transition(
            DeliveryStatus::Pickup,
            DeliveryStatus::Completed,
            Role::Rider
        )
        .is_err());
        assert!(validate_delivery_transition(
            DeliveryStatus::Delivering,
            DeliveryStatus::Pickup,
            Role::Rider
        )
        .is_err());

        // wrong role
        let err = validate_delivery_transition(
            DeliveryStatus::Pickup,
            DeliveryStatus::Delivering,
            Role::Chef,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransitionError::DeliveryRoleNotPermitted { role: Role::Chef }
        );
    }

    #[test]
    fn test_order_total() {
        // 2 x 1000 + 1 x 500 + 500 delivery + 100 service = 3100
        let subtotal = order_subtotal(vec![(1000, 2), (500, 1)]);
        assert_eq!(subtotal, 2500);
        assert_eq!(order_total(subtotal), 3100);
    }

    #[test]
    fn test_order_total_empty_cart() {
        let subtotal = order_subtotal(Vec::new());
        assert_eq!(subtotal, 0);
        assert_eq!(order_total(subtotal), DELIVERY_FEE + SERVICE_FEE);
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::PickedUp,
            OrderStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        for status in [
            DeliveryStatus::Pickup,
            DeliveryStatus::Delivering,
            DeliveryStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<DeliveryStatus>().unwrap(), status);
        }
        for role in [Role::Customer, Role::Chef, Role::Rider, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("Ready".parse::<OrderStatus>().is_err());
        assert!("".parse::<Role>().is_err());
    }
}
