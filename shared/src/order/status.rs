//! Order status state machine
//!
//! Orders move forward along `Ordered → Preparing → Delivering → Delivered`.
//! `Cancelled` is reachable from `Ordered` only. `Delivered`, `Cancelled`
//! and `Returned` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Order status as exchanged with the order API
///
/// Serialized by name (`"Ordered"`, `"Preparing"`, ...). The status update
/// endpoint takes the integer encoding from [`OrderStatus::code`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Ordered,
    Preparing,
    Delivering,
    Delivered,
    Returned,
    Cancelled,
}

/// Why a transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    /// Current status is terminal
    Terminal,
    /// Cancellation requested after the order left `Ordered`
    CancelNotAllowed,
    /// Target is not strictly ahead in the forward hierarchy
    NotForward,
}

/// A refused status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot change order status from {from} to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub reason: TransitionRejection,
}

impl TransitionError {
    /// Error code matching the rejection reason
    pub fn code(&self) -> ErrorCode {
        match self.reason {
            TransitionRejection::Terminal => ErrorCode::OrderStatusTerminal,
            TransitionRejection::CancelNotAllowed => ErrorCode::CancelNotAllowed,
            TransitionRejection::NotForward => ErrorCode::InvalidStatusTransition,
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::with_message(err.code(), err.to_string())
            .with_detail("from", err.from.as_str())
            .with_detail("to", err.to.as_str())
    }
}

impl OrderStatus {
    /// All statuses in integer-encoding order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Ordered,
        OrderStatus::Preparing,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Returned,
        OrderStatus::Cancelled,
    ];

    /// Forward hierarchy
    pub const HIERARCHY: [OrderStatus; 4] = [
        OrderStatus::Ordered,
        OrderStatus::Preparing,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
    ];

    /// Integer encoding used by `PUT /Order/update-status/{id}?newStatus=`
    pub const fn code(self) -> u8 {
        match self {
            OrderStatus::Ordered => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::Delivering => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Returned => 4,
            OrderStatus::Cancelled => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Delivering => "Delivering",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Returned => "Returned",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Arabic display label
    pub const fn label_ar(self) -> &'static str {
        match self {
            OrderStatus::Ordered => "تم الطلب",
            OrderStatus::Preparing => "قيد التحضير",
            OrderStatus::Delivering => "قيد التوصيل",
            OrderStatus::Delivered => "تم التوصيل",
            OrderStatus::Returned => "مرتجع",
            OrderStatus::Cancelled => "ملغي",
        }
    }

    /// Position in the forward hierarchy, `None` for side states
    pub fn position(self) -> Option<usize> {
        Self::HIERARCHY.iter().position(|s| *s == self)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Returned
        )
    }

    /// Validate a transition from `self` to `next`
    pub fn check_transition(self, next: OrderStatus) -> Result<(), TransitionError> {
        let reject = |reason| TransitionError {
            from: self,
            to: next,
            reason,
        };

        if self.is_terminal() {
            return Err(reject(TransitionRejection::Terminal));
        }

        if next == OrderStatus::Cancelled {
            return if self == OrderStatus::Ordered {
                Ok(())
            } else {
                Err(reject(TransitionRejection::CancelNotAllowed))
            };
        }

        match (self.position(), next.position()) {
            (Some(current), Some(target)) if target > current => Ok(()),
            _ => Err(reject(TransitionRejection::NotForward)),
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.check_transition(next).is_ok()
    }

    /// Statuses reachable from `self`, in integer-encoding order
    pub fn allowed_transitions(self) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.code() == value)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("unknown order status code: {value}"),
                )
            })
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    /// Case-insensitive status name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("unknown order status: {s}"),
                )
            })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
