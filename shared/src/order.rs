//! 订单类型与订单状态机
//!
//! 状态只能沿 `placed → confirmed → preparing → ready → completed`
//! 逐级前进，或从任意非终态横跳到 `cancelled`。
//! 其余迁移一律拒绝，返回 [`TransitionError`]。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 订单类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// 外送 (需要配送地址，下单时创建配送单)
    Delivery,
    /// 自取
    Pickup,
    /// 堂食
    DineIn,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "delivery",
            OrderType::Pickup => "pickup",
            OrderType::DineIn => "dine_in",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 拒绝的状态迁移
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

impl TransitionError {
    pub fn new(from: impl fmt::Display, to: impl fmt::Display) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// 订单状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Placed,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// 正向序列中的位置 (cancelled 不在序列内)
    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Placed => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::Ready => Some(3),
            OrderStatus::Completed => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    /// 终态：completed / cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// 校验 `self -> to` 是否合法
    ///
    /// 合法迁移只有两种：
    /// - 沿正向序列前进一格 (rank(to) == rank(self) + 1)
    /// - 任意非终态 -> cancelled
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        match (self.rank(), to.rank()) {
            (Some(from), Some(next)) => next == from + 1,
            _ => false,
        }
    }

    /// 执行迁移，非法时返回 [`TransitionError`]
    pub fn transition(&self, to: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(TransitionError::new(self, to))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_one_step_only() {
        assert!(OrderStatus::Placed.can_transition(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition(OrderStatus::Completed));

        // 跳级被拒绝
        assert!(!OrderStatus::Placed.can_transition(OrderStatus::Ready));
        assert!(!OrderStatus::Placed.can_transition(OrderStatus::Completed));
        // 回退被拒绝
        assert!(!OrderStatus::Ready.can_transition(OrderStatus::Placed));
        // 原地不动被拒绝
        assert!(!OrderStatus::Preparing.can_transition(OrderStatus::Preparing));
    }

    #[test]
    fn cancel_from_any_non_terminal() {
        for status in [
            OrderStatus::Placed,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            assert!(status.can_transition(OrderStatus::Cancelled));
        }
        assert!(!OrderStatus::Completed.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for to in [
            OrderStatus::Placed,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            assert!(!OrderStatus::Completed.can_transition(to));
            assert!(!OrderStatus::Cancelled.can_transition(to));
        }
    }

    #[test]
    fn transition_error_carries_both_states() {
        let err = OrderStatus::Placed
            .transition(OrderStatus::Ready)
            .unwrap_err();
        assert_eq!(err.from, "placed");
        assert_eq!(err.to, "ready");
    }
}
