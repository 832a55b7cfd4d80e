//! 配送状态机
//!
//! 配送状态独立于订单状态存储：
//! `pending → assigned → picked_up → in_transit → delivered`，
//! 且只能逐步前进。`cancelled` 是终态，仅由订单取消的同步规则写入，
//! 配送员的 advance 操作永远不会产生它。

use crate::order::TransitionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 配送状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    /// 订单取消时由同步规则写入，配送员不可达
    Cancelled,
}

impl DeliveryStatus {
    fn rank(&self) -> Option<u8> {
        match self {
            DeliveryStatus::Pending => Some(0),
            DeliveryStatus::Assigned => Some(1),
            DeliveryStatus::PickedUp => Some(2),
            DeliveryStatus::InTransit => Some(3),
            DeliveryStatus::Delivered => Some(4),
            DeliveryStatus::Cancelled => None,
        }
    }

    /// 终态：delivered / cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// 配送员推进的下一个状态 (终态返回 None)
    pub fn next(&self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Pending => Some(DeliveryStatus::Assigned),
            DeliveryStatus::Assigned => Some(DeliveryStatus::PickedUp),
            DeliveryStatus::PickedUp => Some(DeliveryStatus::InTransit),
            DeliveryStatus::InTransit => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered | DeliveryStatus::Cancelled => None,
        }
    }

    /// 校验 `self -> to`：只允许前进一格，cancelled 不经此路径
    pub fn can_transition(&self, to: DeliveryStatus) -> bool {
        match (self.rank(), to.rank()) {
            (Some(from), Some(next)) => next == from + 1,
            _ => false,
        }
    }

    /// 执行迁移，非法时返回 [`TransitionError`]
    pub fn transition(&self, to: DeliveryStatus) -> Result<DeliveryStatus, TransitionError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(TransitionError::new(self, to))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::PickedUp => "picked_up",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_one_step_at_a_time() {
        let mut status = DeliveryStatus::Pending;
        let expected = [
            DeliveryStatus::Assigned,
            DeliveryStatus::PickedUp,
            DeliveryStatus::InTransit,
            DeliveryStatus::Delivered,
        ];
        for want in expected {
            status = status.next().unwrap();
            assert_eq!(status, want);
        }
        assert_eq!(status.next(), None);
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(!DeliveryStatus::Pending.can_transition(DeliveryStatus::PickedUp));
        assert!(!DeliveryStatus::Assigned.can_transition(DeliveryStatus::Delivered));
        assert!(!DeliveryStatus::InTransit.can_transition(DeliveryStatus::Assigned));
        assert!(
            DeliveryStatus::Assigned
                .transition(DeliveryStatus::Delivered)
                .is_err()
        );
    }

    #[test]
    fn cancelled_is_not_reachable_by_advance() {
        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::Assigned,
            DeliveryStatus::PickedUp,
            DeliveryStatus::InTransit,
        ] {
            assert!(!status.can_transition(DeliveryStatus::Cancelled));
            assert_ne!(status.next(), Some(DeliveryStatus::Cancelled));
        }
        assert!(DeliveryStatus::Cancelled.is_terminal());
        assert_eq!(DeliveryStatus::Cancelled.next(), None);
    }
}
