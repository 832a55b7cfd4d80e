//! 订单生命周期模块
//!
//! - **checkout**: 购物车 → 订单的原子结算
//! - **lifecycle**: 订单/配送状态推进与两条同步规则
//! - **money**: 十进制金额运算
//!
//! # 状态流
//!
//! ```text
//! Cart ──place_order──▶ Order(placed) ──manager──▶ ... ──▶ completed
//!                          │                                  ▲
//!                          └─▶ Delivery(pending) ──agent──▶ delivered
//!                                  (delivered 时订单自动 completed,
//!                                   订单 cancelled 时配送单强制 cancelled)
//! ```

pub mod checkout;
pub mod lifecycle;
pub mod money;

pub use checkout::{CheckoutService, PlaceOrderRequest};
pub use lifecycle::LifecycleService;
