//! SmartBite Shared - 前后端共享的领域类型
//!
//! # 模块结构
//!
//! ```text
//! shared/src/
//! ├── role.rs      # 用户角色
//! ├── order.rs     # 订单类型与订单状态机
//! └── delivery.rs  # 配送状态机
//! ```
//!
//! 状态机只描述合法迁移，不做任何 IO；持久化与权限检查由 api-server 负责。

pub mod delivery;
pub mod order;
pub mod role;

// Re-exports
pub use delivery::DeliveryStatus;
pub use order::{OrderStatus, OrderType, TransitionError};
pub use role::UserRole;
