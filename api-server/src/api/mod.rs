//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 登录 / 当前用户
//! - [`restaurants`] - 餐厅管理接口
//! - [`menu`] - 菜单管理接口
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口 (结算 + 状态推进)
//! - [`delivery`] - 配送接口
//! - [`admin`] - 管理员接口

pub mod admin;
pub mod auth;
pub mod cart;
pub mod delivery;
pub mod health;
pub mod menu;
pub mod orders;
pub mod restaurants;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
