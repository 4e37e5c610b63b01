//! 实体（Entity）基础抽象
//!
//! 为聚合与实体提供统一的标识（Id）能力，标识在创建后不可变。
//!
use std::fmt::Display;

/// 具备唯一标识的实体抽象
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可克隆、可显示与全序（稳定排序用于分页）
    type Id: Clone + Ord + Display + Send + Sync + 'static;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}
