//! 聚合根（Aggregate Root）抽象
//!
//! 聚合根是独立持久化与标识的一致性边界：
//! - 通过 `Entity` 约束具备不可变标识；
//! - 通过 `Notifiable` 约束具备自校验能力（产生零或多条通知）；
//! - 仅能经由显式的写操作变更，生命周期为创建 → 持久化 → 删除（硬删或软删）。
//!
use crate::entity::Entity;
use crate::notification::Notifiable;

/// 聚合根接口（显式标记实现）
pub trait AggregateRoot: Entity + Notifiable + Clone + Send + Sync + 'static {}

/// 软删除能力扩展
///
/// 支持软删除的聚合在删除时仅被打上移除标记而非物理删除，
/// 默认读查询会排除已标记的记录。
pub trait SoftDeletable: AggregateRoot {
    /// 是否已被标记删除
    fn is_deleted(&self) -> bool;

    /// 打上删除标记
    fn mark_deleted(&mut self);
}
