//! 多租户（Multi-tenancy）能力扩展
//!
//! 租户感知的聚合携带 `tenant_id`；读仓储可组合租户过滤，
//! 仅返回当前环境租户的数据。当前租户由 `TenantProvider` 提供，
//! 通常由外围基础设施（如请求头、会话）解析后注入。
//!
use crate::aggregate::AggregateRoot;
use uuid::Uuid;

/// 租户感知的聚合根
pub trait Tenantable: AggregateRoot {
    /// 归属租户标识
    fn tenant_id(&self) -> Uuid;
}

/// 当前租户提供者（请求范围的环境信息）
pub trait TenantProvider: Send + Sync {
    fn tenant_id(&self) -> Uuid;
}

/// 固定租户提供者，用于测试与单租户场景
#[derive(Debug, Clone, Copy)]
pub struct FixedTenantProvider(pub Uuid);

impl TenantProvider for FixedTenantProvider {
    fn tenant_id(&self) -> Uuid {
        self.0
    }
}
