//! CRUD 领域层基础库（crud-domain）
//!
//! 提供围绕聚合根的通用持久化契约与构件，用于在应用中实现：
//! - 实体（`entity`）与聚合根（`aggregate`）建模，含软删除与多租户能力扩展
//! - 通知（`notification`）：请求范围内的校验失败收集器
//! - 读/写仓储契约（`repository`）与工作单元（`unit_of_work`）事务边界
//! - 过滤与分页（`pagination`）：查询请求到有界结果集的翻译
//! - 内存持久化参考实现（`persist`），用于测试与演示
//!
//! 本 crate 尽量保持与存储与传输实现解耦，仅定义领域层接口与最小必要的错误类型，
//! 以便在不同基础设施（例如 Postgres、文档库等）上进行适配实现。
//!
//! 典型用法：
//! 1. 为聚合实现 `Entity` + `Notifiable` + `AggregateRoot`（可选 `SoftDeletable`/`Tenantable`）；
//! 2. 选择或实现一对 `ReadRepository`/`WriteRepository` 与一个 `UnitOfWork`；
//! 3. 由应用层（crud-application）的 `ServiceApplication` 编排校验、落库与提交。
//!
pub mod aggregate;
pub mod entity;
pub mod error;
pub mod notification;
pub mod pagination;
pub mod persist;
pub mod repository;
pub mod tenant;
pub mod unit_of_work;
