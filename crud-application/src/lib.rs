//! CRUD 应用层（crud-application）
//!
//! 在 crud-domain 的仓储/工作单元/通知契约之上，提供跨聚合通用的
//! 服务应用编排器（`ServiceApplication`）：
//! - 读流程：点查、批量查、全量列举与过滤分页查询，逐条映射为响应 DTO；
//! - 写流程：校验 DTO → 映射为聚合 → 校验聚合 → 暂存写入 → 工作单元提交，
//!   任一校验失败都在触达仓储前短路，仅以通知的形式对外暴露；
//! - 提交门控：通知上下文非空时提交立即返回 `false`，不触达存储。
//!
pub mod dto;
pub mod error;
pub mod service_application;

pub use service_application::ServiceApplication;
