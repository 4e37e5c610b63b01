//! 内存持久化参考实现
//!
//! 面向测试与演示的进程内存储：`InMemoryStore` 为共享根，
//! 写入经由 `InMemoryUnitOfWork` 暂存并原子提交，读取经由
//! `InMemoryReadRepository` 应用可组合的记录过滤（软删除、租户）。
//!
mod repository;
mod store;
mod unit_of_work;

pub use repository::{InMemoryReadRepository, InMemoryWriteRepository};
pub use store::InMemoryStore;
pub use unit_of_work::InMemoryUnitOfWork;
