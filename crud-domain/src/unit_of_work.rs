//! 工作单元（Unit of Work）事务边界
//!
//! 一个工作单元实例承载一次逻辑操作的全部暂存写入，
//! 作为单个事务原子提交；实例的生命周期与逻辑操作一致，
//! 结束时释放底层会话。
//!
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 事务边界契约
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// 原子提交全部暂存写入
    async fn commit(&self) -> DomainResult<()>;

    /// 丢弃全部暂存写入
    async fn rollback(&self) -> DomainResult<()>;

    /// 释放底层会话；实现必须幂等，默认无会话可释放
    fn dispose(&self) {}
}

#[async_trait]
impl<T> UnitOfWork for Arc<T>
where
    T: UnitOfWork + ?Sized,
{
    async fn commit(&self) -> DomainResult<()> {
        (**self).commit().await
    }

    async fn rollback(&self) -> DomainResult<()> {
        (**self).rollback().await
    }

    fn dispose(&self) {
        (**self).dispose();
    }
}
