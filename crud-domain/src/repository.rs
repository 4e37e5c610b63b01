//! 读/写仓储契约（Repository capability pair）
//!
//! 以能力接口的形式约束一类聚合根的持久化操作：
//! - 读侧：按标识点查、批量查、全量列举与过滤分页查询，
//!   均可附带调用方提供的关联装载钩子（`IncludeFn`）；
//! - 写侧：插入、更新与按标识删除 —— 写操作只是**暂存**，
//!   在工作单元（`UnitOfWork`）提交前对读取不可见。
//!
use crate::aggregate::AggregateRoot;
use crate::error::DomainResult;
use crate::pagination::{SearchRequest, SearchResult};
use async_trait::async_trait;
use std::sync::Arc;

/// 关联数据装载钩子
///
/// 由调用方提供、持久化层应用的查询塑形回调，用于控制加载聚合时
/// 附带多少关联数据；编排层不解释其内容。
pub type IncludeFn<A> = dyn Fn(A) -> A + Send + Sync;

/// 读仓储能力
#[async_trait]
pub trait ReadRepository<A>: Send + Sync
where
    A: AggregateRoot,
{
    /// 仓储特定的过滤对象类型（由查询层解释）
    type Filter: Send + Sync;

    /// 按标识点查；未找到返回 `None`，不构成错误
    async fn get_by_id(
        &self,
        id: &A::Id,
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<Option<A>>;

    /// 批量点查；不存在的标识被静默忽略，结果保持入参顺序
    async fn get_by_ids(
        &self,
        ids: &[A::Id],
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<Vec<A>>;

    /// 全量列举（受默认过滤约束，如软删除排除）
    async fn get_all(&self, includes: Option<&IncludeFn<A>>) -> DomainResult<Vec<A>>;

    /// 过滤 + 分页查询；总数统计于过滤后的全集
    async fn search(
        &self,
        request: &SearchRequest<Self::Filter>,
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<SearchResult<A>>;
}

/// 写仓储能力（所有操作仅暂存，由工作单元统一提交）
#[async_trait]
pub trait WriteRepository<A>: Send + Sync
where
    A: AggregateRoot,
{
    /// 暂存一个新聚合
    async fn insert(&self, aggregate: A) -> DomainResult<()>;

    /// 暂存一次聚合更新
    async fn update(&self, aggregate: A) -> DomainResult<()>;

    /// 按标识暂存删除；软删除聚合应打标记而非物理移除，
    /// 不存在的标识在存储侧是 no-op
    async fn delete(&self, id: &A::Id) -> DomainResult<()>;
}

#[async_trait]
impl<A, T> ReadRepository<A> for Arc<T>
where
    A: AggregateRoot,
    T: ReadRepository<A> + ?Sized,
{
    type Filter = T::Filter;

    async fn get_by_id(
        &self,
        id: &A::Id,
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<Option<A>> {
        (**self).get_by_id(id, includes).await
    }

    async fn get_by_ids(
        &self,
        ids: &[A::Id],
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<Vec<A>> {
        (**self).get_by_ids(ids, includes).await
    }

    async fn get_all(&self, includes: Option<&IncludeFn<A>>) -> DomainResult<Vec<A>> {
        (**self).get_all(includes).await
    }

    async fn search(
        &self,
        request: &SearchRequest<Self::Filter>,
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<SearchResult<A>> {
        (**self).search(request, includes).await
    }
}

#[async_trait]
impl<A, T> WriteRepository<A> for Arc<T>
where
    A: AggregateRoot,
    T: WriteRepository<A> + ?Sized,
{
    async fn insert(&self, aggregate: A) -> DomainResult<()> {
        (**self).insert(aggregate).await
    }

    async fn update(&self, aggregate: A) -> DomainResult<()> {
        (**self).update(aggregate).await
    }

    async fn delete(&self, id: &A::Id) -> DomainResult<()> {
        (**self).delete(id).await
    }
}
