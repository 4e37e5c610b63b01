//! 内存工作单元
//!
use crate::aggregate::{AggregateRoot, SoftDeletable};
use crate::entity::Entity;
use crate::error::DomainResult;
use crate::persist::InMemoryStore;
use crate::unit_of_work::UnitOfWork;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// 一条暂存写入
pub(crate) enum StagedWrite<A>
where
    A: AggregateRoot,
{
    Insert(A),
    Update(A),
    Delete(<A as Entity>::Id),
}

type DeleteFn<A> =
    dyn Fn(&mut BTreeMap<<A as Entity>::Id, A>, &<A as Entity>::Id) + Send + Sync;

/// 暂存写入缓冲 + 原子提交
///
/// 删除行为是可组合的：默认物理移除；`soft_delete` 构造的实例
/// 对支持软删除的聚合仅打删除标记。
///
/// 生命周期与一次逻辑操作一致：被上层门控跳过的提交会把暂存写入
/// 留在缓冲中，直到同一实例再次 `commit` 或 `rollback`；
/// 跨逻辑操作复用实例不在契约之内。
pub struct InMemoryUnitOfWork<A>
where
    A: AggregateRoot,
{
    store: Arc<InMemoryStore<A>>,
    staged: Mutex<Vec<StagedWrite<A>>>,
    delete_fn: Box<DeleteFn<A>>,
    disposed: AtomicBool,
}

impl<A> InMemoryUnitOfWork<A>
where
    A: AggregateRoot,
{
    /// 默认实例：删除即物理移除
    pub fn new(store: Arc<InMemoryStore<A>>) -> Self {
        Self {
            store,
            staged: Mutex::new(Vec::new()),
            delete_fn: Box::new(|records, id| {
                records.remove(id);
            }),
            disposed: AtomicBool::new(false),
        }
    }

    /// 软删除实例：删除仅打标记，记录保留在存储中
    pub fn soft_delete(store: Arc<InMemoryStore<A>>) -> Self
    where
        A: SoftDeletable,
    {
        Self {
            store,
            staged: Mutex::new(Vec::new()),
            delete_fn: Box::new(|records, id| {
                if let Some(record) = records.get_mut(id) {
                    record.mark_deleted();
                }
            }),
            disposed: AtomicBool::new(false),
        }
    }

    pub(crate) async fn stage(&self, write: StagedWrite<A>) {
        self.staged.lock().await.push(write);
    }

    /// 当前暂存写入数，用于测试断言
    pub async fn pending(&self) -> usize {
        self.staged.lock().await.len()
    }

    /// 会话是否已释放
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<A> UnitOfWork for InMemoryUnitOfWork<A>
where
    A: AggregateRoot,
{
    async fn commit(&self) -> DomainResult<()> {
        let writes = {
            let mut staged = self.staged.lock().await;
            std::mem::take(&mut *staged)
        };

        debug!(writes = writes.len(), "committing staged writes");

        // 单把存储锁覆盖全部写入，提交因此是原子的
        let mut records = self.store.records.lock().await;
        for write in writes {
            match write {
                StagedWrite::Insert(aggregate) => {
                    records.insert(aggregate.id().clone(), aggregate);
                }
                StagedWrite::Update(aggregate) => {
                    if let Some(existing) = records.get_mut(aggregate.id()) {
                        *existing = aggregate;
                    }
                }
                StagedWrite::Delete(id) => {
                    (self.delete_fn)(&mut records, &id);
                }
            }
        }

        Ok(())
    }

    async fn rollback(&self) -> DomainResult<()> {
        self.staged.lock().await.clear();
        Ok(())
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}
