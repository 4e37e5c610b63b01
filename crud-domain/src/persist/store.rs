//! 进程内存储根
//!
use crate::aggregate::AggregateRoot;
use crate::entity::Entity;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// 以标识为键的进程内记录表
///
/// 使用 `BTreeMap` 保证遍历顺序随标识稳定，分页因此可重复。
/// 单把锁即是事务边界：提交在一次加锁内应用全部暂存写入。
pub struct InMemoryStore<A>
where
    A: AggregateRoot,
{
    pub(crate) records: Mutex<BTreeMap<A::Id, A>>,
}

impl<A> InMemoryStore<A>
where
    A: AggregateRoot,
{
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// 直接写入记录，绕过工作单元；仅用于测试种子数据
    pub async fn seed(&self, records: impl IntoIterator<Item = A>) {
        let mut guard = self.records.lock().await;
        for record in records {
            guard.insert(record.id().clone(), record);
        }
    }

    /// 当前记录数（含软删除标记的记录）
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// 全量快照（标识序），用于测试断言
    pub async fn snapshot(&self) -> Vec<A> {
        self.records.lock().await.values().cloned().collect()
    }
}

impl<A> Default for InMemoryStore<A>
where
    A: AggregateRoot,
{
    fn default() -> Self {
        Self::new()
    }
}
