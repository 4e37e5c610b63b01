//! 内存读/写仓储
//!
use crate::aggregate::{AggregateRoot, SoftDeletable};
use crate::error::DomainResult;
use crate::pagination::{AllRecords, Filtering, SearchRequest, SearchResult};
use crate::persist::store::InMemoryStore;
use crate::persist::unit_of_work::{InMemoryUnitOfWork, StagedWrite};
use crate::repository::{IncludeFn, ReadRepository, WriteRepository};
use crate::tenant::{TenantProvider, Tenantable};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// 写仓储：把写入暂存到共享的工作单元
pub struct InMemoryWriteRepository<A>
where
    A: AggregateRoot,
{
    unit_of_work: Arc<InMemoryUnitOfWork<A>>,
}

impl<A> InMemoryWriteRepository<A>
where
    A: AggregateRoot,
{
    pub fn new(unit_of_work: Arc<InMemoryUnitOfWork<A>>) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<A> WriteRepository<A> for InMemoryWriteRepository<A>
where
    A: AggregateRoot,
{
    async fn insert(&self, aggregate: A) -> DomainResult<()> {
        self.unit_of_work.stage(StagedWrite::Insert(aggregate)).await;
        Ok(())
    }

    async fn update(&self, aggregate: A) -> DomainResult<()> {
        self.unit_of_work.stage(StagedWrite::Update(aggregate)).await;
        Ok(())
    }

    async fn delete(&self, id: &A::Id) -> DomainResult<()> {
        self.unit_of_work.stage(StagedWrite::Delete(id.clone())).await;
        Ok(())
    }
}

type RecordFilter<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// 读仓储：在存储快照上应用可组合的记录过滤与分页
///
/// - `filtered` 以 AND 语义组合谓词；
/// - `soft_delete_aware` 组合“未标记删除”谓词；
/// - `tenant_aware` 组合“归属当前租户”谓词（租户在查询时解析）。
pub struct InMemoryReadRepository<A, F = AllRecords>
where
    A: AggregateRoot,
{
    store: Arc<InMemoryStore<A>>,
    filter: Option<RecordFilter<A>>,
    _filter_marker: PhantomData<fn() -> F>,
}

impl<A, F> InMemoryReadRepository<A, F>
where
    A: AggregateRoot,
    F: Filtering<A>,
{
    pub fn new(store: Arc<InMemoryStore<A>>) -> Self {
        Self {
            store,
            filter: None,
            _filter_marker: PhantomData,
        }
    }

    /// 组合一个默认记录过滤（AND 语义）
    pub fn filtered(self, predicate: impl Fn(&A) -> bool + Send + Sync + 'static) -> Self {
        let filter: RecordFilter<A> = match self.filter {
            Some(existing) => {
                Arc::new(move |record| existing.as_ref()(record) && predicate(record))
            }
            None => Arc::new(predicate),
        };

        Self {
            filter: Some(filter),
            ..self
        }
    }

    /// 默认排除已标记删除的记录
    pub fn soft_delete_aware(self) -> Self
    where
        A: SoftDeletable,
    {
        self.filtered(|record| !record.is_deleted())
    }

    /// 仅返回当前租户的记录
    pub fn tenant_aware(self, provider: Arc<dyn TenantProvider>) -> Self
    where
        A: Tenantable,
    {
        self.filtered(move |record| record.tenant_id() == provider.tenant_id())
    }

    fn visible(&self, record: &A) -> bool {
        match &self.filter {
            Some(filter) => filter.as_ref()(record),
            None => true,
        }
    }

    fn expand(record: A, includes: Option<&IncludeFn<A>>) -> A {
        match includes {
            Some(f) => f(record),
            None => record,
        }
    }
}

#[async_trait]
impl<A, F> ReadRepository<A> for InMemoryReadRepository<A, F>
where
    A: AggregateRoot,
    F: Filtering<A> + 'static,
{
    type Filter = F;

    async fn get_by_id(
        &self,
        id: &A::Id,
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<Option<A>> {
        let found = {
            let records = self.store.records.lock().await;
            records.get(id).filter(|r| self.visible(r)).cloned()
        };

        Ok(found.map(|record| Self::expand(record, includes)))
    }

    async fn get_by_ids(
        &self,
        ids: &[A::Id],
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<Vec<A>> {
        let found: Vec<A> = {
            let records = self.store.records.lock().await;
            ids.iter()
                .filter_map(|id| records.get(id).filter(|r| self.visible(r)).cloned())
                .collect()
        };

        Ok(found
            .into_iter()
            .map(|record| Self::expand(record, includes))
            .collect())
    }

    async fn get_all(&self, includes: Option<&IncludeFn<A>>) -> DomainResult<Vec<A>> {
        let found: Vec<A> = {
            let records = self.store.records.lock().await;
            records.values().filter(|r| self.visible(r)).cloned().collect()
        };

        Ok(found
            .into_iter()
            .map(|record| Self::expand(record, includes))
            .collect())
    }

    async fn search(
        &self,
        request: &SearchRequest<Self::Filter>,
        includes: Option<&IncludeFn<A>>,
    ) -> DomainResult<SearchResult<A>> {
        let matched: Vec<A> = {
            let records = self.store.records.lock().await;
            records
                .values()
                .filter(|r| self.visible(r) && request.filter().matches(r))
                .cloned()
                .collect()
        };

        // 总数统计于过滤后的全集，装载钩子只作用于返回页
        let result = SearchResult::paginate(matched, request.page(), request.page_size());
        Ok(match includes {
            Some(f) => result.map(|record| f(record)),
            None => result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::notification::{Notifiable, Notification};
    use crate::tenant::FixedTenantProvider;
    use crate::unit_of_work::UnitOfWork;
    use uuid::Uuid;

    #[derive(Debug, Clone)]
    struct Ticket {
        id: u32,
        title: String,
        tenant: Uuid,
        deleted: bool,
    }

    impl Ticket {
        fn new(id: u32, title: &str) -> Self {
            Self {
                id,
                title: title.to_string(),
                tenant: Uuid::nil(),
                deleted: false,
            }
        }
    }

    impl Entity for Ticket {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    impl Notifiable for Ticket {
        fn validate(&self) -> Vec<Notification> {
            Vec::new()
        }
    }

    impl AggregateRoot for Ticket {}

    impl SoftDeletable for Ticket {
        fn is_deleted(&self) -> bool {
            self.deleted
        }

        fn mark_deleted(&mut self) {
            self.deleted = true;
        }
    }

    impl Tenantable for Ticket {
        fn tenant_id(&self) -> Uuid {
            self.tenant
        }
    }

    struct TitleContains(String);

    impl Filtering<Ticket> for TitleContains {
        fn matches(&self, record: &Ticket) -> bool {
            record.title.contains(&self.0)
        }
    }

    fn harness() -> (
        Arc<InMemoryStore<Ticket>>,
        Arc<InMemoryUnitOfWork<Ticket>>,
        InMemoryWriteRepository<Ticket>,
    ) {
        let store = Arc::new(InMemoryStore::new());
        let uow = Arc::new(InMemoryUnitOfWork::new(Arc::clone(&store)));
        let writer = InMemoryWriteRepository::new(Arc::clone(&uow));
        (store, uow, writer)
    }

    // 暂存写入在提交前对读取不可见
    #[tokio::test]
    async fn staged_writes_are_invisible_before_commit() {
        let (store, uow, writer) = harness();
        let reader: InMemoryReadRepository<Ticket> =
            InMemoryReadRepository::new(Arc::clone(&store));

        writer.insert(Ticket::new(1, "first")).await.unwrap();
        assert!(reader.get_all(None).await.unwrap().is_empty());
        assert_eq!(uow.pending().await, 1);

        uow.commit().await.unwrap();
        assert_eq!(reader.get_all(None).await.unwrap().len(), 1);
        assert_eq!(uow.pending().await, 0);
    }

    // 回滚丢弃全部暂存写入
    #[tokio::test]
    async fn rollback_discards_staged_writes() {
        let (store, uow, writer) = harness();

        writer.insert(Ticket::new(1, "first")).await.unwrap();
        writer.insert(Ticket::new(2, "second")).await.unwrap();
        uow.rollback().await.unwrap();
        uow.commit().await.unwrap();

        assert!(store.is_empty().await);
    }

    // 不存在标识的更新与删除在存储侧是 no-op
    #[tokio::test]
    async fn absent_id_update_and_delete_are_noops() {
        let (store, uow, writer) = harness();
        store.seed([Ticket::new(1, "kept")]).await;

        writer.update(Ticket::new(9, "ghost")).await.unwrap();
        writer.delete(&7).await.unwrap();
        uow.commit().await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "kept");
    }

    // 批量点查忽略缺失的标识并保持入参顺序
    #[tokio::test]
    async fn get_by_ids_omits_missing() {
        let (store, _uow, _writer) = harness();
        store
            .seed([Ticket::new(1, "a"), Ticket::new(2, "b"), Ticket::new(3, "c")])
            .await;
        let reader: InMemoryReadRepository<Ticket> =
            InMemoryReadRepository::new(Arc::clone(&store));

        let found = reader.get_by_ids(&[3, 42, 1], None).await.unwrap();

        let ids: Vec<u32> = found.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    // 软删除：删除仅打标记，默认读查询排除已标记记录
    #[tokio::test]
    async fn soft_delete_marks_and_hides() {
        let store = Arc::new(InMemoryStore::new());
        let uow = Arc::new(InMemoryUnitOfWork::soft_delete(Arc::clone(&store)));
        let writer = InMemoryWriteRepository::new(Arc::clone(&uow));
        let reader: InMemoryReadRepository<Ticket> =
            InMemoryReadRepository::new(Arc::clone(&store)).soft_delete_aware();

        store
            .seed([Ticket::new(1, "a"), Ticket::new(2, "b"), Ticket::new(3, "c")])
            .await;

        writer.delete(&1).await.unwrap();
        writer.delete(&2).await.unwrap();
        uow.commit().await.unwrap();

        // 记录仍在存储中，但默认读查询只见未删记录
        assert_eq!(store.len().await, 3);
        let visible = reader.get_all(None).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 3);
        assert!(reader.get_by_id(&1, None).await.unwrap().is_none());
    }

    // 租户过滤：只返回当前租户的记录
    #[tokio::test]
    async fn tenant_filter_restricts_reads() {
        let store = Arc::new(InMemoryStore::new());
        let mine = Uuid::from_u128(1);
        let other = Uuid::from_u128(2);

        let mut a = Ticket::new(1, "mine");
        a.tenant = mine;
        let mut b = Ticket::new(2, "theirs");
        b.tenant = other;
        store.seed([a, b]).await;

        let reader: InMemoryReadRepository<Ticket> =
            InMemoryReadRepository::new(Arc::clone(&store))
                .tenant_aware(Arc::new(FixedTenantProvider(mine)));

        let visible = reader.get_all(None).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    // 过滤 + 分页：总数统计于过滤后的全集
    #[tokio::test]
    async fn search_counts_filtered_set() {
        let store = Arc::new(InMemoryStore::new());
        store
            .seed((1..=20).map(|i| {
                Ticket::new(i, if i % 2 == 0 { "even" } else { "odd" })
            }))
            .await;
        let reader: InMemoryReadRepository<Ticket, TitleContains> =
            InMemoryReadRepository::new(Arc::clone(&store));

        let request = SearchRequest::builder()
            .filter(TitleContains("even".into()))
            .page(2)
            .page_size(3)
            .build();
        let result = reader.search(&request, None).await.unwrap();

        assert_eq!(result.total_items(), 10);
        assert_eq!(result.items().len(), 3);
        let ids: Vec<u32> = result.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![8, 10, 12]);
    }

    // 装载钩子按记录应用于返回结果
    #[tokio::test]
    async fn include_hook_is_applied() {
        let (store, _uow, _writer) = harness();
        store.seed([Ticket::new(1, "plain")]).await;
        let reader: InMemoryReadRepository<Ticket> =
            InMemoryReadRepository::new(Arc::clone(&store));

        let expand: Box<dyn Fn(Ticket) -> Ticket + Send + Sync> = Box::new(|mut t: Ticket| {
            t.title.push_str("+expanded");
            t
        });
        let found = reader.get_by_id(&1, Some(expand.as_ref())).await.unwrap();

        assert_eq!(found.unwrap().title, "plain+expanded");
    }
}
