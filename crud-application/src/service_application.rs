//! 服务应用编排器（Service Application）
//!
//! 跨聚合通用的 CRUD 编排：对任意聚合根 `A`，组合一对读/写仓储、
//! 一个工作单元与请求范围的通知上下文，实现
//! 校验 → 映射 → 校验 → 暂存 → 提交 的标准写流程与免校验的读流程。
//!
//! 错误信号分两条通道：
//! - 预期内失败（DTO/聚合校验、存在性检查落空）只记通知并返回空结果；
//! - 基础设施硬失败（提交异常）记一条 `"Error"` 通知**并**继续向上抛出。
//!
use crate::dto::Dto;
use crate::error::AppResult;
use crud_domain::aggregate::AggregateRoot;
use crud_domain::entity::Entity;
use crud_domain::notification::{Notifiable, NotificationContext};
use crud_domain::pagination::{SearchRequest, SearchResult};
use crud_domain::repository::{IncludeFn, ReadRepository, WriteRepository};
use crud_domain::unit_of_work::UnitOfWork;
use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// 通用服务应用
///
/// - `A`：聚合根类型
/// - `R`/`W`：读/写仓储实现
/// - `U`：工作单元实现
///
/// 持有协作者的引用而非生命周期：仓储、工作单元与通知上下文
/// 均以 `Arc` 注入，且仅限一次逻辑操作内使用。
pub struct ServiceApplication<A, R, W, U>
where
    A: AggregateRoot,
    R: ReadRepository<A>,
    W: WriteRepository<A>,
    U: UnitOfWork,
{
    read_repository: Arc<R>,
    write_repository: Arc<W>,
    unit_of_work: Arc<U>,
    notification_context: Arc<NotificationContext>,
    includes: Option<Arc<IncludeFn<A>>>,
    disposed: AtomicBool,
    _marker: PhantomData<fn() -> A>,
}

impl<A, R, W, U> ServiceApplication<A, R, W, U>
where
    A: AggregateRoot,
    R: ReadRepository<A>,
    W: WriteRepository<A>,
    U: UnitOfWork,
{
    pub fn new(
        read_repository: Arc<R>,
        write_repository: Arc<W>,
        unit_of_work: Arc<U>,
        notification_context: Arc<NotificationContext>,
    ) -> Self {
        info!(aggregate = type_name::<A>(), "initializing service application");

        Self {
            read_repository,
            write_repository,
            unit_of_work,
            notification_context,
            includes: None,
            disposed: AtomicBool::new(false),
            _marker: PhantomData,
        }
    }

    /// 设置读操作的关联装载钩子（由持久化层应用）
    pub fn set_includes(&mut self, includes: Arc<IncludeFn<A>>) {
        self.includes = Some(includes);
    }

    pub fn clear_includes(&mut self) {
        self.includes = None;
    }

    /// 本次逻辑操作共享的通知上下文
    pub fn notification_context(&self) -> &Arc<NotificationContext> {
        &self.notification_context
    }

    /// 按标识点查并映射为响应形状；未找到返回 `None`，不构成错误
    pub async fn get_by_id<Res>(&self, id: &A::Id) -> AppResult<Option<Res>>
    where
        Res: From<A>,
    {
        debug!(id = %id, response = type_name::<Res>(), "get_by_id");

        let found = self
            .read_repository
            .get_by_id(id, self.includes.as_deref())
            .await?;

        Ok(found.map(Res::from))
    }

    /// 批量点查；不存在的标识被静默忽略
    pub async fn get_by_ids<Res>(&self, ids: &[A::Id]) -> AppResult<Vec<Res>>
    where
        Res: From<A>,
    {
        debug!(ids = ids.len(), response = type_name::<Res>(), "get_by_ids");

        let found = self
            .read_repository
            .get_by_ids(ids, self.includes.as_deref())
            .await?;

        Ok(found.into_iter().map(Res::from).collect())
    }

    /// 全量列举（受仓储默认过滤约束，如软删除排除）
    pub async fn get_all<Res>(&self) -> AppResult<Vec<Res>>
    where
        Res: From<A>,
    {
        debug!(response = type_name::<Res>(), "get_all");

        let found = self
            .read_repository
            .get_all(self.includes.as_deref())
            .await?;

        Ok(found.into_iter().map(Res::from).collect())
    }

    /// 过滤 + 分页查询；过滤对象的解释完全委托给仓储
    pub async fn search<Res>(
        &self,
        request: &SearchRequest<R::Filter>,
    ) -> AppResult<SearchResult<Res>>
    where
        Res: From<A>,
    {
        debug!(
            page = request.page(),
            page_size = request.page_size(),
            response = type_name::<Res>(),
            "search"
        );

        let result = self
            .read_repository
            .search(request, self.includes.as_deref())
            .await?;

        Ok(result.map(Res::from))
    }

    /// 插入：校验 DTO → 映射为聚合 → 校验聚合 → 暂存 → 提交
    ///
    /// 任一校验失败都在触达仓储前短路，返回 `Ok(None)` 并在
    /// 通知上下文留痕。
    pub async fn insert<T, Res>(&self, dto: T) -> AppResult<Option<Res>>
    where
        T: Dto,
        A: From<T>,
        Res: From<A>,
    {
        if self.check_invalid(&dto) {
            return Ok(None);
        }

        debug!(dto = type_name::<T>(), aggregate = type_name::<A>(), "insert");

        let aggregate = A::from(dto);
        if self.check_invalid(&aggregate) {
            return Ok(None);
        }

        self.write_repository.insert(aggregate.clone()).await?;
        self.commit().await?;

        Ok(Some(Res::from(aggregate)))
    }

    /// 更新：与插入相同的校验管线，外加存在性检查。
    ///
    /// 标识不存在只记一条“记录未找到”通知，**不**提前返回 ——
    /// 继续校验并暂存更新，由提交阶段统一门控（记录并继续语义）。
    /// 因此对不存在标识的有效更新仍返回映射后的响应，但不会落库。
    pub async fn update<T, Res>(&self, dto: T) -> AppResult<Option<Res>>
    where
        T: Dto,
        A: From<T>,
        Res: From<A>,
    {
        if self.check_invalid(&dto) {
            return Ok(None);
        }

        debug!(dto = type_name::<T>(), aggregate = type_name::<A>(), "update");

        let aggregate = A::from(dto);

        let not_found = self
            .read_repository
            .get_by_id(aggregate.id(), None)
            .await?
            .is_none();
        if not_found {
            self.notification_context
                .add_notification(aggregate.id().to_string(), "record not found");
        }

        if self.check_invalid(&aggregate) {
            return Ok(None);
        }

        self.write_repository.update(aggregate.clone()).await?;
        self.commit().await?;

        Ok(Some(Res::from(aggregate)))
    }

    /// 删除：存在性检查落空只记通知（非致命），仍委托仓储暂存删除，
    /// 由提交阶段门控；对不存在的标识删除不是错误
    pub async fn delete(&self, id: &A::Id) -> AppResult<()> {
        debug!(id = %id, "delete");

        let not_found = self.read_repository.get_by_id(id, None).await?.is_none();
        if not_found {
            self.notification_context
                .add_notification(id.to_string(), "record not found or already removed");
        }

        self.write_repository.delete(id).await?;
        self.commit().await?;

        Ok(())
    }

    /// 提交：通知上下文非空时立即返回 `false`，不触达存储；
    /// 底层提交异常记一条 `"Error"` 通知并继续向上抛出（双通道信号）
    pub async fn commit(&self) -> AppResult<bool> {
        if self.notification_context.has_notifications() {
            debug!("commit skipped: notification context is not empty");
            return Ok(false);
        }

        if let Err(source) = self.unit_of_work.commit().await {
            self.notification_context
                .add_notification("Error", source.to_string());
            return Err(source.into());
        }

        Ok(true)
    }

    /// 把自校验对象的失败通知合并进上下文，返回是否存在失败。
    /// 插入/更新据此决定是否中止 —— 校验流程的统一卡点。
    pub fn check_invalid(&self, data: &dyn Notifiable) -> bool {
        let failures = data.validate();
        if failures.is_empty() {
            return false;
        }

        self.notification_context.add_notifications(failures);

        debug!(
            total = self.notification_context.notifications().len(),
            "validation failures recorded"
        );

        true
    }

    /// 释放工作单元的底层会话，恰好一次；重复调用是 no-op
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            debug!("disposing unit of work");
            self.unit_of_work.dispose();
        }
    }
}

impl<A, R, W, U> Drop for ServiceApplication<A, R, W, U>
where
    A: AggregateRoot,
    R: ReadRepository<A>,
    W: WriteRepository<A>,
    U: UnitOfWork,
{
    fn drop(&mut self) {
        self.dispose();
    }
}
