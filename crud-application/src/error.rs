use crud_domain::error::DomainError;

/// 应用层错误
///
/// 仅覆盖硬失败通道：底层持久化异常与基础设施故障。
/// 常规校验失败经由通知上下文表达，不进入错误通道。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("infra: {0}")]
    Infra(String),
}

/// 统一 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
