use crud_domain::notification::Notifiable;
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输入/输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将聚合直接暴露到接口层；
/// - 请求方向的 DTO 在被信任前必须自校验（`Notifiable`），
///   响应方向的形状由调用方按次指定，仅要求可由聚合 `From` 转换。
pub trait Dto: Notifiable + Serialize + Send + Sync + 'static {}
