//! 通知（Notification）
//!
//! 以“键 + 消息”描述一次校验或业务规则失败。常规校验失败不抛出异常，
//! 而是累积到请求范围的 `NotificationContext` 中；上下文一旦非空，
//! 当前逻辑操作不得提交。
//!
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// 一条校验失败记录（键 + 消息）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    key: String,
    message: String,
}

impl Notification {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 可自校验对象：返回零或多条失败通知
///
/// DTO 与聚合根在被信任前都必须通过 `validate` 自校验；
/// 校验是纯函数，不修改对象、不访问外部资源。
pub trait Notifiable: Send + Sync {
    fn validate(&self) -> Vec<Notification>;
}

/// 请求范围的校验失败收集器
///
/// - 仅收集，不提供移除操作：失败记录持续到作用域结束；
/// - 通过 `Arc` 在一次逻辑操作内共享，不得跨并发操作复用；
/// - 不变式：`has_notifications() == !notifications().is_empty()`。
#[derive(Debug, Default)]
pub struct NotificationContext {
    notifications: Mutex<Vec<Notification>>,
}

impl NotificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Notification>> {
        // 同一逻辑操作内不存在并发访问，锁中毒只可能来自 panic 过的测试线程
        self.notifications.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 记录一条失败通知
    pub fn add_notification(&self, key: impl Into<String>, message: impl Into<String>) {
        self.guard().push(Notification::new(key, message));
    }

    /// 批量合并失败通知（保持插入顺序）
    pub fn add_notifications(&self, notifications: impl IntoIterator<Item = Notification>) {
        self.guard().extend(notifications);
    }

    /// 是否存在失败通知（决定当前操作能否提交）
    pub fn has_notifications(&self) -> bool {
        !self.guard().is_empty()
    }

    /// 获取当前全部通知的有序快照
    pub fn notifications(&self) -> Vec<Notification> {
        self.guard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 空上下文不应报告任何通知
    #[test]
    fn empty_context_has_no_notifications() {
        let ctx = NotificationContext::new();
        assert!(!ctx.has_notifications());
        assert!(ctx.notifications().is_empty());
    }

    // 记录通知后上下文应立即可见且保持顺序
    #[test]
    fn added_notifications_are_ordered() {
        let ctx = NotificationContext::new();
        ctx.add_notification("name", "name is required");
        ctx.add_notification("email", "email is invalid");

        assert!(ctx.has_notifications());
        let all = ctx.notifications();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].key(), "name");
        assert_eq!(all[1].message(), "email is invalid");
    }

    // 批量合并应追加到既有通知之后
    #[test]
    fn merged_notifications_are_appended() {
        let ctx = NotificationContext::new();
        ctx.add_notification("first", "first failure");
        ctx.add_notifications(vec![
            Notification::new("second", "second failure"),
            Notification::new("third", "third failure"),
        ]);

        let all = ctx.notifications();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].key(), "third");
    }

    // 不变式：has_notifications 与通知数量一致
    #[test]
    fn has_notifications_tracks_count() {
        let ctx = NotificationContext::new();
        assert_eq!(ctx.has_notifications(), !ctx.notifications().is_empty());

        ctx.add_notification("key", "message");
        assert_eq!(ctx.has_notifications(), !ctx.notifications().is_empty());
    }
}
