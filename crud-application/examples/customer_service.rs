//! 服务应用最小用例：插入 → 检索 → 软删除
//!
//! ```bash
//! cargo run -p crud-application --example customer_service
//! ```
use crud_application::ServiceApplication;
use crud_application::dto::Dto;
use crud_domain::aggregate::{AggregateRoot, SoftDeletable};
use crud_domain::entity::Entity;
use crud_domain::notification::{Notifiable, Notification, NotificationContext};
use crud_domain::pagination::{Filtering, SearchRequest};
use crud_domain::persist::{
    InMemoryReadRepository, InMemoryStore, InMemoryUnitOfWork, InMemoryWriteRepository,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Customer {
    id: Uuid,
    name: String,
    email: String,
    deleted: bool,
}

impl Entity for Customer {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Notifiable for Customer {
    fn validate(&self) -> Vec<Notification> {
        let mut failures = Vec::new();
        if self.name.trim().is_empty() {
            failures.push(Notification::new("name", "name is required"));
        }
        if !self.email.contains('@') {
            failures.push(Notification::new("email", "email is invalid"));
        }
        failures
    }
}

impl AggregateRoot for Customer {}

impl SoftDeletable for Customer {
    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

#[derive(Debug, Clone, Serialize)]
struct InsertCustomerDto {
    name: String,
    email: String,
}

impl Notifiable for InsertCustomerDto {
    fn validate(&self) -> Vec<Notification> {
        Vec::new()
    }
}

impl Dto for InsertCustomerDto {}

impl From<InsertCustomerDto> for Customer {
    fn from(dto: InsertCustomerDto) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: dto.name,
            email: dto.email,
            deleted: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct CustomerResponse {
    id: String,
    name: String,
    contact: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name,
            contact: customer.email,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct NameContains(Option<String>);

impl Filtering<Customer> for NameContains {
    fn matches(&self, record: &Customer) -> bool {
        self.0
            .as_ref()
            .is_none_or(|needle| record.name.contains(needle.as_str()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let unit_of_work = Arc::new(InMemoryUnitOfWork::soft_delete(Arc::clone(&store)));
    let context = Arc::new(NotificationContext::new());

    let service = ServiceApplication::new(
        Arc::new(
            InMemoryReadRepository::<Customer, NameContains>::new(Arc::clone(&store))
                .soft_delete_aware(),
        ),
        Arc::new(InMemoryWriteRepository::new(Arc::clone(&unit_of_work))),
        Arc::clone(&unit_of_work),
        Arc::clone(&context),
    );

    // 插入两条记录
    for (name, email) in [("Ada", "ada@example.com"), ("Grace", "grace@example.com")] {
        let inserted: Option<CustomerResponse> = service
            .insert(InsertCustomerDto {
                name: name.to_string(),
                email: email.to_string(),
            })
            .await?;
        println!("inserted: {inserted:?}");
    }

    // 过滤检索
    let request = SearchRequest::builder()
        .filter(NameContains(Some("Ada".into())))
        .page(1)
        .page_size(10)
        .build();
    let result = service.search::<CustomerResponse>(&request).await?;
    println!(
        "search: {} of {} record(s)",
        result.items().len(),
        result.total_items()
    );

    // 软删除第一条后重新列举
    if let Some(first) = result.items().first() {
        service.delete(&first.id.parse()?).await?;
    }
    let remaining: Vec<CustomerResponse> = service.get_all().await?;
    println!("remaining: {remaining:?}");
    println!("notifications: {:?}", context.notifications());

    Ok(())
}
