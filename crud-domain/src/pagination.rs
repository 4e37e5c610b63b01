//! 过滤与分页（Pagination/Search）
//!
//! 将“过滤对象 + 页码/页宽”的查询请求翻译为有界结果集与总数元信息：
//! - 页码约定为 **1 基**；调用方传入 0 视同第 1 页；
//! - 页宽缺省表示不分页，整个过滤结果作为单页返回；
//! - `total_items` 始终统计过滤后的全集，而非当前页。
//!
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 查询请求：过滤对象 + 可选分页参数
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest<F> {
    /// 仓储特定的过滤对象（由查询层解释其形状）
    filter: F,
    /// 页码（1 基，0 视同 1）
    page: Option<usize>,
    /// 页宽；缺省表示返回全部匹配
    page_size: Option<usize>,
}

impl<F> SearchRequest<F> {
    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn page(&self) -> Option<usize> {
        self.page
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }
}

/// 查询结果：当前页条目 + 全集总数 + 回显的分页参数
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<T> {
    items: Vec<T>,
    total_items: usize,
    page: usize,
    page_size: Option<usize>,
}

impl<T> SearchResult<T> {
    /// 对过滤后的全集执行分页：跳过 `(page - 1) * page_size` 条，取下一页宽条。
    ///
    /// `page_size` 缺省时跳过分页，全集作为单页返回。
    pub fn paginate(filtered: Vec<T>, page: Option<usize>, page_size: Option<usize>) -> Self {
        let total_items = filtered.len();
        let page = page.unwrap_or(1).max(1);

        let items = match page_size {
            Some(size) => filtered
                .into_iter()
                .skip((page - 1).saturating_mul(size))
                .take(size)
                .collect(),
            None => filtered,
        };

        Self {
            items,
            total_items,
            page,
            page_size,
        }
    }

    /// 转换条目类型，保留分页元信息（用于实体到 DTO 的映射）
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchResult<U> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }
}

/// 过滤对象对记录的解释方式（内存查询层使用）
///
/// 对接真实存储的仓储通常将过滤对象翻译为查询语句，而非逐条匹配。
pub trait Filtering<A>: Send + Sync {
    fn matches(&self, record: &A) -> bool;
}

/// 匹配全部记录的空过滤
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AllRecords;

impl<A> Filtering<A> for AllRecords {
    fn matches(&self, _record: &A) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    // 常规分页：第 2 页、页宽 10 应返回偏移 10..20 的记录
    #[test]
    fn paginate_skips_previous_pages() {
        let result = SearchResult::paginate(numbers(100), Some(2), Some(10));

        assert_eq!(result.items(), &numbers(100)[10..20]);
        assert_eq!(result.total_items(), 100);
        assert_eq!(result.page(), 2);
        assert_eq!(result.page_size(), Some(10));
    }

    // 页码 0 视同第 1 页
    #[test]
    fn page_zero_is_treated_as_first_page() {
        let result = SearchResult::paginate(numbers(10), Some(0), Some(3));

        assert_eq!(result.items(), &[1, 2, 3]);
        assert_eq!(result.page(), 1);
    }

    // 页宽缺省时不分页，全集作为单页返回
    #[test]
    fn missing_page_size_returns_everything() {
        let result = SearchResult::paginate(numbers(7), Some(3), None);

        assert_eq!(result.items().len(), 7);
        assert_eq!(result.total_items(), 7);
    }

    // 末页不足一页宽时返回剩余记录
    #[test]
    fn last_page_may_be_partial() {
        let result = SearchResult::paginate(numbers(25), Some(3), Some(10));

        assert_eq!(result.items(), &numbers(25)[20..25]);
        assert_eq!(result.total_items(), 25);
    }

    // 超出范围的页码返回空页，但总数不变
    #[test]
    fn out_of_range_page_is_empty() {
        let result = SearchResult::paginate(numbers(5), Some(4), Some(2));

        assert!(result.items().is_empty());
        assert_eq!(result.total_items(), 5);
    }

    // map 保留分页元信息
    #[test]
    fn map_preserves_metadata() {
        let result = SearchResult::paginate(numbers(30), Some(2), Some(5)).map(|n| n.to_string());

        assert_eq!(result.items().len(), 5);
        assert_eq!(result.items()[0], "6");
        assert_eq!(result.total_items(), 30);
        assert_eq!(result.page(), 2);
        assert_eq!(result.page_size(), Some(5));
    }

    // builder 构造的请求应回显分页参数
    #[test]
    fn search_request_builder() {
        let request = SearchRequest::builder()
            .filter(AllRecords)
            .page(2)
            .page_size(10)
            .build();

        assert_eq!(request.page(), Some(2));
        assert_eq!(request.page_size(), Some(10));
        assert!(request.filter().matches(&42usize));
    }
}
