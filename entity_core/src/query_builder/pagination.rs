//! Pagination terminal

use crate::debug_log;
use crate::errors::EntityError;
use crate::materializer::rows_to_entities;
use crate::traits::{Entity, StatementExecutor};

use super::builder::EntityQuery;

/// One materialized page plus enough bookkeeping to render a pager.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matches across all pages
    pub total_count: i64,
    /// 1-based page number actually fetched
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    /// Number of pages at this page size.
    pub fn page_count(&self) -> i64 {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }
}

impl<T: Entity, E: StatementExecutor> EntityQuery<T, E> {
    /// Fetch one page of matches. `page` is 1-based; both arguments are
    /// clamped up to 1, so a zero or negative request fetches page one.
    pub async fn paginate(&mut self, page: i64, page_size: i64) -> Result<Page<T>, EntityError> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let statement = self.select_statement(None);
        debug_log!(
            entity = self.main.entity_name,
            page,
            page_size,
            "executing paginated select"
        );
        let row_page = self.executor.paginate(&statement, page, page_size).await?;
        let items = rows_to_entities(row_page.rows)?;
        self.reset();
        Ok(Page {
            items,
            total_count: row_page.total_count,
            page,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_count_rounds_up() {
        let page: Page<()> = Page {
            items: vec![],
            total_count: 25,
            page: 1,
            page_size: 10,
        };
        assert_eq!(page.page_count(), 3);

        let empty: Page<()> = Page {
            items: vec![],
            total_count: 0,
            page: 1,
            page_size: 10,
        };
        assert_eq!(empty.page_count(), 0);
    }
}
