//! Page arithmetic and the navigation metadata returned with each page.

use serde::Serialize;
use tracing::debug;

use crate::{error::HrResult, model::Employee, store::EmployeeStore};

pub const DEFAULT_PAGE_SIZE: u64 = 5;
pub const DEFAULT_NAVIGATE_PAGES: u64 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageSettings {
    page_size: u64,
    navigate_pages: u64,
}

impl PageSettings {
    /// Zero values are raised to one.
    pub fn new(page_size: u64, navigate_pages: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            navigate_pages: navigate_pages.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn navigate_pages(&self) -> u64 {
        self.navigate_pages
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_NAVIGATE_PAGES)
    }
}

/// The slice of rows a page number maps to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page_num: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Missing or non-positive page numbers select the first page.
    pub fn new(page_num: Option<i64>, settings: &PageSettings) -> Self {
        let page_num = match page_num {
            Some(n) if n > 0 => n as u64,
            _ => 1,
        };
        let limit = settings.page_size();
        Self {
            page_num,
            offset: (page_num - 1).saturating_mul(limit),
            limit,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub page_num: u64,
    pub page_size: u64,
    pub size: usize,
    pub total: u64,
    pub pages: u64,
    pub list: Vec<T>,
    pub pre_page: u64,
    pub next_page: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub navigate_pages: u64,
    #[serde(rename = "navigatepageNums")]
    pub navigate_page_nums: Vec<u64>,
}

impl<T> PageResult<T> {
    pub fn assemble(request: PageRequest, settings: &PageSettings, total: u64, list: Vec<T>) -> Self {
        let page_num = request.page_num;
        let pages = total.div_ceil(request.limit);
        let has_previous_page = page_num > 1;
        let has_next_page = page_num < pages;
        Self {
            page_num,
            page_size: request.limit,
            size: list.len(),
            total,
            pages,
            list,
            pre_page: if has_previous_page { page_num - 1 } else { 0 },
            next_page: if has_next_page { page_num + 1 } else { 0 },
            is_first_page: page_num == 1,
            is_last_page: pages == 0 || page_num == pages,
            has_previous_page,
            has_next_page,
            navigate_pages: settings.navigate_pages(),
            navigate_page_nums: navigate_window(page_num, pages, settings.navigate_pages()),
        }
    }
}

/// Up to `width` consecutive page numbers centred on `page_num`, within `1..=pages`.
pub fn navigate_window(page_num: u64, pages: u64, width: u64) -> Vec<u64> {
    if pages == 0 {
        return Vec::new();
    }
    if pages <= width {
        return (1..=pages).collect();
    }
    let current = page_num.clamp(1, pages);
    let start = current
        .saturating_sub(width / 2)
        .max(1)
        .min(pages - width + 1);
    (start..start + width).collect()
}

/// Counts the employees, then fetches only the requested page.
pub async fn paginate<S>(
    store: &S,
    page_num: Option<i64>,
    settings: &PageSettings,
) -> HrResult<PageResult<Employee>>
where
    S: EmployeeStore + ?Sized,
{
    let request = PageRequest::new(page_num, settings);
    let total = store.count().await?;
    let list = if request.offset < total {
        store.find_page(request.offset, request.limit).await?
    } else {
        Vec::new()
    };
    debug!(
        page = request.page_num,
        total,
        fetched = list.len(),
        "employee page assembled"
    );
    Ok(PageResult::assemble(request, settings, total, list))
}
