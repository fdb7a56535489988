pub const PAGE_SIZE: usize = 8;

/// Items on 1-indexed `page`. Page 0 and pages past the end yield an empty
/// slice rather than being clamped.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based position of the first item shown, 0 when the page is empty.
    pub first_item: usize,
    pub last_item: usize,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Self {
        let shown = if page == 0 || page_size == 0 {
            0
        } else {
            let start = (page - 1).saturating_mul(page_size);
            total_items.saturating_sub(start).min(page_size)
        };
        let first_item = if shown == 0 {
            0
        } else {
            (page - 1) * page_size + 1
        };
        let last_item = if shown == 0 { 0 } else { first_item + shown - 1 };

        Self {
            page,
            total_pages: total_pages(total_items, page_size),
            total_items,
            first_item,
            last_item,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_item == 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
