use serde::{Deserialize, Serialize};

/// Page sizes offered by the results view.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Requested page. `page_number` is 1-based and clamped before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub page_number: usize,
    pub page_size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually shown, after clamping.
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageSpec {
    /// `max(1, ceil(total / size))`. A zero page size is treated as 1.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size.max(1)).max(1)
    }

    pub fn clamped(&self, total_items: usize) -> PageSpec {
        PageSpec {
            page_number: self.page_number.clamp(1, self.total_pages(total_items)),
            page_size: self.page_size.max(1),
        }
    }
}

/// Slices one page out of an ordered sequence. Never fails: out-of-range page numbers
/// resolve to the nearest valid page, and only an empty sequence yields an empty page.
pub fn paginate<T: Clone>(items: &[T], spec: PageSpec) -> Page<T> {
    let total_items = items.len();
    let spec = spec.clamped(total_items);
    let start = ((spec.page_number - 1) * spec.page_size).min(total_items);
    let end = (start + spec.page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page_number: spec.page_number,
        page_size: spec.page_size,
        total_items,
        total_pages: spec.total_pages(total_items),
    }
}
