use std::ops::Range;

/// One page of the client-side table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based, already clamped into range.
    pub index: usize,
    /// Always at least 1; an empty collection has one empty page.
    pub count: usize,
    pub range: Range<usize>,
}

impl Page {
    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.count
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.index + 1, self.count)
    }
}

pub fn paginate(len: usize, requested: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let count = len.div_ceil(page_size).max(1);
    let index = requested.min(count - 1);
    let start = index * page_size;
    let end = (start + page_size).min(len);
    Page {
        index,
        count,
        range: start.min(len)..end,
    }
}
