//! Slicing an ordered task list into pages.
//!
//! Only the two source numbers (total element count and effective page size)
//! are stored; every derived value is computed from them on demand.

pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Zero-based page index plus a page size clamped to
/// `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
}

impl PageRequest {
    pub fn new(index: u32, size: u32) -> Self {
        Self {
            index,
            size: size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    content: Vec<T>,
    total_elements: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.request.size))
    }

    pub fn index(&self) -> u32 {
        self.request.index
    }

    pub fn size(&self) -> u32 {
        self.request.size
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.request.index) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.request.index > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            request: self.request,
        }
    }
}

/// Cut one page out of an already ordered sequence.
///
/// An index past the last page yields empty content with accurate totals.
pub fn paginate<T>(all: Vec<T>, request: PageRequest) -> Page<T> {
    let total_elements = all.len() as u64;
    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);

    let content = all
        .into_iter()
        .skip(skip)
        .take(request.size as usize)
        .collect();

    Page {
        content,
        total_elements,
        request,
    }
}
