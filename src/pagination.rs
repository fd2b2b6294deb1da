//! Page arithmetic and the page-number strip shown under a result list.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Most page links shown at once, ellipses included.
pub const MAX_VISIBLE_PAGES: usize = 7;

/// Page sizes offered to users by default.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 3] = [25, 50, 100];

/// Number of pages needed for `total` items, never less than one.
pub fn total_pages(total: usize, page_size: usize) -> usize {
  if page_size == 0 {
    return 1;
  }
  total.div_ceil(page_size).max(1)
}

/// Clamps a 1-indexed page into `1..=total_pages`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
  page.clamp(1, total_pages.max(1))
}

/// The index range of `page` within a list of `total` items.
///
/// The page must already be clamped; the range is cut to `total` so the last
/// page may be short.
pub fn page_range(page: usize, page_size: usize, total: usize) -> Range<usize> {
  let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
  let end = start.saturating_add(page_size).min(total);
  start..end
}

/// One slot in the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLink {
  Page(usize),
  Ellipsis,
}

/// Builds the page-number strip for `current` out of `total_pages`.
///
/// Up to seven pages are shown in full. Beyond that the strip is anchored on
/// the first and last page with a one-page window around `current`, and
/// ellipses stand in for the gaps, giving at most seven slots:
///
/// ```rust
/// use dentalsearch::pagination::{page_numbers, PageLink::*};
///
/// assert_eq!(
///     page_numbers(6, 12),
///     vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(12)]
/// );
/// ```
pub fn page_numbers(current: usize, total_pages: usize) -> Vec<PageLink> {
  let last = total_pages.max(1);
  let current = clamp_page(current, last);

  if last <= MAX_VISIBLE_PAGES {
    return (1..=last).map(PageLink::Page).collect();
  }

  let mut links = Vec::with_capacity(MAX_VISIBLE_PAGES);
  if current <= 3 {
    links.extend((1..=5).map(PageLink::Page));
    links.push(PageLink::Ellipsis);
    links.push(PageLink::Page(last));
  } else if current >= last - 2 {
    links.push(PageLink::Page(1));
    links.push(PageLink::Ellipsis);
    links.extend((last - 4..=last).map(PageLink::Page));
  } else {
    links.push(PageLink::Page(1));
    links.push(PageLink::Ellipsis);
    links.extend((current - 1..=current + 1).map(PageLink::Page));
    links.push(PageLink::Ellipsis);
    links.push(PageLink::Page(last));
  }
  links
}

/// Current page and page size as held by a presentation layer.
///
/// Page sizes are limited to a fixed set of options. Changing the page size
/// always returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
  page: usize,
  page_size: usize,
  options: Vec<usize>,
}

impl Default for Pager {
  fn default() -> Self {
    Self {
      page: 1,
      page_size: crate::criteria::DEFAULT_PAGE_SIZE,
      options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
    }
  }
}

impl Pager {
  /// Creates a pager on page 1. Fails if `page_size` is not among `options`.
  pub fn new(page_size: usize, options: Vec<usize>) -> Result<Self> {
    if !options.contains(&page_size) {
      return Err(Error::InvalidPageSize {
        requested: page_size,
        allowed: options,
      });
    }
    Ok(Self {
      page: 1,
      page_size,
      options,
    })
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn options(&self) -> &[usize] {
    &self.options
  }

  /// Switches page size and returns to page 1.
  pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
    if !self.options.contains(&page_size) {
      return Err(Error::InvalidPageSize {
        requested: page_size,
        allowed: self.options.clone(),
      });
    }
    self.page_size = page_size;
    self.page = 1;
    Ok(())
  }

  /// Moves to `page`, clamped to the pages available for `total` items.
  pub fn set_page(&mut self, page: usize, total: usize) {
    self.page = clamp_page(page, total_pages(total, self.page_size));
  }

  /// Moves forward one page unless already on the last.
  pub fn next(&mut self, total: usize) {
    self.set_page(self.page.saturating_add(1), total);
  }

  /// Moves back one page unless already on the first.
  pub fn prev(&mut self) {
    self.page = self.page.saturating_sub(1).max(1);
  }

  /// Returns to page 1, as after a new search.
  pub fn reset(&mut self) {
    self.page = 1;
  }
}

#[cfg(test)]
mod tests {
  use super::PageLink::*;
  use super::*;

  #[test]
  fn test_total_pages_never_zero() {
    assert_eq!(total_pages(0, 50), 1);
    assert_eq!(total_pages(50, 50), 1);
    assert_eq!(total_pages(51, 50), 2);
    assert_eq!(total_pages(300, 25), 12);
  }

  #[test]
  fn test_page_range_is_cut_to_total() {
    assert_eq!(page_range(1, 50, 120), 0..50);
    assert_eq!(page_range(3, 50, 120), 100..120);
    assert_eq!(page_range(1, 50, 0), 0..0);
  }

  #[test]
  fn test_short_strip_lists_every_page() {
    assert_eq!(page_numbers(1, 1), vec![Page(1)]);
    assert_eq!(page_numbers(4, 7).len(), 7);
    assert!(!page_numbers(4, 7).contains(&Ellipsis));
  }

  #[test]
  fn test_strip_near_start_and_end() {
    assert_eq!(
      page_numbers(2, 12),
      vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(12)]
    );
    assert_eq!(
      page_numbers(11, 12),
      vec![Page(1), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12)]
    );
  }

  #[test]
  fn test_strip_never_exceeds_seven_slots() {
    for total in 1..40 {
      for current in 1..=total {
        let links = page_numbers(current, total);
        assert!(links.len() <= MAX_VISIBLE_PAGES);
        assert!(links.contains(&Page(current)));
        assert_eq!(links.first(), Some(&Page(1)));
        assert_eq!(links.last(), Some(&Page(total)));
      }
    }
  }

  #[test]
  fn test_pager_resets_on_page_size_change() {
    let mut pager = Pager::default();
    pager.set_page(3, 500);
    assert_eq!(pager.page(), 3);
    pager.set_page_size(100).unwrap();
    assert_eq!(pager.page(), 1);
    assert_eq!(pager.page_size(), 100);
  }

  #[test]
  fn test_pager_rejects_unknown_size() {
    let mut pager = Pager::default();
    assert!(matches!(
      pager.set_page_size(30),
      Err(Error::InvalidPageSize { requested: 30, .. })
    ));
    assert_eq!(pager.page_size(), 50);
  }

  #[test]
  fn test_pager_clamps_navigation() {
    let mut pager = Pager::new(25, vec![25, 50]).unwrap();
    pager.prev();
    assert_eq!(pager.page(), 1);
    pager.set_page(99, 60);
    assert_eq!(pager.page(), 3);
    pager.next(60);
    assert_eq!(pager.page(), 3);
  }
}
