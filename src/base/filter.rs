use crate::base;

/// Narrows a record list to the receipts a user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Statuses to keep. Empty keeps every status.
    pub statuses: Vec<base::Status>,
    /// Inclusive range on the receipt date. The end bound covers the whole
    /// final day.
    pub interval: base::Interval,
    /// Drops the interval's lower bound.
    pub include_before_start: bool,
    /// Case-insensitive substring of the vendor, receipt number or payment.
    pub query: String,
    /// Wildcard patterns on the chart of account. Empty keeps every category.
    pub categories: Vec<String>,
}

impl Filter {
    fn keeps(&self, r: &base::Receipt, query: &str, patterns: &[wildmatch::WildMatch]) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&r.status());
        let dt = r.receipt_time().date();
        let date_ok = if self.include_before_start {
            self.interval.contains_or_precedes(dt)
        } else {
            self.interval.contains(dt)
        };
        let query_ok = query.is_empty()
            || [r.vendor_name(), r.receipt_number(), r.payment()]
                .iter()
                .any(|s| s.to_lowercase().contains(query));
        let category_ok =
            patterns.is_empty() || patterns.iter().any(|p| p.matches(r.chart_of_account()));
        status_ok && date_ok && query_ok && category_ok
    }

    fn compile(&self) -> (String, Vec<wildmatch::WildMatch>) {
        let query = self.query.trim().to_lowercase();
        let patterns = self
            .categories
            .iter()
            .map(|s| wildmatch::WildMatch::new(s))
            .collect();
        (query, patterns)
    }

    pub fn matches(&self, r: &base::Receipt) -> bool {
        let (query, patterns) = self.compile();
        self.keeps(r, &query, &patterns)
    }

    /// Returns the visible records, in list order.
    pub fn apply<'a>(&self, rl: &'a base::Recordlist) -> Vec<&'a base::ReceiptRecord> {
        let (query, patterns) = self.compile();
        rl.iter()
            .filter(|r| self.keeps(r, &query, &patterns))
            .collect()
    }
}

/// One page of a filtered listing. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: Self::SIZES[0],
        }
    }
}

impl Page {
    /// Page sizes offered to users.
    pub const SIZES: [usize; 3] = [20, 50, 100];

    fn size(self) -> usize {
        self.size.max(1)
    }

    pub fn total_pages(self, n: usize) -> usize {
        n.div_ceil(self.size()).max(1)
    }

    /// The requested page number, clamped to the pages that exist.
    pub fn current(self, n: usize) -> usize {
        self.number.clamp(1, self.total_pages(n))
    }

    fn bounds(self, n: usize) -> (usize, usize) {
        let start = ((self.current(n) - 1) * self.size()).min(n);
        let end = (start + self.size()).min(n);
        (start, end)
    }

    pub fn slice<T>(self, items: &[T]) -> &[T] {
        let (start, end) = self.bounds(items.len());
        &items[start..end]
    }

    /// E.g. `21-40 of 57`, or `0 of 0` when there is nothing to show.
    pub fn range_label(self, n: usize) -> String {
        if n == 0 {
            return "0 of 0".to_string();
        }
        let (start, end) = self.bounds(n);
        format!("{}-{} of {}", start + 1, end, n)
    }
}

/// Records chosen for a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(std::collections::BTreeSet<base::RecordId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: base::RecordId) -> bool {
        self.0.contains(&id)
    }

    pub fn toggle(&mut self, id: base::RecordId) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    /// Whether every record on `page` is selected. An empty page never is.
    pub fn all_selected(&self, page: &[&base::ReceiptRecord]) -> bool {
        !page.is_empty() && page.iter().all(|r| self.contains(r.id()))
    }

    /// Deselects the page if it is fully selected, otherwise selects all of
    /// it. Records on other pages are untouched.
    pub fn toggle_page(&mut self, page: &[&base::ReceiptRecord]) {
        if self.all_selected(page) {
            for r in page {
                self.0.remove(&r.id());
            }
        } else {
            self.0.extend(page.iter().map(|r| r.id()));
        }
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<base::RecordId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<base::RecordId> for Selection {
    fn from_iter<T: IntoIterator<Item = base::RecordId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Summary strip over a filtered listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: base::Cents,
    pub tax: base::Cents,
    pub total: base::Cents,
    pub selected: usize,
    /// Distinct non-empty chart of account labels.
    pub categories: usize,
}

impl Totals {
    pub fn of(records: &[&base::ReceiptRecord], selection: &Selection) -> Self {
        let mut categories = records
            .iter()
            .map(|r| r.chart_of_account())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        categories.sort_unstable();
        categories.dedup();
        Self {
            subtotal: records.iter().map(|r| r.subtotal()).sum(),
            tax: records.iter().map(|r| r.tax()).sum(),
            total: records.iter().map(|r| r.total()).sum(),
            selected: selection.len(),
            categories: categories.len(),
        }
    }
}
