use crate::base;

/// An immutable snapshot of the receipt collection, ordered newest first by
/// receipt time. Receipts with equal times are ordered by descending id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recordlist(Vec<base::ReceiptRecord>);

fn order(a: &base::ReceiptRecord, b: &base::ReceiptRecord) -> std::cmp::Ordering {
    b.receipt_time()
        .cmp(&a.receipt_time())
        .then_with(|| b.id().cmp(&a.id()))
}

impl Recordlist {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_vec(mut inner: Vec<base::ReceiptRecord>) -> Self {
        inner.sort_by(order);
        Self(inner)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, id: base::RecordId) -> Option<&base::ReceiptRecord> {
        self.0.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: base::RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the largest id in the list.
    pub fn max_id(&self) -> Option<base::RecordId> {
        self.0.iter().map(base::ReceiptRecord::id).max()
    }

    pub fn insert(&mut self, r: base::ReceiptRecord) {
        let i = self.0.partition_point(|x| order(x, &r).is_lt());
        self.0.insert(i, r);
    }

    /// Applies `update` to every record whose id is in `ids`. Returns the number
    /// of records updated.
    pub(crate) fn update(&mut self, ids: &[base::RecordId], update: &base::FieldUpdate) -> usize {
        let mut n = 0;
        for r in self.0.iter_mut().filter(|r| ids.contains(&r.id())) {
            r.apply(update);
            n += 1;
        }
        n
    }

    pub fn iter(&self) -> impl Iterator<Item = &base::ReceiptRecord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Recordlist {
    type Item = &'a base::ReceiptRecord;
    type IntoIter = std::slice::Iter<'a, base::ReceiptRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<base::ReceiptRecord> for Recordlist {
    fn from_iter<T: IntoIterator<Item = base::ReceiptRecord>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Recordlist {
    /// Writes a terminating newline.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in self.iter() {
            writeln!(f, "{}", r)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid record at line {line}")]
pub struct ParseError {
    line: usize,
    source: serde_json::Error,
}

impl std::str::FromStr for Recordlist {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, x)| !x.is_empty())
            .map(|(i, x)| {
                x.parse::<base::ReceiptRecord>().map_err(|e| ParseError {
                    line: i + 1,
                    source: e,
                })
            })
            .collect::<Result<Self, _>>()
    }
}

impl TryFrom<&str> for Recordlist {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}
