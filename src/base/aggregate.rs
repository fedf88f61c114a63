/// Per-key running sums plus a grand total. Keys iterate in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate<K, V> {
    m: std::collections::BTreeMap<K, V>,
    sum: V,
}

impl<K, V> Default for Aggregate<K, V>
where
    V: Default,
{
    fn default() -> Self {
        Self {
            m: Default::default(),
            sum: Default::default(),
        }
    }
}

impl<K, V> Aggregate<K, V> {
    pub fn sum(&self) -> V
    where
        V: Copy,
    {
        self.sum
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn add(&mut self, key: K, value: V)
    where
        K: Ord,
        V: Copy + Default + std::ops::AddAssign,
    {
        *(self.m.entry(key).or_default()) += value;
        self.sum += value;
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        K: Ord,
        V: Copy,
    {
        self.m.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, V)> + '_
    where
        V: Copy,
    {
        self.m.iter().map(|(k, &v)| (k, v))
    }

    /// Consumes the aggregate into `(key, value)` pairs in ascending key order.
    pub fn into_vec(self) -> Vec<(K, V)> {
        self.m.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Aggregate<K, V>
where
    K: Ord,
    V: Copy + Default + std::ops::AddAssign,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut agg = Aggregate::<K, V>::default();
        for (k, v) in iter {
            agg.add(k, v);
        }
        agg
    }
}
