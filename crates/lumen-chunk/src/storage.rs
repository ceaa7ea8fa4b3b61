/// One light channel of a chunk.
///
/// Freshly generated chunks usually hold a single value everywhere (all dark, or
/// all full sky), so storage starts `Uniform` and inflates on the first write that
/// differs. [`LightStorage::deflate`] collapses it back when possible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LightStorage {
    Uniform { len: usize, value: u8 },
    Dense(Box<[u8]>),
}

impl LightStorage {
    #[inline]
    pub fn uniform(len: usize, value: u8) -> Self {
        LightStorage::Uniform { len, value }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            LightStorage::Uniform { len, .. } => *len,
            LightStorage::Dense(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_uniform(&self) -> bool {
        matches!(self, LightStorage::Uniform { .. })
    }

    #[inline]
    pub fn get(&self, idx: usize) -> u8 {
        match self {
            LightStorage::Uniform { value, .. } => *value,
            LightStorage::Dense(v) => v[idx],
        }
    }

    pub fn set(&mut self, idx: usize, value: u8) {
        match self {
            LightStorage::Uniform { len, value: cur } => {
                if *cur == value {
                    return;
                }
                let mut dense = vec![*cur; *len].into_boxed_slice();
                dense[idx] = value;
                *self = LightStorage::Dense(dense);
            }
            LightStorage::Dense(v) => v[idx] = value,
        }
    }

    /// Collapse dense storage back to uniform when every entry matches.
    /// Returns true if storage is uniform afterwards.
    pub fn deflate(&mut self) -> bool {
        if let LightStorage::Dense(v) = self {
            let Some(&first) = v.first() else {
                return false;
            };
            if v.iter().all(|&b| b == first) {
                *self = LightStorage::Uniform {
                    len: v.len(),
                    value: first,
                };
            }
        }
        self.is_uniform()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}
