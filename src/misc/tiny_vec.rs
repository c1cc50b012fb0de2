use std::fmt::Debug;

/// Fixed-capacity inline vector. Elements are stored compactly in the first
/// `len` slots, so removal shifts the tail left to keep insertion order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TinyVec<T, const N: usize>
where
    T: Copy,
{
    data: [Option<T>; N],
    len: u8,
}

impl<T, const N: usize> TinyVec<T, N>
where
    T: Copy + PartialEq,
{
    pub const fn new() -> Self {
        const { assert!(N <= 255, "TinyVec supports up to 255 elements") }
        TinyVec {
            data: [const { None }; N],
            len: 0,
        }
    }

    /// Appends `value`. Returns `false` and leaves the vector untouched when it is full.
    pub fn push(&mut self, value: T) -> bool {
        if (self.len as usize) < N {
            self.data[self.len as usize] = Some(value);
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Appends `value` unless an equal element is already present.
    pub fn push_unique(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.push(value)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn clear(&mut self) {
        self.data = [const { None }; N];
        self.len = 0;
    }

    pub fn get(&self, index: usize) -> Option<T> {
        if index < self.len as usize {
            self.data[index]
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data[..self.len as usize].iter().flatten().copied()
    }

    pub fn contains(&self, element: &T) -> bool {
        self.iter().any(|x| x == *element)
    }

    /// Removes the first element equal to `element`.
    pub fn remove(&mut self, element: &T) -> bool {
        let len = self.len as usize;
        match self.data[..len].iter().position(|x| x.as_ref() == Some(element)) {
            Some(pos) => {
                for i in pos..len - 1 {
                    self.data[i] = self.data[i + 1];
                }
                self.data[len - 1] = None;
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Keeps only the elements for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(T) -> bool) {
        let mut kept = Self::new();
        for value in self.iter() {
            if keep(value) {
                kept.push(value);
            }
        }
        *self = kept;
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T, const N: usize> Default for TinyVec<T, N>
where
    T: Copy + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FromIterator<T> for TinyVec<T, N>
where
    T: Copy + PartialEq,
{
    /// Collects up to `N` elements; the rest are dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        for value in iter.into_iter().take(N) {
            vec.push(value);
        }
        vec
    }
}

impl<T, const N: usize> Debug for TinyVec<T, N>
where
    T: Copy + PartialEq + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
