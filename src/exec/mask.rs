use smallvec::SmallVec;

const WORD_BITS: usize = 64;

/// Dense bitset over the elements of an output's value.
///
/// Bits at or above `size` are always zero, so two masks compare equal exactly when they
/// have the same size and the same set bits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mask {
    words: SmallVec<[u64; 2]>,
    size: usize,
}

fn words_for(size: usize) -> usize {
    size.div_ceil(WORD_BITS)
}

impl Mask {
    /// All-zeros mask with `size` elements.
    pub fn new(size: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, words_for(size)),
            size,
        }
    }

    pub fn all_ones(size: usize) -> Self {
        let mut m = Self {
            words: SmallVec::from_elem(u64::MAX, words_for(size)),
            size,
        };
        m.clear_tail();
        m
    }

    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut m = Self::default();
        for (i, bit) in bits.into_iter().enumerate() {
            m.grow(i + 1);
            if bit {
                m.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        m
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Zero-sized mask. An empty mask passed to a removal means "everything".
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_all_zeros(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn is_all_ones(&self) -> bool {
        self.count_ones() == self.size
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_set(&self, index: usize) -> bool {
        index < self.size && self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Set bit `index`, growing the mask when it is out of range.
    pub fn set(&mut self, index: usize) {
        self.grow(index + 1);
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
    }

    /// Union `other` into `self`. An empty `self` adopts `other` as-is.
    pub fn set_or_append(&mut self, other: &Mask) {
        if self.is_empty() {
            self.clone_from(other);
            return;
        }
        self.grow(other.size);
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w |= *o;
        }
    }

    fn grow(&mut self, size: usize) {
        if size > self.size {
            self.words.resize(words_for(size), 0);
            self.size = size;
        }
    }

    fn clear_tail(&mut self) {
        let used = self.size % WORD_BITS;
        if used != 0
            && let Some(last) = self.words.last_mut()
        {
            *last &= (1u64 << used) - 1;
        }
    }
}

impl std::ops::SubAssign<&Mask> for Mask {
    /// Clear every bit set in `rhs`.
    fn sub_assign(&mut self, rhs: &Mask) {
        for (w, o) in self.words.iter_mut().zip(rhs.words.iter()) {
            *w &= !*o;
        }
    }
}

impl std::ops::BitAnd for &Mask {
    type Output = Mask;

    /// Intersection sized to the larger operand; bits past the shorter one are zero.
    fn bitand(self, rhs: &Mask) -> Mask {
        let mut out = Mask::new(self.size.max(rhs.size));
        for ((w, a), b) in out.words.iter_mut().zip(self.words.iter()).zip(rhs.words.iter()) {
            *w = *a & *b;
        }
        out
    }
}

impl std::ops::BitOr for &Mask {
    type Output = Mask;

    fn bitor(self, rhs: &Mask) -> Mask {
        let mut out = Mask::new(self.size.max(rhs.size));
        out.set_or_append(self);
        out.set_or_append(rhs);
        out
    }
}

impl std::fmt::Display for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.size {
            f.write_str(if self.is_set(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/exec/mask.rs"]
mod tests;
