use crate::constants::{MISSING_VALUE, PHASED_SEPARATOR, UNPHASED_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One allele call of a genotype. The phase flag on allele `i > 0` describes
/// the separator written before it; it is ignored on the first allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenotypeAllele {
    Unphased(usize),
    Phased(usize),
    UnphasedMissing,
    PhasedMissing,
}

impl GenotypeAllele {
    pub fn new(index: Option<usize>, phased: bool) -> Self {
        match (index, phased) {
            (Some(idx), false) => GenotypeAllele::Unphased(idx),
            (Some(idx), true) => GenotypeAllele::Phased(idx),
            (None, false) => GenotypeAllele::UnphasedMissing,
            (None, true) => GenotypeAllele::PhasedMissing,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            GenotypeAllele::Unphased(idx) | GenotypeAllele::Phased(idx) => Some(*idx),
            GenotypeAllele::UnphasedMissing | GenotypeAllele::PhasedMissing => None,
        }
    }

    pub fn is_phased(&self) -> bool {
        matches!(
            self,
            GenotypeAllele::Phased(_) | GenotypeAllele::PhasedMissing
        )
    }

    pub fn with_phase(self, phased: bool) -> Self {
        Self::new(self.index(), phased)
    }
}

/// A sample genotype call. An empty genotype is a no-call of ploidy 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genotype(Vec<GenotypeAllele>);

impl Genotype {
    pub fn from_indices<I>(indices: I, phased: bool) -> Self
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        let alleles: Vec<GenotypeAllele> = indices
            .into_iter()
            .map(|idx| GenotypeAllele::new(idx, phased))
            .collect();
        // An all-missing call carries no information beyond "not called".
        if alleles.iter().all(|allele| allele.index().is_none()) {
            return Self::default();
        }
        Self(alleles)
    }

    pub fn alleles(&self) -> &[GenotypeAllele] {
        &self.0
    }

    pub fn ploidy(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> Vec<Option<usize>> {
        self.0.iter().map(GenotypeAllele::index).collect()
    }

    /// Fully called diploid-or-higher genotype: every allele index is known.
    fn called_indices(&self) -> Option<Vec<usize>> {
        if self.ploidy() < 2 {
            return None;
        }
        self.0.iter().map(GenotypeAllele::index).collect()
    }

    pub fn is_homozygous(&self) -> bool {
        self.called_indices()
            .is_some_and(|indices| indices.windows(2).all(|pair| pair[0] == pair[1]))
    }

    pub fn is_heterozygous(&self) -> bool {
        self.called_indices()
            .is_some_and(|indices| indices.windows(2).any(|pair| pair[0] != pair[1]))
    }

    pub fn is_phased(&self) -> bool {
        self.ploidy() >= 2 && self.0.iter().skip(1).all(GenotypeAllele::is_phased)
    }

    pub fn set_phased(&mut self, phased: bool) {
        for allele in self.0.iter_mut() {
            *allele = allele.with_phase(phased);
        }
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{MISSING_VALUE}");
        }
        for (i, allele) in self.0.iter().enumerate() {
            if i > 0 {
                let sep = if allele.is_phased() {
                    PHASED_SEPARATOR
                } else {
                    UNPHASED_SEPARATOR
                };
                write!(f, "{sep}")?;
            }
            match allele.index() {
                Some(idx) => write!(f, "{idx}")?,
                None => write!(f, "{MISSING_VALUE}")?,
            }
        }
        Ok(())
    }
}

/// Input to allele-string genotype assignment. Integer inputs are carried
/// through so they can be rejected with a pointer to the index setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlleleValue {
    Allele(String),
    Index(i64),
    Missing,
}

impl From<&str> for AlleleValue {
    fn from(allele: &str) -> Self {
        AlleleValue::Allele(allele.to_string())
    }
}

impl From<String> for AlleleValue {
    fn from(allele: String) -> Self {
        AlleleValue::Allele(allele)
    }
}

impl From<&String> for AlleleValue {
    fn from(allele: &String) -> Self {
        AlleleValue::Allele(allele.clone())
    }
}

impl<T: Into<AlleleValue>> From<Option<T>> for AlleleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AlleleValue::Missing, Into::into)
    }
}

macro_rules! allele_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AlleleValue {
                fn from(index: $t) -> Self {
                    AlleleValue::Index(index as i64)
                }
            }
        )*
    };
}

allele_value_from_int!(i32, i64, u32, usize);
