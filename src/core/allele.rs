use crate::{constants::MISSING_VALUE, error::VcfError, utils::util::Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered REF + ALT alleles of a record. Index 0 is always the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AlleleSet {
    alleles: Vec<String>,
}

impl AlleleSet {
    pub fn new<I, S>(alleles: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alleles: Vec<String> = alleles.into_iter().map(Into::into).collect();
        if alleles.is_empty() {
            return Err(VcfError::InvalidAlleleSet {
                reason: "at least the reference allele is required".to_string(),
            });
        }
        for (idx, allele) in alleles.iter().enumerate() {
            if allele.is_empty() {
                return Err(VcfError::InvalidAlleleSet {
                    reason: format!("allele {idx} is empty"),
                });
            }
            if allele
                .chars()
                .any(|c| c.is_whitespace() || c == ',' || c == ';')
            {
                return Err(VcfError::InvalidAlleleSet {
                    reason: format!("allele {idx} ({allele:?}) contains a separator character"),
                });
            }
        }
        Ok(Self { alleles })
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    // Never true for a constructed set; kept for the len/is_empty pairing.
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    pub fn index_of(&self, allele: &str) -> Option<usize> {
        self.alleles.iter().position(|a| a == allele)
    }

    pub fn at(&self, index: usize) -> Result<&str> {
        self.alleles
            .get(index)
            .map(String::as_str)
            .ok_or(VcfError::OutOfRange {
                what: "allele set",
                index,
                len: self.alleles.len(),
            })
    }

    pub fn reference(&self) -> &str {
        &self.alleles[0]
    }

    pub fn alts(&self) -> &[String] {
        &self.alleles[1..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.alleles.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for AlleleSet {
    type Error = VcfError;

    fn try_from(alleles: Vec<String>) -> Result<Self> {
        Self::new(alleles)
    }
}

impl From<AlleleSet> for Vec<String> {
    fn from(set: AlleleSet) -> Self {
        set.alleles
    }
}

/// Renders the REF and ALT columns separated by a tab.
impl fmt::Display for AlleleSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t", self.reference())?;
        if self.alts().is_empty() {
            write!(f, "{MISSING_VALUE}")
        } else {
            write!(f, "{}", self.alts().join(","))
        }
    }
}
