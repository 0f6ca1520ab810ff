use super::{
    field::FieldValue,
    genotype::{AlleleValue, Genotype},
};
use crate::{
    constants::GT_KEY,
    core::{
        allele::AlleleSet,
        header::{FieldNumber, VariantHeader},
    },
    error::VcfError,
    utils::util::Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-sample storage owned by a `VariantRecord`. Access goes through the
/// `Sample` / `SampleMut` views, which carry the record's alleles and header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    pub(crate) genotype: Genotype,
    pub(crate) fields: HashMap<String, FieldValue>,
}

#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub(super) name: &'a str,
    pub(super) alleles: &'a AlleleSet,
    pub(super) header: &'a VariantHeader,
    pub(super) data: &'a SampleData,
}

impl<'a> Sample<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn genotype(&self) -> &'a Genotype {
        &self.data.genotype
    }

    pub fn ploidy(&self) -> usize {
        self.data.genotype.ploidy()
    }

    pub fn allele_indices(&self) -> Vec<Option<usize>> {
        self.data.genotype.indices()
    }

    pub fn get_genotype_alleles(&self) -> Vec<Option<&'a str>> {
        self.data
            .genotype
            .indices()
            .into_iter()
            .map(|idx| idx.and_then(|idx| self.alleles.at(idx).ok()))
            .collect()
    }

    pub fn is_homozygous(&self) -> bool {
        self.data.genotype.is_homozygous()
    }

    pub fn is_heterozygous(&self) -> bool {
        self.data.genotype.is_heterozygous()
    }

    pub fn phased(&self) -> bool {
        self.data.genotype.is_phased()
    }

    /// Raw stored value, `None` if the field was never set for this sample.
    pub fn field(&self, id: &str) -> Option<&'a FieldValue> {
        self.data.fields.get(id)
    }

    /// Stored value of a declared FORMAT field, or its missing sentinel.
    /// `GT` is returned in its text form.
    pub fn get_field(&self, id: &str) -> Result<FieldValue> {
        let descriptor = self.header.format(id)?;
        if id == GT_KEY {
            if self.data.genotype.is_empty() {
                return Ok(FieldValue::missing(descriptor.field_type));
            }
            return Ok(FieldValue::from(self.data.genotype.to_string()));
        }
        Ok(self
            .data
            .fields
            .get(id)
            .cloned()
            .unwrap_or_else(|| FieldValue::missing(descriptor.field_type)))
    }
}

pub struct SampleMut<'a> {
    pub(super) name: &'a str,
    pub(super) alleles: &'a AlleleSet,
    pub(super) header: &'a VariantHeader,
    pub(super) data: &'a mut SampleData,
    pub(super) format_order: &'a mut Vec<String>,
}

impl<'a> SampleMut<'a> {
    pub fn as_sample(&self) -> Sample<'_> {
        Sample {
            name: self.name,
            alleles: self.alleles,
            header: self.header,
            data: &*self.data,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn ploidy(&self) -> usize {
        self.data.genotype.ploidy()
    }

    pub fn allele_indices(&self) -> Vec<Option<usize>> {
        self.data.genotype.indices()
    }

    pub fn get_genotype_alleles(&self) -> Vec<Option<&str>> {
        self.as_sample().get_genotype_alleles()
    }

    pub fn is_homozygous(&self) -> bool {
        self.data.genotype.is_homozygous()
    }

    pub fn is_heterozygous(&self) -> bool {
        self.data.genotype.is_heterozygous()
    }

    pub fn phased(&self) -> bool {
        self.data.genotype.is_phased()
    }

    pub fn get_field(&self, id: &str) -> Result<FieldValue> {
        self.as_sample().get_field(id)
    }

    pub fn set_field(&mut self, id: &str, value: impl Into<FieldValue>) -> Result<()> {
        if id == GT_KEY {
            return Err(crate::vcf_error!(
                "GT cannot be set as a plain field; use set_genotype or set_genotype_indices"
            ));
        }
        let descriptor = self.header.format(id)?;
        let ploidy = self.value_ploidy(self.data.genotype.ploidy());

        let validated = value
            .into()
            .validate(descriptor, self.alleles.len(), ploidy)
            .inspect_err(|e| log::debug!("Sample {}: rejected {id}: {e}", self.name))?;

        match validated {
            Some(value) => {
                log::trace!("Sample {}: {id} = {:?}", self.name, value);
                if !self.format_order.iter().any(|key| key == id) {
                    self.format_order.push(id.to_string());
                }
                self.data.fields.insert(id.to_string(), value);
            }
            None => {
                log::trace!("Sample {}: {id} cleared", self.name);
                self.data.fields.remove(id);
            }
        }
        Ok(())
    }

    pub fn clear_field(&mut self, id: &str) -> Result<()> {
        if id == GT_KEY {
            self.header.format(id)?;
            return self.clear_genotype();
        }
        self.set_field(id, FieldValue::Missing)
    }

    /// Assigns the genotype from allele strings. Missing entries are allowed;
    /// an input with no called allele clears the genotype. Integer entries are
    /// rejected: indices go through `set_genotype_indices`.
    pub fn set_genotype<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<AlleleValue>,
    {
        self.header.format(GT_KEY)?;
        let values: Vec<AlleleValue> = values.into_iter().map(Into::into).collect();

        if values
            .iter()
            .any(|value| matches!(value, AlleleValue::Index(_)))
        {
            log::debug!("Sample {}: rejected integer genotype {:?}", self.name, values);
            return Err(VcfError::IntegerAllele);
        }

        let indices = values
            .iter()
            .map(|value| match value {
                AlleleValue::Allele(allele) => {
                    self.alleles.index_of(allele).map(Some).ok_or_else(|| {
                        log::debug!(
                            "Sample {}: allele {allele:?} not in {:?}",
                            self.name,
                            self.alleles
                        );
                        VcfError::UndefinedAllele
                    })
                }
                AlleleValue::Missing | AlleleValue::Index(_) => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;

        self.store_genotype(indices)
    }

    pub fn set_genotype_indices<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        self.header.format(GT_KEY)?;
        let indices: Vec<Option<usize>> = values.into_iter().collect();
        if let Some(index) = indices
            .iter()
            .flatten()
            .copied()
            .find(|idx| *idx >= self.alleles.len())
        {
            return Err(VcfError::OutOfRange {
                what: "allele set",
                index,
                len: self.alleles.len(),
            });
        }

        self.store_genotype(indices)
    }

    /// Removes the call. Fails like the setters when a stored `Number=G`
    /// value does not fit the default ploidy.
    pub fn clear_genotype(&mut self) -> Result<()> {
        self.check_genotype_fields(0)?;
        self.data.genotype = Genotype::default();
        Ok(())
    }

    /// Marks every separator of the current genotype as phased or unphased.
    /// No-op for an empty genotype.
    pub fn set_phased(&mut self, phased: bool) {
        self.data.genotype.set_phased(phased);
    }

    /// Ploidy used to size `Number=G` values: the call's ploidy, or the
    /// configured default when there is no call.
    fn value_ploidy(&self, ploidy: usize) -> usize {
        match ploidy {
            0 => self.header.config().default_ploidy,
            ploidy => ploidy,
        }
    }

    // Stored Number=G values must still fit once the genotype has `ploidy` alleles.
    fn check_genotype_fields(&self, ploidy: usize) -> Result<()> {
        let ploidy = self.value_ploidy(ploidy);
        if ploidy == self.value_ploidy(self.data.genotype.ploidy()) {
            return Ok(());
        }
        for (id, value) in &self.data.fields {
            let descriptor = self.header.format(id)?;
            if descriptor.number != FieldNumber::Genotypes {
                continue;
            }
            value
                .clone()
                .validate(descriptor, self.alleles.len(), ploidy)
                .inspect_err(|e| {
                    log::debug!(
                        "Sample {}: ploidy {ploidy} conflicts with stored {id}: {e}",
                        self.name
                    )
                })?;
        }
        Ok(())
    }

    fn store_genotype(&mut self, indices: Vec<Option<usize>>) -> Result<()> {
        let phased = self.data.genotype.is_phased();
        let genotype = Genotype::from_indices(indices, phased);
        self.check_genotype_fields(genotype.ploidy())?;
        self.data.genotype = genotype;
        log::trace!("Sample {}: GT = {}", self.name, self.data.genotype);
        Ok(())
    }
}
