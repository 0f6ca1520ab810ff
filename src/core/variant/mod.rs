mod field;
mod genotype;
mod sample;


pub use field::FieldValue;
pub use genotype::{AlleleValue, Genotype, GenotypeAllele};
pub use sample::{Sample, SampleData, SampleMut};

use crate::{
    constants::{GT_KEY, MAX_POSITION, MISSING_VALUE, PASS_FILTER},
    core::{allele::AlleleSet, header::VariantHeader},
    error::VcfError,
    utils::util::Result,
};
use std::sync::Arc;

/// A single VCF data line: fixed columns, INFO values and one `SampleData`
/// per sample declared in the header.
#[derive(Debug, Clone)]
pub struct VariantRecord {
    header: Arc<VariantHeader>,
    contig: String,
    start: u64,
    ids: Vec<String>,
    alleles: AlleleSet,
    qual: Option<f32>,
    filters: Vec<String>,
    info: Vec<(String, FieldValue)>,
    format_order: Vec<String>, // non-GT FORMAT keys in first-assignment order
    samples: Vec<SampleData>,
}

impl VariantRecord {
    /// `start` is 0-based; the text form writes `start + 1`. The position must
    /// fit htslib's coordinate range and lie within the contig when its length
    /// is declared.
    pub fn new(
        header: Arc<VariantHeader>,
        contig: impl Into<String>,
        start: u64,
        alleles: AlleleSet,
    ) -> Result<Self> {
        let contig = contig.into();
        if !header.has_contig(&contig) {
            return Err(VcfError::UnknownContig { name: contig });
        }
        let limit = header
            .contig_length(&contig)
            .map_or(MAX_POSITION, |length| length.min(MAX_POSITION));
        if start >= limit {
            return Err(VcfError::InvalidPosition {
                contig,
                pos: start.saturating_add(1),
                limit,
            });
        }
        let samples = vec![SampleData::default(); header.sample_count()];

        log::trace!(
            "Record: {}:{} {} with {} sample(s)",
            contig,
            start + 1,
            alleles,
            samples.len()
        );

        Ok(Self {
            header,
            contig,
            start,
            ids: Vec::new(),
            alleles,
            qual: None,
            filters: Vec::new(),
            info: Vec::new(),
            format_order: Vec::new(),
            samples,
        })
    }

    pub fn header(&self) -> &Arc<VariantHeader> {
        &self.header
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// 1-based position as written in the POS column.
    pub fn pos(&self) -> u64 {
        self.start + 1
    }

    /// 0-based exclusive end, covering the reference allele.
    pub fn stop(&self) -> u64 {
        self.start + self.alleles.reference().len() as u64
    }

    pub fn alleles(&self) -> &AlleleSet {
        &self.alleles
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn add_id(&mut self, id: &str) -> Result<()> {
        if id.is_empty() || id == MISSING_VALUE {
            return Err(crate::vcf_error!("Record ID must be a non-missing value"));
        }
        if id.chars().any(|c| c.is_whitespace() || c == ';') {
            return Err(crate::vcf_error!(
                "Invalid record ID {id:?}: contains whitespace or ';'"
            ));
        }
        if !self.ids.iter().any(|existing| existing == id) {
            self.ids.push(id.to_string());
        }
        Ok(())
    }

    pub fn clear_ids(&mut self) {
        self.ids.clear();
    }

    pub fn qual(&self) -> Option<f32> {
        self.qual
    }

    pub fn set_qual(&mut self, qual: Option<f32>) {
        self.qual = qual;
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Adds a declared filter. `PASS` replaces every other filter, and any
    /// other filter removes `PASS`.
    pub fn add_filter(&mut self, name: &str) -> Result<()> {
        if !self.header.has_filter(name) {
            return Err(VcfError::UnknownFilter {
                name: name.to_string(),
            });
        }
        if name == PASS_FILTER {
            self.filters.clear();
        } else {
            self.filters.retain(|f| f != PASS_FILTER);
        }
        if !self.filters.iter().any(|f| f == name) {
            self.filters.push(name.to_string());
        }
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn info_entries(&self) -> &[(String, FieldValue)] {
        &self.info
    }

    pub fn get_info(&self, id: &str) -> Result<FieldValue> {
        let descriptor = self.header.info(id)?;
        Ok(self
            .info
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| FieldValue::missing(descriptor.field_type)))
    }

    pub fn set_info(&mut self, id: &str, value: impl Into<FieldValue>) -> Result<()> {
        let descriptor = self.header.info(id)?;
        let validated = value.into().validate(
            descriptor,
            self.alleles.len(),
            self.header.config().default_ploidy,
        )?;

        let slot = self.info.iter().position(|(key, _)| key == id);
        match (validated, slot) {
            (Some(value), Some(idx)) => self.info[idx].1 = value,
            (Some(value), None) => self.info.push((id.to_string(), value)),
            (None, Some(idx)) => {
                self.info.remove(idx);
            }
            (None, None) => {}
        }
        Ok(())
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn sample(&self, name: &str) -> Result<Sample<'_>> {
        let idx = self.sample_position(name)?;
        Ok(self.view(idx))
    }

    pub fn sample_mut(&mut self, name: &str) -> Result<SampleMut<'_>> {
        let idx = self.sample_position(name)?;
        Ok(self.view_mut(idx))
    }

    pub fn sample_at(&self, index: usize) -> Result<Sample<'_>> {
        if index >= self.samples.len() {
            return Err(VcfError::OutOfRange {
                what: "samples",
                index,
                len: self.samples.len(),
            });
        }
        Ok(self.view(index))
    }

    pub fn sample_at_mut(&mut self, index: usize) -> Result<SampleMut<'_>> {
        if index >= self.samples.len() {
            return Err(VcfError::OutOfRange {
                what: "samples",
                index,
                len: self.samples.len(),
            });
        }
        Ok(self.view_mut(index))
    }

    /// Samples in header declaration order.
    pub fn samples(&self) -> impl Iterator<Item = Sample<'_>> {
        (0..self.samples.len()).map(move |idx| self.view(idx))
    }

    /// FORMAT keys to write: `GT` first when any sample has a call, then every
    /// other key with at least one non-missing value, in first-assignment order.
    pub fn format_keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.format_order.len() + 1);
        if self.samples.iter().any(|s| !s.genotype.is_empty()) {
            keys.push(GT_KEY);
        }
        for key in &self.format_order {
            let used = self.samples.iter().any(|s| {
                s.fields
                    .get(key)
                    .is_some_and(|value| !value.is_missing())
            });
            if used {
                keys.push(key.as_str());
            }
        }
        keys
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn sample_position(&self, name: &str) -> Result<usize> {
        self.header
            .sample_index(name)
            .ok_or_else(|| VcfError::UnknownSample {
                name: name.to_string(),
            })
    }

    fn view(&self, idx: usize) -> Sample<'_> {
        Sample {
            name: &self.header.samples()[idx],
            alleles: &self.alleles,
            header: &self.header,
            data: &self.samples[idx],
        }
    }

    fn view_mut(&mut self, idx: usize) -> SampleMut<'_> {
        SampleMut {
            name: &self.header.samples()[idx],
            alleles: &self.alleles,
            header: &self.header,
            data: &mut self.samples[idx],
            format_order: &mut self.format_order,
        }
    }
}
