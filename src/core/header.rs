use crate::{
    constants::{HeaderConfig, GT_KEY, PASS_FILTER},
    error::VcfError,
    utils::util::Result,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Info,
    Format,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Info => "INFO",
            FieldKind::Format => "FORMAT",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value count of a field (the `Number=` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldNumber {
    Fixed(usize),
    /// `A`: one value per alternate allele.
    AltAlleles,
    /// `R`: one value per allele, reference included.
    Alleles,
    /// `G`: one value per possible genotype.
    Genotypes,
    /// `.`: any number of values.
    Variable,
}

impl fmt::Display for FieldNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldNumber::Fixed(n) => write!(f, "{n}"),
            FieldNumber::AltAlleles => write!(f, "A"),
            FieldNumber::Alleles => write!(f, "R"),
            FieldNumber::Genotypes => write!(f, "G"),
            FieldNumber::Variable => write!(f, "."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    Float,
    String,
    Flag,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer => write!(f, "Integer"),
            FieldType::Float => write!(f, "Float"),
            FieldType::String => write!(f, "String"),
            FieldType::Flag => write!(f, "Flag"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub kind: FieldKind,
    pub number: FieldNumber,
    pub field_type: FieldType,
    pub description: String,
}

impl FieldDescriptor {
    fn same_definition(&self, other: &FieldDescriptor) -> bool {
        self.number == other.number
            && self.field_type == other.field_type
            && self.description == other.description
    }

    fn summary(&self) -> String {
        format!("Number={},Type={}", self.number, self.field_type)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "##{}=<ID={},Number={},Type={},Description=\"{}\">",
            self.kind,
            self.id,
            self.number,
            self.field_type,
            self.description.replace('"', "\\\"")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterDescriptor {
    id: String,
    description: String,
}

/// Field schema, contigs and sample names shared by every record built
/// against it. Records hold it behind an `Arc`, so it is read-only once a
/// record exists.
#[derive(Debug, Clone)]
pub struct VariantHeader {
    config: HeaderConfig,
    contigs: Vec<(String, Option<u64>)>,
    filters: Vec<FilterDescriptor>,
    info: Vec<FieldDescriptor>,
    formats: Vec<FieldDescriptor>,
    samples: Vec<String>,
    sample_index: HashMap<String, usize>,
}

impl Default for VariantHeader {
    fn default() -> Self {
        Self::with_config(HeaderConfig::default())
    }
}

impl VariantHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeaderConfig) -> Self {
        Self {
            config,
            contigs: Vec::new(),
            filters: vec![FilterDescriptor {
                id: PASS_FILTER.to_string(),
                description: "All filters passed".to_string(),
            }],
            info: Vec::new(),
            formats: Vec::new(),
            samples: Vec::new(),
            sample_index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn add_sample(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        validate_identifier("sample", &name, &['\t', '\n', '\r'])?;
        if self.sample_index.contains_key(&name) {
            return Err(crate::vcf_error!("Duplicate sample name {name} in header"));
        }
        let idx = self.samples.len();
        self.sample_index.insert(name.clone(), idx);
        self.samples.push(name);
        Ok(idx)
    }

    pub fn add_samples<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_sample(name)?;
        }
        Ok(())
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn sample_index(&self, name: &str) -> Option<usize> {
        self.sample_index.get(name).copied()
    }

    pub fn add_contig(&mut self, name: impl Into<String>, length: Option<u64>) -> Result<()> {
        let name = name.into();
        validate_identifier("contig", &name, &['\t', '\n', '\r', ' ', ',', '<', '>'])?;
        if let Some(existing) = self.contigs.iter().find(|(id, _)| *id == name) {
            if existing.1 != length {
                return Err(crate::vcf_error!(
                    "Contig {name} is already defined with a different length"
                ));
            }
            return Ok(());
        }
        self.contigs.push((name, length));
        Ok(())
    }

    pub fn has_contig(&self, name: &str) -> bool {
        self.contigs.iter().any(|(id, _)| id == name)
    }

    /// Declared length of a contig, `None` if unknown or declared without one.
    pub fn contig_length(&self, name: &str) -> Option<u64> {
        self.contigs
            .iter()
            .find(|(id, _)| id == name)
            .and_then(|(_, length)| *length)
    }

    pub fn add_filter(
        &mut self,
        id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let id = id.into();
        validate_identifier("FILTER", &id, &['\t', '\n', '\r', ' ', ';', ','])?;
        let description = description.into();
        if let Some(existing) = self.filters.iter_mut().find(|f| f.id == id) {
            // PASS ships with a default description that callers may override.
            if existing.id == PASS_FILTER {
                existing.description = description;
                return Ok(());
            }
            if existing.description != description {
                return Err(VcfError::SchemaConflict {
                    kind: "FILTER",
                    id,
                    existing: existing.description.clone(),
                    requested: description,
                });
            }
            return Ok(());
        }
        self.filters.push(FilterDescriptor { id, description });
        Ok(())
    }

    pub fn has_filter(&self, id: &str) -> bool {
        self.filters.iter().any(|f| f.id == id)
    }

    pub fn add_format(
        &mut self,
        id: impl Into<String>,
        number: FieldNumber,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Result<()> {
        self.declare(FieldKind::Format, id.into(), number, field_type, description.into())
    }

    pub fn add_info(
        &mut self,
        id: impl Into<String>,
        number: FieldNumber,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Result<()> {
        self.declare(FieldKind::Info, id.into(), number, field_type, description.into())
    }

    /// Declares the standard `GT` FORMAT field.
    pub fn add_genotype_format(&mut self) -> Result<()> {
        self.add_format(GT_KEY, FieldNumber::Fixed(1), FieldType::String, "Genotype")
    }

    pub fn declare(
        &mut self,
        kind: FieldKind,
        id: String,
        number: FieldNumber,
        field_type: FieldType,
        description: String,
    ) -> Result<()> {
        validate_identifier(kind.as_str(), &id, &['\t', '\n', '\r', ' ', ':', ';', '=', ','])?;
        let descriptor = FieldDescriptor {
            id,
            kind,
            number,
            field_type,
            description,
        };
        Self::validate_descriptor(&descriptor)?;

        let fields = match kind {
            FieldKind::Info => &mut self.info,
            FieldKind::Format => &mut self.formats,
        };
        if let Some(existing) = fields.iter().find(|f| f.id == descriptor.id) {
            if existing.same_definition(&descriptor) {
                log::trace!("Header: {} {} re-declared identically", kind, descriptor.id);
                return Ok(());
            }
            return Err(VcfError::SchemaConflict {
                kind: kind.as_str(),
                id: descriptor.id.clone(),
                existing: existing.summary(),
                requested: descriptor.summary(),
            });
        }

        log::debug!(
            "Header: declared {} {} ({})",
            kind,
            descriptor.id,
            descriptor.summary()
        );
        fields.push(descriptor);
        Ok(())
    }

    fn validate_descriptor(descriptor: &FieldDescriptor) -> Result<()> {
        let kind = descriptor.kind.as_str();
        match (descriptor.kind, descriptor.field_type) {
            (FieldKind::Format, FieldType::Flag) => {
                return Err(crate::vcf_error!(
                    "Unsupported FORMAT type Flag for tag {}",
                    descriptor.id
                ));
            }
            (FieldKind::Info, FieldType::Flag) if descriptor.number != FieldNumber::Fixed(0) => {
                return Err(crate::vcf_error!(
                    "{kind} Flag {} must be declared with Number=0",
                    descriptor.id
                ));
            }
            (_, FieldType::Flag) => {}
            (_, _) if descriptor.number == FieldNumber::Fixed(0) => {
                return Err(crate::vcf_error!(
                    "{kind} field {} has Number=0 but Type={}",
                    descriptor.id,
                    descriptor.field_type
                ));
            }
            _ => {}
        }
        if descriptor.id == GT_KEY
            && descriptor.kind == FieldKind::Format
            && (descriptor.number != FieldNumber::Fixed(1)
                || descriptor.field_type != FieldType::String)
        {
            return Err(crate::vcf_error!(
                "FORMAT GT must be declared as Number=1,Type=String"
            ));
        }
        Ok(())
    }

    pub fn lookup(&self, kind: FieldKind, id: &str) -> Result<&FieldDescriptor> {
        let fields = match kind {
            FieldKind::Info => &self.info,
            FieldKind::Format => &self.formats,
        };
        fields
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| VcfError::UnknownField {
                kind: kind.as_str(),
                id: id.to_string(),
            })
    }

    pub fn format(&self, id: &str) -> Result<&FieldDescriptor> {
        self.lookup(FieldKind::Format, id)
    }

    pub fn info(&self, id: &str) -> Result<&FieldDescriptor> {
        self.lookup(FieldKind::Info, id)
    }

    pub fn formats(&self) -> &[FieldDescriptor] {
        &self.formats
    }

    pub fn infos(&self) -> &[FieldDescriptor] {
        &self.info
    }

    /// Header lines (`##` meta lines and the `#CHROM` column line), each
    /// terminated by a newline.
    pub fn to_text(&self) -> String {
        let mut out = format!("##fileformat={}\n", self.config.fileformat);
        for filter in &self.filters {
            out.push_str(&format!(
                "##FILTER=<ID={},Description=\"{}\">\n",
                filter.id,
                filter.description.replace('"', "\\\"")
            ));
        }
        for descriptor in self.info.iter().chain(self.formats.iter()) {
            out.push_str(&format!("{descriptor}\n"));
        }
        for (name, length) in &self.contigs {
            match length {
                Some(length) => out.push_str(&format!("##contig=<ID={name},length={length}>\n")),
                None => out.push_str(&format!("##contig=<ID={name}>\n")),
            }
        }
        out.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO");
        if !self.samples.is_empty() {
            out.push_str("\tFORMAT");
            for sample in &self.samples {
                out.push('\t');
                out.push_str(sample);
            }
        }
        out.push('\n');
        out
    }
}

fn validate_identifier(what: &str, id: &str, forbidden: &[char]) -> Result<()> {
    if id.is_empty() {
        return Err(crate::vcf_error!("Empty {what} identifier"));
    }
    if id.chars().any(|c| forbidden.contains(&c)) {
        return Err(crate::vcf_error!(
            "Invalid {what} identifier {id:?}: contains a reserved character"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_header() -> VariantHeader {
        let mut header = VariantHeader::new();
        header.add_samples(["sample1", "sample2"]).unwrap();
        header.add_contig("1", None).unwrap();
        header
    }

    #[test]
    fn samples_keep_declaration_order_and_reject_duplicates() {
        let mut header = make_header();
        assert_eq!(header.samples(), &["sample1".to_string(), "sample2".to_string()]);
        assert_eq!(header.sample_index("sample2"), Some(1));
        assert_eq!(header.sample_index("sample3"), None);

        let err = header.add_sample("sample1").unwrap_err();
        assert!(err.to_string().contains("Duplicate sample name sample1"));
        assert_eq!(header.sample_count(), 2);
    }

    #[test]
    fn lookup_of_undeclared_field_fails() {
        let header = make_header();
        let err = header.format("AN").unwrap_err();
        assert_eq!(
            err,
            VcfError::UnknownField {
                kind: "FORMAT",
                id: "AN".to_string()
            }
        );
        assert!(header.info("AN").is_err());
    }

    #[test]
    fn identical_redeclaration_is_a_no_op() {
        let mut header = make_header();
        header
            .add_format("AN", FieldNumber::Fixed(1), FieldType::String, "An annotation")
            .unwrap();
        header
            .add_format("AN", FieldNumber::Fixed(1), FieldType::String, "An annotation")
            .unwrap();
        assert_eq!(header.formats().len(), 1);
    }

    #[test]
    fn conflicting_redeclaration_fails_fast() {
        let mut header = make_header();
        header
            .add_format("DP", FieldNumber::Fixed(1), FieldType::Integer, "Depth")
            .unwrap();
        let err = header
            .add_format("DP", FieldNumber::Fixed(1), FieldType::Float, "Depth")
            .unwrap_err();
        assert!(matches!(err, VcfError::SchemaConflict { kind: "FORMAT", .. }));
        assert_eq!(header.format("DP").unwrap().field_type, FieldType::Integer);

        // Same id in the INFO namespace is a separate field.
        header
            .add_info("DP", FieldNumber::Fixed(1), FieldType::Float, "Depth")
            .unwrap();
    }

    #[test]
    fn invalid_descriptors_are_rejected() {
        let mut header = make_header();
        assert!(header
            .add_format("FL", FieldNumber::Fixed(0), FieldType::Flag, "")
            .is_err());
        assert!(header
            .add_info("FL", FieldNumber::Fixed(1), FieldType::Flag, "")
            .is_err());
        assert!(header
            .add_info("Z", FieldNumber::Fixed(0), FieldType::Integer, "")
            .is_err());
        assert!(header
            .add_format("GT", FieldNumber::Fixed(2), FieldType::Integer, "")
            .is_err());
        assert!(header
            .add_format("A:B", FieldNumber::Fixed(1), FieldType::String, "")
            .is_err());
        assert!(header.formats().is_empty());
        header
            .add_info("DB", FieldNumber::Fixed(0), FieldType::Flag, "dbSNP")
            .unwrap();
    }

    #[test]
    fn header_text_lists_definitions_and_samples() {
        let mut header = make_header();
        header.add_genotype_format().unwrap();
        header
            .add_info("DB", FieldNumber::Fixed(0), FieldType::Flag, "dbSNP \"member\"")
            .unwrap();
        header.add_filter("q10", "Quality below 10").unwrap();

        let text = header.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "##fileformat=VCFv4.3",
                "##FILTER=<ID=PASS,Description=\"All filters passed\">",
                "##FILTER=<ID=q10,Description=\"Quality below 10\">",
                "##INFO=<ID=DB,Number=0,Type=Flag,Description=\"dbSNP \\\"member\\\"\">",
                "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">",
                "##contig=<ID=1>",
                "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample1\tsample2",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn filters_and_contigs_are_registered() {
        let mut header = make_header();
        assert!(header.has_filter("PASS"));
        assert!(!header.has_filter("q10"));
        header.add_filter("q10", "Quality below 10").unwrap();
        assert!(header.has_filter("q10"));
        assert!(matches!(
            header.add_filter("q10", "Other").unwrap_err(),
            VcfError::SchemaConflict { kind: "FILTER", .. }
        ));

        assert!(header.has_contig("1"));
        header.add_contig("1", None).unwrap();
        assert!(header.add_contig("1", Some(100)).is_err());
        header.add_contig("chr2", Some(2_000)).unwrap();
        assert!(header.to_text().contains("##contig=<ID=chr2,length=2000>\n"));
        assert_eq!(header.contig_length("chr2"), Some(2_000));
        assert_eq!(header.contig_length("1"), None);
        assert_eq!(header.contig_length("chrX"), None);
    }
}
