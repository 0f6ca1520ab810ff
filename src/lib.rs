pub mod error;

pub mod core {
    pub mod allele;
    pub mod header;
    pub mod variant;
}

pub mod io {
    pub mod vcf_text;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
pub use crate::core::{
    allele::AlleleSet,
    header::{FieldDescriptor, FieldKind, FieldNumber, FieldType, VariantHeader},
    variant::{
        AlleleValue, FieldValue, Genotype, GenotypeAllele, Sample, SampleData, SampleMut,
        VariantRecord,
    },
};
pub use error::{VcfError, VcfResult};
