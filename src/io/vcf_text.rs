use crate::{
    constants::{
        FIELD_SEPARATOR, GT_KEY, INFO_SEPARATOR, MISSING_VALUE, SAMPLE_FIELD_SEPARATOR,
    },
    core::{
        header::{FieldNumber, FieldType},
        variant::{FieldValue, Sample, VariantRecord},
    },
    utils::util::format_float,
};
use std::fmt::{self, Write};

/// Writes one VCF data line for `record`, newline included.
pub fn write_record<W: Write>(out: &mut W, record: &VariantRecord) -> fmt::Result {
    let header = record.header();

    write!(out, "{}{FIELD_SEPARATOR}{}", record.contig(), record.pos())?;
    out.write_str(FIELD_SEPARATOR)?;
    if record.ids().is_empty() {
        out.write_str(MISSING_VALUE)?;
    } else {
        out.write_str(&record.ids().join(INFO_SEPARATOR))?;
    }
    write!(out, "{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}", record.alleles())?;
    match record.qual() {
        Some(qual) => out.write_str(&format_float(qual))?,
        None => out.write_str(MISSING_VALUE)?,
    }
    out.write_str(FIELD_SEPARATOR)?;
    if record.filters().is_empty() {
        out.write_str(MISSING_VALUE)?;
    } else {
        out.write_str(&record.filters().join(INFO_SEPARATOR))?;
    }
    out.write_str(FIELD_SEPARATOR)?;
    write_info(out, record)?;

    let keys = record.format_keys();
    if !keys.is_empty() {
        out.write_str(FIELD_SEPARATOR)?;
        out.write_str(&keys.join(SAMPLE_FIELD_SEPARATOR))?;

        let numbers: Vec<FieldNumber> = keys
            .iter()
            .map(|key| {
                header
                    .format(key)
                    .map(|descriptor| descriptor.number)
                    .unwrap_or(FieldNumber::Variable)
            })
            .collect();
        for sample in record.samples() {
            out.write_str(FIELD_SEPARATOR)?;
            write_sample(out, &sample, &keys, &numbers)?;
        }
    }

    out.write_char('\n')
}

fn write_info<W: Write>(out: &mut W, record: &VariantRecord) -> fmt::Result {
    let entries = record.info_entries();
    if entries.is_empty() {
        return out.write_str(MISSING_VALUE);
    }
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.write_str(INFO_SEPARATOR)?;
        }
        let descriptor = record.header().info(key).ok();
        match (value, descriptor.map(|d| d.field_type)) {
            (FieldValue::Flag(_), _) | (_, Some(FieldType::Flag)) => out.write_str(key)?,
            _ => {
                let number = descriptor.map_or(FieldNumber::Variable, |d| d.number);
                write!(out, "{key}={}", value.render(number))?;
            }
        }
    }
    Ok(())
}

/// Sample values in `keys` order. Each sample is rendered on its own; string
/// values are never padded to match other samples.
fn write_sample<W: Write>(
    out: &mut W,
    sample: &Sample<'_>,
    keys: &[&str],
    numbers: &[FieldNumber],
) -> fmt::Result {
    for (i, (key, number)) in keys.iter().zip(numbers).enumerate() {
        if i > 0 {
            out.write_str(SAMPLE_FIELD_SEPARATOR)?;
        }
        if *key == GT_KEY {
            write!(out, "{}", sample.genotype())?;
            continue;
        }
        match sample.field(key) {
            Some(value) if !value.is_missing() => out.write_str(&value.render(*number))?,
            _ => out.write_str(MISSING_VALUE)?,
        }
    }
    Ok(())
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_record(f, self)
    }
}
