use crate::error::VcfResult;
use log;
use std::sync::Once;

pub type Result<T> = VcfResult<T>;

// htslib reserves these integers as the missing value and the vector terminator.
pub const MISSING_INTEGER: i32 = i32::MIN;
pub const VECTOR_END_INTEGER: i32 = i32::MIN + 1;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

/// Number of unordered genotypes for `n_alleles` alleles at the given ploidy,
/// i.e. the value count of a `Number=G` field: C(n_alleles + ploidy - 1, ploidy).
pub fn genotype_count(n_alleles: usize, ploidy: usize) -> Option<usize> {
    if n_alleles == 0 {
        return Some(0);
    }
    let n = n_alleles + ploidy - 1;
    let k = ploidy.min(n - ploidy);
    let mut count: usize = 1;
    for i in 0..k {
        count = count.checked_mul(n - i)? / (i + 1);
    }
    Some(count)
}

pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_negative() {
            "-Inf".to_string()
        } else {
            "Inf".to_string()
        }
    } else {
        value.to_string()
    }
}
