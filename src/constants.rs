use crate::{error::VcfError, utils::util::Result};

pub const DEFAULT_FILE_FORMAT: &str = "VCFv4.3";
pub const DEFAULT_PLOIDY: usize = 2; // used for Number=G when no genotype is set
pub const MAX_PLOIDY: usize = 64;
pub const MAX_POSITION: u64 = i32::MAX as u64; // largest 1-based POS htslib stores

pub const MISSING_VALUE: &str = ".";
pub const GT_KEY: &str = "GT";
pub const PASS_FILTER: &str = "PASS";

pub const FIELD_SEPARATOR: &str = "\t";
pub const SAMPLE_FIELD_SEPARATOR: &str = ":";
pub const VALUE_SEPARATOR: &str = ",";
pub const INFO_SEPARATOR: &str = ";";
pub const UNPHASED_SEPARATOR: char = '/';
pub const PHASED_SEPARATOR: char = '|';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderConfig {
    pub fileformat: String,
    pub default_ploidy: usize,
}

impl HeaderConfig {
    pub fn new(fileformat: impl Into<String>, default_ploidy: usize) -> Result<Self> {
        let fileformat = fileformat.into();
        if !fileformat.starts_with("VCFv") {
            return Err(VcfError::InvalidConfig(format!(
                "fileformat must start with VCFv, got {fileformat:?}"
            )));
        }
        if default_ploidy == 0 {
            return Err(VcfError::InvalidConfig(
                "default ploidy must be >= 1".to_string(),
            ));
        }
        if default_ploidy > MAX_PLOIDY {
            return Err(VcfError::InvalidConfig(format!(
                "default ploidy ({default_ploidy}) must be <= {MAX_PLOIDY}"
            )));
        }

        Ok(Self {
            fileformat,
            default_ploidy,
        })
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            fileformat: DEFAULT_FILE_FORMAT.to_string(),
            default_ploidy: DEFAULT_PLOIDY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_config_new_rejects_bad_inputs() {
        let fileformat_error = HeaderConfig::new("4.3", 2)
            .expect_err("fileformat without VCFv prefix should be rejected");
        assert!(fileformat_error.to_string().contains("fileformat"));

        let ploidy_error =
            HeaderConfig::new("VCFv4.2", 0).expect_err("zero ploidy should be rejected");
        assert!(ploidy_error.to_string().contains("ploidy"));

        let large_ploidy_error = HeaderConfig::new("VCFv4.2", MAX_PLOIDY + 1)
            .expect_err("oversized ploidy should be rejected");
        assert!(matches!(large_ploidy_error, VcfError::InvalidConfig(_)));
    }

    #[test]
    fn header_config_default_matches_constants() {
        let config = HeaderConfig::default();
        assert_eq!(config.fileformat, DEFAULT_FILE_FORMAT);
        assert_eq!(config.default_ploidy, DEFAULT_PLOIDY);
        assert_eq!(HeaderConfig::new(DEFAULT_FILE_FORMAT, DEFAULT_PLOIDY).unwrap(), config);
    }
}
