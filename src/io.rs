use std::fs;
use std::path::Path;

use crate::error::VmError;
use crate::translation::Translation;

/// Read the whitespace-separated decimal virtual addresses in `path`.
///
/// Addresses are C-style signed 32-bit integers; only the low 16 bits are
/// meaningful after masking. A token that does not parse is an error rather
/// than silently becoming address 0.
pub fn read_virtual_addresses<P: AsRef<Path>>(path: P) -> Result<Vec<i32>, VmError> {
    let content =
        fs::read_to_string(path.as_ref()).map_err(|source| VmError::AddressFile { source })?;
    parse_addresses(&content)
}

pub fn parse_addresses(content: &str) -> Result<Vec<i32>, VmError> {
    content
        .split_whitespace()
        .map(|token| {
            token.parse::<i32>().map_err(|_| VmError::MalformedAddress {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Reference output for a verification run: one line per translated address.
///
/// Each line is reduced to the integers it contains, so prose such as
/// "Virtual address:" is ignored and any reference formatting works.
pub struct Reference {
    lines: Vec<Vec<i64>>,
}

impl Reference {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VmError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| VmError::Reference { source })?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let lines = content
            .lines()
            .map(|line| {
                line.split_whitespace()
                    .filter_map(|token| token.parse::<i64>().ok())
                    .collect()
            })
            .collect();

        Reference { lines }
    }

    /// Whether line `index` contains the translation's full
    /// (virtual, physical, value) triple.
    pub fn matches(&self, index: usize, t: &Translation) -> bool {
        let Some(ints) = self.lines.get(index) else {
            return false;
        };

        [
            t.virtual_addr as i32 as i64,
            t.physical_addr as i64,
            t.value as i64,
        ]
        .iter()
        .all(|v| ints.contains(v))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
