//! The program image: what an external assembler hands to the loader.
//!
//! An image is a structured bundle of a text segment (pre-packed
//! instruction words), an optional data segment (byte strings placed at
//! the high end of memory), and an optional stack reservation. It is
//! consumed exactly once, at load time; after that only memory's state
//! matters.
//!
//! On disk an image is a JSON document with the same three fields. The
//! byte-shape rule for data elements is enforced by the types here: a
//! document whose data elements are not byte sequences fails to parse
//! and surfaces as a format fault.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VmError;

/// A loadable program: text, optional data, optional stack reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Instruction words, placed at address 0 upward. Required, non-empty.
    pub text: Vec<i64>,

    /// Byte strings, concatenated in order and placed right-aligned
    /// against the reserved system cell.
    #[serde(default)]
    pub data: Vec<Vec<u8>>,

    /// Words reserved (but never initialized) between text and data.
    /// Counts toward the capacity check only; see the loader.
    #[serde(default)]
    pub stack: usize,
}

impl Image {
    /// Total data-segment length in bytes.
    pub fn data_len(&self) -> usize {
        self.data.iter().map(Vec::len).sum()
    }

    /// Minimum memory size (in words) this image needs, including the
    /// reserved system cell and the stack reservation.
    pub fn required_words(&self) -> usize {
        self.text.len() + crate::memory::SYS_LEN + self.data_len() + self.stack
    }

    /// Parse an image from a JSON document.
    pub fn from_reader(r: impl Read) -> Result<Self, VmError> {
        serde_json::from_reader(r).map_err(|e| VmError::Format(e.to_string()))
    }

    /// Read and parse an image file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VmError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_image() {
        let img = Image::from_reader(
            br#"{"text": [16512, 0], "data": [[72, 105]], "stack": 4}"#.as_slice(),
        )
        .unwrap();
        assert_eq!(img.text, vec![16512, 0]);
        assert_eq!(img.data, vec![vec![72, 105]]);
        assert_eq!(img.stack, 4);
    }

    #[test]
    fn test_data_and_stack_default() {
        let img = Image::from_reader(br#"{"text": [1]}"#.as_slice()).unwrap();
        assert!(img.data.is_empty());
        assert_eq!(img.stack, 0);
    }

    #[test]
    fn test_missing_text_is_format_fault() {
        let err = Image::from_reader(br#"{"data": []}"#.as_slice()).unwrap_err();
        assert!(matches!(err, VmError::Format(_)));
    }

    #[test]
    fn test_non_byte_data_is_format_fault() {
        let err =
            Image::from_reader(br#"{"text": [1], "data": [[300]]}"#.as_slice()).unwrap_err();
        assert!(matches!(err, VmError::Format(_)));
    }

    #[test]
    fn test_required_words() {
        let img = Image {
            text: vec![1, 2, 3],
            data: vec![vec![0; 4], vec![0; 2]],
            stack: 5,
        };
        // 3 text + 1 sys + 6 data + 5 stack
        assert_eq!(img.required_words(), 15);
    }
}
