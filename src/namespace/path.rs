//! path.rs
//! Absolute variable and system paths, held as owned segment sequences.

use smallvec::SmallVec;

/// Separator between system names in an absolute path (e.g. `G1:C1:x`).
pub const DEFAULT_DELIMITER: char = ':';

/// An absolute path in the namespace tree, split once into its segments.
///
/// The empty path is the tree root. Most models are shallow, so up to four
/// segments are stored inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NamespacePath {
    segments: SmallVec<[String; 4]>,
}

impl NamespacePath {
    pub fn root() -> Self { Self::default() }

    pub fn parse(path: &str, delimiter: char) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self { segments: path.split(delimiter).map(str::to_owned).collect() }
    }

    pub fn segments(&self) -> &[String] { &self.segments }
    pub fn depth(&self) -> usize { self.segments.len() }
    pub fn is_root(&self) -> bool { self.segments.is_empty() }

    /// The nearest common ancestor of two paths.
    ///
    /// Segments are compared pairwise from the root and the scan stops at the
    /// first mismatch, so `A:B:X` and `A:C:X` share only `A`. Equal leaf names
    /// past a divergence never count.
    pub fn common_ancestor(&self, other: &Self) -> Self {
        let segments = self
            .segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();
        Self { segments }
    }

    pub fn join(&self, delimiter: char) -> String {
        let mut buf = [0u8; 4];
        self.segments.join(&*delimiter.encode_utf8(&mut buf))
    }
}
