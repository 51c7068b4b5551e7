//! Supported sentence encoders.

use std::fmt;
use std::str::FromStr;

use fastembed::EmbeddingModel;

use crate::EmbeddingError;

/// Sentence encoders the engine can be configured with.
///
/// Catalog embeddings and query embeddings must come from the same variant;
/// [`Self::name`] is recorded next to cached vectors for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncoderModel {
    /// sentence-transformers/all-mpnet-base-v2, 768 dims. The encoder the
    /// shipped artifacts were built with.
    #[default]
    AllMpnetBaseV2,
    /// sentence-transformers/all-MiniLM-L6-v2, 384 dims.
    AllMiniLmL6V2,
    /// sentence-transformers/all-MiniLM-L12-v2, 384 dims.
    AllMiniLmL12V2,
    /// BAAI/bge-small-en-v1.5, 384 dims.
    BgeSmallEnV15,
    /// BAAI/bge-base-en-v1.5, 768 dims.
    BgeBaseEnV15,
}

impl EncoderModel {
    pub const ALL: [Self; 5] = [
        Self::AllMpnetBaseV2,
        Self::AllMiniLmL6V2,
        Self::AllMiniLmL12V2,
        Self::BgeSmallEnV15,
        Self::BgeBaseEnV15,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AllMpnetBaseV2 => "all-mpnet-base-v2",
            Self::AllMiniLmL6V2 => "all-minilm-l6-v2",
            Self::AllMiniLmL12V2 => "all-minilm-l12-v2",
            Self::BgeSmallEnV15 => "bge-small-en-v1.5",
            Self::BgeBaseEnV15 => "bge-base-en-v1.5",
        }
    }

    #[must_use]
    pub const fn dimension(self) -> usize {
        match self {
            Self::AllMiniLmL6V2 | Self::AllMiniLmL12V2 | Self::BgeSmallEnV15 => 384,
            Self::AllMpnetBaseV2 | Self::BgeBaseEnV15 => 768,
        }
    }

    pub(crate) const fn fastembed_model(self) -> EmbeddingModel {
        match self {
            Self::AllMpnetBaseV2 => EmbeddingModel::AllMpnetBaseV2,
            Self::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            Self::AllMiniLmL12V2 => EmbeddingModel::AllMiniLML12V2,
            Self::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            Self::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
        }
    }
}

impl fmt::Display for EncoderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncoderModel {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|model| model.name() == wanted)
            .ok_or_else(|| EmbeddingError::UnknownModel(s.to_string()))
    }
}
