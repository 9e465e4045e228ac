#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static content for Cartography: the piece catalog and starting layouts.
//!
//! Pieces are loaded once into a [`Catalog`], which assigns every entry a
//! stable [`PieceId`] and rejects duplicate names. Name lookups exist only for
//! adapters translating external input; everything downstream uses ids.

mod layouts;

use std::collections::BTreeMap;

use cartography_core::{InvariantViolation, Piece, PieceId, PieceMask, TerrainCategory};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use thiserror::Error;

pub use layouts::{StartingLayout, STANDARD_GRID_SIZE, STANDARD_TIME_LIMIT};

/// Compact, compile-time description of a catalog entry.
#[derive(Clone, Copy, Debug)]
pub struct PieceDefinition {
    /// Display name, unique within the catalog.
    pub name: &'static str,
    /// Terrain written by the piece.
    pub category: TerrainCategory,
    /// Occupancy rows using `0` for empty and `1` for occupied.
    pub mask: &'static [&'static [u8]],
    /// Time units consumed by placing the piece.
    pub time_cost: u32,
}

impl PieceDefinition {
    /// Validates the mask and converts the definition into a [`Piece`].
    pub fn load(&self) -> Result<Piece, CatalogError> {
        let mask = PieceMask::from_bits(self.mask).map_err(|source| CatalogError::InvalidMask {
            name: self.name.to_owned(),
            source,
        })?;
        Ok(Piece::new(self.name, self.category, mask, self.time_cost))
    }
}

/// Explorations available in the standard game.
pub const STANDARD_PIECES: [PieceDefinition; 12] = [
    PieceDefinition {
        name: "Land",
        category: TerrainCategory::Fields,
        mask: &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]],
        time_cost: 1,
    },
    PieceDefinition {
        name: "Forgotten forest",
        category: TerrainCategory::Forest,
        mask: &[&[0, 1, 1], &[1, 1, 0]],
        time_cost: 1,
    },
    PieceDefinition {
        name: "Farm",
        category: TerrainCategory::Fields,
        mask: &[&[0, 1, 0], &[1, 1, 1]],
        time_cost: 2,
    },
    PieceDefinition {
        name: "Town",
        category: TerrainCategory::Settlement,
        mask: &[&[1, 1, 1], &[1, 1, 0]],
        time_cost: 1,
    },
    PieceDefinition {
        name: "Fishing village",
        category: TerrainCategory::Settlement,
        mask: &[&[1, 1, 1, 1]],
        time_cost: 2,
    },
    PieceDefinition {
        name: "River in the fields",
        category: TerrainCategory::Fields,
        mask: &[&[1, 1, 1], &[1, 0, 0], &[1, 0, 0]],
        time_cost: 2,
    },
    PieceDefinition {
        name: "Swamp",
        category: TerrainCategory::Forest,
        mask: &[&[1, 0, 0], &[1, 1, 1], &[1, 0, 0]],
        time_cost: 2,
    },
    PieceDefinition {
        name: "Anomaly",
        category: TerrainCategory::Fields,
        mask: &[&[1]],
        time_cost: 0,
    },
    PieceDefinition {
        name: "Hamlet",
        category: TerrainCategory::Settlement,
        mask: &[&[1, 0], &[1, 1]],
        time_cost: 1,
    },
    PieceDefinition {
        name: "Great river",
        category: TerrainCategory::Water,
        mask: &[&[0, 0, 1], &[0, 1, 1], &[1, 1, 0]],
        time_cost: 1,
    },
    PieceDefinition {
        name: "Garden",
        category: TerrainCategory::Forest,
        mask: &[&[1, 1, 1], &[0, 0, 1]],
        time_cost: 2,
    },
    PieceDefinition {
        name: "Forest huts",
        category: TerrainCategory::Settlement,
        mask: &[&[0, 0, 1, 1], &[1, 1, 1, 0]],
        time_cost: 2,
    },
];

/// Reasons a catalog may fail to load.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog contains no pieces.
    #[error("catalog contains no pieces")]
    Empty,
    /// Two pieces share the same name.
    #[error("piece name '{0}' appears more than once")]
    DuplicateName(String),
    /// The catalog holds more pieces than identifiers can address.
    #[error("catalog holds {0} pieces, more than identifiers can address")]
    TooManyPieces(usize),
    /// A definition carries an invalid mask.
    #[error("piece '{name}' has an invalid mask: {source}")]
    InvalidMask {
        /// Name of the offending piece.
        name: String,
        /// Violated mask invariant.
        source: InvariantViolation,
    },
}

/// Immutable registry of placeable pieces keyed by [`PieceId`].
#[derive(Clone, Debug)]
pub struct Catalog {
    pieces: Vec<Piece>,
    by_name: BTreeMap<String, PieceId>,
}

impl Catalog {
    /// Loads the standard exploration catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_definitions(&STANDARD_PIECES)
    }

    /// Loads a catalog from compact definitions.
    pub fn from_definitions(definitions: &[PieceDefinition]) -> Result<Self, CatalogError> {
        let pieces = definitions
            .iter()
            .map(PieceDefinition::load)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_pieces(pieces)
    }

    /// Builds a catalog, assigning identifiers in declaration order.
    pub fn from_pieces(pieces: Vec<Piece>) -> Result<Self, CatalogError> {
        if pieces.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_name = BTreeMap::new();
        for (index, piece) in pieces.iter().enumerate() {
            let value =
                u16::try_from(index).map_err(|_| CatalogError::TooManyPieces(pieces.len()))?;
            if by_name
                .insert(piece.name().to_owned(), PieceId::new(value))
                .is_some()
            {
                return Err(CatalogError::DuplicateName(piece.name().to_owned()));
            }
        }

        Ok(Self { pieces, by_name })
    }

    /// Retrieves the piece registered under the identifier.
    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(usize::from(id.get()))
    }

    /// Resolves a piece name to its identifier.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PieceId> {
        self.by_name.get(name).copied()
    }

    /// Iterates over all pieces in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| (PieceId::new(index as u16), piece))
    }

    /// Number of pieces in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Reports whether the catalog is empty. Loaded catalogs never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Deterministically picks the piece offered on the provided turn.
    ///
    /// The same `(seed, turn)` pair always yields the same piece, so the offer
    /// can be recomputed from the length of the move log.
    #[must_use]
    pub fn draw(&self, seed: u64, turn: usize) -> PieceId {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(turn as u64);
        let index = rng.gen_range(0..self.pieces.len());
        PieceId::new(index as u16)
    }
}
