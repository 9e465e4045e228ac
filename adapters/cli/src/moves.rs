use std::str::FromStr;

use cartography_core::CellCoord;
use thiserror::Error;

/// Placement requested on the command line as `NAME@ROW,COL[/ROTATION]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PlannedMove {
    /// Catalog name of the piece.
    pub(crate) piece: String,
    /// Cell under the bottom-right corner of the rotated mask.
    pub(crate) anchor: CellCoord,
    /// Clockwise quarter turns, zero when omitted.
    pub(crate) rotation: i32,
}

/// Reasons a move argument may fail to parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum MoveParseError {
    /// The argument has no `@` separating the piece from the anchor.
    #[error("move '{0}' must look like NAME@ROW,COL[/ROTATION]")]
    MissingAnchor(String),
    /// The piece name is blank.
    #[error("move '{0}' does not name a piece")]
    MissingPiece(String),
    /// The anchor is not two comma-separated integers.
    #[error("anchor '{0}' must be ROW,COL")]
    InvalidAnchor(String),
    /// The rotation suffix is not an integer.
    #[error("rotation '{0}' is not an integer")]
    InvalidRotation(String),
}

impl FromStr for PlannedMove {
    type Err = MoveParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (piece, placement) = value
            .rsplit_once('@')
            .ok_or_else(|| MoveParseError::MissingAnchor(value.to_owned()))?;
        let piece = piece.trim();
        if piece.is_empty() {
            return Err(MoveParseError::MissingPiece(value.to_owned()));
        }

        let (anchor, rotation) = match placement.split_once('/') {
            Some((anchor, rotation)) => {
                let rotation = rotation
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| MoveParseError::InvalidRotation(rotation.to_owned()))?;
                (anchor, rotation)
            }
            None => (placement, 0),
        };

        Ok(Self {
            piece: piece.to_owned(),
            anchor: parse_anchor(anchor)?,
            rotation,
        })
    }
}

fn parse_anchor(anchor: &str) -> Result<CellCoord, MoveParseError> {
    let invalid = || MoveParseError::InvalidAnchor(anchor.to_owned());
    let (row, column) = anchor.split_once(',').ok_or_else(invalid)?;
    let row = row.trim().parse::<i32>().map_err(|_| invalid())?;
    let column = column.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok(CellCoord::new(row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_with_spaces_and_rotation() {
        let planned: PlannedMove = "Forgotten forest@3,4/-1".parse().expect("move parses");
        assert_eq!(
            planned,
            PlannedMove {
                piece: "Forgotten forest".to_owned(),
                anchor: CellCoord::new(3, 4),
                rotation: -1,
            }
        );
    }

    #[test]
    fn rotation_defaults_to_zero() {
        let planned: PlannedMove = "Land@ 0 , 10 ".parse().expect("move parses");
        assert_eq!(planned.anchor, CellCoord::new(0, 10));
        assert_eq!(planned.rotation, 0);
    }

    #[test]
    fn negative_anchors_are_allowed() {
        let planned: PlannedMove = "Anomaly@-1,-2".parse().expect("move parses");
        assert_eq!(planned.anchor, CellCoord::new(-1, -2));
    }

    #[test]
    fn reports_malformed_moves() {
        assert_eq!(
            "Land".parse::<PlannedMove>(),
            Err(MoveParseError::MissingAnchor("Land".to_owned()))
        );
        assert_eq!(
            " @1,1".parse::<PlannedMove>(),
            Err(MoveParseError::MissingPiece(" @1,1".to_owned()))
        );
        assert_eq!(
            "Land@1;1".parse::<PlannedMove>(),
            Err(MoveParseError::InvalidAnchor("1;1".to_owned()))
        );
        assert_eq!(
            "Land@1,1/left".parse::<PlannedMove>(),
            Err(MoveParseError::InvalidRotation("left".to_owned()))
        );
    }
}
