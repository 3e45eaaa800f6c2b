use regex::Regex;

use crate::grid::prelude::*;

/// Parses `col,row` (whitespace around either number is ignored).
impl std::str::FromStr for Coord {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let pattern = Regex::new(r"^\s*(?<col>-?[0-9]+)\s*,\s*(?<row>-?[0-9]+)\s*$")?;
        let Some(matches) = pattern.captures(s) else {
            return Err(anyhow!("could not parse coordinate {s}"));
        };
        Ok(Coord::new(matches["col"].parse()?, matches["row"].parse()?))
    }
}

/// Parses `WxH`, e.g. `2x1`. Both sides must be at least 1.
impl std::str::FromStr for Footprint {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let pattern = Regex::new(r"^\s*(?<width>[0-9]+)\s*[xX]\s*(?<height>[0-9]+)\s*$")?;
        let Some(matches) = pattern.captures(s) else {
            return Err(anyhow!("could not parse footprint {s}"));
        };
        let [width, height] = [matches["width"].parse::<i32>()?, matches["height"].parse::<i32>()?];
        if width < 1 || height < 1 {
            return Err(anyhow!("footprint {s} must be at least 1x1"));
        }
        Ok(Footprint::new(width, height))
    }
}

/// Parses `x,y` with optional signs and fractions.
impl std::str::FromStr for Vec2 {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let number = r"-?[0-9]+(?:\.[0-9]*)?";
        let pattern = Regex::new(&format!(r"^\s*(?<x>{number})\s*,\s*(?<y>{number})\s*$"))?;
        let Some(matches) = pattern.captures(s) else {
            return Err(anyhow!("could not parse position {s}"));
        };
        Ok(Vec2::new(matches["x"].parse()?, matches["y"].parse()?))
    }
}

/// Parses a comma-separated list of board types, e.g. `battle,bench`, keeping the given order.
pub fn parse_board_list(s: &str) -> Result<Vec<BoardType>> {
    let kinds = s
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<BoardType>())
        .collect::<Result<Vec<_>>>()?;
    if kinds.is_empty() {
        return Err(anyhow!("no boards named in {s:?}"));
    }
    Ok(kinds)
}

/// Parses a board's dimensions, written like a footprint (`COLSxROWS`).
pub fn parse_dimensions(s: &str) -> Result<(i32, i32)> {
    let Footprint { width, height } = s.parse::<Footprint>().with_context(|| format!("bad board size {s}"))?;
    Ok((width, height))
}
