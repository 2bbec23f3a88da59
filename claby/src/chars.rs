//! Box-drawing glyph tables for maze rendering.

use crate::dirs::Dirs;

/// Width in characters of a cell interior.
pub const H_LEN: usize = 5;

/// Label stamped on the start cell.
pub const START: &str = "←┼→";
/// Label stamped on the finish cell.
pub const FINISH: &str = "→┼←";

pub const SPACE: char = ' ';
pub const H_WALL: char = '─';
pub const H_WALL_BOLD: char = '━';
pub const V_WALL: char = '│';
pub const V_WALL_BOLD: char = '┃';

const BIAS: f32 = 0.1;

/// The light corner glyph extending in the given directions; routes are
/// traced with these.
pub fn corner(dirs: Dirs) -> char {
    match (
        dirs.contains(Dirs::LEFT),
        dirs.contains(Dirs::RIGHT),
        dirs.contains(Dirs::UP),
        dirs.contains(Dirs::DOWN),
    ) {
        (false, false, false, false) => ' ',
        (true, false, false, false) => '╴',
        (false, true, false, false) => '╶',
        (false, false, true, false) => '╵',
        (false, false, false, true) => '╷',
        (true, true, false, false) => '─',
        (false, false, true, true) => '│',
        (false, true, false, true) => '┌',
        (true, false, false, true) => '┐',
        (false, true, true, false) => '└',
        (true, false, true, false) => '┘',
        (true, true, true, false) => '┴',
        (true, true, false, true) => '┬',
        (false, true, true, true) => '├',
        (true, false, true, true) => '┤',
        (true, true, true, true) => '┼',
    }
}

/// The heavy variant of [`corner`]; walls are drawn with these.
pub fn corner_bold(dirs: Dirs) -> char {
    match (
        dirs.contains(Dirs::LEFT),
        dirs.contains(Dirs::RIGHT),
        dirs.contains(Dirs::UP),
        dirs.contains(Dirs::DOWN),
    ) {
        (false, false, false, false) => ' ',
        (true, false, false, false) => '╸',
        (false, true, false, false) => '╺',
        (false, false, true, false) => '╹',
        (false, false, false, true) => '╻',
        (true, true, false, false) => '━',
        (false, false, true, true) => '┃',
        (false, true, false, true) => '┏',
        (true, false, false, true) => '┓',
        (false, true, true, false) => '┗',
        (true, false, true, false) => '┛',
        (true, true, true, false) => '┻',
        (true, true, false, true) => '┳',
        (false, true, true, true) => '┣',
        (true, false, true, true) => '┫',
        (true, true, true, true) => '╋',
    }
}

/// The arrow pointing in a single direction.
pub fn arrow(dir: Dirs) -> char {
    match dir {
        Dirs::LEFT => '←',
        Dirs::RIGHT => '→',
        Dirs::UP => '↑',
        Dirs::DOWN => '↓',
        _ => panic!("no arrow for composite direction {dir}"),
    }
}

/// `orig` with `label` overlaid at its center, biased slightly left.
pub fn embedded(orig: &str, label: &str) -> String {
    let orig: Vec<char> = orig.chars().collect();
    let label_len = label.chars().count();
    debug_assert!(label_len <= orig.len(), "can't embed label in shorter string");

    let pos = (orig.len() as f32 / 2.0 - label_len as f32 / 2.0 - BIAS)
        .round()
        .max(0.0) as usize;
    let mut out = String::new();
    out.extend(&orig[..pos]);
    out.push_str(label);
    out.extend(&orig[pos + label_len..]);
    out
}

/// The interior base line: each half is a light wall glyph when the
/// route continues to that side, blank otherwise.
pub fn center_base(dirs: Dirs) -> String {
    let left = if dirs.contains(Dirs::LEFT) { H_WALL } else { SPACE };
    let right = if dirs.contains(Dirs::RIGHT) { H_WALL } else { SPACE };
    let split = (H_LEN as f32 / 2.0 - BIAS).round() as usize;

    let mut out = String::new();
    out.extend(std::iter::repeat(left).take(split));
    out.extend(std::iter::repeat(right).take(H_LEN - split));
    out
}
