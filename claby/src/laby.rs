use thiserror::Error;

use crate::chars;
use crate::dirs::{Dirs, DirsError, Pos};
use crate::grid::{Grid, GridError};
use crate::node::{Neighbors, Node};
use crate::router::{Route, RouteNotFoundError};

#[derive(Debug, Error)]
pub enum LabyError {
    #[error(transparent)]
    Dirs(#[from] DirsError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    RouteNotFound(#[from] RouteNotFoundError),
    #[error("invalid maze size {0:?}")]
    InvalidSize(Pos),
    #[error("position {0:?} is outside the maze")]
    OutOfBounds(Pos),
    #[error("start and finish must be set before routing")]
    MissingEndpoints,
    #[error("incompatible neighboring cells at {0:?}")]
    InconsistentNeighbors(Pos),
}

/// A labyrinth: a rectangular grid of nodes plus an optional start and
/// finish position.
///
/// Construction seals the perimeter, so no node ever opens out of the
/// grid. The remaining structural invariant, that neighboring nodes
/// agree on the wall between them, is checked when rendering.
#[derive(Debug, Clone)]
pub struct Laby {
    grid: Grid<Node>,
    start: Option<Pos>,
    finish: Option<Pos>,
}

impl Laby {
    /// A laby of the requested shape made entirely of closed nodes.
    pub fn zeros(shape: Pos) -> Result<Laby, LabyError> {
        Self::full_with(shape, Node::zero)
    }

    /// A laby of the requested shape made entirely of open nodes.
    pub fn ones(shape: Pos) -> Result<Laby, LabyError> {
        Self::full_with(shape, Node::one)
    }

    pub fn full(shape: Pos, node: Node) -> Result<Laby, LabyError> {
        Self::full_with(shape, || node)
    }

    pub fn full_with(shape: Pos, mut fill: impl FnMut() -> Node) -> Result<Laby, LabyError> {
        let rows = (0..shape.0)
            .map(|_| (0..shape.1).map(|_| fill()).collect())
            .collect();
        Self::from_grid(Grid::from_rows(rows)?)
    }

    /// Parse a laby from one line per row, cells separated by commas,
    /// each cell the letters of its open directions.
    pub fn from_letters(letters: &str) -> Result<Laby, LabyError> {
        let mut rows = Vec::new();
        for line in letters.lines() {
            let row = line
                .split(',')
                .map(|token| Dirs::from_letters(token.trim()).map(Node::new))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_grid(Grid::from_rows(rows)?)
    }

    pub fn from_dirs(dirs: &Grid<Dirs>) -> Result<Laby, LabyError> {
        Self::from_grid(dirs.map(|&dirs| Node::new(dirs)))
    }

    fn from_grid(grid: Grid<Node>) -> Result<Laby, LabyError> {
        let size = grid.size();
        if size.0 <= 0 || size.1 <= 0 {
            return Err(LabyError::InvalidSize(size));
        }
        let mut laby = Laby {
            grid,
            start: None,
            finish: None,
        };
        laby.enforce_walls();
        Ok(laby)
    }

    /// Remove the outward directions of every perimeter node.
    fn enforce_walls(&mut self) {
        let Pos(rows, cols) = self.grid.size();
        for pos in Pos::iter_fill(Pos::ZERO, self.grid.size()) {
            let node = &mut self.grid[pos];
            if pos.0 == 0 {
                node.dirs &= !Dirs::UP;
            }
            if pos.0 == rows - 1 {
                node.dirs &= !Dirs::DOWN;
            }
            if pos.1 == 0 {
                node.dirs &= !Dirs::LEFT;
            }
            if pos.1 == cols - 1 {
                node.dirs &= !Dirs::RIGHT;
            }
        }
    }

    pub fn size(&self) -> Pos {
        self.grid.size()
    }

    pub fn is_in_bounds(&self, pos: Pos) -> bool {
        self.grid.get(pos).is_some()
    }

    pub fn get(&self, pos: Pos) -> Option<&Node> {
        self.grid.get(pos)
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Node> {
        self.grid.get_mut(pos)
    }

    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    pub fn finish(&self) -> Option<Pos> {
        self.finish
    }

    pub fn set_start(&mut self, pos: Pos) -> Result<(), LabyError> {
        self.grid
            .get_mut(pos)
            .ok_or(LabyError::OutOfBounds(pos))?
            .set_label(chars::START);
        self.start = Some(pos);
        Ok(())
    }

    pub fn set_finish(&mut self, pos: Pos) -> Result<(), LabyError> {
        self.grid
            .get_mut(pos)
            .ok_or(LabyError::OutOfBounds(pos))?
            .set_label(chars::FINISH);
        self.finish = Some(pos);
        Ok(())
    }

    /// The four nodes around `pos`, synthesizing a virtual wall node
    /// wherever the grid ends. At a literal grid corner the two wall
    /// directions cancel, leaving a fully open virtual node, so no
    /// spurious wall stub is drawn there.
    ///
    /// Recomputed on every call: node contents are mutable, so caching
    /// here would go stale.
    pub fn neighbors(&self, pos: Pos) -> Neighbors {
        Neighbors {
            left: self.neighbor_at(Pos(pos.0, pos.1 - 1)),
            right: self.neighbor_at(Pos(pos.0, pos.1 + 1)),
            up: self.neighbor_at(Pos(pos.0 - 1, pos.1)),
            down: self.neighbor_at(Pos(pos.0 + 1, pos.1)),
        }
    }

    fn neighbor_at(&self, pos: Pos) -> Node {
        let Pos(rows, cols) = self.grid.size();
        let mut wall_dirs = Dirs::NONE;
        if pos.0 < 0 {
            wall_dirs |= Dirs::DOWN;
        } else if pos.0 >= rows {
            wall_dirs |= Dirs::UP;
        }
        if pos.1 < 0 {
            wall_dirs |= Dirs::RIGHT;
        } else if pos.1 >= cols {
            wall_dirs |= Dirs::LEFT;
        }

        if !wall_dirs.is_empty() {
            if wall_dirs.intersects(Dirs::H) && wall_dirs.intersects(Dirs::V) {
                wall_dirs = Dirs::NONE;
            }
            return Node::new_virtual(wall_dirs);
        }
        self.grid[pos]
    }

    /// Write a route onto the laby. With `do_walls` the route carves
    /// open passages, on both sides of every wall it crosses; without
    /// it the route only marks which existing passages it follows.
    pub fn write(&mut self, route: &Route, do_walls: bool) -> Result<(), LabyError> {
        for step in route.steps() {
            if step.dir.is_empty() {
                continue;
            }
            {
                let node = self
                    .grid
                    .get_mut(step.pos)
                    .ok_or(LabyError::OutOfBounds(step.pos))?;
                if do_walls {
                    node.dirs |= step.dir;
                } else {
                    node.route_dirs |= step.dir;
                }
            }
            if do_walls {
                let next = step.pos + step.dir.delta()?;
                self.grid
                    .get_mut(next)
                    .ok_or(LabyError::OutOfBounds(next))?
                    .dirs |= step.dir.opposite()?;
            }
        }
        Ok(())
    }

    /// Overwrite every node's directions (or route directions) at once.
    pub fn write_all(&mut self, dirs: Dirs, do_walls: bool) {
        for pos in Pos::iter_fill(Pos::ZERO, self.grid.size()) {
            let node = &mut self.grid[pos];
            if do_walls {
                node.dirs = dirs;
            } else {
                node.route_dirs = dirs;
            }
        }
    }

    /// Run `f` with start and finish swapped, restoring them after.
    pub fn reversed<R>(&mut self, f: impl FnOnce(&mut Laby) -> R) -> R {
        std::mem::swap(&mut self.start, &mut self.finish);
        let result = f(self);
        std::mem::swap(&mut self.start, &mut self.finish);
        result
    }

    /// Render the laby as a box-drawing string, one glyph block per
    /// node. Fails if any pair of neighboring nodes disagrees about the
    /// wall between them.
    pub fn render(&self) -> Result<String, LabyError> {
        let display = self.display_grid()?;
        let Pos(rows, cols) = display.size();

        let mut lines = Vec::with_capacity(rows as usize * 2);
        for row in 0..rows {
            let mut top = String::new();
            let mut mid = String::new();
            for col in 0..cols {
                let pos = Pos(row, col);
                let node = &display[pos];
                let neighbors = self.neighbors(pos);
                if !node.neighbors_consistent(&neighbors) {
                    return Err(LabyError::InconsistentNeighbors(pos));
                }
                let [node_top, node_mid] = node.strs(&neighbors);
                top.push_str(&node_top);
                mid.push_str(&node_mid);
            }
            lines.push(top);
            lines.push(mid);
        }
        Ok(lines.join("\n"))
    }

    /// The grid actually rendered: one virtual ring on the bottom and
    /// right edges closes off the outer walls, and the shared corner is
    /// opened entirely so it draws no stray stub.
    fn display_grid(&self) -> Result<Grid<Node>, LabyError> {
        let Pos(rows, cols) = self.grid.size();

        let wide_rows = self
            .grid
            .rows()
            .map(|row| {
                let mut row = row.to_vec();
                row.push(Node::new_virtual(Dirs::LEFT));
                row
            })
            .collect();
        let wide = Grid::from_rows(wide_rows)?;

        let mut bottom = vec![Node::new_virtual(Dirs::UP); cols as usize];
        bottom.push(Node::new_virtual(Dirs::LEFT));
        let bottom = Grid::from_rows(vec![bottom])?;

        let mut display = wide.vconcat(bottom)?;
        display[Pos(rows, cols)].dirs |= Dirs::ALL;
        Ok(display)
    }
}

#[cfg(test)]
mod tests {
    use super::{Laby, LabyError};
    use crate::dirs::{Dirs, Pos};
    use crate::grid::Grid;
    use crate::router::{Route, RouteStep};

    #[test]
    fn perimeter_is_sealed() {
        let laby = Laby::ones(Pos(2, 2)).unwrap();
        assert_eq!(laby.get(Pos(0, 0)).unwrap().dirs, Dirs::RIGHT | Dirs::DOWN);
        assert_eq!(laby.get(Pos(0, 1)).unwrap().dirs, Dirs::LEFT | Dirs::DOWN);
        assert_eq!(laby.get(Pos(1, 0)).unwrap().dirs, Dirs::RIGHT | Dirs::UP);
        assert_eq!(laby.get(Pos(1, 1)).unwrap().dirs, Dirs::LEFT | Dirs::UP);
    }

    #[test]
    fn empty_shapes_are_rejected() {
        assert!(matches!(
            Laby::zeros(Pos(0, 5)),
            Err(LabyError::InvalidSize(_))
        ));
        assert!(matches!(
            Laby::from_letters(""),
            Err(LabyError::InvalidSize(_))
        ));
    }

    #[test]
    fn neighbors_synthesize_virtual_walls() {
        let laby = Laby::zeros(Pos(1, 1)).unwrap();
        let neighbors = laby.neighbors(Pos(0, 0));
        assert!(neighbors.left.is_virtual());
        assert_eq!(neighbors.left.dirs, !Dirs::RIGHT);
        assert_eq!(neighbors.up.dirs, !Dirs::DOWN);

        // Both walls cancel at a literal grid corner.
        let corner = laby.neighbors(Pos(1, 1)).down;
        assert!(corner.is_virtual());
        assert_eq!(corner.dirs, Dirs::ALL);
    }

    #[test]
    fn reversed_swaps_and_restores() {
        let mut laby = Laby::zeros(Pos(2, 2)).unwrap();
        laby.set_start(Pos(0, 0)).unwrap();
        laby.set_finish(Pos(1, 1)).unwrap();

        laby.reversed(|laby| {
            assert_eq!(laby.start(), Some(Pos(1, 1)));
            assert_eq!(laby.finish(), Some(Pos(0, 0)));
        });
        assert_eq!(laby.start(), Some(Pos(0, 0)));
        assert_eq!(laby.finish(), Some(Pos(1, 1)));
    }

    #[test]
    fn writing_walls_opens_both_sides() {
        let mut laby = Laby::zeros(Pos(1, 2)).unwrap();
        let route = Route::from_steps(vec![
            RouteStep {
                pos: Pos(0, 0),
                dir: Dirs::RIGHT,
            },
            RouteStep {
                pos: Pos(0, 1),
                dir: Dirs::NONE,
            },
        ]);
        laby.write(&route, true).unwrap();
        assert_eq!(laby.get(Pos(0, 0)).unwrap().dirs, Dirs::RIGHT);
        assert_eq!(laby.get(Pos(0, 1)).unwrap().dirs, Dirs::LEFT);

        laby.write(&route, false).unwrap();
        assert_eq!(laby.get(Pos(0, 0)).unwrap().route_dirs, Dirs::RIGHT);
        assert_eq!(laby.get(Pos(0, 1)).unwrap().route_dirs, Dirs::NONE);
    }

    #[test]
    fn corridor_renders_with_matched_corners() {
        let mut laby = Laby::from_letters("r, l").unwrap();
        laby.set_start(Pos(0, 0)).unwrap();
        laby.set_finish(Pos(0, 1)).unwrap();

        let expected = [
            "┏━━━━━━━━━━━┓     ",
            "┃ ←┼→   →┼← ┃     ",
            "┗━━━━━━━━━━━┛     ",
            "                  ",
        ]
        .join("\n");
        assert_eq!(laby.render().unwrap(), expected);
    }

    #[test]
    fn solved_corridor_traces_arrows() {
        let mut laby = Laby::from_letters("r, l").unwrap();
        laby.set_start(Pos(0, 0)).unwrap();
        laby.set_finish(Pos(0, 1)).unwrap();
        let route = Route::from_steps(vec![
            RouteStep {
                pos: Pos(0, 0),
                dir: Dirs::RIGHT,
            },
            RouteStep {
                pos: Pos(0, 1),
                dir: Dirs::NONE,
            },
        ]);
        laby.write(&route, false).unwrap();

        let rendered = laby.render().unwrap();
        let interior = rendered.lines().nth(1).unwrap();
        assert_eq!(interior, "┃ ←┼→─→─→┼← ┃     ");
    }

    #[test]
    fn unmarked_box_renders_bare() {
        let laby = Laby::zeros(Pos(1, 1)).unwrap();
        let expected = [
            "┏━━━━━┓     ",
            "┃     ┃     ",
            "┗━━━━━┛     ",
            "            ",
        ]
        .join("\n");
        assert_eq!(laby.render().unwrap(), expected);
    }

    #[test]
    fn rendering_is_idempotent() {
        let laby = Laby::from_letters("r, lr, l\nr, lr, l").unwrap();
        assert_eq!(laby.render().unwrap(), laby.render().unwrap());
    }

    #[test]
    fn letters_and_dirs_render_identically() {
        let from_letters = Laby::from_letters("r, lr, l\nr, lr, l").unwrap();
        let dirs = Grid::from_rows(vec![
            vec![Dirs::RIGHT, Dirs::H, Dirs::LEFT],
            vec![Dirs::RIGHT, Dirs::H, Dirs::LEFT],
        ])
        .unwrap();
        let from_dirs = Laby::from_dirs(&dirs).unwrap();
        assert_eq!(from_letters.render().unwrap(), from_dirs.render().unwrap());
    }

    #[test]
    fn asymmetric_passages_fail_to_render() {
        let laby = Laby::from_letters("r, ").unwrap();
        assert!(matches!(
            laby.render(),
            Err(LabyError::InconsistentNeighbors(Pos(0, 0)))
        ));
    }
}
