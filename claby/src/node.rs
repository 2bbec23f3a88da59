use crate::chars;
use crate::dirs::Dirs;

/// One cell of a maze: its open passages, the directions a traced route
/// takes through it, and an optional label shown in its interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// The allowed directions out of this node.
    pub dirs: Dirs,
    /// The directions in which a route is traced.
    pub route_dirs: Dirs,
    label: Option<&'static str>,
    is_virtual: bool,
}

impl Node {
    pub fn new(dirs: Dirs) -> Node {
        Node {
            dirs,
            route_dirs: Dirs::NONE,
            label: None,
            is_virtual: false,
        }
    }

    /// A node that is completely closed up.
    pub fn zero() -> Node {
        Node::new(Dirs::NONE)
    }

    /// A node that is completely open.
    pub fn one() -> Node {
        Node::new(Dirs::ALL)
    }

    /// A display-only node walled in the given directions, used to draw
    /// the outside of the maze. Virtual nodes are exempt from the
    /// neighbor-consistency invariant.
    pub fn new_virtual(wall_dirs: Dirs) -> Node {
        let mut node = Node::new(!wall_dirs);
        node.is_virtual = true;
        node
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub(crate) fn set_label(&mut self, label: &'static str) {
        self.label = Some(label);
    }

    /// The two glyph rows this node contributes to the rendered maze:
    /// its top-left corner plus top edge, then its left edge plus
    /// interior. Bottom and right edges belong to the neighboring
    /// blocks, so emitting only these two rows never doubles a border.
    pub fn strs(&self, neighbors: &Neighbors) -> [String; 2] {
        let corner = corner_char(neighbors, Dirs::LEFT | Dirs::UP);
        let top = self.edge_str(neighbors, Dirs::UP);
        let left = self.edge_str(neighbors, Dirs::LEFT);
        let center = self.center_str(neighbors);
        [format!("{corner}{top}"), format!("{left}{center}")]
    }

    fn edge_str(&self, neighbors: &Neighbors, edge_dir: Dirs) -> String {
        let opposite = edge_dir.opposite().expect("primitive direction");
        let is_h = Dirs::H.intersects(edge_dir);
        if !self.dirs.intersects(edge_dir) {
            return if is_h {
                chars::V_WALL_BOLD.to_string()
            } else {
                chars::H_WALL_BOLD.to_string().repeat(chars::H_LEN)
            };
        }

        let base = if is_h {
            chars::SPACE.to_string()
        } else {
            chars::SPACE.to_string().repeat(chars::H_LEN)
        };

        let mut edge_route_dirs = Dirs::NONE;
        if self.route_dirs.intersects(edge_dir)
            || neighbors.get(edge_dir).route_dirs.intersects(opposite)
        {
            edge_route_dirs = edge_dir | opposite;
        }
        let label = if edge_route_dirs == Dirs::H || edge_route_dirs == Dirs::V {
            let arrow_dir = if self.route_dirs.intersects(edge_dir) {
                edge_dir
            } else {
                opposite
            };
            chars::arrow(arrow_dir).to_string()
        } else {
            chars::corner(edge_route_dirs).to_string()
        };
        chars::embedded(&base, &label)
    }

    fn center_str(&self, neighbors: &Neighbors) -> String {
        let mut center_dirs = self.route_dirs;
        for dir in Dirs::seq() {
            let opposite = dir.opposite().expect("primitive direction");
            if neighbors.get(dir).route_dirs.intersects(opposite) {
                center_dirs |= dir;
            }
        }

        let base = chars::center_base(center_dirs);
        match self.label {
            Some(label) => chars::embedded(&base, label),
            None => chars::embedded(&base, &chars::corner(center_dirs).to_string()),
        }
    }

    /// Whether the open/closed state toward every neighbor mirrors the
    /// neighbor's state back toward this node. Virtual nodes pass
    /// vacuously.
    pub fn neighbors_consistent(&self, neighbors: &Neighbors) -> bool {
        if self.is_virtual {
            return true;
        }
        Dirs::seq().into_iter().all(|dir| {
            let opposite = dir.opposite().expect("primitive direction");
            self.dirs.intersects(dir) == neighbors.get(dir).dirs.intersects(opposite)
        })
    }
}

/// The four cells around a position, real or synthesized.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors {
    pub left: Node,
    pub right: Node,
    pub up: Node,
    pub down: Node,
}

impl Neighbors {
    pub fn get(&self, dir: Dirs) -> &Node {
        match dir {
            Dirs::LEFT => &self.left,
            Dirs::RIGHT => &self.right,
            Dirs::UP => &self.up,
            Dirs::DOWN => &self.down,
            _ => panic!("no neighbor for composite direction {dir}"),
        }
    }
}

/// Resolve one corner of a node's glyph block from the two cells that
/// share it. Each of the four wall stubs around the corner is present
/// exactly when the corresponding passage next to it is closed.
fn corner_char(neighbors: &Neighbors, corner_dir: Dirs) -> char {
    let h_dir = corner_dir & Dirs::H;
    let v_dir = corner_dir & Dirs::V;
    debug_assert!(!h_dir.is_empty() && !v_dir.is_empty());
    let h_opposite = h_dir.opposite().expect("primitive direction");
    let v_opposite = v_dir.opposite().expect("primitive direction");

    let mut dirs = Dirs::NONE;
    if !neighbors.get(h_dir).dirs.intersects(v_dir) {
        dirs |= h_dir;
    }
    if !neighbors.get(v_dir).dirs.intersects(v_opposite) {
        dirs |= h_opposite;
    }
    if !neighbors.get(v_dir).dirs.intersects(h_dir) {
        dirs |= v_dir;
    }
    if !neighbors.get(h_dir).dirs.intersects(h_opposite) {
        dirs |= v_opposite;
    }
    chars::corner_bold(dirs)
}
