use hashbrown::HashSet;
use thiserror::Error;

use crate::dirs::{Dirs, DirsError, Pos};

/// The expected terminator of an exhaustive search: the origin itself
/// has no candidate directions left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no route could be found")]
pub struct RouteNotFoundError;

/// One step of a materialized route: a position and the direction taken
/// onward from it. The last step of a route carries `Dirs::NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteStep {
    pub pos: Pos,
    pub dir: Dirs,
}

/// A discovered path through a laby, ordered from its origin to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    steps: Vec<RouteStep>,
}

impl Route {
    pub fn from_steps(steps: Vec<RouteStep>) -> Route {
        Route { steps }
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// The number of moves the route makes; a single-point route has
    /// length zero.
    pub fn len(&self) -> usize {
        self.steps.iter().filter(|step| !step.dir.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> Option<Pos> {
        self.steps.first().map(|step| step.pos)
    }

    pub fn end(&self) -> Option<Pos> {
        self.steps.last().map(|step| step.pos)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.steps.iter().map(|step| step.pos)
    }
}

/// One point of the search state. Points live in the router's arena and
/// chain backward through `prev`, so several branch heads can share one
/// prefix; detaching copies a point instead of mutating the shared one.
#[derive(Debug, Clone)]
struct Point {
    pos: Pos,
    /// The direction taken onward from here, `NONE` while this is a head.
    dir: Dirs,
    /// Directions taken from here and backtracked from.
    old_dirs: Dirs,
    /// Positions explored from here and backtracked past.
    ahead: HashSet<Pos>,
    prev: Option<usize>,
}

impl Point {
    fn new(pos: Pos) -> Point {
        Point {
            pos,
            dir: Dirs::NONE,
            old_dirs: Dirs::NONE,
            ahead: HashSet::new(),
            prev: None,
        }
    }
}

/// The search controller: owns every branch's head and the arena their
/// chains live in. The first branch is the main one; all branches share
/// the set of visited positions, so no two of them ever cross.
#[derive(Debug, Clone)]
pub struct Router {
    points: Vec<Point>,
    heads: Vec<usize>,
}

impl Router {
    pub fn new(pos: Pos) -> Router {
        Router {
            points: vec![Point::new(pos)],
            heads: vec![0],
        }
    }

    fn head_id(&self) -> usize {
        *self.heads.last().expect("router always has a head")
    }

    fn head(&self) -> &Point {
        &self.points[self.head_id()]
    }

    pub fn head_pos(&self) -> Pos {
        self.head().pos
    }

    pub fn is_head_main(&self) -> bool {
        self.heads.len() == 1
    }

    /// Move the head one step in `dir`, recording the direction on the
    /// point it leaves behind.
    pub fn advance(&mut self, dir: Dirs) -> Result<(), DirsError> {
        let head_id = self.head_id();
        let next_pos = self.points[head_id].pos + dir.delta()?;
        self.points[head_id].dir = dir;

        let next_id = self.points.len();
        let mut next = Point::new(next_pos);
        next.prev = Some(head_id);
        self.points.push(next);
        *self.heads.last_mut().expect("router always has a head") = next_id;
        Ok(())
    }

    /// Retreat the head to its predecessor, remembering the direction
    /// just abandoned and every position seen beyond it. With `recreate`
    /// the predecessor is copied into a fresh point with no ahead
    /// memory, leaving the original, possibly shared point untouched.
    pub fn backtrack(&mut self, recreate: bool) {
        let head_id = self.head_id();
        let mut prev_id = self.points[head_id].prev.expect("cannot backtrack past the route origin");
        if recreate {
            let mut copy = self.points[prev_id].clone();
            copy.ahead.clear();
            prev_id = self.points.len();
            self.points.push(copy);
        }

        let head_pos = self.points[head_id].pos;
        let head_ahead = std::mem::take(&mut self.points[head_id].ahead);

        let prev = &mut self.points[prev_id];
        prev.ahead.extend(head_ahead);
        prev.ahead.insert(head_pos);
        prev.old_dirs |= prev.dir;
        prev.dir = Dirs::NONE;
        *self.heads.last_mut().expect("router always has a head") = prev_id;
    }

    /// Start a new branch from a copy of the head's predecessor, with
    /// cleared ahead memory. Returns `false` when the head has no
    /// predecessor, i.e. there is nothing to branch from.
    pub fn branch(&mut self) -> bool {
        let Some(prev_id) = self.head().prev else {
            return false;
        };
        let mut copy = self.points[prev_id].clone();
        copy.ahead.clear();
        let new_id = self.points.len();
        self.points.push(copy);
        self.heads.push(new_id);
        true
    }

    /// Filter the directions the environment permits down to the ones
    /// still worth trying: not already taken or abandoned from this
    /// point, and not leading into a position any branch has claimed or
    /// this head has already explored past.
    pub fn get_dirs_choices(&self, permitted_dirs: Dirs) -> Result<Dirs, DirsError> {
        let head = self.head();
        let mut choices = permitted_dirs & !(head.dir | head.old_dirs);
        if choices.is_empty() {
            return Ok(choices);
        }

        let all_poss = self.all_poss();
        for dir in choices {
            let next_pos = head.pos + dir.delta()?;
            if all_poss.contains(&next_pos) || head.ahead.contains(&next_pos) {
                choices &= !dir;
            }
        }
        Ok(choices)
    }

    /// Every position on any branch's chain. Shared prefixes are walked
    /// once.
    pub fn all_poss(&self) -> HashSet<Pos> {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut poss = HashSet::new();
        for &head in &self.heads {
            let mut current = Some(head);
            while let Some(id) = current {
                if !seen.insert(id) {
                    break;
                }
                poss.insert(self.points[id].pos);
                current = self.points[id].prev;
            }
        }
        poss
    }

    /// Materialize every branch's route, main branch first.
    pub fn routes(&self) -> Vec<Route> {
        self.heads.iter().map(|&head| self.route_from(head)).collect()
    }

    /// Materialize the current head's route.
    pub fn head_route(&self) -> Route {
        self.route_from(self.head_id())
    }

    fn route_from(&self, head: usize) -> Route {
        let mut steps = Vec::new();
        let mut current = Some(head);
        while let Some(id) = current {
            let point = &self.points[id];
            steps.push(RouteStep {
                pos: point.pos,
                dir: point.dir,
            });
            current = point.prev;
        }
        steps.reverse();
        Route { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, RouteStep, Router};
    use crate::dirs::{Dirs, Pos};

    #[test]
    fn advance_records_the_direction_taken() {
        let mut router = Router::new(Pos(0, 0));
        router.advance(Dirs::RIGHT).unwrap();
        assert_eq!(router.head_pos(), Pos(0, 1));

        let route = router.head_route();
        assert_eq!(
            route.steps(),
            [
                RouteStep {
                    pos: Pos(0, 0),
                    dir: Dirs::RIGHT
                },
                RouteStep {
                    pos: Pos(0, 1),
                    dir: Dirs::NONE
                },
            ]
        );
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn abandoned_directions_are_not_retried() {
        let mut router = Router::new(Pos(1, 1));
        router.advance(Dirs::UP).unwrap();
        router.backtrack(false);

        assert_eq!(router.head_pos(), Pos(1, 1));
        let choices = router.get_dirs_choices(Dirs::ALL).unwrap();
        assert_eq!(choices, Dirs::LEFT | Dirs::RIGHT | Dirs::DOWN);
    }

    #[test]
    fn visited_positions_are_excluded() {
        let mut router = Router::new(Pos(0, 0));
        router.advance(Dirs::RIGHT).unwrap();
        router.advance(Dirs::DOWN).unwrap();

        // Going back left into (1, 0) is fine, going up into the
        // visited (0, 1) is not.
        let choices = router.get_dirs_choices(Dirs::ALL).unwrap();
        assert_eq!(choices, Dirs::LEFT | Dirs::RIGHT | Dirs::DOWN);
    }

    #[test]
    fn branch_starts_from_the_heads_predecessor() {
        let mut router = Router::new(Pos(0, 0));
        router.advance(Dirs::RIGHT).unwrap();
        assert!(router.is_head_main());

        assert!(router.branch());
        assert!(!router.is_head_main());
        assert_eq!(router.head_pos(), Pos(0, 0));

        // The copied point keeps its taken direction, so the new branch
        // will not just follow the old route again.
        let choices = router.get_dirs_choices(Dirs::ALL).unwrap();
        assert_eq!(choices, Dirs::LEFT | Dirs::UP | Dirs::DOWN);
    }

    #[test]
    fn branching_needs_a_predecessor() {
        let mut router = Router::new(Pos(0, 0));
        assert!(!router.branch());
    }

    #[test]
    fn recreate_detaches_from_shared_state() {
        let mut router = Router::new(Pos(0, 0));
        router.advance(Dirs::RIGHT).unwrap();
        router.advance(Dirs::RIGHT).unwrap();
        router.branch();

        // The branch head sits on a copy of (0, 1); retreating with
        // recreate must not disturb the main route.
        router.backtrack(true);
        assert_eq!(router.head_pos(), Pos(0, 0));

        let main_route = router.routes().remove(0);
        let positions: Vec<_> = main_route.positions().collect();
        assert_eq!(positions, [Pos(0, 0), Pos(0, 1), Pos(0, 2)]);
        assert_eq!(main_route.len(), 2);
    }

    #[test]
    fn single_point_route_is_empty() {
        let route = Route::from_steps(vec![RouteStep {
            pos: Pos(0, 0),
            dir: Dirs::NONE,
        }]);
        assert!(route.is_empty());
        assert_eq!(route.start(), route.end());
    }
}
