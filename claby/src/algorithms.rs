use crate::dirs::{Dirs, Pos};
use crate::laby::{Laby, LabyError};
use crate::router::{Route, RouteNotFoundError, Router};

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

/// Generate a random laby of the given shape, with its start in the top
/// left and its finish in the bottom right corner.
///
/// The search runs over a fully open scratch of the laby with start and
/// finish reversed, branching off a new route each time one completes,
/// until no unexplored route is left. Everything is then closed up and
/// only the discovered routes are carved back in, so the start and
/// finish are connected by construction.
pub fn generate(shape: Pos, rng: &mut Random) -> Result<Laby, LabyError> {
    let mut laby = generate_empty(shape)?;

    let router = laby.reversed(|laby| -> Result<Router, LabyError> {
        let start = laby.start().ok_or(LabyError::MissingEndpoints)?;
        let mut router = Router::new(start);
        loop {
            match find_route(laby, &mut router, rng) {
                Ok(()) => {
                    if !router.branch() {
                        break;
                    }
                }
                Err(LabyError::RouteNotFound(_)) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(router)
    })?;

    laby.write_all(Dirs::NONE, true);
    let routes = router.routes();
    log::debug!(
        "carving {} routes into a {}x{} laby",
        routes.len(),
        shape.0,
        shape.1
    );
    for route in &routes {
        laby.write(route, true)?;
    }
    Ok(laby)
}

fn generate_empty(shape: Pos) -> Result<Laby, LabyError> {
    let mut laby = Laby::ones(shape)?;
    laby.set_start(Pos::ZERO)?;
    laby.set_finish(shape - Pos(1, 1))?;
    Ok(laby)
}

/// Find a route from the laby's start to its finish, using only its
/// open passages. Fails with [`RouteNotFoundError`] when the start is
/// exhausted without reaching the finish.
pub fn solve(laby: &Laby, rng: &mut Random) -> Result<Route, LabyError> {
    let start = laby.start().ok_or(LabyError::MissingEndpoints)?;
    laby.finish().ok_or(LabyError::MissingEndpoints)?;

    let mut router = Router::new(start);
    find_route(laby, &mut router, rng)?;
    let route = router.head_route();
    log::debug!("solved {}x{} laby in {} steps", laby.size().0, laby.size().1, route.len());
    Ok(route)
}

/// Advance the router's head until it reaches the laby's finish,
/// backtracking out of dead ends. A non-main branch that gets stuck
/// after advancing is left where it is: it has traced a dead-end
/// corridor, which is exactly what generation branches are for.
fn find_route(laby: &Laby, router: &mut Router, rng: &mut Random) -> Result<(), LabyError> {
    let start = laby.start().ok_or(LabyError::MissingEndpoints)?;
    let finish = laby.finish().ok_or(LabyError::MissingEndpoints)?;

    let mut has_advanced = false;
    while router.head_pos() != finish {
        let pos = router.head_pos();
        let permitted_dirs = laby.get(pos).ok_or(LabyError::OutOfBounds(pos))?.dirs;
        let dirs_choices = router.get_dirs_choices(permitted_dirs)?;

        if dirs_choices.is_empty() {
            if router.head_pos() == start {
                return Err(RouteNotFoundError.into());
            }
            if !router.is_head_main() && has_advanced {
                return Ok(());
            }
            router.backtrack(!has_advanced);
            continue;
        }

        has_advanced = true;
        let dir = dirs_choices.choice(rng);
        router.advance(dir)?;
    }
    Ok(())
}
