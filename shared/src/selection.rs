//! Best-route selection across scored alternatives

use crate::models::CandidateRoute;
use crate::scoring::{RouteScorer, ScoredRoute};

/// Outcome of one selection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub best: ScoredRoute,
    /// Number of real candidates that were scored
    pub candidates: usize,
    /// True when no alternatives existed and the route is synthetic
    pub placeholder: bool,
}

/// Pick the best candidate according to the scorer's objective.
///
/// Ties keep the earliest candidate. An empty candidate set yields the
/// placeholder route scored the same way, so callers always get a route.
pub fn select_best<S>(scorer: &S, candidates: &[CandidateRoute]) -> Selection
where
    S: RouteScorer + ?Sized,
{
    let objective = scorer.objective();

    let Some((first, rest)) = candidates.split_first() else {
        let route = CandidateRoute::placeholder();
        let score = scorer.score(&route);
        return Selection {
            best: ScoredRoute::new(route, score),
            candidates: 0,
            placeholder: true,
        };
    };

    let mut best_route = first;
    let mut best_score = scorer.score(first);

    for route in rest {
        let score = scorer.score(route);
        if objective.is_better(score.score, best_score.score) {
            best_route = route;
            best_score = score;
        }
    }

    Selection {
        best: ScoredRoute::new(best_route.clone(), best_score),
        candidates: candidates.len(),
        placeholder: false,
    }
}
