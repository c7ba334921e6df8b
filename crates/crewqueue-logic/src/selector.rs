//! Crew selection — fill a part's seats from the available crew by role.
//!
//! Selection is greedy over a ranked candidate list:
//!
//! 1. Drop exempt crew (already seated elsewhere) and, under hard-lock,
//!    vacationing crew.
//! 2. Rank: rested crew before vacationing crew, then by experience
//!    (ascending, or descending when preferring veterans), then whoever has
//!    waited longest since their last mission, then by name.
//! 3. Seat `i` inside the role composition takes the best remaining
//!    candidate of `composition[i]`. A role with no candidate leaves its
//!    seat empty.
//! 4. Seats past the composition draw a role uniformly from the composition
//!    roles that still have candidates, using the caller's RNG.
//!
//! The result never exceeds the capacity and never names anyone twice.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::roles::DEFAULT_COMPOSITION;

/// One crew member as the selector sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// Profession / experience trait title.
    pub role: String,
    pub experience_level: u8,
    /// Universal time of the last recovery; `-inf` if never flown.
    pub last_flown: f64,
    pub on_vacation: bool,
}

/// Seats to fill and the roles they want.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRequest {
    pub capacity: usize,
    /// Role wanted by each leading seat.
    pub composition: Vec<String>,
}

impl SeatRequest {
    /// Request using the default Pilot / Engineer / Scientist composition.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            composition: DEFAULT_COMPOSITION.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Request with an explicit composition; an empty one falls back to the
    /// default.
    pub fn with_composition<I, S>(capacity: usize, composition: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let composition: Vec<String> = composition
            .into_iter()
            .map(Into::into)
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if composition.is_empty() {
            Self::new(capacity)
        } else {
            Self {
                capacity,
                composition,
            }
        }
    }

    /// Parse a part's comma-separated composition ("Pilot, Engineer").
    pub fn parse(capacity: usize, raw: &str) -> Self {
        Self::with_composition(capacity, raw.split(','))
    }

    /// Distinct roles in composition order.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        for role in &self.composition {
            if !roles.iter().any(|r| same_role(r, role)) {
                roles.push(role);
            }
        }
        roles
    }
}

/// Everything a selection needs besides the pool and RNG.
#[derive(Debug, Clone)]
pub struct SelectionQuery<'a> {
    pub request: &'a SeatRequest,
    /// Crew already placed elsewhere.
    pub exempt: &'a [String],
    pub prefer_veteran: bool,
    pub hard_lock: bool,
}

impl<'a> SelectionQuery<'a> {
    pub fn new(request: &'a SeatRequest) -> Self {
        Self {
            request,
            exempt: &[],
            prefer_veteran: false,
            hard_lock: false,
        }
    }
}

fn same_role(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Sort candidates best-first for the given preference.
pub fn rank_candidates(candidates: &mut [&Candidate], prefer_veteran: bool) {
    candidates.sort_by(|a, b| {
        let experience = if prefer_veteran {
            b.experience_level.cmp(&a.experience_level)
        } else {
            a.experience_level.cmp(&b.experience_level)
        };
        a.on_vacation
            .cmp(&b.on_vacation)
            .then(experience)
            .then_with(|| a.last_flown.total_cmp(&b.last_flown))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Pick crew for `query.request`. Returns names in seat order.
pub fn select_crew<R: Rng + ?Sized>(
    query: &SelectionQuery<'_>,
    pool: &[Candidate],
    rng: &mut R,
) -> Vec<String> {
    let request = query.request;
    let mut remaining: Vec<&Candidate> = pool
        .iter()
        .filter(|c| !query.exempt.iter().any(|e| *e == c.name))
        .filter(|c| !(query.hard_lock && c.on_vacation))
        .collect();
    rank_candidates(&mut remaining, query.prefer_veteran);

    let mut picked: Vec<String> = Vec::with_capacity(request.capacity);
    let roles = request.roles();

    for seat in 0..request.capacity {
        let role = match request.composition.get(seat) {
            Some(role) => role.as_str(),
            None => {
                let open: Vec<&str> = roles
                    .iter()
                    .copied()
                    .filter(|r| remaining.iter().any(|c| same_role(&c.role, r)))
                    .collect();
                if open.is_empty() {
                    break;
                }
                open[rng.gen_range(0..open.len())]
            }
        };

        match remaining.iter().position(|c| same_role(&c.role, role)) {
            Some(idx) => {
                let chosen = remaining.remove(idx).name.clone();
                remaining.retain(|c| c.name != chosen);
                picked.push(chosen);
            }
            None => log::debug!("No {} available for seat {}", role, seat),
        }
    }

    log::debug!(
        "Selected {}/{} crew: {}",
        picked.len(),
        request.capacity,
        picked.join(", ")
    );
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(name: &str, role: &str, level: u8) -> Candidate {
        Candidate {
            name: name.into(),
            role: role.into(),
            experience_level: level,
            last_flown: f64::NEG_INFINITY,
            on_vacation: false,
        }
    }

    fn select(query: &SelectionQuery<'_>, pool: &[Candidate], seed: u64) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(seed);
        select_crew(query, pool, &mut rng)
    }

    #[test]
    fn empty_pool_selects_nobody() {
        let request = SeatRequest::new(3);
        assert!(select(&SelectionQuery::new(&request), &[], 1).is_empty());
    }

    #[test]
    fn zero_capacity_selects_nobody() {
        let request = SeatRequest::new(0);
        let pool = vec![candidate("Jeb", "Pilot", 1)];
        assert!(select(&SelectionQuery::new(&request), &pool, 1).is_empty());
    }

    #[test]
    fn fills_composition_in_order() {
        let request = SeatRequest::new(3);
        let pool = vec![
            candidate("Bob", "Scientist", 0),
            candidate("Bill", "Engineer", 0),
            candidate("Jeb", "Pilot", 0),
        ];
        let picked = select(&SelectionQuery::new(&request), &pool, 1);
        assert_eq!(picked, vec!["Jeb", "Bill", "Bob"]);
    }

    #[test]
    fn missing_role_leaves_seat_empty() {
        // 4 seats, Pilot/Engineer/Scientist, 1 pilot, no engineers, 2 scientists.
        let request = SeatRequest::new(4);
        let pool = vec![
            candidate("Jeb", "Pilot", 1),
            candidate("Bob", "Scientist", 1),
            candidate("Gene", "Scientist", 2),
        ];
        for seed in 0..20 {
            let picked = select(&SelectionQuery::new(&request), &pool, seed);
            assert!(picked.len() <= 3);
            assert_eq!(picked[0], "Jeb");
            // The overflow seat can only be the second scientist.
            assert_eq!(picked, vec!["Jeb", "Bob", "Gene"]);
        }
    }

    #[test]
    fn least_experienced_first_by_default() {
        let request = SeatRequest::with_composition(1, ["Pilot"]);
        let pool = vec![candidate("Vet", "Pilot", 5), candidate("Rookie", "Pilot", 0)];
        assert_eq!(select(&SelectionQuery::new(&request), &pool, 1), vec!["Rookie"]);
    }

    #[test]
    fn veterans_first_when_preferred() {
        let request = SeatRequest::with_composition(1, ["Pilot"]);
        let pool = vec![candidate("Rookie", "Pilot", 0), candidate("Vet", "Pilot", 5)];
        let query = SelectionQuery {
            prefer_veteran: true,
            ..SelectionQuery::new(&request)
        };
        assert_eq!(select(&query, &pool, 1), vec!["Vet"]);
    }

    #[test]
    fn ties_go_to_least_recently_flown() {
        let request = SeatRequest::with_composition(1, ["Pilot"]);
        let mut recent = candidate("Recent", "Pilot", 2);
        recent.last_flown = 500.0;
        let mut rested = candidate("Rested", "Pilot", 2);
        rested.last_flown = 10.0;
        let pool = vec![recent, rested];
        assert_eq!(select(&SelectionQuery::new(&request), &pool, 1), vec!["Rested"]);
    }

    #[test]
    fn exempt_crew_are_skipped() {
        let request = SeatRequest::with_composition(2, ["Pilot", "Pilot"]);
        let pool = vec![candidate("Jeb", "Pilot", 0), candidate("Val", "Pilot", 0)];
        let exempt = vec!["Jeb".to_string()];
        let query = SelectionQuery {
            exempt: &exempt,
            ..SelectionQuery::new(&request)
        };
        assert_eq!(select(&query, &pool, 1), vec!["Val"]);
    }

    #[test]
    fn hard_lock_excludes_vacationing_crew() {
        let request = SeatRequest::with_composition(1, ["Pilot"]);
        let mut tired = candidate("Tired", "Pilot", 0);
        tired.on_vacation = true;
        let pool = vec![tired];
        let query = SelectionQuery {
            hard_lock: true,
            ..SelectionQuery::new(&request)
        };
        assert!(select(&query, &pool, 1).is_empty());
    }

    #[test]
    fn soft_lock_sorts_vacationing_crew_last() {
        let request = SeatRequest::with_composition(2, ["Pilot", "Pilot"]);
        let mut tired = candidate("TiredVet", "Pilot", 5);
        tired.on_vacation = true;
        let pool = vec![tired, candidate("Rookie", "Pilot", 0)];
        let query = SelectionQuery {
            prefer_veteran: true,
            ..SelectionQuery::new(&request)
        };
        assert_eq!(select(&query, &pool, 1), vec!["Rookie", "TiredVet"]);
    }

    #[test]
    fn overflow_is_reproducible_for_a_seed() {
        let request = SeatRequest::new(8);
        let pool: Vec<Candidate> = (0..12)
            .map(|i| {
                let role = ["Pilot", "Engineer", "Scientist"][i % 3];
                candidate(&format!("Crew{}", i), role, (i % 4) as u8)
            })
            .collect();
        let query = SelectionQuery::new(&request);
        assert_eq!(select(&query, &pool, 42), select(&query, &pool, 42));
    }

    #[test]
    fn never_exceeds_capacity_or_repeats() {
        let pool: Vec<Candidate> = (0..9)
            .map(|i| {
                let role = ["Pilot", "Engineer", "Scientist"][i % 3];
                candidate(&format!("Crew{}", i), role, 0)
            })
            .chain(std::iter::once(candidate("Crew0", "Pilot", 0)))
            .collect();
        for capacity in 0..12 {
            let request = SeatRequest::new(capacity);
            for seed in 0..10 {
                let picked = select(&SelectionQuery::new(&request), &pool, seed);
                assert!(picked.len() <= capacity);
                let mut unique = picked.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), picked.len(), "duplicate in {:?}", picked);
            }
        }
    }

    #[test]
    fn composition_longer_than_capacity_is_truncated() {
        let request = SeatRequest::with_composition(1, ["Engineer", "Pilot"]);
        let pool = vec![candidate("Jeb", "Pilot", 0), candidate("Bill", "Engineer", 0)];
        assert_eq!(select(&SelectionQuery::new(&request), &pool, 1), vec!["Bill"]);
    }

    #[test]
    fn parse_trims_and_defaults() {
        let request = SeatRequest::parse(2, " Pilot , Scientist ,");
        assert_eq!(request.composition, vec!["Pilot", "Scientist"]);
        let fallback = SeatRequest::parse(2, " , ");
        assert_eq!(fallback.composition, vec!["Pilot", "Engineer", "Scientist"]);
    }

    #[test]
    fn role_matching_ignores_case() {
        let request = SeatRequest::with_composition(1, ["pilot"]);
        let pool = vec![candidate("Jeb", "Pilot", 0)];
        assert_eq!(select(&SelectionQuery::new(&request), &pool, 1), vec!["Jeb"]);
    }
}
