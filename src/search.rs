use crate::travel::Hop;
use crate::volcano::{ValveHandle, Volcano};

// Valves opened along the current branch. Copied down the recursion, so
// sibling branches never see each other's openings and there's nothing to
// restore when a branch is abandoned.
#[derive(Clone, Copy, Default)]
struct OpenSet(u128);

impl OpenSet {
    fn contains(self, vh: ValveHandle) -> bool {
        self.0 & (1u128 << vh.as_usize()) != 0
    }

    fn with(self, vh: ValveHandle) -> Self {
        OpenSet(self.0 | (1u128 << vh.as_usize()))
    }
}

// Progress along one branch: time left on the shared clock, the combined
// rate of the open valves, and the pressure they'll have released by now.
#[derive(Clone, Copy, Default)]
struct Path {
    left: u32,
    rate: u32,
    released: u32,
    opened: OpenSet,
}

impl Path {
    fn begin(budget: u32) -> Self {
        Path { left: budget, ..Path::default() }
    }

    // Let time pass at the current rate. Callers never elapse more time
    // than is left.
    fn elapse(self, time: u32) -> Self {
        Path {
            left: self.left - time,
            released: self.released + self.rate * time,
            ..self
        }
    }

    // Total released if nobody opens anything else before the clock runs
    // out.
    fn settled(self) -> u32 {
        self.released + self.rate * self.left
    }
}

struct Search<'a> {
    volcano: &'a Volcano,
    travel: &'a [Vec<Hop>],
    best: u32,
}

pub fn max_release(volcano: &Volcano, travel: &[Vec<Hop>], budget: u32) -> u32 {
    let mut search = Search { volcano, travel, best: 0 };
    for &hop in &travel[volcano.start().as_usize()] {
        search.release_from(hop, Path::begin(budget));
    }
    search.best
}

impl Search<'_> {
    // Walk to hop.valve, open it, and try every way to continue from there.
    fn release_from(&mut self, hop: Hop, path: Path) {
        // No time to get there: let the clock run out where we are.
        if hop.time >= path.left {
            self.best = self.best.max(path.settled());
            return;
        }

        // The walk and the minute spent opening both run at the old rate;
        // the valve only helps from the minute after it's opened.
        let mut path = path.elapse(hop.time + 1);
        path.rate += self.volcano.get(hop.valve).flow;
        path.opened = path.opened.with(hop.valve);

        let travel = self.travel;
        for &next in &travel[hop.valve.as_usize()] {
            if !path.opened.contains(next.valve) {
                self.release_from(next, path);
            }
        }
        // Also consider stopping here and waiting out the clock.
        self.best = self.best.max(path.settled());
    }
}

// One of the two agents: the valve it has committed to walk to and open,
// and how many minutes until it gets that done. The two agents share the
// clock but drift apart as they walk different distances, so the pair
// search always advances to whichever agent frees up first.
#[derive(Clone, Copy)]
struct Agent {
    valve: ValveHandle,
    eta: u32,
}

// An agent with nothing left worth doing waits out the clock where it is.
const PARKED: u32 = u32::MAX;

impl Agent {
    fn commit(hop: Hop) -> Self {
        Agent { valve: hop.valve, eta: hop.time }
    }

    fn parked(valve: ValveHandle) -> Self {
        Agent { valve, eta: PARKED }
    }

    fn is_parked(&self) -> bool {
        self.eta == PARKED
    }

    fn after(self, time: u32) -> Self {
        if self.is_parked() {
            self
        } else {
            Agent { valve: self.valve, eta: self.eta - time }
        }
    }
}

pub fn max_release_pair(volcano: &Volcano, travel: &[Vec<Hop>], budget: u32) -> u32 {
    let mut search = Search { volcano, travel, best: 0 };
    let start = volcano.start();
    let hops = &travel[start.as_usize()];

    // Both agents pick their first destination in the same instant. They're
    // interchangeable, so trying ordered pairs would search everything
    // twice; parking one of them covers every single-agent plan too.
    for (i, &first) in hops.iter().enumerate() {
        for &second in &hops[i + 1..] {
            search.release_pair(Agent::commit(first), Agent::commit(second), Path::begin(budget));
        }
        search.release_pair(Agent::commit(first), Agent::parked(start), Path::begin(budget));
    }
    search.best
}

impl Search<'_> {
    fn release_pair(&mut self, a: Agent, b: Agent, path: Path) {
        // Jump ahead to the next moment an agent finishes opening a valve.
        // If the clock runs out first, this branch is done.
        let wait = a.eta.min(b.eta);
        if wait >= path.left {
            self.best = self.best.max(path.settled());
            return;
        }
        let mut path = path.elapse(wait);
        let a = a.after(wait);
        let b = b.after(wait);

        // Whoever's timer hit zero opens their valve now. Opening costs one
        // minute at the old rate, and a single shared minute covers both
        // agents when they arrive together.
        path = path.elapse(1);
        for agent in [a, b] {
            if agent.eta == 0 {
                path.opened = path.opened.with(agent.valve);
                path.rate += self.volcano.get(agent.valve).flow;
            }
        }

        // The agents are symmetric from here on, so put the one that just
        // arrived first.
        let (a, b) = if a.eta == 0 { (a, b) } else { (b, a) };
        if b.eta == 0 {
            // Both arrived: try every pair of next commitments, except both
            // claiming the same valve.
            let for_a = self.commits(a.valve, b.valve, path.opened);
            let for_b = self.commits(b.valve, a.valve, path.opened);
            for &na in &for_a {
                for &nb in &for_b {
                    if !na.is_parked() && !nb.is_parked() && na.valve == nb.valve {
                        continue;
                    }
                    if na.is_parked() && nb.is_parked() {
                        continue; // same as settling, below
                    }
                    self.release_pair(na, nb, path);
                }
            }
        } else {
            // Only a arrived. b keeps walking through the minute a spent
            // opening, and a can't claim the valve b is committed to.
            let b = b.after(1);
            for &na in &self.commits(a.valve, b.valve, path.opened) {
                if na.is_parked() && b.is_parked() {
                    continue;
                }
                self.release_pair(na, b, path);
            }
        }
        // Also consider both agents stopping here.
        self.best = self.best.max(path.settled());
    }

    // Everything an agent at `from` could commit to next: any closed valve
    // it can reach that the partner hasn't claimed, or parking for good.
    fn commits(&self, from: ValveHandle, claimed: ValveHandle, opened: OpenSet) -> Vec<Agent> {
        let mut commits: Vec<Agent> = self.travel[from.as_usize()].iter()
            .filter(|hop| !opened.contains(hop.valve) && hop.valve != claimed)
            .map(|&hop| Agent::commit(hop))
            .collect();
        commits.push(Agent::parked(from));
        commits
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::travel::travel_times;
    use std::str::FromStr;

    const EXAMPLE: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II";

    fn example() -> (Volcano, Vec<Vec<Hop>>) {
        let volcano = Volcano::from_str(EXAMPLE).unwrap();
        let travel = travel_times(&volcano);
        (volcano, travel)
    }

    #[test]
    fn test_max_release() {
        let (volcano, travel) = example();
        assert_eq!(max_release(&volcano, &travel, 30), 1651);
    }

    #[test]
    fn test_max_release_pair() {
        let (volcano, travel) = example();
        assert_eq!(max_release_pair(&volcano, &travel, 26), 1707);
    }

    #[test]
    fn test_no_valves_worth_opening() {
        let input = "\
Valve AA has flow rate=0; tunnels lead to valves BB
Valve BB has flow rate=0; tunnels lead to valves AA";
        let volcano = Volcano::from_str(input).unwrap();
        let travel = travel_times(&volcano);
        assert_eq!(max_release(&volcano, &travel, 30), 0);
        assert_eq!(max_release_pair(&volcano, &travel, 26), 0);
    }

    #[test]
    fn test_budget_too_short_to_matter() {
        // CC is two minutes away, so it takes until minute three for it to
        // be open, and a fourth minute for that to count for anything.
        let input = "\
Valve AA has flow rate=0; tunnels lead to valves BB
Valve BB has flow rate=0; tunnels lead to valves AA, CC
Valve CC has flow rate=5; tunnel leads to valve BB";
        let volcano = Volcano::from_str(input).unwrap();
        let travel = travel_times(&volcano);
        for budget in 0..=3 {
            assert_eq!(max_release(&volcano, &travel, budget), 0, "budget={budget}");
        }
        assert_eq!(max_release(&volcano, &travel, 4), 5);
        assert_eq!(max_release(&volcano, &travel, 5), 10);
    }

    #[test]
    fn test_search_is_idempotent() {
        let (volcano, travel) = example();
        assert_eq!(
            max_release(&volcano, &travel, 30),
            max_release(&volcano, &travel, 30),
        );
        assert_eq!(
            max_release_pair(&volcano, &travel, 26),
            max_release_pair(&volcano, &travel, 26),
        );
    }

    #[test]
    fn test_more_time_never_hurts() {
        let (volcano, travel) = example();
        let mut prev = 0;
        for budget in 0..=30 {
            let got = max_release(&volcano, &travel, budget);
            assert!(got >= prev, "budget={budget}: {got} < {prev}");
            prev = got;
        }
    }

    #[test]
    fn test_pair_at_least_matches_one_agent() {
        // The second agent can always just park at AA.
        let (volcano, travel) = example();
        for budget in [8, 15, 26] {
            let solo = max_release(&volcano, &travel, budget);
            let pair = max_release_pair(&volcano, &travel, budget);
            assert!(pair >= solo, "budget={budget}: {pair} < {solo}");
        }
    }
}
