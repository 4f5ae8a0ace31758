use std::collections::VecDeque;

use crate::volcano::{ValveHandle, Volcano};

// One edge of the reduced graph: a valuable valve and the walking time to it.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Hop {
    pub valve: ValveHandle,
    pub time: u32,
}

// Walking times from every valuable valve (and the start) to every valuable
// valve it can reach, indexed by source handle. Rows for other valves are
// empty since the searches never stand there.
pub fn travel_times(volcano: &Volcano) -> Vec<Vec<Hop>> {
    let mut times: Vec<Vec<Hop>> = vec![Vec::new(); volcano.len()];
    for src in volcano.handles() {
        if src == volcano.start() || volcano.get(src).flow > 0 {
            times[src.as_usize()] = hops_from(volcano, src);
        }
    }
    times
}

// Tunnels all take a minute to walk, so a plain BFS finds the shortest
// travel times from src. The source itself is never one of its own hops.
fn hops_from(volcano: &Volcano, src: ValveHandle) -> Vec<Hop> {
    let mut seen = vec![false; volcano.len()];
    let mut queue: VecDeque<(ValveHandle, u32)> = VecDeque::new();
    let mut hops: Vec<Hop> = Vec::new();

    seen[src.as_usize()] = true;
    queue.push_back((src, 0));
    while let Some((valve, time)) = queue.pop_front() {
        for &next in &volcano.get(valve).tunnels {
            if seen[next.as_usize()] {
                continue;
            }
            seen[next.as_usize()] = true;
            if volcano.get(next).flow > 0 {
                hops.push(Hop { valve: next, time: time + 1 });
            }
            queue.push_back((next, time + 1));
        }
    }
    hops
}
