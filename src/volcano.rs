use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use once_cell::unsync::Lazy;
use regex_lite::Regex;

pub const START_VALVE: &str = "AA";

// The searches track open valves in a u128 bitmask indexed by handle.
pub const MAX_VALVES: usize = 128;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValveHandle(u8);

impl ValveHandle {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ValveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct Valve {
    pub name: String,
    pub flow: u32,
    pub tunnels: Vec<ValveHandle>,
}

// Parsed form of a valve, with tunnels still referring to valves by name.
pub struct ValveDef {
    pub name: String,
    pub flow: u32,
    pub tunnels: Vec<String>,
}

#[derive(Debug)]
pub struct Volcano {
    valves: Vec<Valve>,
    handle_for: HashMap<String, ValveHandle>,
    start: ValveHandle,
}

impl Volcano {
    pub fn from_defs(defs: Vec<ValveDef>, start: &str) -> Result<Self, Box<dyn Error>> {
        if defs.len() > MAX_VALVES {
            return Err(format!("too many valves: {} > {}", defs.len(), MAX_VALVES).into());
        }

        let mut handle_for: HashMap<String, ValveHandle> = HashMap::new();
        for (i, def) in defs.iter().enumerate() {
            let prev = handle_for.insert(def.name.clone(), ValveHandle(i as u8));
            if prev.is_some() {
                return Err(format!("valve {} is defined twice", def.name).into());
            }
        }

        let mut valves: Vec<Valve> = Vec::with_capacity(defs.len());
        for def in defs {
            let tunnels = def.tunnels.iter()
                .map(|name| {
                    handle_for.get(name).copied().ok_or_else(|| {
                        format!("valve {} has a tunnel to undefined valve {}", def.name, name)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            valves.push(Valve { name: def.name, flow: def.flow, tunnels });
        }

        let Some(&start) = handle_for.get(start) else {
            return Err(format!("start valve {start} is not defined").into());
        };
        Ok(Volcano { valves, handle_for, start })
    }

    pub fn get(&self, vh: ValveHandle) -> &Valve {
        &self.valves[vh.as_usize()]
    }

    pub fn handle(&self, name: &str) -> Option<ValveHandle> {
        self.handle_for.get(name).copied()
    }

    pub fn start(&self) -> ValveHandle {
        self.start
    }

    pub fn len(&self) -> usize {
        self.valves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valves.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = ValveHandle> {
        (0..self.valves.len()).map(|i| ValveHandle(i as u8))
    }

    pub fn flow(&self, name: &str) -> u32 {
        self.get(self.handle_for[name]).flow
    }

    pub fn tunnel_names(&self, name: &str) -> Vec<&str> {
        self.get(self.handle_for[name]).tunnels.iter()
            .map(|&vh| self.get(vh).name.as_str())
            .collect()
    }
}

impl FromStr for Volcano {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // eg: Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
        let line_re = Lazy::new(|| {
            Regex::new(r#"Valve ([A-Z]{2}) has flow rate=(\d+); tunnel(?:s)? lead(?:s)? to valve(?:s)? (.*)"#).unwrap()
        });
        let mut defs: Vec<ValveDef> = Vec::new();
        for line in s.lines() {
            let Some(caps) = line_re.captures(line) else {
                return Err(format!("unexpected line format: {line}").into());
            };
            let name = caps[1].to_string();
            let flow: u32 = caps[2].parse()?;
            let tunnels = caps[3].split(", ").map(str::to_string).collect();
            defs.push(ValveDef { name, flow, tunnels });
        }
        Volcano::from_defs(defs, START_VALVE)
    }
}
