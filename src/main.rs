use std::error::Error;
use std::io::Read;
use std::str::FromStr;

use volcano::{max_release, max_release_pair, travel_times, Volcano};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args[..] {
        ["part1"] => println!("{}", part1(std::io::stdin().lock())?),
        ["part2"] => println!("{}", part2(std::io::stdin().lock())?),
        _ => return Err("must specify part1|part2".into()),
    }
    Ok(())
}

fn part1(r: impl Read) -> Result<u32, Box<dyn Error>> {
    let input = std::io::read_to_string(r)?;
    let volcano = Volcano::from_str(&input)?;
    let travel = travel_times(&volcano);
    Ok(max_release(&volcano, &travel, 30))
}

fn part2(r: impl Read) -> Result<u32, Box<dyn Error>> {
    let input = std::io::read_to_string(r)?;
    let volcano = Volcano::from_str(&input)?;
    let travel = travel_times(&volcano);
    Ok(max_release_pair(&volcano, &travel, 26))
}
