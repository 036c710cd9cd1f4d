//! Vehicle files.
//!
//! One vehicle per line as `id,lane[,priority]`, e.g. `17,AL2,1`. Blank
//! lines and lines starting with `#` are skipped. Vehicles are released in
//! file order, `per_tick` at a time.

use std::collections::VecDeque;
use std::fmt::Write as _;

use super::{Arrival, ArrivalSource};
use crate::simulation::{Intersection, Vehicle};
use anyhow::{anyhow, bail, Context, Result};
use rand::Rng;

#[derive(Debug)]
pub struct ScriptedArrivals {
    pending: VecDeque<Arrival>,
    per_tick: usize,
}

impl ScriptedArrivals {
    pub fn load_from_file(path: &str, intersection: &Intersection, per_tick: usize) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vehicle file '{}'", path))?;
        Self::parse(&content, intersection, per_tick)
            .with_context(|| format!("Malformed vehicle file '{}'", path))
    }

    pub fn parse(content: &str, intersection: &Intersection, per_tick: usize) -> Result<Self> {
        if per_tick == 0 {
            bail!("Scripted arrivals per tick must be greater than zero");
        }

        let mut pending = VecDeque::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let arrival = parse_line(line, intersection)
                .with_context(|| format!("line {}: '{}'", index + 1, line))?;
            pending.push_back(arrival);
        }

        Ok(Self { pending, per_tick })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

fn parse_line(line: &str, intersection: &Intersection) -> Result<Arrival> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 2 || fields.len() > 3 {
        bail!("expected 'id,lane[,priority]'");
    }

    let id: u64 = fields[0]
        .parse()
        .map_err(|_| anyhow!("vehicle id '{}' is not a non-negative integer", fields[0]))?;

    let lane_id = fields[1];
    let road_id = intersection
        .road_of_lane(lane_id)
        .ok_or_else(|| anyhow!("lane '{}' is not part of the junction", lane_id))?;

    let priority = match fields.get(2).copied() {
        None | Some("") | Some("0") | Some("false") => false,
        Some("1") | Some("true") | Some("p") | Some("priority") => true,
        Some(other) => bail!("unrecognised priority flag '{}'", other),
    };

    let vehicle = if priority {
        Vehicle::priority(id)
    } else {
        Vehicle::new(id)
    };

    Ok(Arrival {
        road_id: road_id.to_string(),
        lane_id: lane_id.to_string(),
        vehicle: vehicle.with_source_lane(lane_id),
    })
}

impl ArrivalSource for ScriptedArrivals {
    fn next_arrivals(&mut self, _tick: u64) -> Result<Vec<Arrival>> {
        let take = self.per_tick.min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Writes `count` random vehicles spread uniformly over `lanes`.
pub fn generate_script<R: Rng>(
    count: usize,
    lanes: &[String],
    priority_probability: f64,
    rng: &mut R,
) -> Result<String> {
    if lanes.is_empty() {
        bail!("Cannot generate vehicles without any lanes");
    }
    if !(0.0..=1.0).contains(&priority_probability) {
        bail!("Priority probability must be in range [0, 1]");
    }

    let mut script = String::new();
    for id in 0..count {
        let lane = &lanes[rng.gen_range(0..lanes.len())];
        if rng.gen_bool(priority_probability) {
            writeln!(script, "{},{},1", id, lane)?;
        } else {
            writeln!(script, "{},{}", id, lane)?;
        }
    }
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntersectionConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn junction() -> Intersection {
        Intersection::new(&IntersectionConfig::default()).unwrap()
    }

    #[test]
    fn releases_in_file_order() {
        let script = "# morning rush\n0,AL1\n1,BL2,1\n\n2,CL3\n";
        let mut source = ScriptedArrivals::parse(script, &junction(), 2).unwrap();
        assert_eq!(source.remaining(), 3);

        let first = source.next_arrivals(0).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].road_id, "A");
        assert_eq!(first[1].lane_id, "BL2");
        assert!(first[1].vehicle.is_priority());

        let second = source.next_arrivals(1).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].vehicle.id().0, 2);
        assert!(source.is_exhausted());
        assert!(source.next_arrivals(2).unwrap().is_empty());
    }

    #[test]
    fn reports_the_offending_line() {
        let script = "0,AL1\nseven,BL1\n";
        let err = ScriptedArrivals::parse(script, &junction(), 1).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn rejects_unknown_lanes() {
        assert!(ScriptedArrivals::parse("0,ZL9\n", &junction(), 1).is_err());
    }

    #[test]
    fn generated_scripts_parse_back() {
        let junction = junction();
        let lanes: Vec<String> = junction.lane_ids().into_iter().map(|(_, lane)| lane).collect();
        let mut rng = StdRng::seed_from_u64(3);

        let script = generate_script(25, &lanes, 0.2, &mut rng).unwrap();
        let source = ScriptedArrivals::parse(&script, &junction, 1).unwrap();
        assert_eq!(source.remaining(), 25);
    }
}
