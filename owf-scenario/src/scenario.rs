use crate::error::{OwfError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Water allocation policy used by the simulation run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// First Come First Served
    Fcfs,
    /// Policy Enforced allocation
    PolicyEnforced,
}

/// Simulation replica. Not every dataset family publishes replicas.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Replica {
    R1,
    R2,
    R3,
    R4,
    R5,
}

impl Replica {
    pub fn code(&self) -> &'static str {
        match self {
            Replica::R1 => "R1",
            Replica::R2 => "R2",
            Replica::R3 => "R3",
            Replica::R4 => "R4",
            Replica::R5 => "R5",
        }
    }
}

impl FromStr for Replica {
    type Err = OwfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "R1" => Ok(Replica::R1),
            "R2" => Ok(Replica::R2),
            "R3" => Ok(Replica::R3),
            "R4" => Ok(Replica::R4),
            "R5" => Ok(Replica::R5),
            other => Err(OwfError::InvalidParameter(format!(
                "unknown replica: {other}"
            ))),
        }
    }
}

/// Demand projection year for population, crops, or livestock.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum ProjectionYear {
    Y2022,
    Y2030,
    Y2040,
    Y2050,
}

impl ProjectionYear {
    pub fn year(&self) -> u16 {
        match self {
            ProjectionYear::Y2022 => 2022,
            ProjectionYear::Y2030 => 2030,
            ProjectionYear::Y2040 => 2040,
            ProjectionYear::Y2050 => 2050,
        }
    }

    pub fn from_year(year: u16) -> Result<Self> {
        match year {
            2022 => Ok(ProjectionYear::Y2022),
            2030 => Ok(ProjectionYear::Y2030),
            2040 => Ok(ProjectionYear::Y2040),
            2050 => Ok(ProjectionYear::Y2050),
            other => Err(OwfError::InvalidParameter(format!(
                "projection year must be one of 2022/2030/2040/2050, got {other}"
            ))),
        }
    }
}

/// The seven parameters describing one simulation scenario.
///
/// Constructed once per comparison side and never mutated afterwards.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub policy: Policy,
    pub replica: Option<Replica>,
    /// Temperature change in degrees C, 0..=5
    pub temperature_delta: u8,
    /// Precipitation change in percent, -30..=30 in steps of 10
    pub precipitation_delta: i8,
    pub population_year: ProjectionYear,
    pub crop_year: ProjectionYear,
    pub livestock_year: ProjectionYear,
}

impl ScenarioParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        policy: Policy,
        replica: Option<Replica>,
        temperature_delta: u8,
        precipitation_delta: i8,
        population_year: ProjectionYear,
        crop_year: ProjectionYear,
        livestock_year: ProjectionYear,
    ) -> Result<Self> {
        if temperature_delta > 5 {
            return Err(OwfError::InvalidParameter(format!(
                "temperature delta must be 0..=5, got {temperature_delta}"
            )));
        }
        if !(-30..=30).contains(&precipitation_delta) || precipitation_delta % 10 != 0 {
            return Err(OwfError::InvalidParameter(format!(
                "precipitation delta must be -30..=30 in steps of 10, got {precipitation_delta}"
            )));
        }
        Ok(ScenarioParameters {
            policy,
            replica,
            temperature_delta,
            precipitation_delta,
            population_year,
            crop_year,
            livestock_year,
        })
    }
}

/// Compact text form used on the command line:
/// `fcfs,R1,dt2,dp0,pop2030,crop2022,liv2030`.
///
/// The replica segment is `-` for dataset families without replicas.
impl FromStr for ScenarioParameters {
    type Err = OwfError;

    fn from_str(s: &str) -> Result<Self> {
        let segments: Vec<&str> = s.split(',').map(str::trim).collect();
        if segments.len() != 7 {
            return Err(OwfError::InvalidParameter(format!(
                "expected 7 comma-separated segments, got {}",
                segments.len()
            )));
        }
        let policy = match segments[0].to_lowercase().as_str() {
            "fcfs" => Policy::Fcfs,
            "pe" => Policy::PolicyEnforced,
            other => {
                return Err(OwfError::InvalidParameter(format!(
                    "policy must be fcfs or pe, got {other}"
                )))
            }
        };
        let replica = match segments[1] {
            "-" => None,
            r => Some(r.parse::<Replica>()?),
        };
        let temperature_delta = parse_prefixed(segments[2], "dt")?;
        let precipitation_delta = parse_prefixed(segments[3], "dp")?;
        let population_year = ProjectionYear::from_year(parse_prefixed(segments[4], "pop")?)?;
        let crop_year = ProjectionYear::from_year(parse_prefixed(segments[5], "crop")?)?;
        let livestock_year = ProjectionYear::from_year(parse_prefixed(segments[6], "liv")?)?;
        ScenarioParameters::new(
            policy,
            replica,
            temperature_delta,
            precipitation_delta,
            population_year,
            crop_year,
            livestock_year,
        )
    }
}

impl fmt::Display for ScenarioParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self.policy {
            Policy::Fcfs => "fcfs",
            Policy::PolicyEnforced => "pe",
        };
        let replica = self.replica.map_or("-", |r| r.code());
        write!(
            f,
            "{policy},{replica},dt{},dp{},pop{},crop{},liv{}",
            self.temperature_delta,
            self.precipitation_delta,
            self.population_year.year(),
            self.crop_year.year(),
            self.livestock_year.year()
        )
    }
}

fn parse_prefixed<T: FromStr>(segment: &str, prefix: &str) -> Result<T> {
    let value = segment
        .strip_prefix(prefix)
        .ok_or_else(|| {
            OwfError::InvalidParameter(format!("segment {segment} must start with {prefix}"))
        })?;
    value.parse::<T>().map_err(|_| {
        OwfError::InvalidParameter(format!("could not parse numeric value in {segment}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> ScenarioParameters {
        ScenarioParameters::new(
            Policy::Fcfs,
            Some(Replica::R1),
            2,
            0,
            ProjectionYear::Y2030,
            ProjectionYear::Y2022,
            ProjectionYear::Y2030,
        )
        .unwrap()
    }

    #[test]
    fn test_compact_form_round_trip() {
        let params = baseline();
        let text = params.to_string();
        assert_eq!(text, "fcfs,R1,dt2,dp0,pop2030,crop2022,liv2030");
        let parsed: ScenarioParameters = text.parse().unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_compact_form_without_replica() {
        let parsed: ScenarioParameters = "pe,-,dt0,dp-10,pop2050,crop2040,liv2022"
            .parse()
            .unwrap();
        assert_eq!(parsed.policy, Policy::PolicyEnforced);
        assert_eq!(parsed.replica, None);
        assert_eq!(parsed.precipitation_delta, -10);
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let result = ScenarioParameters::new(
            Policy::Fcfs,
            None,
            6,
            0,
            ProjectionYear::Y2030,
            ProjectionYear::Y2030,
            ProjectionYear::Y2030,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_off_step_precipitation() {
        let result = ScenarioParameters::new(
            Policy::Fcfs,
            None,
            0,
            5,
            ProjectionYear::Y2030,
            ProjectionYear::Y2030,
            ProjectionYear::Y2030,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unknown_projection_year() {
        assert!(ProjectionYear::from_year(2025).is_err());
    }
}
