use std::fmt;
use std::str::FromStr;

use crate::error::UplinkError;

/// Heat-pump channels with a fixed parameter ID and cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Series {
    OutdoorTemp,
    BrineInTemp,
    BrineOutTemp,
    HotWaterCharging,
    HotWaterTop,
    ReturnLineTemp,
    SupplyLineTemp,
}

impl Series {
    pub const ALL: [Series; 7] = [
        Series::OutdoorTemp,
        Series::BrineInTemp,
        Series::BrineOutTemp,
        Series::HotWaterCharging,
        Series::HotWaterTop,
        Series::ReturnLineTemp,
        Series::SupplyLineTemp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Series::OutdoorTemp => "outdoor",
            Series::BrineInTemp => "brine_in",
            Series::BrineOutTemp => "brine_out",
            Series::HotWaterCharging => "hot_water_charging",
            Series::HotWaterTop => "hot_water_top",
            Series::ReturnLineTemp => "return_line",
            Series::SupplyLineTemp => "supply_line",
        }
    }

    pub fn parameter_id(self) -> u32 {
        match self {
            Series::OutdoorTemp => 4,
            Series::BrineInTemp => 13,
            Series::BrineOutTemp => 14,
            Series::HotWaterCharging => 12,
            Series::HotWaterTop => 11,
            Series::ReturnLineTemp => 10,
            Series::SupplyLineTemp => 8,
        }
    }

    /// Name of the cache file holding this series' history.
    pub fn cache_key(self) -> &'static str {
        match self {
            Series::OutdoorTemp => "outdoor_temp",
            Series::BrineInTemp => "brine_in_temp",
            Series::BrineOutTemp => "brine_out_temp",
            Series::HotWaterCharging => "hot_water_charging",
            Series::HotWaterTop => "hot_water_top",
            Series::ReturnLineTemp => "return-line-temp",
            Series::SupplyLineTemp => "supply-line-temp",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Series {
    type Err = UplinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Series::ALL
            .into_iter()
            .find(|series| series.name() == s || series.cache_key() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Series::ALL.iter().map(|s| s.name()).collect();
                UplinkError::Config(format!(
                    "unknown series '{s}'; expected one of {}",
                    names.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_lookup_table() {
        let table: Vec<(&str, u32)> = Series::ALL
            .iter()
            .map(|s| (s.name(), s.parameter_id()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("outdoor", 4),
                ("brine_in", 13),
                ("brine_out", 14),
                ("hot_water_charging", 12),
                ("hot_water_top", 11),
                ("return_line", 10),
                ("supply_line", 8),
            ]
        );
    }

    #[test]
    fn test_parse_by_name_or_cache_key() {
        assert_eq!("outdoor".parse::<Series>().unwrap(), Series::OutdoorTemp);
        assert_eq!("return-line-temp".parse::<Series>().unwrap(), Series::ReturnLineTemp);
        assert!("indoor".parse::<Series>().is_err());
    }

    #[test]
    fn test_cache_keys_are_unique() {
        let mut keys: Vec<&str> = Series::ALL.iter().map(|s| s.cache_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Series::ALL.len());
    }
}
